//! Typed views of the service's resources.
//!
//! # Design
//! The client passes JSON through untouched; these types are for callers
//! that want to work with structs instead. They mirror the wire shapes but
//! stay independent from the mock server's own types, so integration tests
//! catch drift between the two.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Payload for `POST quests`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuest {
    pub name: String,
    pub description: String,
    pub deadline: f64,
    pub difficulty: i64,
    #[serde(default)]
    pub checkboxes: Vec<String>,
    #[serde(default)]
    pub prereqs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkbox {
    pub name: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub name: String,
    pub description: String,
    pub deadline: f64,
    pub difficulty: i64,
    #[serde(default)]
    pub checkboxes: Vec<Checkbox>,
    #[serde(default)]
    pub completed: bool,
}

/// Response of `POST quests`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedQuest {
    pub uuid: String,
    pub quest: Quest,
    pub prereqs: Vec<String>,
}

/// Quest lists (`quests`, `quests/active`, `quests/daily`) keyed by uuid.
pub type QuestMap = BTreeMap<String, Quest>;

/// Payload for `PUT quests/{id}/checkboxes`. Both lists must have the same
/// length; entry `i` of `checked` belongs to entry `i` of `names`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckboxUpdate {
    pub names: Vec<String>,
    pub checked: Vec<bool>,
}

impl CheckboxUpdate {
    pub fn from_checkboxes(checkboxes: &[Checkbox]) -> Self {
        Self {
            names: checkboxes.iter().map(|c| c.name.clone()).collect(),
            checked: checkboxes.iter().map(|c| c.checked).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub last_seen: f64,
    #[serde(default)]
    pub experience: i64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn new_quest_defaults_lists() {
        let quest: NewQuest = serde_json::from_value(json!({
            "name": "n", "description": "d", "deadline": 10.5, "difficulty": 3
        }))
        .unwrap();
        assert!(quest.checkboxes.is_empty());
        assert!(quest.prereqs.is_empty());
    }

    #[test]
    fn checkbox_update_pairs_names_with_flags() {
        let update = CheckboxUpdate::from_checkboxes(&[
            Checkbox {
                name: "a".to_string(),
                checked: true,
            },
            Checkbox {
                name: "b".to_string(),
                checked: false,
            },
        ]);
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"names": ["a", "b"], "checked": [true, false]})
        );
    }
}
