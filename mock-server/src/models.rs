//! Wire shapes of the quest service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkbox {
    pub name: String,
    pub checked: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub name: String,
    pub description: String,
    pub deadline: f64,
    pub difficulty: i64,
    pub checkboxes: Vec<Checkbox>,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateQuest {
    pub name: String,
    pub description: String,
    pub deadline: f64,
    pub difficulty: i64,
    #[serde(default)]
    pub checkboxes: Vec<String>,
    #[serde(default)]
    pub prereqs: Vec<Uuid>,
}

#[derive(Deserialize, Default)]
pub struct UpdateQuest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<f64>,
    pub difficulty: Option<i64>,
}

#[derive(Deserialize)]
pub struct ReplaceCheckboxes {
    pub names: Vec<String>,
    pub checked: Vec<bool>,
}

#[derive(Deserialize, Default)]
pub struct UpdateCheckbox {
    pub name: Option<String>,
    pub checked: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Daily {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDaily {
    pub name: String,
    pub description: String,
}

#[derive(Deserialize, Default)]
pub struct UpdateDaily {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegularQuest {
    pub name: String,
    pub description: String,
    pub difficulty: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Regular {
    pub quest: RegularQuest,
    pub min_cooldown: f64,
    pub max_cooldown: f64,
}

#[derive(Deserialize)]
pub struct CreateRegular {
    pub name: String,
    pub description: String,
    pub difficulty: i64,
    pub min_cooldown: f64,
    pub max_cooldown: f64,
}

#[derive(Deserialize, Default)]
pub struct UpdateRegular {
    pub name: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<i64>,
    pub min_cooldown: Option<f64>,
    pub max_cooldown: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub last_seen: f64,
    pub experience: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rewards {
    pub experience: i64,
}
