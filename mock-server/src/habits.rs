//! Recurring tasks: dailies and regulars.
//!
//! A daily owns a companion quest with the same uuid, which is what
//! `quests/daily` lists. Deleting the daily deletes that quest too.

use axum::{body::Bytes, extract::State};
use serde_json::json;
use uuid::Uuid;

use crate::models::{
    CreateDaily, CreateRegular, Daily, Quest, Regular, RegularQuest, UpdateDaily, UpdateRegular,
};
use crate::reply::{ok, ok_empty, payload, payload_or_default, Failure, Id, Reply};
use crate::state::{now, MockState, QuestRecord};

const DAY_SECS: f64 = 86_400.0;

fn daily_not_found() -> Failure {
    Failure::not_found("daily not found")
}

fn regular_not_found() -> Failure {
    Failure::not_found("regular not found")
}

pub async fn list_dailies(State(state): State<MockState>) -> Reply {
    let db = state.db().read().await;
    let dailies: std::collections::BTreeMap<String, &Daily> =
        db.dailies.iter().map(|(id, daily)| (id.to_string(), daily)).collect();
    ok(dailies)
}

pub async fn create_daily(State(state): State<MockState>, body: Bytes) -> Reply {
    let input: CreateDaily = payload(&body)?;
    let daily = Daily {
        name: input.name,
        description: input.description,
    };
    let companion = Quest {
        name: daily.name.clone(),
        description: daily.description.clone(),
        deadline: now() + DAY_SECS,
        difficulty: 1,
        checkboxes: Vec::new(),
        completed: false,
    };

    let id = Uuid::new_v4();
    let mut db = state.db().write().await;
    db.dailies.insert(id, daily.clone());
    db.quests.insert(
        id,
        QuestRecord {
            quest: companion,
            prereqs: Vec::new(),
            daily: true,
        },
    );
    ok(json!({ "uuid": id, "daily": daily }))
}

pub async fn get_daily(State(state): State<MockState>, Id(id): Id<Uuid>) -> Reply {
    let db = state.db().read().await;
    ok(db.dailies.get(&id).ok_or_else(daily_not_found)?)
}

pub async fn update_daily(
    State(state): State<MockState>,
    Id(id): Id<Uuid>,
    body: Bytes,
) -> Reply {
    let input: UpdateDaily = payload_or_default(&body)?;
    let mut db = state.db().write().await;
    let daily = db.dailies.get_mut(&id).ok_or_else(daily_not_found)?;
    if let Some(name) = input.name {
        daily.name = name;
    }
    if let Some(description) = input.description {
        daily.description = description;
    }
    let daily = daily.clone();
    if let Some(record) = db.quests.get_mut(&id) {
        record.quest.name = daily.name.clone();
        record.quest.description = daily.description.clone();
    }
    ok(daily)
}

pub async fn remove_daily(State(state): State<MockState>, Id(id): Id<Uuid>) -> Reply {
    let mut db = state.db().write().await;
    db.dailies.remove(&id).ok_or_else(daily_not_found)?;
    db.quests.remove(&id);
    ok_empty()
}

fn validate_cooldowns(min_cooldown: f64, max_cooldown: f64) -> Result<(), Failure> {
    if min_cooldown < 0.0 {
        return Err(Failure::bad_request("min_cooldown must not be negative"));
    }
    if max_cooldown <= min_cooldown {
        return Err(Failure::bad_request(
            "max_cooldown must be greater than min_cooldown",
        ));
    }
    Ok(())
}

pub async fn list_regulars(State(state): State<MockState>) -> Reply {
    let db = state.db().read().await;
    let regulars: std::collections::BTreeMap<String, &Regular> = db
        .regulars
        .iter()
        .map(|(id, regular)| (id.to_string(), regular))
        .collect();
    ok(regulars)
}

pub async fn create_regular(State(state): State<MockState>, body: Bytes) -> Reply {
    let input: CreateRegular = payload(&body)?;
    validate_cooldowns(input.min_cooldown, input.max_cooldown)?;
    let regular = Regular {
        quest: RegularQuest {
            name: input.name,
            description: input.description,
            difficulty: input.difficulty,
        },
        min_cooldown: input.min_cooldown,
        max_cooldown: input.max_cooldown,
    };

    let id = Uuid::new_v4();
    state.db().write().await.regulars.insert(id, regular.clone());
    ok(json!({ "uuid": id, "regular": regular }))
}

pub async fn get_regular(State(state): State<MockState>, Id(id): Id<Uuid>) -> Reply {
    let db = state.db().read().await;
    ok(db.regulars.get(&id).ok_or_else(regular_not_found)?)
}

pub async fn update_regular(
    State(state): State<MockState>,
    Id(id): Id<Uuid>,
    body: Bytes,
) -> Reply {
    let input: UpdateRegular = payload_or_default(&body)?;
    let mut db = state.db().write().await;
    let regular = db.regulars.get_mut(&id).ok_or_else(regular_not_found)?;

    let min_cooldown = input.min_cooldown.unwrap_or(regular.min_cooldown);
    let max_cooldown = input.max_cooldown.unwrap_or(regular.max_cooldown);
    validate_cooldowns(min_cooldown, max_cooldown)?;

    regular.min_cooldown = min_cooldown;
    regular.max_cooldown = max_cooldown;
    if let Some(name) = input.name {
        regular.quest.name = name;
    }
    if let Some(description) = input.description {
        regular.quest.description = description;
    }
    if let Some(difficulty) = input.difficulty {
        regular.quest.difficulty = difficulty;
    }
    ok(&*regular)
}

pub async fn remove_regular(State(state): State<MockState>, Id(id): Id<Uuid>) -> Reply {
    let mut db = state.db().write().await;
    db.regulars.remove(&id).ok_or_else(regular_not_found)?;
    ok_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldowns_must_be_ordered_and_non_negative() {
        assert!(validate_cooldowns(0.0, 1.0).is_ok());
        assert!(validate_cooldowns(-1.0, 5.0).is_err());
        assert!(validate_cooldowns(3.0, 3.0).is_err());
        assert!(validate_cooldowns(4.0, 2.0).is_err());
    }
}
