//! Quest and checkbox routes.

use std::collections::BTreeMap;

use axum::{body::Bytes, extract::State};
use serde_json::json;
use uuid::Uuid;

use crate::models::{
    Checkbox, CreateQuest, Quest, ReplaceCheckboxes, Rewards, UpdateCheckbox, UpdateQuest,
};
use crate::reply::{ok, ok_empty, payload, payload_or_default, Failure, Id, Reply};
use crate::state::{now, Db, MockState, QuestRecord};

fn quest_not_found() -> Failure {
    Failure::not_found("quest not found")
}

fn quest_map<'a>(db: &'a Db, keep: impl Fn(&QuestRecord) -> bool) -> BTreeMap<String, &'a Quest> {
    db.quests
        .iter()
        .filter(|(_, record)| keep(*record))
        .map(|(id, record)| (id.to_string(), &record.quest))
        .collect()
}

pub async fn list(State(state): State<MockState>) -> Reply {
    let db = state.db().read().await;
    ok(quest_map(&db, |_| true))
}

pub async fn list_active(State(state): State<MockState>) -> Reply {
    let now = now();
    let db = state.db().read().await;
    ok(quest_map(&db, |r| !r.quest.completed && r.quest.deadline > now))
}

pub async fn list_daily(State(state): State<MockState>) -> Reply {
    let db = state.db().read().await;
    ok(quest_map(&db, |r| r.daily))
}

pub async fn create(State(state): State<MockState>, body: Bytes) -> Reply {
    let input: CreateQuest = payload(&body)?;
    let mut db = state.db().write().await;

    if let Some(missing) = input.prereqs.iter().find(|id| !db.quests.contains_key(*id)) {
        return Err(Failure::bad_request(format!("unknown prerequisite {missing}")));
    }

    let quest = Quest {
        name: input.name,
        description: input.description,
        deadline: input.deadline,
        difficulty: input.difficulty,
        checkboxes: input
            .checkboxes
            .into_iter()
            .map(|name| Checkbox {
                name,
                checked: false,
            })
            .collect(),
        completed: false,
    };
    let id = Uuid::new_v4();
    db.quests.insert(
        id,
        QuestRecord {
            quest: quest.clone(),
            prereqs: input.prereqs.clone(),
            daily: false,
        },
    );
    ok(json!({ "uuid": id, "quest": quest, "prereqs": input.prereqs }))
}

pub async fn get_one(State(state): State<MockState>, Id(id): Id<Uuid>) -> Reply {
    let db = state.db().read().await;
    let record = db.quests.get(&id).ok_or_else(quest_not_found)?;
    ok(&record.quest)
}

pub async fn update(State(state): State<MockState>, Id(id): Id<Uuid>, body: Bytes) -> Reply {
    let input: UpdateQuest = payload_or_default(&body)?;
    let mut db = state.db().write().await;
    let quest = &mut db.quests.get_mut(&id).ok_or_else(quest_not_found)?.quest;
    if let Some(name) = input.name {
        quest.name = name;
    }
    if let Some(description) = input.description {
        quest.description = description;
    }
    if let Some(deadline) = input.deadline {
        quest.deadline = deadline;
    }
    if let Some(difficulty) = input.difficulty {
        quest.difficulty = difficulty;
    }
    ok(&*quest)
}

pub async fn remove(State(state): State<MockState>, Id(id): Id<Uuid>) -> Reply {
    let mut db = state.db().write().await;
    db.quests.remove(&id).ok_or_else(quest_not_found)?;
    ok_empty()
}

pub async fn complete(State(state): State<MockState>, Id(id): Id<Uuid>) -> Reply {
    let mut db = state.db().write().await;
    let quest = &mut db.quests.get_mut(&id).ok_or_else(quest_not_found)?.quest;
    if quest.completed {
        return Err(Failure::bad_request("quest already completed"));
    }
    quest.completed = true;
    let quest = quest.clone();
    let rewards = Rewards {
        experience: quest.difficulty,
    };
    db.player.experience += rewards.experience;
    ok(json!({ "quest": quest, "rewards": rewards }))
}

pub async fn checkboxes(State(state): State<MockState>, Id(id): Id<Uuid>) -> Reply {
    let db = state.db().read().await;
    let record = db.quests.get(&id).ok_or_else(quest_not_found)?;
    ok(&record.quest.checkboxes)
}

pub async fn replace_checkboxes(
    State(state): State<MockState>,
    Id(id): Id<Uuid>,
    body: Bytes,
) -> Reply {
    let input: ReplaceCheckboxes = payload(&body)?;
    if input.names.len() != input.checked.len() {
        return Err(Failure::bad_request(
            "names and checked must have the same length",
        ));
    }
    let mut db = state.db().write().await;
    let quest = &mut db.quests.get_mut(&id).ok_or_else(quest_not_found)?.quest;
    quest.checkboxes = input
        .names
        .into_iter()
        .zip(input.checked)
        .map(|(name, checked)| Checkbox { name, checked })
        .collect();
    ok(&quest.checkboxes)
}

pub async fn checkbox(
    State(state): State<MockState>,
    Id((id, index)): Id<(Uuid, usize)>,
) -> Reply {
    let db = state.db().read().await;
    let record = db.quests.get(&id).ok_or_else(quest_not_found)?;
    let checkbox = record
        .quest
        .checkboxes
        .get(index)
        .ok_or_else(|| Failure::not_found("checkbox not found"))?;
    ok(checkbox)
}

pub async fn update_checkbox(
    State(state): State<MockState>,
    Id((id, index)): Id<(Uuid, usize)>,
    body: Bytes,
) -> Reply {
    let input: UpdateCheckbox = payload_or_default(&body)?;
    let mut db = state.db().write().await;
    let quest = &mut db.quests.get_mut(&id).ok_or_else(quest_not_found)?.quest;
    let checkbox = quest
        .checkboxes
        .get_mut(index)
        .ok_or_else(|| Failure::not_found("checkbox not found"))?;
    if let Some(name) = input.name {
        checkbox.name = name;
    }
    if let Some(checked) = input.checked {
        checkbox.checked = checked;
    }
    ok(&*checkbox)
}
