use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DayId, DiaryEntryId, GoalId, UserId};

/// Calendar day. Unique by `date`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Day {
    pub id: DayId,
    pub date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Goal {
    pub id: GoalId,
    #[sqlx(rename = "day_id")]
    pub day: DayId,
    #[sqlx(rename = "user_id")]
    pub user: UserId,
    pub text: String,
    pub is_completed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewGoal {
    pub day: DayId,
    pub user: UserId,
    pub text: String,
    pub is_completed: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DiaryEntry {
    pub id: DiaryEntryId,
    #[sqlx(rename = "day_id")]
    pub day: DayId,
    #[sqlx(rename = "user_id")]
    pub user: UserId,
    pub title: String,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewDiaryEntry {
    pub day: DayId,
    pub user: UserId,
    pub title: String,
    pub content: String,
}
