use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::UserId;

/// User as saved on database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub nickname: String,
    pub birth_date: NaiveDate,
    pub gender: String,
    pub phone_number: String,
    /// Argon2id PHC string.
    #[serde(skip)]
    pub password: String,
}

/// User fields handed to the store, credential already hashed.
#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub nickname: String,
    pub birth_date: NaiveDate,
    pub gender: String,
    pub phone_number: String,
    pub password_hash: String,
}
