//! Sign-up, optionally with the first survey answers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Validated;
use crate::crypto::PasswordManager;
use crate::error::Result;
use crate::model::{Answers, NewUser, User, UserId};
use crate::store::{SurveyStore, UserStore};

#[derive(Debug, Deserialize, Validate)]
pub struct Body {
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(length(
        min = 1,
        max = 150,
        message = "Username must contain between 1 and 150 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 1,
        max = 30,
        message = "Nickname must contain between 1 and 30 characters."
    ))]
    pub nickname: String,
    pub birth_date: NaiveDate,
    #[validate(length(min = 1, max = 10, message = "Gender is required."))]
    pub gender: String,
    #[validate(custom(function = "crate::serializer::validate_phone_number"))]
    pub phone_number: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
    #[validate(must_match(
        other = "password",
        message = "Passwords do not match."
    ))]
    pub password_confirm: String,
    /// Answer sets stored once the user exists.
    #[serde(default)]
    #[validate(nested)]
    pub survey_responses: Vec<Answers>,
}

/// Created user. The credential is write-only.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub nickname: String,
    pub birth_date: NaiveDate,
    pub gender: String,
    pub phone_number: String,
}

/// Hash the credential, persist the user, then store each submitted answer
/// set linked to it.
///
/// Not atomic: if a survey response fails, the user and the responses
/// stored before it remain and the store error is returned.
pub async fn create<S>(
    body: Validated<Body>,
    store: &S,
    pwd: &PasswordManager,
) -> Result<User>
where
    S: UserStore + SurveyStore + ?Sized,
{
    let Body {
        email,
        username,
        nickname,
        birth_date,
        gender,
        phone_number,
        password,
        password_confirm: _,
        survey_responses,
    } = body.into_inner();

    let password_hash = pwd.hash_password(&password)?;

    let user = store
        .create_user(NewUser {
            email,
            username,
            nickname,
            birth_date,
            gender,
            phone_number,
            password_hash,
        })
        .await?;

    for answers in survey_responses.iter() {
        store.create_survey_response(user.id, *answers).await?;
    }

    tracing::info!(
        user_id = %user.id,
        survey_responses = survey_responses.len(),
        "user signed up"
    );

    Ok(user)
}

pub fn to_external(user: &User) -> Response {
    Response {
        id: user.id,
        email: user.email.clone(),
        username: user.username.clone(),
        nickname: user.nickname.clone(),
        birth_date: user.birth_date,
        gender: user.gender.clone(),
        phone_number: user.phone_number.clone(),
    }
}
