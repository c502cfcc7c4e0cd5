//! Transcoding between records and their external representation.
//!
//! Every module exposes a writable `Body` (decoded and validated through
//! [`validate`]) and a read-side `Response` built by `to_external`.

pub mod bundle;
pub mod comment;
pub mod counsel;
pub mod day;
pub mod diary;
pub mod goal;
pub mod login;
pub mod mypage;
pub mod post;
pub mod signup;
pub mod survey;

use std::ops::Deref;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::error::Result;

/// Body that passed every declared rule.
#[derive(Clone, Debug, PartialEq)]
pub struct Validated<T>(T);

impl<T: Validate> Validated<T> {
    /// Run validation rules on an already decoded body.
    pub fn new(body: T) -> Result<Self> {
        body.validate()?;
        Ok(Self(body))
    }
}

impl<T> Validated<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

/// Decode a raw JSON body into `T` and check its rules.
pub fn validate<T>(raw: serde_json::Value) -> Result<Validated<T>>
where
    T: DeserializeOwned + Validate,
{
    let body = serde_json::from_value::<T>(raw)?;
    Validated::new(body)
}

const PHONE_NUMBER_LENGTH: std::ops::RangeInclusive<usize> = 7..=20;

static PHONE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9][0-9 -]*[0-9]$").expect("valid phone number pattern")
});

/// Check that a phone number only has digits, spaces, `-` and a leading `+`,
/// within 7 to 20 characters.
pub(crate) fn validate_phone_number(
    value: &str,
) -> std::result::Result<(), ValidationError> {
    if PHONE_NUMBER_LENGTH.contains(&value.len()) && PHONE_NUMBER.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("phone_number")
            .with_message("Phone number must be formatted.".into()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::User;
    use crate::serializer::signup;
    use crate::store::memory::MemoryStore;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Sign a user up on `store` with a fixed profile.
    pub async fn sign_up(store: &MemoryStore, username: &str) -> User {
        let body = validate::<signup::Body>(serde_json::json!({
            "email": format!("{username}@withinha.kr"),
            "username": username,
            "nickname": username,
            "birth_date": "2000-06-15",
            "gender": "F",
            "phone_number": "010-1234-5678",
            "password": "P$soW%920$n&",
            "password_confirm": "P$soW%920$n&",
        }))
        .unwrap();

        signup::create(body, store, &crate::crypto::test_manager())
            .await
            .unwrap()
    }

    #[test]
    fn test_phone_number() {
        assert!(validate_phone_number("010-1234-5678").is_ok());
        assert!(validate_phone_number("+82 10 1234 5678").is_ok());
        assert!(validate_phone_number("01012345678").is_ok());
        assert!(validate_phone_number("call me").is_err());
        assert!(validate_phone_number("123").is_err());
        assert!(validate_phone_number("010-1234-567-").is_err());

        // 7 to 20 characters, leading `+` included.
        assert!(validate_phone_number("1234567").is_ok());
        assert!(validate_phone_number("123456").is_err());
        assert!(validate_phone_number(&format!("+{}", "1".repeat(19))).is_ok());
        assert!(validate_phone_number(&format!("+{}", "1".repeat(20))).is_err());
        assert!(validate_phone_number(&"1".repeat(21)).is_err());
    }
}
