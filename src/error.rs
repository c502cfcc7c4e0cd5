//! Error handler for withinha.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::crypto::CryptoError;
use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while transcoding records.
#[derive(Debug, Error)]
pub enum Error {
    #[error("validation error occurred")]
    Validation(#[from] ValidationErrors),

    #[error("error parsing body: {0}")]
    Parsing(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl Error {
    /// Field-keyed messages when the error is a validation failure.
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            Error::Validation(errors) => Some(field_errors(errors)),
            _ => None,
        }
    }
}

/// Messages keyed by field path, e.g. `goals[1].text`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Structure for detailed error responses.
#[derive(Debug, Serialize)]
pub struct ResponseError {
    pub title: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl From<&Error> for ResponseError {
    fn from(err: &Error) -> Self {
        let title = match err {
            Error::Validation(_) => "There were validation errors with your request.",
            Error::Parsing(_) => "Server error during data parsing.",
            Error::Store(_) | Error::Crypto(_) => "Internal server error.",
        };

        Self {
            title: title.to_owned(),
            detail: err.to_string(),
            errors: err.field_errors(),
        }
    }
}

/// Flatten nested [`ValidationErrors`] into a path-keyed map.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    collect(errors, None, &mut out);
    out
}

fn collect(errors: &ValidationErrors, prefix: Option<&str>, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(issues) => {
                out.entry(path).or_default().extend(issues.iter().map(|issue| {
                    issue
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| issue.code.to_string())
                }));
            },
            ValidationErrorsKind::Struct(inner) => collect(inner, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, Some(&format!("{path}[{index}]")), out);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_field_errors_use_message_or_code() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "password_confirm",
            ValidationError::new("must_match").with_message("Passwords do not match.".into()),
        );
        errors.add("email", ValidationError::new("email"));

        let fields = field_errors(&errors);
        assert_eq!(fields["password_confirm"], vec!["Passwords do not match."]);
        assert_eq!(fields["email"], vec!["email"]);
    }

    #[test]
    fn test_response_error_only_lists_fields_for_validation() {
        let err = Error::from(StoreError::Conflict("taken".into()));
        let response = ResponseError::from(&err);

        assert!(response.errors.is_none());
        assert_eq!(response.detail, "conflict: taken");
    }
}
