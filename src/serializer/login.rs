//! Credential check.

use serde::Deserialize;
use validator::Validate;

use super::Validated;
use crate::crypto::PasswordManager;
use crate::error::{Error, Result};
use crate::model::User;
use crate::store::UserStore;

#[derive(Debug, Deserialize, Validate)]
pub struct Body {
    /// Username of the account.
    #[validate(length(min = 1, message = "ID is required."))]
    pub id: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

/// Find the user named by `id` and check the password against its hash.
///
/// An unknown user and a wrong password give the same error.
pub async fn authenticate<S>(
    body: Validated<Body>,
    store: &S,
    pwd: &PasswordManager,
) -> Result<User>
where
    S: UserStore + ?Sized,
{
    let Some(user) = store.find_user_by_username(&body.id).await? else {
        tracing::debug!(id = %body.id, "login for unknown user");
        return Err(Error::Validation(PasswordManager::invalid_password()));
    };

    pwd.verify_password(&body.password, &user.password)?;

    Ok(user)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::serializer::tests::sign_up;
    use crate::serializer::validate;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn test_authenticate() {
        let store = MemoryStore::new();
        let pwd = crate::crypto::test_manager();
        let user = sign_up(&store, "member").await;

        let body = validate::<Body>(json!({ "id": "member", "password": "P$soW%920$n&" }))
            .unwrap();
        assert_eq!(authenticate(body, &store, &pwd).await.unwrap().id, user.id);

        let body = validate::<Body>(json!({ "id": "member", "password": "guess" }))
            .unwrap();
        let err = authenticate(body, &store, &pwd).await.unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("password"));

        let body = validate::<Body>(json!({ "id": "nobody", "password": "guess" }))
            .unwrap();
        let err = authenticate(body, &store, &pwd).await.unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("password"));
    }
}
