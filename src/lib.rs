//! withinha turns survey, post, journal and counseling records into their
//! external representation and back.

#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
pub mod crypto;
pub mod error;
pub mod model;
pub mod serializer;
pub mod store;
pub mod telemetry;

use std::sync::Arc;

use clock::{Clock, SystemClock};
use crypto::PasswordManager;
use store::Store;
use store::memory::MemoryStore;
use store::postgres::{
    DEFAULT_CREDENTIALS, DEFAULT_DATABASE_NAME, DEFAULT_POOL_SIZE, PgStore,
};

pub use error::{Error, Result};

/// State shared with the layer serving requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Configuration>,
    pub store: Arc<dyn Store>,
    pub crypto: Arc<PasswordManager>,
    pub clock: Arc<dyn Clock>,
}

/// Initialize the application state.
pub async fn initialize_state(
    config: Arc<config::Configuration>,
) -> Result<AppState> {
    let store: Arc<dyn Store> = match config.postgres {
        Some(ref config) => {
            let store = PgStore::connect(
                &config.address,
                config.username.as_deref().unwrap_or(DEFAULT_CREDENTIALS),
                config.password.as_deref().unwrap_or(DEFAULT_CREDENTIALS),
                config.database.as_deref().unwrap_or(DEFAULT_DATABASE_NAME),
                config.pool_size.unwrap_or(DEFAULT_POOL_SIZE),
            )
            .await?;

            // execute migrations scripts on start.
            store.migrate().await?;

            Arc::new(store)
        },
        None => {
            tracing::warn!(
                "missing `postgres` entry on `config.yaml` file, records are kept in memory"
            );
            Arc::new(MemoryStore::new())
        },
    };

    let crypto = Arc::new(PasswordManager::new(config.argon2.clone())?);

    Ok(AppState {
        config,
        store,
        crypto,
        clock: Arc::new(SystemClock),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::{mypage, post, signup, validate};

    #[tokio::test]
    async fn test_memory_state_round() {
        let mut config = config::Configuration::default();
        config.argon2 = Some(config::Argon2 {
            memory_cost: 1024,
            iterations: 1,
            parallelism: 1,
            hash_length: 32,
        });
        let state = initialize_state(Arc::new(config)).await.unwrap();

        let body = validate::<signup::Body>(serde_json::json!({
            "email": "state@withinha.kr",
            "username": "state",
            "nickname": "state",
            "birth_date": "1990-01-01",
            "gender": "F",
            "phone_number": "010-2222-3333",
            "password": "secret",
            "password_confirm": "secret",
        }))
        .unwrap();
        let user = signup::create(body, state.store.as_ref(), &state.crypto)
            .await
            .unwrap();

        let body = validate::<post::Body>(serde_json::json!({
            "title": "hi",
            "content": "there",
        }))
        .unwrap();
        let created = post::create(body, user.id, state.store.as_ref())
            .await
            .unwrap();
        assert_eq!(post::to_external(&created, Some(user.id)).author_name, "state");

        let page = mypage::aggregate(state.store.as_ref(), user.id, state.clock.as_ref())
            .await
            .unwrap();
        assert_eq!(page.survey_score, None);
    }
}
