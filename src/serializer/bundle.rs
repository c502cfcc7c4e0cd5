//! Several goals and one diary entry submitted together.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Validated, diary, goal};
use crate::error::Result;
use crate::model::{Day, DiaryEntry, Goal, UserId};
use crate::store::JournalStore;

#[derive(Debug, Deserialize, Validate)]
pub struct Body {
    #[validate(nested)]
    pub goals: Vec<goal::Body>,
    #[validate(nested)]
    pub diary_entry: diary::Body,
}

/// Records created by [`create`].
#[derive(Debug, PartialEq)]
pub struct Created {
    pub goals: Vec<(Goal, Day)>,
    pub diary_entry: (DiaryEntry, Day),
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub goals: Vec<goal::Response>,
    pub diary_entry: diary::Response,
}

/// Create each goal in order, then the diary entry.
///
/// Nothing is rolled back: on failure the records created so far remain and
/// the error is returned.
pub async fn create<S>(
    body: Validated<Body>,
    user: UserId,
    store: &S,
) -> Result<Created>
where
    S: JournalStore + ?Sized,
{
    let Body { goals, diary_entry } = body.into_inner();

    let mut created = Vec::with_capacity(goals.len());
    for body in goals {
        created.push(goal::create_unchecked(body, user, store).await?);
    }

    let diary_entry = diary::create_unchecked(diary_entry, user, store).await?;

    tracing::info!(
        user_id = %user,
        goals = created.len(),
        diary_entry_id = %diary_entry.0.id,
        "goals and diary entry created"
    );

    Ok(Created {
        goals: created,
        diary_entry,
    })
}

pub fn to_external(created: &Created) -> Response {
    let (entry, day) = &created.diary_entry;

    Response {
        goals: created
            .goals
            .iter()
            .map(|(goal, day)| goal::to_external(goal, day))
            .collect(),
        diary_entry: diary::to_external(entry, day),
    }
}
