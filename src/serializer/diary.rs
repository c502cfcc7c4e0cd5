//! Diary entries attached to a day.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Validated, day};
use crate::error::Result;
use crate::model::{Day, DiaryEntry, DiaryEntryId, NewDiaryEntry, UserId};
use crate::store::JournalStore;

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct Body {
    #[validate(nested)]
    pub day: day::Body,
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must contain between 1 and 200 characters."
    ))]
    pub title: String,
    pub content: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: DiaryEntryId,
    pub day: day::Response,
    pub title: String,
    pub content: String,
}

/// Resolve the nested day, then persist the entry of `user` on it.
pub async fn create<S>(
    body: Validated<Body>,
    user: UserId,
    store: &S,
) -> Result<(DiaryEntry, Day)>
where
    S: JournalStore + ?Sized,
{
    create_unchecked(body.into_inner(), user, store).await
}

pub(super) async fn create_unchecked<S>(
    body: Body,
    user: UserId,
    store: &S,
) -> Result<(DiaryEntry, Day)>
where
    S: JournalStore + ?Sized,
{
    let day = day::resolve(&body.day, store).await?;

    let entry = store
        .create_diary_entry(NewDiaryEntry {
            day: day.id,
            user,
            title: body.title,
            content: body.content,
        })
        .await?;

    Ok((entry, day))
}

pub fn to_external(entry: &DiaryEntry, day: &Day) -> Response {
    Response {
        id: entry.id,
        day: day::to_external(day),
        title: entry.title.clone(),
        content: entry.content.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::serializer::tests::sign_up;
    use crate::serializer::{goal, validate};
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn test_diary_and_goal_share_day() {
        let store = MemoryStore::new();
        let user = sign_up(&store, "writer").await;

        let goal = validate::<goal::Body>(json!({
            "day": { "date": "2024-06-15" },
            "text": "Write",
        }))
        .unwrap();
        let entry = validate::<Body>(json!({
            "day": { "date": "2024-06-15" },
            "title": "Saturday",
            "content": "Wrote a lot.",
        }))
        .unwrap();

        let (_, goal_day) = goal::create(goal, user.id, &store).await.unwrap();
        let (entry, day) = create(entry, user.id, &store).await.unwrap();

        assert_eq!(goal_day.id, day.id);
        assert_eq!(entry.day, day.id);
        assert_eq!(entry.user, user.id);

        let response = to_external(&entry, &day);
        assert_eq!(response.title, "Saturday");
        assert_eq!(response.day.date, day.date);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let store = MemoryStore::new();
        let entry = validate::<Body>(json!({
            "day": { "date": "2024-06-15" },
            "title": "Ghost",
            "content": "",
        }))
        .unwrap();

        assert!(create(entry, UserId(7), &store).await.is_err());
        // the day is resolved before the entry fails.
        assert_eq!(store.day_count().await, 1);
    }
}
