//! Posts and their likes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Validated;
use crate::error::Result;
use crate::model::{NewPost, Post, PostId, UserId};
use crate::store::PostStore;

#[derive(Debug, Deserialize, Validate)]
pub struct Body {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must contain between 1 and 200 characters."
    ))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required."))]
    pub content: String,
    pub image: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub image: Option<String>,
    pub author_name: String,
    pub total_likes: u64,
    pub total_comments: u64,
    pub liked_by_user: bool,
}

/// Persist a post written by `author`.
pub async fn create<S>(
    body: Validated<Body>,
    author: UserId,
    store: &S,
) -> Result<Post>
where
    S: PostStore + ?Sized,
{
    let Body {
        title,
        content,
        image,
    } = body.into_inner();

    let post = store
        .create_post(NewPost {
            author,
            title,
            content,
            image,
        })
        .await?;

    tracing::debug!(post_id = %post.id, author_id = %author, "post created");
    Ok(post)
}

/// Project `post` for `viewer`. Without viewer, `liked_by_user` is `false`.
pub fn to_external(post: &Post, viewer: Option<UserId>) -> Response {
    Response {
        id: post.id,
        title: post.title.clone(),
        content: post.content.clone(),
        created_at: post.created_at,
        image: post.image.clone(),
        author_name: post.author_name.clone(),
        total_likes: post.total_likes(),
        total_comments: post.total_comments,
        liked_by_user: post.is_liked_by(viewer),
    }
}

/// Like or unlike `post` as `viewer`. Returns the new liked state.
pub async fn toggle_like<S>(store: &S, post: PostId, viewer: UserId) -> Result<bool>
where
    S: PostStore + ?Sized,
{
    Ok(store.toggle_like(post, viewer).await?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::serializer::tests::sign_up;
    use crate::serializer::validate;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn test_new_post_has_no_likes() {
        let store = MemoryStore::new();
        let author = sign_up(&store, "author").await;

        let body = validate::<Body>(json!({
            "title": "First day",
            "content": "Hello.",
        }))
        .unwrap();
        let post = create(body, author.id, &store).await.unwrap();

        let response = to_external(&post, None);
        assert_eq!(response.total_likes, 0);
        assert_eq!(response.total_comments, 0);
        assert!(!response.liked_by_user);
        assert_eq!(response.author_name, "author");
        assert_eq!(response.image, None);
    }

    #[tokio::test]
    async fn test_liked_by_user_depends_on_viewer() {
        let store = MemoryStore::new();
        let author = sign_up(&store, "author").await;
        let fan = sign_up(&store, "fan").await;

        let body = validate::<Body>(json!({
            "title": "Photo",
            "content": "Look.",
            "image": "posts/1.png",
        }))
        .unwrap();
        let post = create(body, author.id, &store).await.unwrap();

        assert!(toggle_like(&store, post.id, fan.id).await.unwrap());
        let post = store.find_post(post.id).await.unwrap().unwrap();

        assert!(to_external(&post, Some(fan.id)).liked_by_user);
        assert!(!to_external(&post, Some(author.id)).liked_by_user);
        assert!(!to_external(&post, None).liked_by_user);
        assert_eq!(to_external(&post, None).total_likes, 1);

        assert!(!toggle_like(&store, post.id, fan.id).await.unwrap());
    }

    #[test]
    fn test_empty_title() {
        let err = validate::<Body>(json!({ "title": "", "content": "x" }))
            .unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("title"));
    }
}
