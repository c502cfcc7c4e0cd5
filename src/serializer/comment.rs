//! Comments on posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Validated;
use crate::error::Result;
use crate::model::{Comment, CommentId, NewComment, PostId, UserId};
use crate::store::PostStore;

#[derive(Debug, Deserialize, Validate)]
pub struct Body {
    pub post: PostId,
    pub author: UserId,
    #[validate(length(min = 1, message = "Content is required."))]
    pub content: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: CommentId,
    pub post: PostId,
    pub author: UserId,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

pub async fn create<S>(body: Validated<Body>, store: &S) -> Result<Comment>
where
    S: PostStore + ?Sized,
{
    let Body {
        post,
        author,
        content,
    } = body.into_inner();

    Ok(store
        .create_comment(NewComment {
            post,
            author,
            content,
        })
        .await?)
}

pub fn to_external(comment: &Comment) -> Response {
    Response {
        id: comment.id,
        post: comment.post,
        author: comment.author,
        author_username: comment.author_username.clone(),
        content: comment.content.clone(),
        created_at: comment.created_at,
    }
}
