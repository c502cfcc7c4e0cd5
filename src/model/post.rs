use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CommentId, PostId, UserId};

/// Post as loaded from the store, with its author name, like-set and comment
/// count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author: UserId,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Users who liked the post.
    pub likes: BTreeSet<UserId>,
    pub total_comments: u64,
}

impl Post {
    pub fn total_likes(&self) -> u64 {
        self.likes.len() as u64
    }

    /// Whether `viewer` is part of the like-set.
    /// Anonymous viewers never liked a post.
    pub fn is_liked_by(&self, viewer: Option<UserId>) -> bool {
        viewer.is_some_and(|viewer| self.likes.contains(&viewer))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewPost {
    pub author: UserId,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
}

/// Comment as loaded from the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: CommentId,
    #[sqlx(rename = "post_id")]
    pub post: PostId,
    #[sqlx(rename = "author_id")]
    pub author: UserId,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewComment {
    pub post: PostId,
    pub author: UserId,
    pub content: String,
}
