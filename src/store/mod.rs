//! These traits define what the transcoder needs from the persistence layer.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::model::{
    Comment, CounselingRequest, Day, DiaryEntry, Goal, NewComment,
    NewCounselingRequest, NewDiaryEntry, NewGoal, NewPost, NewUser, Post,
    PostId, SurveyResponse, Answers, User, UserId,
};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by a store. They are propagated as-is.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQL request failed: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("{entity} not found with id {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Port for user persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user whose credential is already hashed.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn find_user(&self, id: UserId) -> Result<Option<User>>;

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>>;
}

/// Port for survey responses.
#[async_trait]
pub trait SurveyStore: Send + Sync {
    /// Insert a response. The user must exist.
    async fn create_survey_response(
        &self,
        user: UserId,
        answers: Answers,
    ) -> Result<SurveyResponse>;

    /// Most recent response of `user`.
    async fn latest_survey_response(
        &self,
        user: UserId,
    ) -> Result<Option<SurveyResponse>>;
}

/// Port for posts, likes and comments.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create_post(&self, post: NewPost) -> Result<Post>;

    async fn find_post(&self, id: PostId) -> Result<Option<Post>>;

    /// Add `user` to the like-set of `post`, or remove it if already present.
    /// Returns whether the post is liked afterwards.
    async fn toggle_like(&self, post: PostId, user: UserId) -> Result<bool>;

    async fn create_comment(&self, comment: NewComment) -> Result<Comment>;

    async fn comments_for_post(&self, post: PostId) -> Result<Vec<Comment>>;
}

/// Port for days, goals and diary entries.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Day for `date`, created if absent.
    /// Concurrent callers with the same date get the same day.
    async fn get_or_create_day(&self, date: NaiveDate) -> Result<Day>;

    async fn create_goal(&self, goal: NewGoal) -> Result<Goal>;

    async fn create_diary_entry(
        &self,
        entry: NewDiaryEntry,
    ) -> Result<DiaryEntry>;

    async fn goals_for_user(&self, user: UserId) -> Result<Vec<(Goal, Day)>>;

    async fn diary_entries_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<(DiaryEntry, Day)>>;
}

/// Port for counseling requests.
#[async_trait]
pub trait CounselStore: Send + Sync {
    async fn create_counseling_request(
        &self,
        request: NewCounselingRequest,
    ) -> Result<CounselingRequest>;

    async fn counseling_requests_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<CounselingRequest>>;
}

/// Every port at once.
pub trait Store:
    UserStore + SurveyStore + PostStore + JournalStore + CounselStore
{
}

impl<T> Store for T where
    T: UserStore + SurveyStore + PostStore + JournalStore + CounselStore
{
}
