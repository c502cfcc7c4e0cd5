//! In-memory store.
//!
//! Keeps every table behind one lock, which also makes day get-or-create
//! atomic. Data is lost on drop.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;

use super::{
    CounselStore, JournalStore, PostStore, Result, StoreError, SurveyStore,
    UserStore,
};
use crate::model::*;

#[derive(Debug, Default)]
struct Tables {
    sequence: i64,
    users: Vec<User>,
    surveys: Vec<SurveyResponse>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    days: BTreeMap<NaiveDate, DayId>,
    goals: Vec<Goal>,
    diary_entries: Vec<DiaryEntry>,
    counseling_requests: Vec<CounselingRequest>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }

    fn user(&self, id: UserId) -> Result<&User> {
        self.users.iter().find(|u| u.id == id).ok_or(StoreError::NotFound {
            entity: "user",
            id: id.0,
        })
    }

    fn post_mut(&mut self, id: PostId) -> Result<&mut Post> {
        self.posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound {
                entity: "post",
                id: id.0,
            })
    }

    fn day(&self, id: DayId) -> Result<Day> {
        self.days
            .iter()
            .find(|(_, day)| **day == id)
            .map(|(date, id)| Day { id: *id, date: *date })
            .ok_or(StoreError::NotFound {
                entity: "day",
                id: id.0,
            })
    }
}

/// Store holding every record in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create a new empty [`MemoryStore`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored days.
    pub async fn day_count(&self) -> usize {
        self.tables.lock().await.days.len()
    }

    /// Survey responses of `user`, oldest first.
    pub async fn survey_responses_for_user(
        &self,
        user: UserId,
    ) -> Vec<SurveyResponse> {
        self.tables
            .lock()
            .await
            .surveys
            .iter()
            .filter(|s| s.user == user)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.lock().await;

        if tables
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(StoreError::Conflict(format!(
                "user {} or {} already exists",
                user.username, user.email
            )));
        }

        let user = User {
            id: UserId(tables.next_id()),
            email: user.email,
            username: user.username,
            nickname: user.nickname,
            birth_date: user.birth_date,
            gender: user.gender,
            phone_number: user.phone_number,
            password: user.password_hash,
        };
        tables.users.push(user.clone());

        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl SurveyStore for MemoryStore {
    async fn create_survey_response(
        &self,
        user: UserId,
        answers: Answers,
    ) -> Result<SurveyResponse> {
        let mut tables = self.tables.lock().await;
        tables.user(user)?;

        let response = SurveyResponse {
            id: SurveyResponseId(tables.next_id()),
            user,
            answers,
        };
        tables.surveys.push(response.clone());

        Ok(response)
    }

    async fn latest_survey_response(
        &self,
        user: UserId,
    ) -> Result<Option<SurveyResponse>> {
        let tables = self.tables.lock().await;
        Ok(tables.surveys.iter().rev().find(|s| s.user == user).cloned())
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let mut tables = self.tables.lock().await;
        let author_name = tables.user(post.author)?.username.clone();

        let post = Post {
            id: PostId(tables.next_id()),
            author: post.author,
            author_name,
            title: post.title,
            content: post.content,
            image: post.image,
            created_at: Utc::now(),
            likes: BTreeSet::new(),
            total_comments: 0,
        };
        tables.posts.push(post.clone());

        Ok(post)
    }

    async fn find_post(&self, id: PostId) -> Result<Option<Post>> {
        let tables = self.tables.lock().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn toggle_like(&self, post: PostId, user: UserId) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        tables.user(user)?;
        let post = tables.post_mut(post)?;

        if post.likes.remove(&user) {
            Ok(false)
        } else {
            post.likes.insert(user);
            Ok(true)
        }
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment> {
        let mut tables = self.tables.lock().await;
        let author_username = tables.user(comment.author)?.username.clone();
        tables.post_mut(comment.post)?.total_comments += 1;

        let comment = Comment {
            id: CommentId(tables.next_id()),
            post: comment.post,
            author: comment.author,
            author_username,
            content: comment.content,
            created_at: Utc::now(),
        };
        tables.comments.push(comment.clone());

        Ok(comment)
    }

    async fn comments_for_post(&self, post: PostId) -> Result<Vec<Comment>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.post == post)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl JournalStore for MemoryStore {
    async fn get_or_create_day(&self, date: NaiveDate) -> Result<Day> {
        let mut tables = self.tables.lock().await;

        if let Some(id) = tables.days.get(&date).copied() {
            return Ok(Day { id, date });
        }

        let id = DayId(tables.next_id());
        tables.days.insert(date, id);

        Ok(Day { id, date })
    }

    async fn create_goal(&self, goal: NewGoal) -> Result<Goal> {
        let mut tables = self.tables.lock().await;
        tables.user(goal.user)?;
        tables.day(goal.day)?;

        let goal = Goal {
            id: GoalId(tables.next_id()),
            day: goal.day,
            user: goal.user,
            text: goal.text,
            is_completed: goal.is_completed,
        };
        tables.goals.push(goal.clone());

        Ok(goal)
    }

    async fn create_diary_entry(
        &self,
        entry: NewDiaryEntry,
    ) -> Result<DiaryEntry> {
        let mut tables = self.tables.lock().await;
        tables.user(entry.user)?;
        tables.day(entry.day)?;

        let entry = DiaryEntry {
            id: DiaryEntryId(tables.next_id()),
            day: entry.day,
            user: entry.user,
            title: entry.title,
            content: entry.content,
        };
        tables.diary_entries.push(entry.clone());

        Ok(entry)
    }

    async fn goals_for_user(&self, user: UserId) -> Result<Vec<(Goal, Day)>> {
        let tables = self.tables.lock().await;
        tables
            .goals
            .iter()
            .filter(|g| g.user == user)
            .map(|g| tables.day(g.day).map(|day| (g.clone(), day)))
            .collect()
    }

    async fn diary_entries_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<(DiaryEntry, Day)>> {
        let tables = self.tables.lock().await;
        tables
            .diary_entries
            .iter()
            .filter(|d| d.user == user)
            .map(|d| tables.day(d.day).map(|day| (d.clone(), day)))
            .collect()
    }
}

#[async_trait]
impl CounselStore for MemoryStore {
    async fn create_counseling_request(
        &self,
        request: NewCounselingRequest,
    ) -> Result<CounselingRequest> {
        let mut tables = self.tables.lock().await;
        tables.user(request.user)?;

        let request = CounselingRequest {
            id: CounselingRequestId(tables.next_id()),
            user: request.user,
            available_time: request.available_time,
            reason: request.reason,
            phone_number: request.phone_number,
        };
        tables.counseling_requests.push(request.clone());

        Ok(request)
    }

    async fn counseling_requests_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<CounselingRequest>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .counseling_requests
            .iter()
            .filter(|c| c.user == user)
            .cloned()
            .collect())
    }
}
