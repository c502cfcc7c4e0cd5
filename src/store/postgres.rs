//! PostgreSQL implementation of the store ports.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{
    CounselStore, JournalStore, PostStore, Result, StoreError, SurveyStore,
    UserStore,
};
use crate::model::*;

pub const DEFAULT_CREDENTIALS: &str = "postgres";
pub const DEFAULT_DATABASE_NAME: &str = "withinha";
pub const DEFAULT_POOL_SIZE: u32 = 10;

const USER_COLUMNS: &str =
    "id, email, username, nickname, birth_date, gender, phone_number, password";
const SURVEY_COLUMNS: &str = "id, user_id, answer1, answer2, answer3, answer4, \
     answer5, answer6, answer7, answer8, answer9, answer10";

/// Post row joined with its author and comment count.
#[derive(Debug, sqlx::FromRow)]
struct PostRecord {
    id: PostId,
    author_id: UserId,
    author_name: String,
    title: String,
    content: String,
    image: Option<String>,
    created_at: DateTime<Utc>,
    total_comments: i64,
}

impl PostRecord {
    fn into_post(self, likes: BTreeSet<UserId>) -> Post {
        Post {
            id: self.id,
            author: self.author_id,
            author_name: self.author_name,
            title: self.title,
            content: self.content,
            image: self.image,
            created_at: self.created_at,
            likes,
            total_comments: self.total_comments.max(0) as u64,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GoalRecord {
    #[sqlx(flatten)]
    goal: Goal,
    date: NaiveDate,
}

#[derive(Debug, sqlx::FromRow)]
struct DiaryEntryRecord {
    #[sqlx(flatten)]
    entry: DiaryEntry,
    date: NaiveDate,
}

/// PostgreSQL store.
#[derive(Clone)]
pub struct PgStore {
    pub pool: PgPool,
}

impl PgStore {
    /// Create a new [`PgStore`] from an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Init database connections.
    pub async fn connect(
        hostname: &str,
        username: &str,
        password: &str,
        db: &str,
        pool: u32,
    ) -> Result<Self> {
        let addr = format!("postgres://{username}:{password}@{hostname}/{db}");
        let pool = PgPoolOptions::new().max_connections(pool);
        let pool = pool.connect(&addr).await?;

        tracing::info!(%hostname, %db, "postgres connected");

        Ok(Self { pool })
    }

    /// Execute migrations scripts.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }

    async fn likes(&self, post: PostId) -> Result<BTreeSet<UserId>> {
        let likes = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM post_likes WHERE post_id = $1",
        )
        .bind(post)
        .fetch_all(&self.pool)
        .await?;

        Ok(likes.into_iter().map(UserId).collect())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let query = format!(
            r#"INSERT INTO users (email, username, nickname, birth_date, gender, phone_number, password)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING {USER_COLUMNS}"#
        );

        Ok(sqlx::query_as::<_, User>(&query)
            .bind(&user.email)
            .bind(&user.username)
            .bind(&user.nickname)
            .bind(user.birth_date)
            .bind(&user.gender)
            .bind(&user.phone_number)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        Ok(sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>> {
        let query =
            format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");

        Ok(sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl SurveyStore for PgStore {
    async fn create_survey_response(
        &self,
        user: UserId,
        answers: Answers,
    ) -> Result<SurveyResponse> {
        let query = format!(
            r#"INSERT INTO survey_responses (user_id, answer1, answer2, answer3, answer4,
                answer5, answer6, answer7, answer8, answer9, answer10)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING {SURVEY_COLUMNS}"#
        );

        let mut query = sqlx::query_as::<_, SurveyResponse>(&query).bind(user);
        for answer in answers.as_array() {
            query = query.bind(answer);
        }

        Ok(query.fetch_one(&self.pool).await?)
    }

    async fn latest_survey_response(
        &self,
        user: UserId,
    ) -> Result<Option<SurveyResponse>> {
        let query = format!(
            r#"SELECT {SURVEY_COLUMNS} FROM survey_responses
                WHERE user_id = $1
                ORDER BY created_at DESC, id DESC
                LIMIT 1"#
        );

        Ok(sqlx::query_as::<_, SurveyResponse>(&query)
            .bind(user)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl PostStore for PgStore {
    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO posts (author_id, title, content, image)
                VALUES ($1, $2, $3, $4)
                RETURNING id"#,
        )
        .bind(post.author)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.image)
        .fetch_one(&self.pool)
        .await?;

        self.find_post(PostId(id))
            .await?
            .ok_or(StoreError::NotFound { entity: "post", id })
    }

    async fn find_post(&self, id: PostId) -> Result<Option<Post>> {
        let record = sqlx::query_as::<_, PostRecord>(
            r#"SELECT p.id, p.author_id, u.username AS author_name, p.title,
                p.content, p.image, p.created_at,
                (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS total_comments
                FROM posts p
                JOIN users u ON u.id = p.author_id
                WHERE p.id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match record {
            Some(record) => {
                let likes = self.likes(record.id).await?;
                Ok(Some(record.into_post(likes)))
            },
            None => Ok(None),
        }
    }

    async fn toggle_like(&self, post: PostId, user: UserId) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        // Inserting first waits on a concurrent like of the same row, so two
        // toggles always end with one liked and one unliked answer.
        let inserted = sqlx::query(
            r#"INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2)
                ON CONFLICT DO NOTHING"#,
        )
        .bind(post)
        .bind(user)
        .execute(&mut *tx)
        .await?;

        let liked = if inserted.rows_affected() > 0 {
            true
        } else {
            sqlx::query(
                "DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2",
            )
            .bind(post)
            .bind(user)
            .execute(&mut *tx)
            .await?;

            false
        };

        tx.commit().await?;

        Ok(liked)
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment> {
        Ok(sqlx::query_as::<_, Comment>(
            r#"WITH inserted AS (
                    INSERT INTO comments (post_id, author_id, content)
                    VALUES ($1, $2, $3)
                    RETURNING id, post_id, author_id, content, created_at
                )
                SELECT i.id, i.post_id, i.author_id, u.username AS author_username,
                    i.content, i.created_at
                FROM inserted i
                JOIN users u ON u.id = i.author_id"#,
        )
        .bind(comment.post)
        .bind(comment.author)
        .bind(&comment.content)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn comments_for_post(&self, post: PostId) -> Result<Vec<Comment>> {
        Ok(sqlx::query_as::<_, Comment>(
            r#"SELECT c.id, c.post_id, c.author_id, u.username AS author_username,
                c.content, c.created_at
                FROM comments c
                JOIN users u ON u.id = c.author_id
                WHERE c.post_id = $1
                ORDER BY c.created_at ASC, c.id ASC"#,
        )
        .bind(post)
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl JournalStore for PgStore {
    async fn get_or_create_day(&self, date: NaiveDate) -> Result<Day> {
        // The no-op update makes RETURNING yield the existing row.
        Ok(sqlx::query_as::<_, Day>(
            r#"INSERT INTO days (date) VALUES ($1)
                ON CONFLICT (date) DO UPDATE SET date = EXCLUDED.date
                RETURNING id, date"#,
        )
        .bind(date)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn create_goal(&self, goal: NewGoal) -> Result<Goal> {
        Ok(sqlx::query_as::<_, Goal>(
            r#"INSERT INTO goals (day_id, user_id, text, is_completed)
                VALUES ($1, $2, $3, $4)
                RETURNING id, day_id, user_id, text, is_completed"#,
        )
        .bind(goal.day)
        .bind(goal.user)
        .bind(&goal.text)
        .bind(goal.is_completed)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn create_diary_entry(
        &self,
        entry: NewDiaryEntry,
    ) -> Result<DiaryEntry> {
        Ok(sqlx::query_as::<_, DiaryEntry>(
            r#"INSERT INTO diary_entries (day_id, user_id, title, content)
                VALUES ($1, $2, $3, $4)
                RETURNING id, day_id, user_id, title, content"#,
        )
        .bind(entry.day)
        .bind(entry.user)
        .bind(&entry.title)
        .bind(&entry.content)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn goals_for_user(&self, user: UserId) -> Result<Vec<(Goal, Day)>> {
        let records = sqlx::query_as::<_, GoalRecord>(
            r#"SELECT g.id, g.day_id, g.user_id, g.text, g.is_completed, d.date
                FROM goals g
                JOIN days d ON d.id = g.day_id
                WHERE g.user_id = $1
                ORDER BY d.date ASC, g.id ASC"#,
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await?;

        Ok(records
            .into_iter()
            .map(|r| {
                let day = Day {
                    id: r.goal.day,
                    date: r.date,
                };
                (r.goal, day)
            })
            .collect())
    }

    async fn diary_entries_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<(DiaryEntry, Day)>> {
        let records = sqlx::query_as::<_, DiaryEntryRecord>(
            r#"SELECT e.id, e.day_id, e.user_id, e.title, e.content, d.date
                FROM diary_entries e
                JOIN days d ON d.id = e.day_id
                WHERE e.user_id = $1
                ORDER BY d.date ASC, e.id ASC"#,
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await?;

        Ok(records
            .into_iter()
            .map(|r| {
                let day = Day {
                    id: r.entry.day,
                    date: r.date,
                };
                (r.entry, day)
            })
            .collect())
    }
}

#[async_trait]
impl CounselStore for PgStore {
    async fn create_counseling_request(
        &self,
        request: NewCounselingRequest,
    ) -> Result<CounselingRequest> {
        Ok(sqlx::query_as::<_, CounselingRequest>(
            r#"INSERT INTO counseling_requests (user_id, available_time, reason, phone_number)
                VALUES ($1, $2, $3, $4)
                RETURNING id, user_id, available_time, reason, phone_number"#,
        )
        .bind(request.user)
        .bind(&request.available_time)
        .bind(&request.reason)
        .bind(&request.phone_number)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn counseling_requests_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<CounselingRequest>> {
        Ok(sqlx::query_as::<_, CounselingRequest>(
            r#"SELECT id, user_id, available_time, reason, phone_number
                FROM counseling_requests
                WHERE user_id = $1
                ORDER BY created_at ASC, id ASC"#,
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use sqlx::{Pool, Postgres};

    use super::*;

    const ADMIN: UserId = UserId(1);

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn new_post(store: &PgStore) -> Post {
        store
            .create_post(NewPost {
                author: ADMIN,
                title: "hello".into(),
                content: "world".into(),
                image: None,
            })
            .await
            .unwrap()
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_get_or_create_day_reuses_date(pool: Pool<Postgres>) {
        let store = PgStore::new(pool);

        let first = store.get_or_create_day(date(2024, 6, 15)).await.unwrap();
        let second = store.get_or_create_day(date(2024, 6, 15)).await.unwrap();
        let other = store.get_or_create_day(date(2024, 6, 16)).await.unwrap();

        assert_eq!(first, second);
        assert_ne!(first.id, other.id);

        let days = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM days")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(days, 2);
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_concurrent_get_or_create_day(pool: Pool<Postgres>) {
        let store = PgStore::new(pool);
        let date = date(2024, 6, 15);

        let tasks = (0..4)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.get_or_create_day(date).await })
            })
            .collect::<Vec<_>>();

        let mut ids = BTreeSet::new();
        for task in tasks {
            ids.insert(task.await.unwrap().unwrap().id);
        }

        assert_eq!(ids.len(), 1);
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_toggle_like(pool: Pool<Postgres>) {
        let store = PgStore::new(pool);
        let post = new_post(&store).await;
        assert_eq!(post.author_name, "admin");
        assert_eq!(post.total_likes(), 0);

        assert!(store.toggle_like(post.id, ADMIN).await.unwrap());
        let liked = store.find_post(post.id).await.unwrap().unwrap();
        assert!(liked.is_liked_by(Some(ADMIN)));
        assert_eq!(liked.total_likes(), 1);

        assert!(!store.toggle_like(post.id, ADMIN).await.unwrap());
        let unliked = store.find_post(post.id).await.unwrap().unwrap();
        assert!(!unliked.is_liked_by(Some(ADMIN)));
        assert_eq!(unliked.total_likes(), 0);
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_find_post_counts_comments(pool: Pool<Postgres>) {
        let store = PgStore::new(pool);
        let post = new_post(&store).await;

        for content in ["first", "second"] {
            let comment = store
                .create_comment(NewComment {
                    post: post.id,
                    author: ADMIN,
                    content: content.into(),
                })
                .await
                .unwrap();
            assert_eq!(comment.author_username, "admin");
        }

        let found = store.find_post(post.id).await.unwrap().unwrap();
        assert_eq!(found.total_comments, 2);

        let comments = store.comments_for_post(post.id).await.unwrap();
        assert_eq!(
            comments.iter().map(|c| c.content.as_str()).collect::<Vec<_>>(),
            vec!["first", "second"]
        );
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_goals_join_their_day(pool: Pool<Postgres>) {
        let store = PgStore::new(pool);
        let day = store.get_or_create_day(date(2024, 6, 15)).await.unwrap();

        store
            .create_goal(NewGoal {
                day: day.id,
                user: ADMIN,
                text: "Run".into(),
                is_completed: true,
            })
            .await
            .unwrap();

        let goals = store.goals_for_user(ADMIN).await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].1, day);
        assert!(goals[0].0.is_completed);
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_find_user_by_username(pool: Pool<Postgres>) {
        let store = PgStore::new(pool);

        let user = store.find_user_by_username("admin").await.unwrap().unwrap();
        assert_eq!(user.id, ADMIN);
        assert!(store.find_user_by_username("ghost").await.unwrap().is_none());
    }
}
