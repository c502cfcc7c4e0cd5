//! Read-only summary of one user's activity.

use serde::{Deserialize, Serialize};

use super::{counsel, diary, goal};
use crate::clock::Clock;
use crate::error::Result;
use crate::model::UserId;
use crate::store::{CounselStore, JournalStore, StoreError, SurveyStore, UserStore};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct MyPage {
    pub survey_score: Option<i64>,
    pub diary_entries: Vec<diary::Response>,
    pub counseling_requests: Vec<counsel::Response>,
    pub goals: Vec<goal::Response>,
    /// Completed goals over all goals, in `[0, 1]`.
    pub goal_achievement_rate: f64,
}

impl MyPage {
    /// Compose already projected parts.
    pub fn new(
        survey_score: Option<i64>,
        diary_entries: Vec<diary::Response>,
        counseling_requests: Vec<counsel::Response>,
        goals: Vec<goal::Response>,
    ) -> Self {
        let goal_achievement_rate = achievement_rate(&goals);

        Self {
            survey_score,
            diary_entries,
            counseling_requests,
            goals,
            goal_achievement_rate,
        }
    }
}

/// Ratio of completed goals. `0.0` without goals.
pub fn achievement_rate(goals: &[goal::Response]) -> f64 {
    if goals.is_empty() {
        return 0.0;
    }

    let completed = goals.iter().filter(|g| g.is_completed).count();
    completed as f64 / goals.len() as f64
}

/// Gather the page of `user` from the store.
pub async fn aggregate<S>(store: &S, user: UserId, clock: &dyn Clock) -> Result<MyPage>
where
    S: UserStore + SurveyStore + JournalStore + CounselStore + ?Sized,
{
    let owner = store.find_user(user).await?.ok_or(StoreError::NotFound {
        entity: "user",
        id: user.0,
    })?;

    let survey_score = store
        .latest_survey_response(user)
        .await?
        .map(|response| response.score());

    let diary_entries = store
        .diary_entries_for_user(user)
        .await?
        .iter()
        .map(|(entry, day)| diary::to_external(entry, day))
        .collect();

    let counseling_requests = store
        .counseling_requests_for_user(user)
        .await?
        .iter()
        .map(|request| counsel::to_external(request, &owner, clock))
        .collect();

    let goals = store
        .goals_for_user(user)
        .await?
        .iter()
        .map(|(goal, day)| goal::to_external(goal, day))
        .collect();

    Ok(MyPage::new(
        survey_score,
        diary_entries,
        counseling_requests,
        goals,
    ))
}
