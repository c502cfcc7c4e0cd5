//! Goals attached to a day.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Validated, day};
use crate::error::Result;
use crate::model::{Day, Goal, GoalId, NewGoal, UserId};
use crate::store::JournalStore;

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct Body {
    #[validate(nested)]
    pub day: day::Body,
    #[validate(length(min = 1, message = "Goal text is required."))]
    pub text: String,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: GoalId,
    pub day: day::Response,
    pub text: String,
    pub is_completed: bool,
}

/// Resolve the nested day, then persist the goal of `user` on it.
pub async fn create<S>(
    body: Validated<Body>,
    user: UserId,
    store: &S,
) -> Result<(Goal, Day)>
where
    S: JournalStore + ?Sized,
{
    create_unchecked(body.into_inner(), user, store).await
}

/// Same as [`create`] for a body validated as part of a larger one.
pub(super) async fn create_unchecked<S>(
    body: Body,
    user: UserId,
    store: &S,
) -> Result<(Goal, Day)>
where
    S: JournalStore + ?Sized,
{
    let day = day::resolve(&body.day, store).await?;

    let goal = store
        .create_goal(NewGoal {
            day: day.id,
            user,
            text: body.text,
            is_completed: body.is_completed,
        })
        .await?;

    Ok((goal, day))
}

pub fn to_external(goal: &Goal, day: &Day) -> Response {
    Response {
        id: goal.id,
        day: day::to_external(day),
        text: goal.text.clone(),
        is_completed: goal.is_completed,
    }
}
