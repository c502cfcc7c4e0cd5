//! Days, deduplicated by date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;
use crate::model::Day;
use crate::store::JournalStore;

/// Nested `{ "date": "YYYY-MM-DD" }` object.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct Body {
    pub date: NaiveDate,
}

pub type Response = Body;

/// Resolve the nested day to its record, creating it on first use.
pub async fn resolve<S>(body: &Body, store: &S) -> Result<Day>
where
    S: JournalStore + ?Sized,
{
    let day = store.get_or_create_day(body.date).await?;
    tracing::trace!(day_id = %day.id, date = %day.date, "day resolved");
    Ok(day)
}

pub fn to_external(day: &Day) -> Response {
    Body { date: day.date }
}
