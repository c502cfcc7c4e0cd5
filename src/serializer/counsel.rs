//! Counseling requests.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Validated;
use crate::clock::Clock;
use crate::error::Result;
use crate::model::{
    CounselingRequest, CounselingRequestId, NewCounselingRequest, User,
    UserId, calculate_age,
};
use crate::store::CounselStore;

#[derive(Debug, Deserialize, Validate)]
pub struct Body {
    #[validate(length(min = 1, max = 100, message = "Available time is required."))]
    pub available_time: String,
    #[validate(length(min = 1, message = "Reason is required."))]
    pub reason: String,
    #[validate(custom(function = "crate::serializer::validate_phone_number"))]
    pub phone_number: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: CounselingRequestId,
    pub username: String,
    pub age: i32,
    pub available_time: String,
    pub reason: String,
    pub phone_number: String,
}

/// Persist a request made by `user`.
pub async fn create<S>(
    body: Validated<Body>,
    user: UserId,
    store: &S,
) -> Result<CounselingRequest>
where
    S: CounselStore + ?Sized,
{
    let Body {
        available_time,
        reason,
        phone_number,
    } = body.into_inner();

    let request = store
        .create_counseling_request(NewCounselingRequest {
            user,
            available_time,
            reason,
            phone_number,
        })
        .await?;

    tracing::info!(request_id = %request.id, user_id = %user, "counseling requested");
    Ok(request)
}

/// Project `request` made by `user`. The age is computed on the clock's
/// current date and never stored.
pub fn to_external(
    request: &CounselingRequest,
    user: &User,
    clock: &dyn Clock,
) -> Response {
    Response {
        id: request.id,
        username: user.username.clone(),
        age: calculate_age(user.birth_date, clock.today()),
        available_time: request.available_time.clone(),
        reason: request.reason.clone(),
        phone_number: request.phone_number.clone(),
    }
}
