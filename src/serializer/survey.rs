//! Survey responses.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use super::Validated;
use crate::error::Result;
use crate::model::{Answers, SurveyResponse, SurveyResponseId, UserId};
use crate::store::SurveyStore;

#[derive(Debug, Deserialize)]
pub struct Body {
    pub user: UserId,
    #[serde(flatten)]
    pub answers: Answers,
}

impl Validate for Body {
    // Answers are flattened into the body, so their errors are keyed by slot.
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        self.answers.validate()
    }
}

/// Default representation. The derived score is not part of it; read it
/// from [`SurveyResponse::score`].
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: SurveyResponseId,
    pub user: UserId,
    #[serde(flatten)]
    pub answers: Answers,
}

pub async fn create<S>(body: Validated<Body>, store: &S) -> Result<SurveyResponse>
where
    S: SurveyStore + ?Sized,
{
    let body = body.into_inner();
    Ok(store.create_survey_response(body.user, body.answers).await?)
}

pub fn to_external(response: &SurveyResponse) -> Response {
    Response {
        id: response.id,
        user: response.user,
        answers: response.answers,
    }
}
