use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{SurveyResponseId, UserId};

/// Lowest choice of an answer slot.
pub const MIN_ANSWER: i32 = 1;
/// Highest choice of an answer slot.
pub const MAX_ANSWER: i32 = 5;

/// The ten answer slots of a survey, each on a five-point scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct Answers {
    #[validate(range(min = MIN_ANSWER, max = MAX_ANSWER, message = "Answer must be between 1 and 5."))]
    pub answer1: i32,
    #[validate(range(min = MIN_ANSWER, max = MAX_ANSWER, message = "Answer must be between 1 and 5."))]
    pub answer2: i32,
    #[validate(range(min = MIN_ANSWER, max = MAX_ANSWER, message = "Answer must be between 1 and 5."))]
    pub answer3: i32,
    #[validate(range(min = MIN_ANSWER, max = MAX_ANSWER, message = "Answer must be between 1 and 5."))]
    pub answer4: i32,
    #[validate(range(min = MIN_ANSWER, max = MAX_ANSWER, message = "Answer must be between 1 and 5."))]
    pub answer5: i32,
    #[validate(range(min = MIN_ANSWER, max = MAX_ANSWER, message = "Answer must be between 1 and 5."))]
    pub answer6: i32,
    #[validate(range(min = MIN_ANSWER, max = MAX_ANSWER, message = "Answer must be between 1 and 5."))]
    pub answer7: i32,
    #[validate(range(min = MIN_ANSWER, max = MAX_ANSWER, message = "Answer must be between 1 and 5."))]
    pub answer8: i32,
    #[validate(range(min = MIN_ANSWER, max = MAX_ANSWER, message = "Answer must be between 1 and 5."))]
    pub answer9: i32,
    #[validate(range(min = MIN_ANSWER, max = MAX_ANSWER, message = "Answer must be between 1 and 5."))]
    pub answer10: i32,
}

impl Answers {
    /// Answers in slot order.
    pub fn as_array(&self) -> [i32; 10] {
        [
            self.answer1,
            self.answer2,
            self.answer3,
            self.answer4,
            self.answer5,
            self.answer6,
            self.answer7,
            self.answer8,
            self.answer9,
            self.answer10,
        ]
    }

    /// Sum of every answer, widened so stored out-of-scale values cannot
    /// overflow.
    pub fn score(&self) -> i64 {
        self.as_array().iter().map(|&answer| i64::from(answer)).sum()
    }
}

/// Survey response of one user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SurveyResponse {
    pub id: SurveyResponseId,
    #[sqlx(rename = "user_id")]
    pub user: UserId,
    #[sqlx(flatten)]
    pub answers: Answers,
}

impl SurveyResponse {
    pub fn score(&self) -> i64 {
        self.answers.score()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_sums_every_slot() {
        let answers = Answers {
            answer1: 1,
            answer2: 2,
            answer3: 3,
            answer4: 4,
            answer5: 5,
            answer6: 1,
            answer7: 2,
            answer8: 3,
            answer9: 4,
            answer10: 5,
        };

        assert_eq!(answers.score(), 30);
        assert_eq!(answers.as_array()[9], 5);
        assert_eq!(Answers::default().score(), 0);
    }

    #[test]
    fn test_score_does_not_overflow() {
        let answers = Answers {
            answer1: i32::MAX,
            answer2: i32::MAX,
            answer3: 1,
            ..Default::default()
        };

        assert_eq!(answers.score(), 2 * i64::from(i32::MAX) + 1);
    }

    #[test]
    fn test_answers_out_of_scale() {
        let answers = Answers {
            answer1: i32::MAX,
            answer2: 3,
            answer3: 0,
            answer4: 1,
            answer5: 5,
            answer6: 6,
            answer7: 2,
            answer8: 2,
            answer9: 2,
            answer10: 2,
        };

        let errors = answers.validate().unwrap_err();
        let fields = errors.field_errors();

        assert_eq!(fields.len(), 3);
        assert!(fields.contains_key("answer1"));
        assert!(fields.contains_key("answer3"));
        assert!(fields.contains_key("answer6"));
    }
}
