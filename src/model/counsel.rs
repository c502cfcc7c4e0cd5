use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{CounselingRequestId, UserId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CounselingRequest {
    pub id: CounselingRequestId,
    #[sqlx(rename = "user_id")]
    pub user: UserId,
    pub available_time: String,
    pub reason: String,
    pub phone_number: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCounselingRequest {
    pub user: UserId,
    pub available_time: String,
    pub reason: String,
    pub phone_number: String,
}

/// Age in full years on `today` for someone born on `birth_date`.
pub fn calculate_age(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - birth_date.year();

    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        years - 1
    } else {
        years
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_calculate_age_around_birthday() {
        let birth = date(2000, 6, 15);

        assert_eq!(calculate_age(birth, date(2024, 6, 14)), 23);
        assert_eq!(calculate_age(birth, date(2024, 6, 15)), 24);
        assert_eq!(calculate_age(birth, date(2024, 12, 31)), 24);
        assert_eq!(calculate_age(birth, date(2025, 1, 1)), 24);
    }

    #[test]
    fn test_calculate_age_leap_day() {
        let birth = date(2004, 2, 29);

        assert_eq!(calculate_age(birth, date(2023, 2, 28)), 18);
        assert_eq!(calculate_age(birth, date(2023, 3, 1)), 19);
        assert_eq!(calculate_age(birth, date(2024, 2, 29)), 20);
    }
}
