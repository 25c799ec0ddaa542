use chrono::NaiveDate;

use crate::error::AppError;

pub const MAX_PREGNANCY_DAYS: i64 = 280;
pub const MAX_PREGNANCY_WEEKS: i64 = 40;
pub const FULL_TERM_WEEKS: i64 = 37;
pub const NEAR_DUE_WEEKS: i64 = 39;
const DAYS_PER_WEEK: i64 = 7;

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn display_date(value: &str) -> String {
    match parse_date(value) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => "(not set)".to_string(),
    }
}

fn clamp_days(value: i64) -> i64 {
    value.clamp(0, MAX_PREGNANCY_DAYS)
}

// An unparsable stored date counts as zero days, never an error.
pub fn days_until_due(due_date: &str, today: NaiveDate) -> i64 {
    match parse_date(due_date) {
        Some(due) => clamp_days((due - today).num_days()),
        None => 0,
    }
}

pub fn weeks_pregnant(days_until_due: i64) -> i64 {
    let weeks_left = (days_until_due + DAYS_PER_WEEK - 1) / DAYS_PER_WEEK;
    (MAX_PREGNANCY_WEEKS - weeks_left).clamp(0, MAX_PREGNANCY_WEEKS)
}

// After the transition the due date doubles as the recorded birth date.
pub fn days_after_birth(recorded_date: &str, today: NaiveDate) -> i64 {
    match parse_date(recorded_date) {
        Some(recorded) => (today - recorded).num_days().max(0),
        None => 0,
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MotherStage {
    FinalMonth,
    FullTerm,
    NearDue,
}

pub fn mother_stage(weeks_pregnant: i64) -> MotherStage {
    if weeks_pregnant >= NEAR_DUE_WEEKS {
        MotherStage::NearDue
    } else if weeks_pregnant >= FULL_TERM_WEEKS {
        MotherStage::FullTerm
    } else {
        MotherStage::FinalMonth
    }
}

pub fn max_due_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2029, 12, 31).unwrap_or(NaiveDate::MAX)
}

pub fn validate_due_date(value: &str, today: NaiveDate) -> Result<(), AppError> {
    let Some(date) = parse_date(value) else {
        return Err(AppError::InvalidInput(format!(
            "due date must be a calendar date formatted YYYY-MM-DD, got '{value}'"
        )));
    };
    let max = max_due_date();
    if date < today || date > max {
        return Err(AppError::InvalidInput(format!(
            "due date must be between {today} and {max}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(value: &str) -> NaiveDate {
        parse_date(value).expect("test date")
    }

    #[test]
    fn days_until_due_counts_forward_and_clamps() {
        let today = day("2025-05-22");
        assert_eq!(days_until_due("2025-06-01", today), 10);
        assert_eq!(days_until_due("2025-05-22", today), 0);
        assert_eq!(days_until_due("2025-05-01", today), 0);
        assert_eq!(days_until_due("2026-05-22", today), MAX_PREGNANCY_DAYS);
        assert_eq!(days_until_due("not a date", today), 0);
    }

    #[test]
    fn weeks_pregnant_tracks_remaining_days() {
        assert_eq!(weeks_pregnant(0), 40);
        assert_eq!(weeks_pregnant(1), 39);
        assert_eq!(weeks_pregnant(7), 39);
        assert_eq!(weeks_pregnant(8), 38);
        assert_eq!(weeks_pregnant(21), 37);
        assert_eq!(weeks_pregnant(MAX_PREGNANCY_DAYS), 0);
    }

    #[test]
    fn days_after_birth_floors_at_zero_and_grows_unbounded() {
        let today = day("2025-06-13");
        assert_eq!(days_after_birth("2025-06-01", today), 12);
        assert_eq!(days_after_birth("2025-06-13", today), 0);
        assert_eq!(days_after_birth("2025-07-01", today), 0);
        assert_eq!(days_after_birth("2024-05-01", today), 408);
        assert_eq!(days_after_birth("garbled", today), 0);
    }

    #[test]
    fn mother_stage_thresholds() {
        assert_eq!(mother_stage(36), MotherStage::FinalMonth);
        assert_eq!(mother_stage(37), MotherStage::FullTerm);
        assert_eq!(mother_stage(38), MotherStage::FullTerm);
        assert_eq!(mother_stage(39), MotherStage::NearDue);
        assert_eq!(mother_stage(40), MotherStage::NearDue);
    }

    #[test]
    fn validate_due_date_enforces_format_and_range() {
        let today = day("2025-05-22");
        assert!(validate_due_date("2025-05-22", today).is_ok());
        assert!(validate_due_date("2029-12-31", today).is_ok());
        assert!(validate_due_date("June 1st", today).is_err());
        assert!(validate_due_date("2025-05-21", today).is_err());
        assert!(validate_due_date("2030-01-01", today).is_err());
    }

    #[test]
    fn display_date_falls_back_when_unset() {
        assert_eq!(display_date("2025-06-01"), "2025-06-01");
        assert_eq!(display_date(""), "(not set)");
        assert_eq!(display_date("soon"), "(not set)");
    }
}
