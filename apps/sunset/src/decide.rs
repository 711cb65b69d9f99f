//! Day-granularity escalation decision.

use chrono::{DateTime, Local, NaiveDate, TimeZone};

/// Truncate an instant to its calendar day in its own time zone.
pub fn normalize<Tz: TimeZone>(at: &DateTime<Tz>) -> NaiveDate {
    at.date_naive()
}

/// Local calendar date of the host clock. Sample once per batch.
pub fn today() -> NaiveDate {
    normalize(&Local::now())
}

/// Escalate when the removal date is today or already past.
pub fn should_escalate(removal: NaiveDate, today: NaiveDate) -> bool {
    removal <= today
}
