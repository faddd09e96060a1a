use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::models::availability::DayAvailability;

/// The facts a field's schedule is resolved from. Handlers fetch these in one
/// pass for the whole range; resolution itself is pure so every edge case is
/// testable without a database.
#[derive(Debug, Default)]
pub struct ScheduleFacts {
    /// Weekly window per Monday-first weekday: day_of_week -> [open, close).
    pub rules: HashMap<i16, (i16, i16)>,
    /// Explicitly removed hours per date.
    pub blocked: HashMap<NaiveDate, HashSet<i16>>,
    /// Hours already taken by an active booking per date.
    pub booked: HashMap<NaiveDate, HashSet<i16>>,
}

/// Bookable hours for a single date: the weekly window minus blocked slots,
/// minus actively booked hours, minus anything that starts before `now`.
/// A date without a rule contributes no hours.
pub fn resolve_day(facts: &ScheduleFacts, date: NaiveDate, now: DateTime<Utc>) -> Vec<i16> {
    let weekday = date.weekday().num_days_from_monday() as i16;
    let (open, close) = match facts.rules.get(&weekday) {
        Some(window) => *window,
        None => return Vec::new(),
    };

    let empty = HashSet::new();
    let blocked = facts.blocked.get(&date).unwrap_or(&empty);
    let booked = facts.booked.get(&date).unwrap_or(&empty);

    (open..close)
        .filter(|hour| !blocked.contains(hour) && !booked.contains(hour))
        .filter(|hour| {
            // An hour whose start lies strictly before `now` is already past.
            date.and_hms_opt(*hour as u32, 0, 0)
                .map(|start| start >= now.naive_utc())
                .unwrap_or(false)
        })
        .collect()
}

/// Resolve `days` consecutive dates starting at `start`, in range order,
/// hours ascending within each date.
pub fn resolve_range(
    facts: &ScheduleFacts,
    start: NaiveDate,
    days: u32,
    now: DateTime<Utc>,
) -> Vec<DayAvailability> {
    (0..days)
        .map(|offset| {
            let date = start + Duration::days(offset as i64);
            DayAvailability {
                date,
                hours: resolve_day(facts, date, now),
            }
        })
        .collect()
}
