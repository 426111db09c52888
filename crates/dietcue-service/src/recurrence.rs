//! Next-occurrence computation for weekly-repeating reminders.
//!
//! All weekday and day arithmetic happens in the owner's timezone; only
//! the final result is converted to UTC for storage and comparison.
//! Mixing the server clock into the weekday calculation produces
//! off-by-one-day fires near midnight boundaries, so the timezone is a
//! mandatory parameter here, never an ambient assumption.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

/// Compute the next fire instant strictly after `reference`.
///
/// * `hour`/`minute` are the owner-local wall-clock fire time.
/// * `weekday` is the target day (Sunday = 0); `None` means daily.
/// * A reference that lands exactly on `hour:minute` counts as already
///   passed, so a boundary tick never fires twice.
///
/// Pure and deterministic: safe to run server-side or device-side as long
/// as one of them is the single source of truth for the stored instant.
pub fn next_occurrence<Tz: TimeZone>(
    hour: u8,
    minute: u8,
    weekday: Option<u8>,
    reference: DateTime<Utc>,
    tz: &Tz,
) -> DateTime<Utc> {
    let local = reference.with_timezone(tz);
    let ref_date = local.date_naive();

    let days_ahead: i64 = match weekday {
        None => 0,
        Some(target) => {
            let ref_weekday = i64::from(local.weekday().num_days_from_sunday());
            (i64::from(target) - ref_weekday).rem_euclid(7)
        }
    };

    let candidate = resolve_local(tz, ref_date + Duration::days(days_ahead), hour, minute);
    if candidate > reference {
        return candidate;
    }

    // Today's slot has already passed (or is exactly now): roll to the
    // next cycle. days_ahead can only be zero here, since any future date
    // is strictly after the reference.
    let cycle = if weekday.is_some() { 7 } else { 1 };
    resolve_local(tz, ref_date + Duration::days(cycle), hour, minute)
}

/// Resolve an owner-local wall-clock time on a date to a UTC instant.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier offset;
/// nonexistent local times (DST spring-forward gap) shift forward by one
/// hour.
fn resolve_local<Tz: TimeZone>(tz: &Tz, date: NaiveDate, hour: u8, minute: u8) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(u32::from(hour.min(23)), u32::from(minute.min(59)), 0)
        .unwrap_or(NaiveTime::MIN);
    let naive = date.and_time(time);

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earlier, _) => earlier.with_timezone(&Utc),
        LocalResult::None => {
            let shifted = naive + Duration::hours(1);
            match tz.from_local_datetime(&shifted) {
                LocalResult::Single(dt) => dt.with_timezone(&Utc),
                LocalResult::Ambiguous(earlier, _) => earlier.with_timezone(&Utc),
                LocalResult::None => Utc.from_utc_datetime(&naive),
            }
        }
    }
}
