use crate::error::{PlannerError, Result};
use chrono::{
    DateTime, Datelike, Days, LocalResult, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone,
    Weekday,
};

/// Parse a schedule time in `HH:MM` (24h) form.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| PlannerError::invalid_time(value))
}

/// Next instant at or after `now` that falls on `weekday` at `time` in `tz`.
///
/// Dates are stepped in calendar days in the zone's local time, so a week
/// that crosses a DST change still lands on the same wall-clock time. A
/// candidate equal to `now` counts as today; only one strictly before `now`
/// moves to the following week.
pub fn next_occurrence<Z: TimeZone, Tz: TimeZone>(
    weekday: Weekday,
    time: NaiveTime,
    now: &DateTime<Z>,
    tz: &Tz,
) -> DateTime<Tz> {
    let now = now.with_timezone(tz);
    let days_ahead =
        (7 + weekday.num_days_from_monday() - now.weekday().num_days_from_monday()) % 7;
    let date = now.date_naive() + Days::new(u64::from(days_ahead));

    let candidate = localize(tz, date.and_time(time));
    if candidate < now {
        return localize(tz, (date + Days::new(7)).and_time(time));
    }
    candidate
}

/// Map a local wall-clock time in `tz` to an instant.
///
/// Ambiguous times (clocks going back) take the earlier instant. Times that
/// fall into a gap (clocks going forward) are read with the offset in force
/// before the gap, which moves them forward by the gap length.
pub(crate) fn localize<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let before = local - TimeDelta::days(1);
            let offset_secs = tz
                .offset_from_local_datetime(&before)
                .earliest()
                .map_or(0, |offset| offset.fix().local_minus_utc());
            tz.from_utc_datetime(&(local - TimeDelta::seconds(i64::from(offset_secs))))
        }
    }
}
