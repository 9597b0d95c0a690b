use crate::error::{PlannerError, Result};
use chrono::Weekday;

/// Weekdays denoted by the `workday` token, in iteration order
pub const WORKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// Weekdays denoted by the `weekend` token, in iteration order
pub const WEEKEND: [Weekday; 2] = [Weekday::Sat, Weekday::Sun];

/// Resolve a day token to the weekdays it covers.
///
/// Matching is case-insensitive. A weekday name yields that single day,
/// `workday` yields Monday to Friday and `weekend` Saturday and Sunday.
/// The returned order is the order candidates are generated in, which
/// decides ties between rules.
pub fn resolve_days(token: &str) -> Result<&'static [Weekday]> {
    let days: &'static [Weekday] = match token.trim().to_lowercase().as_str() {
        "monday" => &[Weekday::Mon],
        "tuesday" => &[Weekday::Tue],
        "wednesday" => &[Weekday::Wed],
        "thursday" => &[Weekday::Thu],
        "friday" => &[Weekday::Fri],
        "saturday" => &[Weekday::Sat],
        "sunday" => &[Weekday::Sun],
        "workday" => &WORKDAYS,
        "weekend" => &WEEKEND,
        _ => return Err(PlannerError::invalid_day(token)),
    };
    Ok(days)
}
