use super::days::resolve_days;
use super::occurrence::{next_occurrence, parse_time_of_day};
use crate::config::ScheduleRule;
use crate::error::{PlannerError, Result};
use chrono::{DateTime, TimeZone};

/// The charge deadline chosen for a vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlan<Tz: TimeZone> {
    /// When the target SOC must be reached
    pub time: DateTime<Tz>,
    /// Target state of charge in percent
    pub soc: i32,
}

struct Candidate<Tz: TimeZone> {
    time: DateTime<Tz>,
    soc: i32,
}

/// Resolve the nearest upcoming deadline over all `rules`.
///
/// Every rule is expanded into one candidate per weekday it covers; rules
/// without their own SOC use `default_soc`. A single bad rule fails the whole
/// resolution. When several candidates share the earliest instant the one
/// generated first wins, i.e. the earlier declared rule.
pub fn resolve_next<Z: TimeZone, Tz: TimeZone>(
    rules: &[ScheduleRule],
    now: &DateTime<Z>,
    default_soc: i32,
    tz: &Tz,
) -> Result<ResolvedPlan<Tz>> {
    let mut candidates = Vec::with_capacity(rules.len());

    for rule in rules {
        let weekdays = resolve_days(&rule.day)?;
        let time = parse_time_of_day(&rule.time)?;
        let soc = rule.soc.unwrap_or(default_soc);

        for &weekday in weekdays {
            candidates.push(Candidate {
                time: next_occurrence(weekday, time, now, tz),
                soc,
            });
        }
    }

    earliest(candidates)
        .map(|c| ResolvedPlan {
            time: c.time,
            soc: c.soc,
        })
        .ok_or(PlannerError::NoCandidates)
}

fn earliest<Tz: TimeZone>(candidates: Vec<Candidate<Tz>>) -> Option<Candidate<Tz>> {
    // strict `<` keeps the earlier-generated candidate on ties
    candidates
        .into_iter()
        .reduce(|best, c| if c.time < best.time { c } else { best })
}
