//! Zone the weekly schedules are evaluated in

use crate::config::ScheduleRule;
use crate::error::{PlannerError, Result};
use crate::schedule::{ResolvedPlan, resolve_next};
use chrono::{DateTime, FixedOffset, TimeZone};
use chrono_tz::Tz;
use std::fmt;

/// A named IANA zone or the host's local zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleZone {
    Named(Tz),
    Local,
}

impl ScheduleZone {
    /// Build from the optional `timezone` setting; blank means host local zone
    pub fn from_config(name: Option<&str>) -> Result<Self> {
        match name.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => name.parse::<Tz>().map(ScheduleZone::Named).map_err(|e| {
                PlannerError::validation("timezone".to_string(), format!("{}: {}", name, e))
            }),
            None => Ok(ScheduleZone::Local),
        }
    }

    /// Resolve `rules` in this zone, returning the deadline with its UTC offset
    pub fn resolve<Z: TimeZone>(
        &self,
        rules: &[ScheduleRule],
        now: &DateTime<Z>,
        default_soc: i32,
    ) -> Result<ResolvedPlan<FixedOffset>> {
        let (time, soc) = match self {
            ScheduleZone::Named(tz) => {
                let plan = resolve_next(rules, now, default_soc, tz)?;
                (plan.time.fixed_offset(), plan.soc)
            }
            ScheduleZone::Local => {
                let plan = resolve_next(rules, now, default_soc, &chrono::Local)?;
                (plan.time.fixed_offset(), plan.soc)
            }
        };
        Ok(ResolvedPlan { time, soc })
    }
}

impl fmt::Display for ScheduleZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleZone::Named(tz) => f.write_str(tz.name()),
            ScheduleZone::Local => f.write_str("Local"),
        }
    }
}
