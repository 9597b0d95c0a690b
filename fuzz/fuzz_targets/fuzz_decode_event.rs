#![no_main]
use charge_planner::config::ScheduleRule;
use charge_planner::intake::Event;
use charge_planner::schedule::{parse_time_of_day, resolve_days, resolve_next};
use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = Event::from_payload(data);

    // Split the input into a day token and a time and run them through the engine
    let text = String::from_utf8_lossy(data);
    let text: &str = &text;
    let (day, time) = text.split_once('|').unwrap_or((text, "07:00"));
    let _ = resolve_days(day);
    let _ = parse_time_of_day(time);

    if let Some(now) = Utc.timestamp_opt(1_700_000_000, 0).single() {
        let rules = [ScheduleRule::new(day, time, None)];
        if let Ok(plan) = resolve_next(&rules, &now, 80, &chrono_tz::Europe::Amsterdam) {
            assert!(plan.time >= now);
        }
    }
});
