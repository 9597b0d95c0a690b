mod common;

use charge_planner::schedule::resolve_next;
use chrono::{FixedOffset, TimeZone};
use common::utc;

#[test]
fn configured_week_resolves_in_configured_zone() {
    let cfg = common::config();
    let zone = cfg.schedule_zone().unwrap();
    let model3 = cfg.vehicle("model3").unwrap();

    // (now in UTC, expected local deadline, soc); Amsterdam is UTC+1 in March 2023
    let cases = [
        (utc(2023, 3, 4, 9, 0), (2023, 3, 5, 9, 0), 60),
        (utc(2023, 3, 5, 9, 0), (2023, 3, 6, 7, 0), 70),
        (utc(2023, 3, 6, 9, 0), (2023, 3, 7, 8, 0), 80),
        (utc(2023, 3, 7, 9, 0), (2023, 3, 8, 7, 0), 80),
        (utc(2023, 3, 8, 9, 0), (2023, 3, 9, 8, 0), 80),
        (utc(2023, 3, 9, 9, 0), (2023, 3, 10, 7, 0), 90),
        (utc(2023, 3, 10, 9, 0), (2023, 3, 11, 9, 0), 60),
    ];

    let cet = FixedOffset::east_opt(3600).unwrap();
    for (now, (y, m, d, h, min), soc) in cases {
        let plan = zone.resolve(&model3.schedule, &now, model3.soc).unwrap();
        assert_eq!(plan.time, cet.with_ymd_and_hms(y, m, d, h, min, 0).unwrap());
        assert_eq!(plan.time.offset(), &cet);
        assert_eq!(plan.soc, soc);
    }
}

#[test]
fn same_rules_in_utc_shift_the_deadline() {
    let cfg = common::config();
    let model3 = cfg.vehicle("model3").unwrap();

    // Sunday 09:30 UTC: the weekend 09:00 slot has just passed in UTC
    let now = utc(2023, 3, 5, 9, 30);
    let plan = resolve_next(&model3.schedule, &now, model3.soc, &chrono::Utc).unwrap();
    assert_eq!(plan.time, utc(2023, 3, 6, 7, 0));
    assert_eq!(plan.soc, 70);
}
