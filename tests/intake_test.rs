mod common;

use charge_planner::error::PlannerError;
use charge_planner::intake::{Event, EventIntake, IgnoreReason, IntakeOutcome};
use common::{RecordingBus, config, utc};
use std::sync::Arc;

fn intake_with(bus: Arc<RecordingBus>) -> EventIntake {
    EventIntake::from_config(Arc::new(config()), bus).unwrap()
}

#[tokio::test]
async fn connect_publishes_next_plan() {
    let bus = Arc::new(RecordingBus::default());
    let intake = intake_with(bus.clone());

    // Sunday 10:00 in Amsterdam
    let outcome = intake
        .handle_payload(
            br#"{"vehicle":"model3","mode":"pv","type":"connect"}"#,
            utc(2023, 3, 5, 9, 0),
        )
        .await
        .unwrap();

    match outcome {
        IntakeOutcome::Dispatched {
            vehicle,
            topic,
            plan,
        } => {
            assert_eq!(vehicle, "model3");
            assert_eq!(topic, "evcc/vehicles/model3/planSoc/set");
            assert_eq!(plan.soc, 70);
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    let published = bus.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].topic, "evcc/vehicles/model3/planSoc/set");
    assert!(!published[0].retained);
    assert_eq!(
        published[0].payload,
        r#"{"value":70,"time":"2023-03-06T07:00:00+01:00"}"#
    );
}

#[tokio::test]
async fn non_connect_events_are_ignored() {
    let bus = Arc::new(RecordingBus::default());
    let intake = intake_with(bus.clone());

    let event = Event {
        vehicle: "model3".to_string(),
        mode: String::new(),
        kind: "disconnect".to_string(),
    };
    let outcome = intake.handle_event(&event, utc(2023, 3, 5, 9, 0)).await.unwrap();
    assert_eq!(
        outcome,
        IntakeOutcome::Ignored(IgnoreReason::NotConnect("disconnect".to_string()))
    );
    assert!(bus.published().is_empty());
}

#[tokio::test]
async fn unknown_vehicles_are_ignored() {
    let bus = Arc::new(RecordingBus::default());
    let intake = intake_with(bus.clone());

    let outcome = intake
        .handle_payload(
            br#"{"vehicle":"Model3","type":"connect"}"#,
            utc(2023, 3, 5, 9, 0),
        )
        .await
        .unwrap();
    assert_eq!(
        outcome,
        IntakeOutcome::Ignored(IgnoreReason::UnknownVehicle("Model3".to_string()))
    );
    assert!(bus.published().is_empty());
}

#[tokio::test]
async fn bad_schedule_publishes_nothing() {
    let bus = Arc::new(RecordingBus::default());
    let intake = intake_with(bus.clone());

    let err = intake
        .handle_payload(
            br#"{"vehicle":"broken","type":"connect"}"#,
            utc(2023, 3, 5, 9, 0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidDayToken { .. }));
    assert!(bus.published().is_empty());
}

#[tokio::test]
async fn empty_schedule_publishes_nothing() {
    let bus = Arc::new(RecordingBus::default());
    let intake = intake_with(bus.clone());

    let err = intake
        .handle_payload(
            br#"{"vehicle":"idle","type":"connect"}"#,
            utc(2023, 3, 5, 9, 0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::NoCandidates));
    assert!(bus.published().is_empty());
}

#[tokio::test]
async fn undecodable_payload_is_an_error() {
    let bus = Arc::new(RecordingBus::default());
    let intake = intake_with(bus.clone());

    let err = intake
        .handle_payload(b"{\"vehicle\":", utc(2023, 3, 5, 9, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::Serialization { .. }));
}

#[tokio::test]
async fn publish_failure_is_reported() {
    let bus = Arc::new(RecordingBus::failing());
    let intake = intake_with(bus);

    let err = intake
        .handle_payload(
            br#"{"vehicle":"model3","type":"connect"}"#,
            utc(2023, 3, 5, 9, 0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::Mqtt { .. }));
    assert!(!err.is_schedule_error());
}

#[tokio::test]
async fn events_for_one_vehicle_resolve_independently() {
    let bus = Arc::new(RecordingBus::default());
    let intake = Arc::new(intake_with(bus.clone()));

    let payload = br#"{"vehicle":"model3","type":"connect"}"#;
    let saturday = {
        let intake = Arc::clone(&intake);
        tokio::spawn(async move { intake.handle_payload(payload, utc(2023, 3, 4, 9, 0)).await })
    };
    let tuesday = {
        let intake = Arc::clone(&intake);
        tokio::spawn(async move { intake.handle_payload(payload, utc(2023, 3, 7, 9, 0)).await })
    };
    saturday.await.unwrap().unwrap();
    tuesday.await.unwrap().unwrap();

    let mut payloads: Vec<_> = bus.published().into_iter().map(|p| p.payload).collect();
    payloads.sort();
    assert_eq!(
        payloads,
        vec![
            r#"{"value":60,"time":"2023-03-05T09:00:00+01:00"}"#.to_string(),
            r#"{"value":80,"time":"2023-03-08T07:00:00+01:00"}"#.to_string(),
        ]
    );
}
