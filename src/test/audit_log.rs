use std::time::Duration;

use crate::audit::{EventDetails, EventKind, EventLog};
use crate::rail::{LineKind, TrackId};
use crate::sim::SimTime;

#[test]
fn records_are_append_only_and_ordered() {
    let mut log = EventLog::default();
    log.log(SimTime::ZERO, EventKind::TrainStart, "12000", "start");
    log.log(SimTime(60), EventKind::TrainHold, "12000", "held");

    assert_eq!(log.len(), 2);
    assert_eq!(log.records()[0].kind, EventKind::TrainStart);
    assert_eq!(log.records()[1].t_secs, 60);
}

#[test]
fn decision_records_capture_confidence_and_exec_time() {
    let mut log = EventLog::default();
    log.log_decision(
        SimTime(120),
        "OPTIMIZATION",
        "12000",
        serde_json::json!({ "train_id": 12000 }),
        serde_json::json!({ "target_departure": 180 }),
        0.9,
        Duration::from_millis(3),
        true,
    );

    let d = &log.decisions()[0];
    assert_eq!(d.decision_type, "OPTIMIZATION");
    assert_eq!(d.confidence, 0.9);
    assert!(d.success);
    assert!(d.exec_time_secs < 1.0);
}

#[test]
fn csv_export_writes_one_row_per_record_with_typed_details() {
    let mut log = EventLog::default();
    log.log(SimTime::ZERO, EventKind::TrainStart, "12000", "start");
    log.log_details(
        SimTime(90),
        EventKind::TrackAcquired,
        "12000",
        "got down_line",
        EventDetails {
            track_id: Some(TrackId(1)),
            line: Some(LineKind::Down),
            waited_secs: Some(30),
            ..EventDetails::default()
        },
    );

    let mut buf = Vec::new();
    log.write_csv(&mut buf).expect("write");
    let text = String::from_utf8(buf).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "timestamp,event_type,item_id,description,details"
    );
    assert!(lines[1].starts_with("0.00,TRAIN_START,12000,start,"));
    assert!(lines[2].starts_with("1.50,TRACK_ACQUIRED,12000,"));
    assert!(lines[2].contains("down_line"));
    assert!(lines[2].contains("waited_secs"));
}

#[test]
fn event_kind_labels_match_serde_names() {
    let json = serde_json::to_string(&EventKind::PlatformAcquired).expect("json");
    assert_eq!(json, "\"PLATFORM_ACQUIRED\"");
    assert_eq!(EventKind::PlatformAcquired.label(), "PLATFORM_ACQUIRED");
}
