//! What-if 引擎端到端测试：场景隔离、批量对比与失败标记。

use railsim_rs::audit::{EventDetails, EventKind, EventLog};
use railsim_rs::rail::{
    Corridor, Direction, Disruption, DisruptionKind, GeoCondition, LineKind, RailError, Station,
    StationId, Track, TrackCondition, TrackId, Train, TrainId, TrainKind,
};
use railsim_rs::scenario::{
    ScenarioError, ScenarioResult, ScenarioSpec, ScenarioStatus, TrainModification,
    maintenance_scenario, scenario_metrics,
};
use railsim_rs::sim::SimTime;

fn station(id: u32, name: &str, distance_km: u32, platforms: usize) -> Station {
    Station {
        id: StationId(id),
        name: name.to_string(),
        distance_km,
        platforms,
        tracks: platforms as u32 * 2,
    }
}

fn track(id: u32, start: u32, end: u32, distance_km: u32) -> Track {
    Track {
        id: TrackId(id),
        start: StationId(start),
        end: StationId(end),
        distance_km,
        condition: TrackCondition::Good,
        geography: GeoCondition::Clear,
        maintenance: false,
        expected_delay_minutes: 0,
    }
}

fn train(id: u32, direction: Direction, priority: u32, speed_kph: u32) -> Train {
    Train {
        id: TrainId(id),
        kind: TrainKind::Express,
        direction,
        priority,
        speed_kph,
        scheduled_departure_min: 0,
        start_delay_min: 0,
    }
}

fn base_corridor() -> Corridor {
    Corridor::new(
        vec![station(1, "Origin", 0, 4), station(2, "Terminus", 10, 4)],
        vec![track(1, 1, 2, 10)],
        vec![
            train(100, Direction::Down, 1, 60),
            train(300, Direction::Down, 3, 60),
        ],
    )
    .expect("valid corridor")
}

fn engine() -> railsim_rs::scenario::WhatIfEngine {
    railsim_rs::scenario::WhatIfEngine::new(base_corridor())
}

const DURATION: SimTime = SimTime(480 * 60);

#[test]
fn unknown_scenario_name_fails_fast() {
    let mut engine = engine();
    let err = engine.run_scenario("nope", DURATION).expect_err("must fail");
    assert!(matches!(err, ScenarioError::UnknownScenario(_)));
}

#[test]
fn scenario_lifecycle_goes_created_then_completed() {
    let mut engine = engine();
    engine.create_scenario("baseline", ScenarioSpec::named("baseline"));
    assert_eq!(engine.status("baseline"), Some(ScenarioStatus::Created));

    let result = engine.run_scenario("baseline", DURATION).expect("runs");
    assert_eq!(result.total_trains, 2);
    assert_eq!(result.completed_trains, 2);
    assert_eq!(engine.status("baseline"), Some(ScenarioStatus::Completed));
}

#[test]
fn scenario_modifications_never_leak_into_other_runs() {
    let mut engine = engine();

    let mut slow = ScenarioSpec::named("slow_passenger");
    slow.train_modifications.insert(
        300,
        TrainModification {
            speed_profile_kph: Some(20),
            ..TrainModification::default()
        },
    );
    engine.create_scenario("slow_passenger", slow);
    engine.create_scenario("baseline", ScenarioSpec::named("baseline"));

    engine.run_scenario("slow_passenger", DURATION).expect("runs");
    // 基础数据保持原值
    assert_eq!(
        engine.base().train_by_id(TrainId(300)).expect("train").speed_kph,
        60
    );

    // 修改过的场景运行之后，基线运行与全新引擎的基线完全一致
    engine.run_scenario("baseline", DURATION).expect("runs");
    let mut fresh = railsim_rs::scenario::WhatIfEngine::new(base_corridor());
    fresh.create_scenario("baseline", ScenarioSpec::named("baseline"));
    fresh.run_scenario("baseline", DURATION).expect("runs");

    let after = engine.result("baseline").expect("result");
    let reference = fresh.result("baseline").expect("result");
    assert_eq!(after.log.records(), reference.log.records());
}

#[test]
fn modification_of_unknown_record_fails_that_scenario_only() {
    let mut engine = engine();

    let mut broken = ScenarioSpec::named("broken");
    broken.train_modifications.insert(
        99999,
        TrainModification {
            priority_level: Some(1),
            ..TrainModification::default()
        },
    );
    engine.create_scenario("broken", broken);
    engine.create_scenario("baseline", ScenarioSpec::named("baseline"));

    let err = engine.run_scenario("broken", DURATION).expect_err("must fail");
    assert!(matches!(
        err,
        ScenarioError::Rail(RailError::UnknownTrain(TrainId(99999)))
    ));
    assert_eq!(engine.status("broken"), Some(ScenarioStatus::Created));

    // 其余场景不受影响
    engine.run_scenario("baseline", DURATION).expect("runs");
    assert_eq!(engine.status("baseline"), Some(ScenarioStatus::Completed));
}

#[test]
fn disruption_scenario_degrades_delay_metrics() {
    let mut engine = engine();
    engine.create_scenario("baseline", ScenarioSpec::named("baseline"));

    let mut disrupted = ScenarioSpec::named("blocked_down_line");
    disrupted.disruption_events = vec![Disruption {
        kind: DisruptionKind::TrackBlocked {
            track_id: TrackId(1),
            line: LineKind::Down,
        },
        start_time: 0,
        duration: 30,
        description: "Track 1 down line blocked".into(),
    }];
    engine.create_scenario("blocked_down_line", disrupted);

    engine.run_scenario("baseline", DURATION).expect("runs");
    engine.run_scenario("blocked_down_line", DURATION).expect("runs");

    let blocked_log = &engine.result("blocked_down_line").expect("result").log;
    assert!(
        blocked_log
            .records()
            .iter()
            .any(|r| r.kind == EventKind::TrackBlocked)
    );

    let comparison = engine.compare_scenarios(&["baseline", "blocked_down_line"]);
    assert!(comparison.failures.is_empty());
    let baseline = &comparison.metrics["baseline"];
    let blocked = &comparison.metrics["blocked_down_line"];
    assert!(blocked.average_delay >= baseline.average_delay);
    assert_eq!(comparison.recommendations.len(), 3);
}

#[test]
fn comparison_flags_missing_and_unfinished_scenarios() {
    let mut engine = engine();
    engine.create_scenario("baseline", ScenarioSpec::named("baseline"));
    engine.create_scenario("pending", ScenarioSpec::named("pending"));
    engine.run_scenario("baseline", DURATION).expect("runs");

    let comparison = engine.compare_scenarios(&["baseline", "pending", "ghost"]);
    assert_eq!(comparison.metrics.len(), 1);
    assert!(comparison.metrics.contains_key("baseline"));
    assert_eq!(comparison.failures["pending"], "scenario has not completed");
    assert_eq!(comparison.failures["ghost"], "scenario not found");
    // 建议只基于成功场景
    assert!(comparison.recommendations.iter().all(|r| r.contains("baseline")));
}

#[test]
fn scenario_spec_round_trips_through_json() {
    let json = r#"{
        "name": "track_maintenance",
        "description": "down line closed",
        "track_modifications": { "1": { "maintenance_status": true, "expected_delay_minutes": 45 } },
        "disruption_events": [{
            "type": "track_blocked",
            "track_id": 1,
            "line": "down_line",
            "start_time": 90,
            "duration": 180,
            "description": "maintenance possession"
        }]
    }"#;
    let spec = ScenarioSpec::from_json(json).expect("parse");
    assert_eq!(spec.name, "track_maintenance");
    assert_eq!(spec.track_modifications[&1].expected_delay_minutes, Some(45));
    assert_eq!(spec.disruption_events.len(), 1);
    assert!(matches!(
        spec.disruption_events[0].kind,
        DisruptionKind::TrackBlocked {
            track_id: TrackId(1),
            line: LineKind::Down,
        }
    ));

    let back = serde_json::to_string(&spec).expect("serialize");
    let again = ScenarioSpec::from_json(&back).expect("reparse");
    assert_eq!(again.disruption_events[0].start_time, 90);
}

#[test]
fn bundled_maintenance_template_targets_track_three() {
    let spec = maintenance_scenario();
    assert_eq!(spec.name, "track_maintenance");
    assert!(spec.track_modifications.contains_key(&3));
    assert!(matches!(
        spec.disruption_events[0].kind,
        DisruptionKind::TrackBlocked {
            track_id: TrackId(3),
            ..
        }
    ));

    // 在覆盖 3 号区间的走廊上可以直接运行
    let corridor = Corridor::new(
        vec![
            station(1, "A", 0, 4),
            station(2, "B", 10, 2),
            station(3, "C", 20, 2),
            station(4, "D", 35, 4),
        ],
        vec![track(1, 1, 2, 10), track(2, 2, 3, 10), track(3, 3, 4, 15)],
        vec![train(100, Direction::Down, 2, 60)],
    )
    .expect("valid corridor");
    let mut engine = railsim_rs::scenario::WhatIfEngine::new(corridor);
    engine.create_scenario("track_maintenance", maintenance_scenario());
    let result = engine.run_scenario("track_maintenance", DURATION).expect("runs");
    assert!(
        result
            .log
            .records()
            .iter()
            .any(|r| r.kind == EventKind::TrackBlocked)
    );
}

#[test]
fn metrics_derive_from_typed_hold_details() {
    let mut log = EventLog::default();
    for hold_min in [2u64, 4, 30] {
        log.log_details(
            SimTime::from_minutes(10),
            EventKind::TrainHold,
            "100",
            format!("held for {hold_min} minutes"),
            EventDetails {
                hold_secs: Some(hold_min * 60),
                ..EventDetails::default()
            },
        );
    }
    let result = ScenarioResult {
        log,
        final_time: SimTime::from_hours(8),
        total_trains: 4,
        completed_trains: 4,
    };
    let metrics = scenario_metrics(&result);

    assert_eq!(metrics.average_delay, 12.0);
    assert_eq!(metrics.throughput, 0.5);
    // 三次持车中两次 ≤ 5 分钟
    assert!((metrics.punctuality - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(metrics.simulation_time, 480.0);
}
