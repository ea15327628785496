use std::time::Duration;

use crate::audit::EventLog;
use crate::opt::{
    Optimizer, OptimizerOpts, PriorityScorer, SystemState, TrainSnapshot,
};
use crate::rail::{Disruption, DisruptionKind, LineKind, TrackId, TrainId};
use crate::sim::SimTime;

fn snapshot(id: u32, priority: u32, next_departure: SimTime, route: Vec<u32>) -> TrainSnapshot {
    TrainSnapshot {
        id: TrainId(id),
        base_priority: priority,
        speed_kph: 60,
        next_departure,
        scheduled_departure_min: Some(0),
        route: route.into_iter().map(TrackId).collect(),
    }
}

fn state() -> SystemState {
    SystemState {
        congestion_level: 0.3,
        weather_impact: 0.1,
    }
}

#[test]
fn single_train_departs_at_horizon_start() {
    let mut opt = Optimizer::new(OptimizerOpts::default());
    let mut log = EventLog::default();

    let schedule = opt.optimize(
        SimTime::ZERO,
        &[snapshot(1, 1, SimTime::ZERO, vec![1])],
        &[],
        &state(),
        &mut log,
    );

    let entry = schedule.get(&TrainId(1)).expect("scheduled");
    assert_eq!(entry.target_departure, SimTime::ZERO);
    assert_eq!(entry.confidence, 0.9);
    assert!(entry.constraints_satisfied);
}

#[test]
fn pairwise_departures_respect_minimum_headway() {
    let mut opt = Optimizer::new(OptimizerOpts::default());
    let mut log = EventLog::default();

    let trains = vec![
        snapshot(1, 1, SimTime::ZERO, vec![1, 2]),
        snapshot(2, 2, SimTime::ZERO, vec![1, 2]),
        snapshot(3, 3, SimTime::ZERO, vec![1, 2]),
    ];
    let schedule = opt.optimize(SimTime::ZERO, &trains, &[], &state(), &mut log);
    assert_eq!(schedule.len(), 3);

    let departures: Vec<u64> = trains
        .iter()
        .map(|t| schedule.get(&t.id).expect("scheduled").target_departure.minutes())
        .collect();
    for i in 0..departures.len() {
        for j in i + 1..departures.len() {
            assert!(
                departures[i].abs_diff(departures[j]) >= 5,
                "headway violated: {departures:?}"
            );
        }
    }
}

#[test]
fn better_priority_never_departs_after_worse_priority() {
    let mut opt = Optimizer::new(OptimizerOpts::default());
    let mut log = EventLog::default();

    let trains = vec![
        snapshot(10, 4, SimTime::ZERO, vec![1]),
        snapshot(11, 1, SimTime::ZERO, vec![1]),
    ];
    let schedule = opt.optimize(SimTime::ZERO, &trains, &[], &state(), &mut log);

    let express = schedule.get(&TrainId(11)).expect("scheduled");
    let freight = schedule.get(&TrainId(10)).expect("scheduled");
    assert!(express.target_departure <= freight.target_departure);
    assert!(express.dynamic_priority < freight.dynamic_priority);
}

#[test]
fn trains_beyond_horizon_are_excluded() {
    let mut opt = Optimizer::new(OptimizerOpts {
        horizon_min: 30,
        ..OptimizerOpts::default()
    });
    let mut log = EventLog::default();

    let schedule = opt.optimize(
        SimTime::ZERO,
        &[snapshot(1, 1, SimTime::from_minutes(45), vec![1])],
        &[],
        &state(),
        &mut log,
    );
    assert!(schedule.is_empty());
}

#[test]
fn blocked_track_excludes_departures_inside_the_window() {
    let mut opt = Optimizer::new(OptimizerOpts::default());
    let mut log = EventLog::default();

    let disruption = Disruption {
        kind: DisruptionKind::TrackBlocked {
            track_id: TrackId(1),
            line: LineKind::Down,
        },
        start_time: 0,
        duration: 12,
        description: "blocked".into(),
    };
    let schedule = opt.optimize(
        SimTime::ZERO,
        &[snapshot(1, 1, SimTime::ZERO, vec![1])],
        &[disruption],
        &state(),
        &mut log,
    );

    let entry = schedule.get(&TrainId(1)).expect("scheduled");
    assert_eq!(entry.target_departure.minutes(), 12);
}

#[test]
fn disruption_on_another_track_does_not_constrain() {
    let mut opt = Optimizer::new(OptimizerOpts::default());
    let mut log = EventLog::default();

    let disruption = Disruption {
        kind: DisruptionKind::TrackBlocked {
            track_id: TrackId(9),
            line: LineKind::Down,
        },
        start_time: 0,
        duration: 12,
        description: "elsewhere".into(),
    };
    let schedule = opt.optimize(
        SimTime::ZERO,
        &[snapshot(1, 1, SimTime::ZERO, vec![1])],
        &[disruption],
        &state(),
        &mut log,
    );
    assert_eq!(
        schedule.get(&TrainId(1)).expect("scheduled").target_departure,
        SimTime::ZERO
    );
}

#[test]
fn exhausted_budget_yields_empty_schedule_not_an_error() {
    let mut opt = Optimizer::new(OptimizerOpts {
        solver_budget: Duration::ZERO,
        ..OptimizerOpts::default()
    });
    let mut log = EventLog::default();

    let schedule = opt.optimize(
        SimTime::ZERO,
        &[snapshot(1, 1, SimTime::ZERO, vec![1])],
        &[],
        &state(),
        &mut log,
    );
    assert!(schedule.is_empty());
}

#[test]
fn infeasible_problem_yields_empty_schedule() {
    // 视界内所有出发分钟都被封锁
    let mut opt = Optimizer::new(OptimizerOpts {
        horizon_min: 10,
        ..OptimizerOpts::default()
    });
    let mut log = EventLog::default();

    let disruption = Disruption {
        kind: DisruptionKind::TrackBlocked {
            track_id: TrackId(1),
            line: LineKind::Down,
        },
        start_time: 0,
        duration: 11,
        description: "full window".into(),
    };
    let schedule = opt.optimize(
        SimTime::ZERO,
        &[snapshot(1, 1, SimTime::ZERO, vec![1])],
        &[disruption],
        &state(),
        &mut log,
    );
    assert!(schedule.is_empty());
}

#[test]
fn reoptimization_uses_capped_horizon_without_mutating_config() {
    let mut opt = Optimizer::new(OptimizerOpts::default());
    let mut log = EventLog::default();

    let disruption = Disruption {
        kind: DisruptionKind::TrackBlocked {
            track_id: TrackId(1),
            line: LineKind::Down,
        },
        start_time: 0,
        duration: 10,
        description: "incident".into(),
    };
    // next_departure 在收窄视界（15 分钟）之内
    let schedule = opt.reoptimize_under_disruption(
        SimTime::ZERO,
        &[snapshot(1, 1, SimTime::ZERO, vec![1])],
        &disruption,
        &state(),
        &mut log,
    );
    assert_eq!(
        schedule.get(&TrainId(1)).expect("scheduled").target_departure.minutes(),
        10
    );
    // 配置视界保持 30 分钟不变
    assert_eq!(opt.opts().horizon_min, 30);
}

#[test]
fn custom_scorer_drives_the_priority_ordering() {
    struct Inverted;
    impl PriorityScorer for Inverted {
        fn score(&self, train: &TrainSnapshot, _now: SimTime, _state: &SystemState) -> f64 {
            // 反转：基础优先级越差，动态优先级越紧迫
            10.0 - f64::from(train.base_priority)
        }
    }

    let mut opt = Optimizer::with_scorer(OptimizerOpts::default(), Box::new(Inverted));
    let mut log = EventLog::default();

    let trains = vec![
        snapshot(10, 1, SimTime::ZERO, vec![1]),
        snapshot(11, 4, SimTime::ZERO, vec![1]),
    ];
    let schedule = opt.optimize(SimTime::ZERO, &trains, &[], &state(), &mut log);

    let nominally_worse = schedule.get(&TrainId(11)).expect("scheduled");
    let nominally_better = schedule.get(&TrainId(10)).expect("scheduled");
    assert!(nominally_worse.target_departure <= nominally_better.target_departure);
}

#[test]
fn solve_history_records_each_call() {
    let mut opt = Optimizer::new(OptimizerOpts::default());
    let mut log = EventLog::default();

    opt.optimize(
        SimTime::ZERO,
        &[snapshot(1, 1, SimTime::ZERO, vec![1])],
        &[],
        &state(),
        &mut log,
    );
    opt.optimize(SimTime::from_minutes(5), &[], &[], &state(), &mut log);

    let records: Vec<_> = opt.history().collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].trains, 1);
    assert_eq!(records[1].trains, 0);
}
