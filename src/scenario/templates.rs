//! 预置场景模板
//!
//! 常用 what-if 分析的现成配置，针对参考数据集的记录 id。

use std::collections::BTreeMap;

use super::spec::{ScenarioSpec, StationModification, TrackModification, TrainModification};
use crate::rail::{Disruption, DisruptionKind, GeoCondition, LineKind, TrackId};

/// 恶劣天气：两段区间风暴，全线降速扰动。
pub fn weather_disruption_scenario() -> ScenarioSpec {
    let mut spec = ScenarioSpec::named("severe_weather");
    spec.description = "Simulation with severe weather conditions affecting operations".into();
    spec.track_modifications = BTreeMap::from([
        (
            1,
            TrackModification {
                geographical_condition: Some(GeoCondition::Storm),
                expected_delay_minutes: Some(30),
                ..TrackModification::default()
            },
        ),
        (
            2,
            TrackModification {
                geographical_condition: Some(GeoCondition::Storm),
                expected_delay_minutes: Some(25),
                ..TrackModification::default()
            },
        ),
    ]);
    spec.disruption_events = vec![Disruption {
        kind: DisruptionKind::WeatherImpact {
            speed_reduction: Some(0.5),
        },
        start_time: 60,
        duration: 120,
        description: "Severe storm affecting track conditions".into(),
    }];
    spec
}

/// 计划维修：3 号区间下行线封锁。
pub fn maintenance_scenario() -> ScenarioSpec {
    let mut spec = ScenarioSpec::named("track_maintenance");
    spec.description = "Simulation with scheduled track maintenance".into();
    spec.track_modifications = BTreeMap::from([(
        3,
        TrackModification {
            maintenance_status: Some(true),
            expected_delay_minutes: Some(45),
            ..TrackModification::default()
        },
    )]);
    spec.disruption_events = vec![Disruption {
        kind: DisruptionKind::TrackBlocked {
            track_id: TrackId(3),
            line: LineKind::Down,
        },
        start_time: 90,
        duration: 180,
        description: "Track 3 down line blocked for maintenance".into(),
    }];
    spec
}

/// 高等级加车：两列车提为最高优先级并提速。
pub fn high_priority_scenario() -> ScenarioSpec {
    let mut spec = ScenarioSpec::named("high_priority_traffic");
    spec.description = "Simulation with increased high-priority train traffic".into();
    spec.train_modifications = BTreeMap::from([
        (
            12000,
            TrainModification {
                priority_level: Some(1),
                speed_profile_kph: Some(100),
            },
        ),
        (
            12001,
            TrainModification {
                priority_level: Some(1),
                speed_profile_kph: Some(95),
            },
        ),
    ]);
    spec
}

/// 站台容量压缩：两端枢纽站台数下调。
pub fn capacity_reduction_scenario() -> ScenarioSpec {
    let mut spec = ScenarioSpec::named("capacity_reduction");
    spec.description = "Simulation with reduced station capacity".into();
    spec.station_modifications = BTreeMap::from([
        (
            1,
            StationModification {
                number_of_platforms: Some(3),
            },
        ),
        (
            7,
            StationModification {
                number_of_platforms: Some(4),
            },
        ),
    ]);
    spec
}
