//! What-if 引擎
//!
//! 场景生命周期：`create_scenario` 登记配置（状态 `created`），
//! `run_scenario` 深拷贝基础数据、应用修改、独立建资源跑完一次仿真
//! （状态 `completed`），`compare_scenarios` 跨场景推导并排名指标。
//! 基础数据从不被修改，失败只标记单个场景。

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use super::error::ScenarioError;
use super::metrics::{Comparison, recommendations, scenario_metrics};
use super::spec::ScenarioSpec;
use crate::audit::{EventKind, EventLog};
use crate::opt::{Optimizer, OptimizerOpts};
use crate::rail::{Corridor, DisruptionKind, RailError, StationId, TrackId, TrainId};
use crate::run::{RailWorld, RunConfig};
use crate::sim::{SimTime, Simulator};

/// 场景状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Created,
    Completed,
}

/// 一次场景运行的产物
#[derive(Debug)]
pub struct ScenarioResult {
    pub log: EventLog,
    /// 运行终了的虚拟时刻
    pub final_time: SimTime,
    pub total_trains: usize,
    pub completed_trains: usize,
}

struct ScenarioSlot {
    spec: ScenarioSpec,
    status: ScenarioStatus,
    result: Option<ScenarioResult>,
}

/// What-if 引擎：持有基础数据与全部已登记场景。
pub struct WhatIfEngine {
    base: Corridor,
    scenarios: BTreeMap<String, ScenarioSlot>,
}

impl WhatIfEngine {
    pub fn new(base: Corridor) -> Self {
        Self {
            base,
            scenarios: BTreeMap::new(),
        }
    }

    pub fn base(&self) -> &Corridor {
        &self.base
    }

    /// 登记一个场景，状态置为 `created`。同名场景被整体替换。
    pub fn create_scenario(&mut self, name: impl Into<String>, spec: ScenarioSpec) {
        self.scenarios.insert(
            name.into(),
            ScenarioSlot {
                spec,
                status: ScenarioStatus::Created,
                result: None,
            },
        );
    }

    pub fn status(&self, name: &str) -> Option<ScenarioStatus> {
        self.scenarios.get(name).map(|s| s.status)
    }

    pub fn result(&self, name: &str) -> Option<&ScenarioResult> {
        self.scenarios.get(name).and_then(|s| s.result.as_ref())
    }

    /// 以默认配置运行场景至 `duration`。
    pub fn run_scenario(
        &mut self,
        name: &str,
        duration: SimTime,
    ) -> Result<&ScenarioResult, ScenarioError> {
        self.run_scenario_with(
            name,
            RunConfig {
                duration,
                ..RunConfig::default()
            },
        )
    }

    /// 运行场景。未知场景名立即报错；修改或扰动引用不存在的记录
    /// 使本场景失败，基础数据保持不变。
    pub fn run_scenario_with(
        &mut self,
        name: &str,
        config: RunConfig,
    ) -> Result<&ScenarioResult, ScenarioError> {
        let spec = self
            .scenarios
            .get(name)
            .ok_or_else(|| ScenarioError::UnknownScenario(name.to_string()))?
            .spec
            .clone();
        info!(scenario = name, "开始场景运行");

        // 深拷贝基础数据，所有修改只作用于副本
        let mut corridor = self.base.clone();
        let applied = apply_modifications(&mut corridor, &spec)?;
        for d in &spec.disruption_events {
            if let DisruptionKind::TrackBlocked { track_id, .. } = d.kind {
                if corridor.track_pos(track_id).is_none() {
                    return Err(RailError::UnknownTrack(track_id).into());
                }
            }
        }

        let duration = config.duration;
        let total_trains = corridor.trains().len();
        let optimizer = Optimizer::new(OptimizerOpts::default());
        let mut world = RailWorld::new(corridor, config, optimizer)
            .with_disruptions(spec.disruption_events.clone());
        for line in &applied {
            world.log_mut().log(
                SimTime::ZERO,
                EventKind::ScenarioModification,
                "SYSTEM",
                line.clone(),
            );
        }

        let mut sim = Simulator::default();
        world.seed(&mut sim);
        sim.run_until(duration, &mut world);

        let final_time = sim.now();
        let completed_trains = world.completed_trains();
        let slot = self
            .scenarios
            .get_mut(name)
            .expect("scenario present, checked above");
        slot.status = ScenarioStatus::Completed;
        slot.result = Some(ScenarioResult {
            log: world.into_log(),
            final_time,
            total_trains,
            completed_trains,
        });
        info!(scenario = name, completed_trains, "场景运行结束");
        Ok(slot.result.as_ref().expect("stored above"))
    }

    /// 跨场景对比。未知或未完成的场景记入 `failures`，
    /// 不中断其余场景的指标与建议。
    pub fn compare_scenarios(&self, names: &[&str]) -> Comparison {
        let mut comparison = Comparison::default();
        for &name in names {
            match self.scenarios.get(name) {
                None => {
                    comparison
                        .failures
                        .insert(name.to_string(), "scenario not found".into());
                }
                Some(slot) => match &slot.result {
                    None => {
                        comparison
                            .failures
                            .insert(name.to_string(), "scenario has not completed".into());
                    }
                    Some(result) => {
                        comparison
                            .metrics
                            .insert(name.to_string(), scenario_metrics(result));
                    }
                },
            }
        }
        comparison.recommendations = recommendations(&comparison.metrics);
        comparison
    }
}

/// 把修改应用到走廊副本，返回审计描述行。引用未知记录即报错。
fn apply_modifications(
    corridor: &mut Corridor,
    spec: &ScenarioSpec,
) -> Result<Vec<String>, RailError> {
    let mut applied = Vec::new();

    for (&id, m) in &spec.track_modifications {
        let track = corridor
            .track_mut(TrackId(id))
            .ok_or(RailError::UnknownTrack(TrackId(id)))?;
        if let Some(v) = m.track_condition {
            track.condition = v;
            applied.push(format!("Modified track {id}: track_condition = {v:?}"));
        }
        if let Some(v) = m.geographical_condition {
            track.geography = v;
            applied.push(format!("Modified track {id}: geographical_condition = {v:?}"));
        }
        if let Some(v) = m.maintenance_status {
            track.maintenance = v;
            applied.push(format!("Modified track {id}: maintenance_status = {v}"));
        }
        if let Some(v) = m.expected_delay_minutes {
            track.expected_delay_minutes = v;
            applied.push(format!("Modified track {id}: expected_delay_minutes = {v}"));
        }
        if let Some(v) = m.distance_km {
            track.distance_km = v;
            applied.push(format!("Modified track {id}: distance_km = {v}"));
        }
    }

    for (&id, m) in &spec.train_modifications {
        let train = corridor
            .train_mut(TrainId(id))
            .ok_or(RailError::UnknownTrain(TrainId(id)))?;
        if let Some(v) = m.priority_level {
            if v == 0 {
                return Err(RailError::ReservedPriority(TrainId(id)));
            }
            train.priority = v;
            applied.push(format!("Modified train {id}: priority_level = {v}"));
        }
        if let Some(v) = m.speed_profile_kph {
            if v == 0 {
                return Err(RailError::ZeroSpeed(TrainId(id)));
            }
            train.speed_kph = v;
            applied.push(format!("Modified train {id}: speed_profile_kph = {v}"));
        }
    }

    for (&id, m) in &spec.station_modifications {
        let station = corridor
            .station_mut(StationId(id))
            .ok_or(RailError::UnknownStation(StationId(id)))?;
        if let Some(v) = m.number_of_platforms {
            station.platforms = v;
            applied.push(format!("Modified station {id}: number_of_platforms = {v}"));
        }
    }

    Ok(applied)
}
