//! 目标时刻表类型
//!
//! 定义优化器的输入快照与输出条目。目标时刻表的生命周期是
//! 一次优化调用：每次求解整体覆盖，从不部分合并。

use std::collections::HashMap;

use serde::Serialize;

use crate::rail::{Corridor, TrackId, Train, TrainId};
use crate::sim::SimTime;

/// 优化器可见的列车快照。优化器不持有资源，只读取投影。
#[derive(Debug, Clone, Serialize)]
pub struct TrainSnapshot {
    pub id: TrainId,
    pub base_priority: u32,
    pub speed_kph: u32,
    /// 下一次可出发时刻
    pub next_departure: SimTime,
    /// 原计划出发（相对仿真起点的分钟），目标函数的偏差项
    pub scheduled_departure_min: Option<u64>,
    /// 全程经过的区间，按走行顺序
    pub route: Vec<TrackId>,
}

impl TrainSnapshot {
    pub fn of(train: &Train, corridor: &Corridor, next_departure: SimTime) -> Self {
        Self {
            id: train.id,
            base_priority: train.priority,
            speed_kph: train.speed_kph,
            next_departure,
            scheduled_departure_min: Some(train.scheduled_departure_min),
            route: corridor.route(train.direction),
        }
    }
}

/// 动态优先级打分可见的系统状态信号
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SystemState {
    pub congestion_level: f64,
    pub weather_impact: f64,
}

/// 单列车的目标时刻表条目
#[derive(Debug, Clone, Serialize)]
pub struct TargetEntry {
    pub target_departure: SimTime,
    /// 求解时使用的动态优先级，数值越小越紧迫
    pub dynamic_priority: f64,
    /// 0.9 = 已证最优，0.7 = 预算内仅得可行解
    pub confidence: f64,
    pub constraints_satisfied: bool,
}

/// 优化器输出：列车 id → 目标条目
pub type TargetSchedule = HashMap<TrainId, TargetEntry>;
