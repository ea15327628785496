//! What-if 场景模块
//!
//! 此模块在隔离的基础数据副本上运行同一套仿真逻辑：应用结构/参数
//! 修改、注入脚本化扰动、独立建一套资源，并跨场景对比指标。
//! 场景之间不共享任何可变状态，单个场景失败不会中断批量对比。

mod engine;
mod error;
mod metrics;
mod spec;
mod templates;

pub use engine::{ScenarioResult, ScenarioStatus, WhatIfEngine};
pub use error::ScenarioError;
pub use metrics::{Comparison, ScenarioMetrics, scenario_metrics};
pub use spec::{ScenarioSpec, StationModification, TrackModification, TrainModification};
pub use templates::{
    capacity_reduction_scenario, high_priority_scenario, maintenance_scenario,
    weather_disruption_scenario,
};
