//! 场景指标
//!
//! 从运行日志的类型化字段推导平均持车延误、吞吐量与正点率，
//! 并给出各指标最优场景的建议。

use std::collections::BTreeMap;

use serde::Serialize;

use super::engine::ScenarioResult;
use crate::audit::EventKind;

/// 正点判定阈值：单次持车不超过 5 分钟。
const ON_TIME_HOLD_MIN: f64 = 5.0;

/// 单场景性能指标
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioMetrics {
    /// 平均持车延误（分钟）
    pub average_delay: f64,
    /// 吞吐量（列车/小时，按仿真时长折算）
    pub throughput: f64,
    /// 正点率：持车 ≤ 5 分钟的比例，无持车计 1.0
    pub punctuality: f64,
    pub total_trains: usize,
    /// 仿真终了时刻（分钟）
    pub simulation_time: f64,
}

/// 从一次已完成运行推导指标。
pub fn scenario_metrics(result: &ScenarioResult) -> ScenarioMetrics {
    let holds: Vec<f64> = result
        .log
        .records()
        .iter()
        .filter(|r| r.kind == EventKind::TrainHold)
        .filter_map(|r| r.details.hold_secs)
        .map(|s| s as f64 / 60.0)
        .collect();

    let average_delay = if holds.is_empty() {
        0.0
    } else {
        holds.iter().sum::<f64>() / holds.len() as f64
    };

    let sim_minutes = result.final_time.as_minutes_f64();
    let throughput = if sim_minutes > 0.0 {
        result.total_trains as f64 / (sim_minutes / 60.0)
    } else {
        0.0
    };

    let punctuality = if holds.is_empty() {
        1.0
    } else {
        holds.iter().filter(|h| **h <= ON_TIME_HOLD_MIN).count() as f64 / holds.len() as f64
    };

    ScenarioMetrics {
        average_delay,
        throughput,
        punctuality,
        total_trains: result.total_trains,
        simulation_time: sim_minutes,
    }
}

/// 跨场景对比结果。失败的场景逐一列名，不影响其余场景的指标。
#[derive(Debug, Clone, Default, Serialize)]
pub struct Comparison {
    pub metrics: BTreeMap<String, ScenarioMetrics>,
    pub failures: BTreeMap<String, String>,
    pub recommendations: Vec<String>,
}

pub(crate) fn recommendations(metrics: &BTreeMap<String, ScenarioMetrics>) -> Vec<String> {
    let mut out = Vec::new();
    let Some(best_delay) = metrics.iter().min_by(|a, b| {
        a.1.average_delay
            .partial_cmp(&b.1.average_delay)
            .unwrap_or(std::cmp::Ordering::Equal)
    }) else {
        return out;
    };
    out.push(format!(
        "Best delay performance: {} (avg delay: {:.2} min)",
        best_delay.0, best_delay.1.average_delay
    ));

    if let Some(best_throughput) = metrics.iter().max_by(|a, b| {
        a.1.throughput
            .partial_cmp(&b.1.throughput)
            .unwrap_or(std::cmp::Ordering::Equal)
    }) {
        out.push(format!(
            "Best throughput: {} ({:.2} trains/hour)",
            best_throughput.0, best_throughput.1.throughput
        ));
    }

    if let Some(best_punctuality) = metrics.iter().max_by(|a, b| {
        a.1.punctuality
            .partial_cmp(&b.1.punctuality)
            .unwrap_or(std::cmp::Ordering::Equal)
    }) {
        out.push(format!(
            "Best punctuality: {} ({:.1}%)",
            best_punctuality.0,
            best_punctuality.1.punctuality * 100.0
        ));
    }
    out
}
