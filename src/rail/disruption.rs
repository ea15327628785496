//! 扰动事件
//!
//! 定义时间窗内强制占用资源的扰动。扰动既是优化器的硬约束，
//! 也是仿真引擎中的真实资源封锁。

use serde::{Deserialize, Serialize};

use super::id::TrackId;
use super::track::LineKind;
use crate::sim::SimTime;

/// 扰动类别
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisruptionKind {
    /// 封锁指定区间的一条线路
    TrackBlocked { track_id: TrackId, line: LineKind },
    /// 恶劣天气。目前仅记录，不改变行驶时间。
    WeatherImpact {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speed_reduction: Option<f64>,
    },
}

/// 扰动事件，活动窗口为 [start_time, start_time + duration)，单位分钟。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disruption {
    #[serde(flatten)]
    pub kind: DisruptionKind,
    /// 相对仿真起点的开始时刻（分钟）
    pub start_time: u64,
    /// 持续时长（分钟）
    pub duration: u64,
    #[serde(default)]
    pub description: String,
}

impl Disruption {
    pub fn start(&self) -> SimTime {
        SimTime::from_minutes(self.start_time)
    }

    pub fn end(&self) -> SimTime {
        SimTime::from_minutes(self.start_time.saturating_add(self.duration))
    }

    /// 该扰动是否封锁指定区间（任一线路）
    pub fn blocks_track(&self, track: TrackId) -> bool {
        matches!(self.kind, DisruptionKind::TrackBlocked { track_id, .. } if track_id == track)
    }

    /// 活动窗口是否覆盖给定的整分钟时刻
    pub fn window_contains_minute(&self, minute: u64) -> bool {
        minute >= self.start_time && minute < self.start_time.saturating_add(self.duration)
    }
}
