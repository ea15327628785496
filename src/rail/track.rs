//! 轨道区间类型
//!
//! 定义轨道区间静态记录及其三条互斥线路（上行、下行、中线）。

use serde::{Deserialize, Serialize};

use super::id::{StationId, TrackId};

/// 区间线路类别。每条线路是容量为 1 的独占资源。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    #[serde(rename = "up_line")]
    Up,
    #[serde(rename = "down_line")]
    Down,
    #[serde(rename = "central_line")]
    Central,
}

impl LineKind {
    pub fn label(self) -> &'static str {
        match self {
            LineKind::Up => "up_line",
            LineKind::Down => "down_line",
            LineKind::Central => "central_line",
        }
    }
}

/// 轨道状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackCondition {
    Good,
    Degraded,
    UnderMaintenance,
}

/// 地理/气象状况
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoCondition {
    Clear,
    Rain,
    Storm,
    Fog,
}

/// 轨道区间静态记录。线路资源在 `resource::ResourceTable` 中单独建表。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub start: StationId,
    pub end: StationId,
    pub distance_km: u32,
    pub condition: TrackCondition,
    pub geography: GeoCondition,
    pub maintenance: bool,
    pub expected_delay_minutes: u64,
}
