//! 列车类型
//!
//! 定义列车静态记录、运行方向和车种。

use serde::{Deserialize, Serialize};

use super::id::TrainId;
use super::track::LineKind;

/// 运行方向。`Down` 按区间索引递增行驶，`Up` 递减。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// 本方向的专用线路
    pub fn dedicated_line(self) -> LineKind {
        match self {
            Direction::Up => LineKind::Up,
            Direction::Down => LineKind::Down,
        }
    }
}

/// 车种，决定基础优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainKind {
    Special,
    Express,
    Passenger,
    Freight,
}

/// 列车静态记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Train {
    pub id: TrainId,
    pub kind: TrainKind,
    pub direction: Direction,
    /// 优先级，数值越小越高；1 为最高
    pub priority: u32,
    pub speed_kph: u32,
    /// 相对仿真起点的计划出发时刻（分钟）
    pub scheduled_departure_min: u64,
    /// 实际进入路网的延迟（分钟，相对仿真起点）
    pub start_delay_min: u64,
}

impl Train {
    /// 优先级 1/2 视为高等级列车，享有专用线路与让行待避
    pub fn is_high_priority(&self) -> bool {
        self.priority <= 2
    }
}
