//! 仿真时间类型
//!
//! 定义仿真时间及其单位转换。

use serde::{Deserialize, Serialize};

/// 仿真时间（秒）。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);
    pub fn from_minutes(m: u64) -> SimTime {
        SimTime(m.saturating_mul(60))
    }
    pub fn from_hours(h: u64) -> SimTime {
        SimTime(h.saturating_mul(3_600))
    }

    /// 饱和加法，时间永不回绕。
    pub fn saturating_add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(rhs.0))
    }

    /// 饱和减法，低于零时截断为零。
    pub fn saturating_sub(self, rhs: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(rhs.0))
    }

    /// 换算为分钟（向下取整）。
    pub fn minutes(self) -> u64 {
        self.0 / 60
    }

    /// 换算为分钟（向上取整）。优化器的整数出发变量使用该口径。
    pub fn ceil_minutes(self) -> u64 {
        self.0.div_ceil(60)
    }

    /// 换算为分钟（浮点），用于指标与日志输出。
    pub fn as_minutes_f64(self) -> f64 {
        self.0 as f64 / 60.0
    }
}
