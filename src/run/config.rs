//! 运行配置
//!
//! 一次仿真运行的全部参数。速度倍率是显式配置项，
//! 随走行时间计算逐处传递，不存在进程级全局状态。

use crate::opt::SystemState;
use crate::sim::SimTime;

/// 运行配置选项
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// 仿真时长上限（虚拟时间）。运行以时间为界，不以全部列车完成为界。
    pub duration: SimTime,
    /// 速度倍率，作用于每次走行时间计算
    pub speed_multiplier: f64,
    /// 停站时长
    pub dwell: SimTime,
    /// 两线皆忙时的重试间隔
    pub retry_interval: SimTime,
    /// 喂给动态优先级打分的系统状态信号
    pub system_state: SystemState,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            duration: SimTime::from_minutes(480),
            speed_multiplier: 1.0,
            dwell: SimTime::from_minutes(5),
            retry_interval: SimTime::from_minutes(1),
            system_state: SystemState {
                congestion_level: 0.3,
                weather_impact: 0.1,
            },
        }
    }
}
