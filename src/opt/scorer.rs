//! 动态优先级打分
//!
//! 打分是可插拔的评分函数，契约是"返回实数优先级，越小越紧迫"，
//! 不要求任何学习模型。

use super::schedule::{SystemState, TrainSnapshot};
use crate::sim::SimTime;

/// 动态优先级打分接口
pub trait PriorityScorer: Send {
    /// 返回列车此刻的动态优先级，数值越小越紧迫。
    fn score(&self, train: &TrainSnapshot, now: SimTime, state: &SystemState) -> f64;
}

/// 默认打分：直接使用列车的静态基础优先级。
pub struct StaticPriority;

impl PriorityScorer for StaticPriority {
    fn score(&self, train: &TrainSnapshot, _now: SimTime, _state: &SystemState) -> f64 {
        f64::from(train.base_priority)
    }
}
