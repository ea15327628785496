//! 优化器模块
//!
//! 此模块在滚动时间视界内为列车求解免冲突的目标出发时刻：
//! 整数出发变量、车头时距/容量/优先序/扰动约束、加权目标函数，
//! 以及墙钟求解预算。输出由调度器按规则一消费。

mod optimizer;
mod schedule;
mod scorer;

pub use optimizer::{Optimizer, OptimizerOpts, SolveRecord, SolveStatus};
pub use schedule::{SystemState, TargetEntry, TargetSchedule, TrainSnapshot};
pub use scorer::{PriorityScorer, StaticPriority};
