//! 调度器模块
//!
//! 规则式调度决策：优化器目标优先、为临近的高等级列车让行、
//! 按优先级选择专用线或中线。

mod dispatcher;

pub use dispatcher::{Decision, Dispatcher};
