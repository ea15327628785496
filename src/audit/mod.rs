//! 审计日志模块
//!
//! 仿真核心在每次状态转移与每个调度/优化决策处追加结构化事件；
//! 该接口只追加、不失败，指标与对比分析读取其类型化字段。

mod types;

pub use types::{DecisionRecord, EventDetails, EventKind, EventLog, EventRecord};
