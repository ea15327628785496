//! 仿真引擎模块
//!
//! 此模块把每列车的走行编排为显式状态机：申请站台 → 调度循环
//! （持车/等待/放行）→ 走行 → 停站 → 释放站台，逐区间推进直到
//! 终点站。扰动进程在窗口内以最高优先级强占线路。

mod config;
mod events;
mod proc;
mod world;

pub use config::RunConfig;
pub use world::RailWorld;
