//! 车站类型
//!
//! 定义车站静态记录。站台资源在 `resource::ResourceTable` 中单独建表，
//! 记录可整体克隆用于场景隔离。

use serde::{Deserialize, Serialize};

use super::id::StationId;

/// 车站静态记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    /// 距走廊起点的里程（km）
    pub distance_km: u32,
    /// 站台数，即站台资源容量
    pub platforms: usize,
    /// 股道数
    pub tracks: u32,
}
