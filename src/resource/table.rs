//! 资源表
//!
//! 站台与线路资源与静态记录分离建表：按车站 id 索引站台资源，
//! 按（区间 id，线路）索引线路资源。场景克隆数据后各自重建资源表，
//! 多个场景之间不共享任何资源实例。

use std::collections::HashMap;

use super::priority::PriorityResource;
use crate::rail::{Corridor, LineKind, StationId, TrackId};

/// 一次仿真运行独占的全部资源。
pub struct ResourceTable {
    platforms: HashMap<StationId, PriorityResource>,
    lines: HashMap<(TrackId, LineKind), PriorityResource>,
}

impl ResourceTable {
    /// 按走廊当前数据建表：每站一个容量为站台数的资源，
    /// 每区间三条容量为 1 的线路。
    pub fn build(corridor: &Corridor) -> Self {
        let platforms = corridor
            .stations()
            .iter()
            .map(|s| (s.id, PriorityResource::new(s.platforms)))
            .collect();
        let mut lines = HashMap::new();
        for track in corridor.tracks() {
            for kind in [LineKind::Up, LineKind::Down, LineKind::Central] {
                lines.insert((track.id, kind), PriorityResource::new(1));
            }
        }
        Self { platforms, lines }
    }

    pub fn platform(&self, station: StationId) -> &PriorityResource {
        self.platforms
            .get(&station)
            .unwrap_or_else(|| panic!("no platform resource for station {station:?}"))
    }

    pub fn platform_mut(&mut self, station: StationId) -> &mut PriorityResource {
        self.platforms
            .get_mut(&station)
            .unwrap_or_else(|| panic!("no platform resource for station {station:?}"))
    }

    pub fn line(&self, track: TrackId, kind: LineKind) -> &PriorityResource {
        self.lines
            .get(&(track, kind))
            .unwrap_or_else(|| panic!("no {} resource for track {track:?}", kind.label()))
    }

    pub fn line_mut(&mut self, track: TrackId, kind: LineKind) -> &mut PriorityResource {
        self.lines
            .get_mut(&(track, kind))
            .unwrap_or_else(|| panic!("no {} resource for track {track:?}", kind.label()))
    }
}
