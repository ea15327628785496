//! 铁路走廊数据模型
//!
//! 此模块包含走廊的静态数据：车站、轨道区间、列车与扰动事件，
//! 以及 CSV 数据装载。记录本身不持有任何活动资源句柄。

// 子模块声明
mod corridor;
mod disruption;
mod error;
mod id;
mod loader;
mod station;
mod track;
mod train;

// 重新导出公共接口
pub use corridor::Corridor;
pub use disruption::{Disruption, DisruptionKind};
pub use error::{RailError, RailResult};
pub use id::{StationId, TrackId, TrainId};
pub use loader::{
    CorridorEvent, load_corridor, load_events, load_events_csv, load_stations, load_stations_csv,
    load_tracks, load_tracks_csv, load_trains, load_trains_csv,
};
pub use station::Station;
pub use track::{GeoCondition, LineKind, Track, TrackCondition};
pub use train::{Direction, Train, TrainKind};
