//! 走廊拓扑
//!
//! 定义线性走廊：有序车站序列与相邻车站之间的轨道区间，
//! 以及方向相关的走行次序换算。

use super::error::{RailError, RailResult};
use super::id::{StationId, TrackId, TrainId};
use super::station::Station;
use super::track::Track;
use super::train::{Direction, Train};

/// 线性走廊：`tracks[i]` 连接 `stations[i]` 与 `stations[i+1]`。
///
/// 区间顺序有意义：`Down` 方向按索引递增走行，`Up` 方向递减。
#[derive(Debug, Clone)]
pub struct Corridor {
    stations: Vec<Station>,
    tracks: Vec<Track>,
    trains: Vec<Train>,
}

impl Corridor {
    /// 构建并校验走廊。区间必须依次连接相邻车站，否则拒绝装载。
    pub fn new(stations: Vec<Station>, tracks: Vec<Track>, trains: Vec<Train>) -> RailResult<Self> {
        if stations.len() < 2 || tracks.is_empty() {
            return Err(RailError::EmptyCorridor);
        }
        if tracks.len() != stations.len() - 1 {
            return Err(RailError::TrackCountMismatch {
                stations: stations.len(),
                tracks: tracks.len(),
            });
        }
        for (i, track) in tracks.iter().enumerate() {
            if track.start != stations[i].id || track.end != stations[i + 1].id {
                return Err(RailError::NonLinearTrack(track.id));
            }
        }
        for train in &trains {
            if train.speed_kph == 0 {
                return Err(RailError::ZeroSpeed(train.id));
            }
            // 优先级 0 保留给扰动进程的线路抢占
            if train.priority == 0 {
                return Err(RailError::ReservedPriority(train.id));
            }
        }
        Ok(Self {
            stations,
            tracks,
            trains,
        })
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    pub fn station(&self, index: usize) -> &Station {
        &self.stations[index]
    }

    pub fn track(&self, index: usize) -> &Track {
        &self.tracks[index]
    }

    pub fn train(&self, index: usize) -> &Train {
        &self.trains[index]
    }

    pub fn train_by_id(&self, id: TrainId) -> Option<&Train> {
        self.trains.iter().find(|t| t.id == id)
    }

    pub fn station_pos(&self, id: StationId) -> Option<usize> {
        self.stations.iter().position(|s| s.id == id)
    }

    pub fn track_pos(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn station_mut(&mut self, id: StationId) -> Option<&mut Station> {
        self.stations.iter_mut().find(|s| s.id == id)
    }

    pub fn track_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    pub fn train_mut(&mut self, id: TrainId) -> Option<&mut Train> {
        self.trains.iter_mut().find(|t| t.id == id)
    }

    /// 该方向的始发站
    pub fn start_station(&self, direction: Direction) -> &Station {
        match direction {
            Direction::Down => &self.stations[0],
            Direction::Up => &self.stations[self.stations.len() - 1],
        }
    }

    /// 该方向的第一个走行区间索引
    pub fn first_leg(&self, direction: Direction) -> usize {
        match direction {
            Direction::Down => 0,
            Direction::Up => self.tracks.len() - 1,
        }
    }

    /// 走完 `leg` 后的下一个区间索引；走完全程返回 None。
    pub fn next_leg(&self, leg: usize, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Down => (leg + 1 < self.tracks.len()).then_some(leg + 1),
            Direction::Up => leg.checked_sub(1),
        }
    }

    pub fn is_final_leg(&self, leg: usize, direction: Direction) -> bool {
        self.next_leg(leg, direction).is_none()
    }

    /// 走行区间 `leg` 的到达车站索引
    pub fn arrival_station_index(&self, leg: usize, direction: Direction) -> usize {
        match direction {
            Direction::Down => leg + 1,
            Direction::Up => leg,
        }
    }

    /// 行进方向上刚驶过的上一区间（让行待避的回望目标）
    pub fn leg_behind(&self, leg: usize, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Down => leg.checked_sub(1),
            Direction::Up => (leg + 1 < self.tracks.len()).then_some(leg + 1),
        }
    }

    /// 该方向全程经过的区间 id，按走行顺序
    pub fn route(&self, direction: Direction) -> Vec<TrackId> {
        match direction {
            Direction::Down => self.tracks.iter().map(|t| t.id).collect(),
            Direction::Up => self.tracks.iter().rev().map(|t| t.id).collect(),
        }
    }
}
