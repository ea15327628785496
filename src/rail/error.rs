use thiserror::Error;

use super::id::{StationId, TrackId, TrainId};

#[derive(Debug, Error)]
pub enum RailError {
    #[error("corridor needs at least two stations and one track")]
    EmptyCorridor,

    #[error("track count must be station count - 1 (got {tracks} tracks for {stations} stations)")]
    TrackCountMismatch { stations: usize, tracks: usize },

    #[error("track {0:?} does not connect consecutive stations")]
    NonLinearTrack(TrackId),

    #[error("unknown station id {0:?}")]
    UnknownStation(StationId),

    #[error("unknown track id {0:?}")]
    UnknownTrack(TrackId),

    #[error("unknown train id {0:?}")]
    UnknownTrain(TrainId),

    #[error("train {0:?} has zero speed")]
    ZeroSpeed(TrainId),

    #[error("train {0:?} has priority 0 (reserved for disruption blocks)")]
    ReservedPriority(TrainId),

    #[error("data parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RailResult<T> = Result<T, RailError>;
