//! CSV corridor loader.
//!
//! # CSV formats
//!
//! `stations.csv` — one row per station, ordered by distance from origin:
//!
//! ```csv
//! station_id,station_name,distance_from_start_km,number_of_platforms,number_of_tracks
//! 1,Bhopal Junction,0,6,12
//! 2,Habibganj,6,5,10
//! ```
//!
//! `tracks.csv` — one row per segment, `track_id` ordered along the corridor:
//!
//! ```csv
//! track_id,start_station_id,end_station_id,distance_km,track_condition,geographical_condition,maintenance_status,expected_delay_minutes
//! 1,1,2,6,good,clear,no,0
//! ```
//!
//! `trains.csv` — one row per (train, station-visit); the loader keeps each
//! train's earliest-timestamp row and converts its timestamps to minute
//! offsets from the first data row's `scheduled_arrival` (the simulation
//! origin). Timestamps are ISO-8601 (`2025-09-17T04:30:00`).
//!
//! `events.csv` — recorded operational events (timestamp, type, free text);
//! loaded for reference, scenario disruptions are usually supplied
//! programmatically instead.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;

use super::corridor::Corridor;
use super::error::{RailError, RailResult};
use super::id::{StationId, TrackId, TrainId};
use super::station::Station;
use super::track::{GeoCondition, Track, TrackCondition};
use super::train::{Direction, Train, TrainKind};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct StationRecord {
    station_id: u32,
    station_name: String,
    distance_from_start_km: u32,
    number_of_platforms: usize,
    number_of_tracks: u32,
}

#[derive(Debug, Deserialize)]
struct TrackRecord {
    track_id: u32,
    start_station_id: u32,
    end_station_id: u32,
    distance_km: u32,
    track_condition: String,
    geographical_condition: String,
    maintenance_status: String,
    expected_delay_minutes: u64,
}

#[derive(Debug, Deserialize)]
struct TrainRecord {
    timestamp: String,
    train_id: u32,
    train_type: String,
    direction: String,
    priority_level: u32,
    speed_profile_kph: u32,
    scheduled_arrival: String,
    scheduled_departure: String,
    actual_departure: String,
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    timestamp: String,
    event_type: String,
    description: String,
}

/// A recorded operational event from `events.csv`.
#[derive(Debug, Clone)]
pub struct CorridorEvent {
    pub timestamp: String,
    pub event_type: String,
    pub description: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

pub fn load_stations_csv(path: &Path) -> RailResult<Vec<Station>> {
    load_stations(std::fs::File::open(path)?)
}

pub fn load_stations<R: Read>(reader: R) -> RailResult<Vec<Station>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut out = Vec::new();
    for row in rdr.deserialize::<StationRecord>() {
        let r = row.map_err(|e| RailError::Parse(e.to_string()))?;
        out.push(Station {
            id: StationId(r.station_id),
            name: r.station_name,
            distance_km: r.distance_from_start_km,
            platforms: r.number_of_platforms,
            tracks: r.number_of_tracks,
        });
    }
    Ok(out)
}

pub fn load_tracks_csv(path: &Path) -> RailResult<Vec<Track>> {
    load_tracks(std::fs::File::open(path)?)
}

pub fn load_tracks<R: Read>(reader: R) -> RailResult<Vec<Track>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut out = Vec::new();
    for row in rdr.deserialize::<TrackRecord>() {
        let r = row.map_err(|e| RailError::Parse(e.to_string()))?;
        out.push(Track {
            id: TrackId(r.track_id),
            start: StationId(r.start_station_id),
            end: StationId(r.end_station_id),
            distance_km: r.distance_km,
            condition: parse_condition(&r.track_condition)?,
            geography: parse_geography(&r.geographical_condition)?,
            maintenance: parse_yes_no(&r.maintenance_status)?,
            expected_delay_minutes: r.expected_delay_minutes,
        });
    }
    Ok(out)
}

pub fn load_trains_csv(path: &Path) -> RailResult<Vec<Train>> {
    load_trains(std::fs::File::open(path)?)
}

/// Load trains from the per-visit time series.
///
/// The first data row's `scheduled_arrival` fixes the simulation origin;
/// each train's start delay is its first visit's `actual_departure` offset
/// from that origin, clamped at zero.
pub fn load_trains<R: Read>(reader: R) -> RailResult<Vec<Train>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut origin: Option<NaiveDateTime> = None;
    // 每列车保留 timestamp 最早的一行
    let mut first_visit: HashMap<u32, (NaiveDateTime, TrainRecord)> = HashMap::new();
    let mut order: Vec<u32> = Vec::new();

    for row in rdr.deserialize::<TrainRecord>() {
        let r = row.map_err(|e| RailError::Parse(e.to_string()))?;
        if origin.is_none() {
            origin = Some(parse_timestamp(&r.scheduled_arrival)?);
        }
        let ts = parse_timestamp(&r.timestamp)?;
        let replace = match first_visit.get(&r.train_id) {
            Some((seen, _)) => ts < *seen,
            None => true,
        };
        if replace {
            if !order.contains(&r.train_id) {
                order.push(r.train_id);
            }
            first_visit.insert(r.train_id, (ts, r));
        }
    }

    let origin = origin.ok_or_else(|| RailError::Parse("trains.csv has no rows".into()))?;
    let mut out = Vec::with_capacity(order.len());
    for id in order {
        let (_, r) = first_visit.remove(&id).expect("recorded above");
        out.push(Train {
            id: TrainId(r.train_id),
            kind: parse_train_kind(&r.train_type)?,
            direction: parse_direction(&r.direction)?,
            priority: r.priority_level,
            speed_kph: r.speed_profile_kph,
            scheduled_departure_min: minutes_from(origin, parse_timestamp(&r.scheduled_departure)?),
            start_delay_min: minutes_from(origin, parse_timestamp(&r.actual_departure)?),
        });
    }
    Ok(out)
}

pub fn load_events_csv(path: &Path) -> RailResult<Vec<CorridorEvent>> {
    load_events(std::fs::File::open(path)?)
}

pub fn load_events<R: Read>(reader: R) -> RailResult<Vec<CorridorEvent>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut out = Vec::new();
    for row in rdr.deserialize::<EventRecord>() {
        let r = row.map_err(|e| RailError::Parse(e.to_string()))?;
        out.push(CorridorEvent {
            timestamp: r.timestamp,
            event_type: r.event_type,
            description: r.description,
        });
    }
    Ok(out)
}

/// Load and cross-validate the full corridor from the three base tables.
pub fn load_corridor(stations: &Path, tracks: &Path, trains: &Path) -> RailResult<Corridor> {
    Corridor::new(
        load_stations_csv(stations)?,
        load_tracks_csv(tracks)?,
        load_trains_csv(trains)?,
    )
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_timestamp(s: &str) -> RailResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| RailError::Parse(format!("bad timestamp {s:?}: {e}")))
}

fn minutes_from(origin: NaiveDateTime, t: NaiveDateTime) -> u64 {
    (t - origin).num_minutes().max(0) as u64
}

fn parse_condition(s: &str) -> RailResult<TrackCondition> {
    match s.trim() {
        "good" => Ok(TrackCondition::Good),
        "degraded" => Ok(TrackCondition::Degraded),
        "under-maintenance" => Ok(TrackCondition::UnderMaintenance),
        other => Err(RailError::Parse(format!("bad track_condition {other:?}"))),
    }
}

fn parse_geography(s: &str) -> RailResult<GeoCondition> {
    match s.trim() {
        "clear" => Ok(GeoCondition::Clear),
        "rain" => Ok(GeoCondition::Rain),
        "storm" => Ok(GeoCondition::Storm),
        "fog" => Ok(GeoCondition::Fog),
        other => Err(RailError::Parse(format!(
            "bad geographical_condition {other:?}"
        ))),
    }
}

fn parse_yes_no(s: &str) -> RailResult<bool> {
    match s.trim() {
        "yes" => Ok(true),
        "no" => Ok(false),
        other => Err(RailError::Parse(format!("bad maintenance_status {other:?}"))),
    }
}

fn parse_train_kind(s: &str) -> RailResult<TrainKind> {
    match s.trim() {
        "Special" => Ok(TrainKind::Special),
        "Express" => Ok(TrainKind::Express),
        "Passenger" => Ok(TrainKind::Passenger),
        "Freight" => Ok(TrainKind::Freight),
        other => Err(RailError::Parse(format!("bad train_type {other:?}"))),
    }
}

fn parse_direction(s: &str) -> RailResult<Direction> {
    match s.trim() {
        "UP" => Ok(Direction::Up),
        "DOWN" => Ok(Direction::Down),
        other => Err(RailError::Parse(format!("bad direction {other:?}"))),
    }
}
