mod audit_log;
mod optimizer;
mod sim_time;

use crate::rail::{
    Corridor, Direction, GeoCondition, Station, StationId, Track, TrackCondition, TrackId, Train,
    TrainId, TrainKind,
};

pub(crate) fn station(id: u32, name: &str, distance_km: u32, platforms: usize) -> Station {
    Station {
        id: StationId(id),
        name: name.to_string(),
        distance_km,
        platforms,
        tracks: platforms as u32 * 2,
    }
}

pub(crate) fn track(id: u32, start: u32, end: u32, distance_km: u32) -> Track {
    Track {
        id: TrackId(id),
        start: StationId(start),
        end: StationId(end),
        distance_km,
        condition: TrackCondition::Good,
        geography: GeoCondition::Clear,
        maintenance: false,
        expected_delay_minutes: 0,
    }
}

pub(crate) fn train(id: u32, direction: Direction, priority: u32, speed_kph: u32) -> Train {
    let kind = match priority {
        1 => TrainKind::Special,
        2 => TrainKind::Express,
        3 => TrainKind::Passenger,
        _ => TrainKind::Freight,
    };
    Train {
        id: TrainId(id),
        kind,
        direction,
        priority,
        speed_kph,
        scheduled_departure_min: 0,
        start_delay_min: 0,
    }
}

/// 两站一区间的最小走廊（区间 10 km）。
pub(crate) fn two_station_corridor(trains: Vec<Train>) -> Corridor {
    Corridor::new(
        vec![station(1, "Origin", 0, 4), station(2, "Terminus", 10, 4)],
        vec![track(1, 1, 2, 10)],
        trains,
    )
    .expect("valid corridor")
}

/// 三站两区间的走廊（10 km + 20 km）。
pub(crate) fn three_station_corridor(trains: Vec<Train>) -> Corridor {
    Corridor::new(
        vec![
            station(1, "Origin", 0, 4),
            station(2, "Midway", 10, 2),
            station(3, "Terminus", 30, 4),
        ],
        vec![track(1, 1, 2, 10), track(2, 2, 3, 20)],
        trains,
    )
    .expect("valid corridor")
}
