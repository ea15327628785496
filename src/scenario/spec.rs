use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rail::{Disruption, GeoCondition, TrackCondition};

/// A named what-if scenario: per-record overrides of the base data plus
/// scripted disruption events. Modification maps are keyed by raw record id;
/// `BTreeMap` keeps application order deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub track_modifications: BTreeMap<u32, TrackModification>,
    #[serde(default)]
    pub train_modifications: BTreeMap<u32, TrainModification>,
    #[serde(default)]
    pub station_modifications: BTreeMap<u32, StationModification>,
    #[serde(default)]
    pub disruption_events: Vec<Disruption>,
}

impl ScenarioSpec {
    /// An empty (baseline) scenario spec.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            track_modifications: BTreeMap::new(),
            train_modifications: BTreeMap::new(),
            station_modifications: BTreeMap::new(),
            disruption_events: Vec::new(),
        }
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Field overrides for one track segment. Absent fields keep base values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackModification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_condition: Option<TrackCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geographical_condition: Option<GeoCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_status: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_delay_minutes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<u32>,
}

/// Field overrides for one train.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainModification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_profile_kph: Option<u32>,
}

/// Field overrides for one station.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationModification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_platforms: Option<usize>,
}
