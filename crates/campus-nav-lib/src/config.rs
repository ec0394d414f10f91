//! Tunable constants for graph construction and travel-time estimates.
//!
//! Every field has a default, so a configuration file only needs to name the
//! values it overrides:
//!
//! ```json
//! { "travel": { "walking_speed": 1.1 } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Constants applied while synthesizing vertical connector edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphBuildOptions {
    /// Length assigned to one floor of stairs, in campus distance units.
    pub stairs_cost_per_floor: f64,
    /// Length assigned to one floor of elevator travel, in campus distance units.
    pub elevator_cost_per_floor: f64,
}

impl Default for GraphBuildOptions {
    fn default() -> Self {
        Self {
            stairs_cost_per_floor: 12.0,
            elevator_cost_per_floor: 20.0,
        }
    }
}

impl GraphBuildOptions {
    pub fn validate(&self) -> std::result::Result<(), String> {
        check_non_negative("stairs_cost_per_floor", self.stairs_cost_per_floor)?;
        check_non_negative("elevator_cost_per_floor", self.elevator_cost_per_floor)
    }
}

/// Constants used to turn a route's physical distance into an ETA.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelConfig {
    /// Distance units covered per second while walking.
    pub walking_speed: f64,
    /// Extra seconds for each floor climbed or descended by stairs.
    pub stairs_seconds_per_floor: f64,
    /// Fixed wait for each elevator ride.
    pub elevator_seconds_per_ride: f64,
    /// Extra seconds for each floor travelled inside an elevator.
    pub elevator_seconds_per_floor: f64,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            walking_speed: 1.4,
            stairs_seconds_per_floor: 15.0,
            elevator_seconds_per_ride: 30.0,
            elevator_seconds_per_floor: 5.0,
        }
    }
}

impl TravelConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.walking_speed.is_finite() || self.walking_speed <= 0.0 {
            return Err(format!(
                "walking_speed must be a positive finite number (got {})",
                self.walking_speed
            ));
        }
        check_non_negative("stairs_seconds_per_floor", self.stairs_seconds_per_floor)?;
        check_non_negative("elevator_seconds_per_ride", self.elevator_seconds_per_ride)?;
        check_non_negative("elevator_seconds_per_floor", self.elevator_seconds_per_floor)
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub graph: GraphBuildOptions,
    pub travel: TravelConfig,
}

impl EngineConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.graph
            .validate()
            .and_then(|_| self.travel.validate())
            .map_err(|message| Error::InvalidConfig { message })
    }
}

fn check_non_negative(field: &str, value: f64) -> std::result::Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!(
            "{field} must be a finite, non-negative number (got {value})"
        ))
    }
}
