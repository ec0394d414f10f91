//! Campus source data as delivered by the building/floor authoring tools.
//!
//! All coordinates share one planar frame and one distance unit across the
//! whole campus; floors of a building are stacked in that frame.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::TraversalKind;

/// Whole campus: buildings, optional outdoor grounds, and cross-area links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campus {
    pub name: String,
    #[serde(default)]
    pub buildings: Vec<Building>,
    /// Outdoor paths between buildings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounds: Option<FloorPlan>,
    /// Links between nodes on different floors or areas, such as an entrance
    /// door and the outdoor path in front of it.
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub floors: Vec<FloorPlan>,
    /// Points of interest, each referencing its floor by id.
    #[serde(default)]
    pub pois: Vec<Poi>,
}

/// One floor of a building, or the outdoor grounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    pub id: String,
    pub level: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    /// Synthetic hallway geometry points.
    #[serde(default)]
    pub junctions: Vec<Junction>,
    /// Direct connections between nodes on this floor.
    #[serde(default)]
    pub links: Vec<Link>,
}

/// A room, represented in the graph by its entry door.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub x: f64,
    pub y: f64,
}

impl Room {
    /// "Robotics Lab (101)", "Robotics Lab", "101", or nothing.
    pub fn label(&self) -> Option<String> {
        match (self.name.as_deref(), self.number.as_deref()) {
            (Some(name), Some(number)) => Some(format!("{name} ({number})")),
            (Some(name), None) => Some(name.to_string()),
            (None, Some(number)) => Some(number.to_string()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Junction {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// Structural role of a point of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiRole {
    Stairs,
    Elevator,
    Ramp,
    Entrance,
    /// Water fountain, bathroom, AED, and similar destinations.
    Amenity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: String,
    pub role: PoiRole,
    pub floor: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Identifier shared by every landing of the same physical stair or
    /// elevator, e.g. "Elevator A".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector: Option<String>,
}

/// Declared connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub kind: TraversalKind,
    #[serde(default)]
    pub one_way: bool,
    /// Overrides the straight-line length between the endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
}

impl Link {
    pub fn walk(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: TraversalKind::Walk,
            one_way: false,
            length: None,
        }
    }
}

impl Campus {
    /// Parse a campus document from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parse a campus document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of floors across every building, plus the grounds if present.
    pub fn floor_count(&self) -> usize {
        self.buildings.iter().map(|b| b.floors.len()).sum::<usize>()
            + usize::from(self.grounds.is_some())
    }
}

/// Load a campus document from a JSON file.
pub fn load_campus(path: &Path) -> Result<Campus> {
    let contents = fs::read_to_string(path)?;
    let campus: Campus =
        serde_json::from_str(&contents).map_err(|err| Error::CampusFormat {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    debug!(
        path = %path.display(),
        campus = %campus.name,
        buildings = campus.buildings.len(),
        floors = campus.floor_count(),
        "loaded campus data"
    );
    Ok(campus)
}
