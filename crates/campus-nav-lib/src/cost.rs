//! Accessibility cost model.
//!
//! Converts an edge plus a rider's [`AccessibilityProfile`] into the weight
//! used by path search, or excludes the edge outright. "Avoid" and "forbid"
//! are different outcomes: a penalized edge stays usable as a last resort, an
//! excluded edge does not exist for that search.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::{GraphEdge, TraversalKind};

/// Extra multiplier applied to stairs when the rider prefers not to use them
/// (`stairs_allowed == false`) but has not restricted themselves to elevators.
pub const AVOIDED_STAIRS_FACTOR: f64 = 1_000.0;

/// Per-rider routing constraints and preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessibilityProfile {
    /// When false, stairs are avoided whenever another route exists.
    pub stairs_allowed: bool,
    /// When true, stairs are never used. Overrides `stairs_allowed`.
    pub elevators_only: bool,
    /// Multiplier applied to stair lengths; 1.0 means no penalty.
    pub stairs_penalty: f64,
}

impl Default for AccessibilityProfile {
    fn default() -> Self {
        Self {
            stairs_allowed: true,
            elevators_only: false,
            stairs_penalty: 5.0,
        }
    }
}

impl AccessibilityProfile {
    /// Every edge at its physical length.
    pub fn unrestricted() -> Self {
        Self {
            stairs_allowed: true,
            elevators_only: false,
            stairs_penalty: 1.0,
        }
    }

    /// Stairs only when nothing else connects the endpoints.
    pub fn avoid_stairs() -> Self {
        Self {
            stairs_allowed: false,
            ..Self::default()
        }
    }

    /// Stairs are never used.
    pub fn elevators_only() -> Self {
        Self {
            elevators_only: true,
            ..Self::default()
        }
    }

    pub fn with_stairs_penalty(mut self, penalty: f64) -> Self {
        self.stairs_penalty = penalty;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.stairs_penalty.is_finite() || self.stairs_penalty < 1.0 {
            return Err(Error::InvalidProfile {
                message: format!(
                    "stairs_penalty must be a finite number >= 1.0 (got {})",
                    self.stairs_penalty
                ),
            });
        }
        Ok(())
    }

    /// Whether edges of `kind` may appear in a route at all.
    pub fn permits(&self, kind: TraversalKind) -> bool {
        !(self.elevators_only && kind == TraversalKind::Stairs)
    }
}

/// Traversal cost of `edge` under `profile`, or `None` when the edge is
/// excluded for this rider.
pub fn edge_cost(edge: &GraphEdge, profile: &AccessibilityProfile) -> Option<f64> {
    match edge.kind() {
        TraversalKind::Walk | TraversalKind::Elevator | TraversalKind::Ramp => Some(edge.base_cost),
        TraversalKind::Stairs if profile.elevators_only => None,
        TraversalKind::Stairs if profile.stairs_allowed => {
            Some(edge.base_cost * profile.stairs_penalty)
        }
        TraversalKind::Stairs => {
            Some(edge.base_cost * profile.stairs_penalty * AVOIDED_STAIRS_FACTOR)
        }
    }
}
