//! Subcommand handlers.
//!
//! Each module handles one CLI subcommand; `main.rs` only parses arguments,
//! loads the campus, and dispatches here.

pub mod route;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use campus_nav_lib::{build_graph, load_campus, Campus, EngineConfig, MapGraph};

/// Campus data, configuration, and the graph built from them.
#[derive(Debug)]
pub struct CampusContext {
    pub campus: Campus,
    pub config: EngineConfig,
    pub graph: MapGraph,
}

impl CampusContext {
    /// Load configuration (or defaults) and campus data, then build the graph.
    pub fn load(campus_path: &Path, config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => EngineConfig::from_path(path).with_context(|| {
                format!("failed to load configuration from {}", path.display())
            })?,
            None => EngineConfig::default(),
        };

        let campus = load_campus(campus_path).with_context(|| {
            format!("failed to load campus data from {}", campus_path.display())
        })?;
        let graph = build_graph(&campus, &config.graph)
            .with_context(|| format!("failed to build routing graph for {}", campus.name))?;

        Ok(Self {
            campus,
            config,
            graph,
        })
    }
}
