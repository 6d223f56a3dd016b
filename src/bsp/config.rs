// src/bsp/config.rs

use serde::{Deserialize, Serialize};

use crate::utils::util::DEFAULT_EPSILON;

/// Tolerances used while building a BSP tree. Map units vary between
/// formats, so none of these are hard-coded in the algorithms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BspConfig {
    /// Two points closer than this are the same vertex.
    pub vertex_weld_epsilon: f64,
    /// Perp-dot magnitude below which a point is considered on a line.
    pub side_epsilon: f64,
    /// Cross product tolerance for the parallel and collinear tests.
    pub parallel_epsilon: f64,
    /// Fail the partition when a segment crosses the interior of the
    /// splitter itself. Valid map geometry never does this.
    ///
    /// Off by default so a lone splitter can cut through anything, e.g. the
    /// splitter (0,0)-(10,0) splitting (5,-5)-(5,5) at its midpoint. Turn it
    /// on when building a tree for real map data, where splitters come from
    /// the map's own lines.
    pub reject_splitter_crossings: bool,
}

impl Default for BspConfig {
    fn default() -> Self {
        BspConfig {
            vertex_weld_epsilon: 0.005,
            side_epsilon: DEFAULT_EPSILON,
            parallel_epsilon: DEFAULT_EPSILON,
            reject_splitter_crossings: false,
        }
    }
}

impl BspConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
