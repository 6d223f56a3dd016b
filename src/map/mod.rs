// src/map/mod.rs
pub mod linedef;
pub mod vertex;

pub use linedef::LineDef;
pub use vertex::Vertex;

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bsp::BspConfig;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse map JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("linedef {line} references missing vertex {vertex}")]
    MissingVertex { line: usize, vertex: usize },

    #[error("linedef {line} starts and ends on vertex {vertex}")]
    DegenerateLine { line: usize, vertex: usize },
}

/// The raw geometry of a map: vertices, the lines between them, and an
/// optional BSP config override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapGeometry {
    #[serde(default)]
    pub config: BspConfig,
    pub vertices: Vec<Vertex>,
    pub linedefs: Vec<LineDef>,
}

impl MapGeometry {
    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        let map: MapGeometry = serde_json::from_str(json)?;
        map.validate()?;
        Ok(map)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    fn validate(&self) -> Result<(), MapError> {
        for line in &self.linedefs {
            for vertex in [line.start, line.end] {
                if vertex >= self.vertices.len() {
                    return Err(MapError::MissingVertex { line: line.id, vertex });
                }
            }
            if line.start == line.end {
                return Err(MapError::DegenerateLine { line: line.id, vertex: line.start });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_map_json() {
        let json = r#"{
            "vertices": [{"x": 0, "y": 0}, {"x": 10, "y": 0}, {"x": 5, "y": 5}],
            "linedefs": [
                {"id": 0, "start": 0, "end": 1, "one_sided": true},
                {"id": 1, "start": 1, "end": 2}
            ]
        }"#;

        let map = MapGeometry::from_json_str(json).unwrap();
        assert_eq!(map.vertices.len(), 3);
        assert_eq!(map.vertices[2], Vertex::new(5.0, 5.0));
        assert!(map.linedefs[0].one_sided);
        assert!(map.linedefs[1].two_sided());
        assert_eq!(map.config, BspConfig::default());
    }

    #[test]
    fn test_missing_vertex_rejected() {
        let json = r#"{
            "vertices": [{"x": 0, "y": 0}],
            "linedefs": [{"id": 7, "start": 0, "end": 3}]
        }"#;

        match MapGeometry::from_json_str(json) {
            Err(MapError::MissingVertex { line, vertex }) => {
                assert_eq!(line, 7);
                assert_eq!(vertex, 3);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_bad_json_rejected() {
        assert!(matches!(MapGeometry::from_json_str("{"), Err(MapError::Json(_))));
    }
}
