// src/map/vertex.rs
use serde::{Deserialize, Serialize};

use crate::utils::geometry::Point2D;

/// A vertex as it appears in the map data, before any welding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Vertex { x, y }
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}
