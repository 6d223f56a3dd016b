// src/bsp/vertex.rs

use std::collections::HashMap;
use std::fmt;

use crate::utils::geometry::Point2D;

/// A handle to a vertex owned by a [`VertexAllocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexIndex(pub usize);

impl fmt::Display for VertexIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BspVertex {
    pub index: VertexIndex,
    pub position: Point2D,
}

/// Hands out vertex indices, welding any point that lands within the weld
/// epsilon of an existing vertex onto that vertex.
///
/// Lookups go through a grid whose cells are one epsilon wide, so a
/// candidate can only be in the cell of the query point or one of its eight
/// neighbours.
#[derive(Debug)]
pub struct VertexAllocator {
    weld_epsilon: f64,
    vertices: Vec<BspVertex>,
    grid: HashMap<(i64, i64), Vec<VertexIndex>>,
}

impl VertexAllocator {
    pub fn new(weld_epsilon: f64) -> Self {
        assert!(weld_epsilon > 0.0, "Vertex weld epsilon must be positive, got {}", weld_epsilon);
        VertexAllocator {
            weld_epsilon,
            vertices: Vec::new(),
            grid: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn position(&self, index: VertexIndex) -> Point2D {
        self.vertices[index.0].position
    }

    /// Returns the vertex at (or welded to) `point`, allocating it if none
    /// is close enough.
    pub fn get_or_create(&mut self, point: Point2D) -> VertexIndex {
        if let Some(existing) = self.find(&point) {
            return existing;
        }

        let index = VertexIndex(self.vertices.len());
        self.vertices.push(BspVertex { index, position: point });
        self.grid.entry(self.cell_of(&point)).or_default().push(index);
        index
    }

    /// Looks up a vertex within the weld epsilon of `point` without
    /// allocating. The closest one wins if several qualify.
    pub fn find(&self, point: &Point2D) -> Option<VertexIndex> {
        let (cx, cy) = self.cell_of(point);
        let mut best: Option<(VertexIndex, f64)> = None;

        for x in cx - 1..=cx + 1 {
            for y in cy - 1..=cy + 1 {
                let Some(bucket) = self.grid.get(&(x, y)) else {
                    continue;
                };
                for &index in bucket {
                    let distance = self.vertices[index.0].position.distance_to(point);
                    if distance > self.weld_epsilon {
                        continue;
                    }
                    if best.map_or(true, |(_, d)| distance < d) {
                        best = Some((index, distance));
                    }
                }
            }
        }

        best.map(|(index, _)| index)
    }

    fn cell_of(&self, point: &Point2D) -> (i64, i64) {
        (
            (point.x / self.weld_epsilon).floor() as i64,
            (point.y / self.weld_epsilon).floor() as i64,
        )
    }
}
