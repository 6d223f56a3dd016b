// src/bsp/segment.rs

use std::fmt;
use std::sync::Arc;

use crate::bsp::vertex::VertexIndex;
use crate::map::LineDef;
use crate::utils::geometry::{Point2D, Seg2D};

/// A handle to a segment owned by a segment pool. Splitting never reuses a
/// handle; the two halves always come back as fresh ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegIndex(pub usize);

impl fmt::Display for SegIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seg{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    pub fn opposite(self) -> Endpoint {
        match self {
            Endpoint::Start => Endpoint::End,
            Endpoint::End => Endpoint::Start,
        }
    }
}

/// A segment being fed through the BSP builder.
///
/// - `line` is the map line this is (a piece of), or `None` for a miniseg.
/// - Positions are cached from the vertex pool when the segment is created.
#[derive(Debug, Clone)]
pub struct BspSegment {
    pub index: SegIndex,
    pub start_vertex: VertexIndex,
    pub end_vertex: VertexIndex,
    pub start: Point2D,
    pub end: Point2D,
    pub line: Option<Arc<LineDef>>,
}

impl BspSegment {
    pub fn new(
        index: SegIndex,
        start_vertex: VertexIndex,
        end_vertex: VertexIndex,
        start: Point2D,
        end: Point2D,
        line: Option<Arc<LineDef>>,
    ) -> Self {
        assert!(
            start_vertex != end_vertex,
            "BSP segment {} cannot start and end on the same vertex {}",
            index,
            start_vertex
        );
        BspSegment {
            index,
            start_vertex,
            end_vertex,
            start,
            end,
            line,
        }
    }

    pub fn is_miniseg(&self) -> bool {
        self.line.is_none()
    }

    /// Does not account for minisegs, which are neither one nor two sided.
    pub fn one_sided(&self) -> bool {
        self.line.as_ref().is_some_and(|line| line.one_sided)
    }

    pub fn two_sided(&self) -> bool {
        !self.is_miniseg() && !self.one_sided()
    }

    pub fn seg2d(&self) -> Seg2D {
        Seg2D::new(self.start, self.end)
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn vertex_from(&self, endpoint: Endpoint) -> VertexIndex {
        match endpoint {
            Endpoint::Start => self.start_vertex,
            Endpoint::End => self.end_vertex,
        }
    }

    pub fn position_from(&self, endpoint: Endpoint) -> Point2D {
        match endpoint {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    /// Compares vertex identities only. Two segments whose endpoints merely
    /// sit at the same coordinates without being welded do not share them.
    pub fn shares_any_endpoints(&self, other: &BspSegment) -> bool {
        self.start_vertex == other.start_vertex
            || self.start_vertex == other.end_vertex
            || self.end_vertex == other.start_vertex
            || self.end_vertex == other.end_vertex
    }
}

impl fmt::Display for BspSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}) -> ({}, {})",
            self.index, self.start.x, self.start.y, self.end.x, self.end.y
        )?;
        match &self.line {
            Some(line) => write!(f, " [line={}, one_sided={}]", line.id, line.one_sided),
            None => write!(f, " [miniseg]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(start: usize, end: usize, line: Option<Arc<LineDef>>) -> BspSegment {
        BspSegment::new(
            SegIndex(0),
            VertexIndex(start),
            VertexIndex(end),
            Point2D::new(start as f64, 0.0),
            Point2D::new(end as f64, 0.0),
            line,
        )
    }

    #[test]
    fn test_sidedness() {
        let one = make(0, 1, Some(Arc::new(LineDef::new(0, 0, 1, true))));
        assert!(one.one_sided());
        assert!(!one.two_sided());
        assert!(!one.is_miniseg());

        let two = make(0, 1, Some(Arc::new(LineDef::new(0, 0, 1, false))));
        assert!(!two.one_sided());
        assert!(two.two_sided());

        let mini = make(0, 1, None);
        assert!(mini.is_miniseg());
        assert!(!mini.one_sided());
        assert!(!mini.two_sided());
    }

    #[test]
    fn test_shares_any_endpoints() {
        let a = make(0, 1, None);
        assert!(a.shares_any_endpoints(&make(1, 2, None)));
        assert!(a.shares_any_endpoints(&make(3, 0, None)));
        assert!(!a.shares_any_endpoints(&make(2, 3, None)));
    }

    #[test]
    fn test_endpoint_lookup() {
        let a = make(4, 9, None);
        assert_eq!(a.vertex_from(Endpoint::Start), VertexIndex(4));
        assert_eq!(a.vertex_from(Endpoint::End.opposite()), VertexIndex(4));
        assert_eq!(a.position_from(Endpoint::End), Point2D::new(9.0, 0.0));
    }

    #[test]
    #[should_panic]
    fn test_point_segment_panics() {
        make(3, 3, None);
    }
}
