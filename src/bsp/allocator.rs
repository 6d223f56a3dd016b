// src/bsp/allocator.rs

use std::collections::HashMap;
use std::sync::Arc;

use crate::bsp::segment::{BspSegment, SegIndex};
use crate::bsp::vertex::{VertexAllocator, VertexIndex};
use crate::map::LineDef;

/// The segment storage the partitioner reads from and splits through.
pub trait SegmentPool {
    fn segment(&self, index: SegIndex) -> &BspSegment;

    /// Splits the segment at time `t` in `(0, 1)`, returning the
    /// `[start, middle]` and `[middle, end]` halves as new handles. Both keep
    /// the parent line of the original.
    fn split(&mut self, index: SegIndex, t: f64) -> (SegIndex, SegIndex);
}

/// Owns every segment created while building a tree. A segment is keyed by
/// its unordered vertex pair, so asking for `(a, b)` after `(b, a)` returns
/// the segment that already exists.
#[derive(Debug)]
pub struct SegmentAllocator {
    vertices: VertexAllocator,
    segments: Vec<BspSegment>,
    table: HashMap<(VertexIndex, VertexIndex), SegIndex>,
}

impl SegmentAllocator {
    pub fn new(vertices: VertexAllocator) -> Self {
        SegmentAllocator {
            vertices,
            segments: Vec::new(),
            table: HashMap::new(),
        }
    }

    pub fn vertices(&self) -> &VertexAllocator {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut VertexAllocator {
        &mut self.vertices
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: SegIndex) -> &BspSegment {
        &self.segments[index.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &BspSegment> {
        self.segments.iter()
    }

    pub fn get_or_create(
        &mut self,
        start: VertexIndex,
        end: VertexIndex,
        line: Option<Arc<LineDef>>,
    ) -> SegIndex {
        assert!(start != end, "Cannot create a segment that is a point (vertex {})", start);
        assert!(start.0 < self.vertices.len(), "Start vertex {} out of range", start);
        assert!(end.0 < self.vertices.len(), "End vertex {} out of range", end);

        let key = table_key(start, end);
        if let Some(&existing) = self.table.get(&key) {
            return existing;
        }

        let index = SegIndex(self.segments.len());
        self.segments.push(BspSegment::new(
            index,
            start,
            end,
            self.vertices.position(start),
            self.vertices.position(end),
            line,
        ));
        self.table.insert(key, index);
        index
    }

    /// Order of the two vertices does not matter.
    pub fn contains_segment(&self, start: VertexIndex, end: VertexIndex) -> bool {
        self.table.contains_key(&table_key(start, end))
    }
}

impl SegmentPool for SegmentAllocator {
    fn segment(&self, index: SegIndex) -> &BspSegment {
        self.get(index)
    }

    fn split(&mut self, index: SegIndex, t: f64) -> (SegIndex, SegIndex) {
        assert!(
            t > 0.0 && t < 1.0,
            "Trying to split {} out of range or at an endpoint with t = {}",
            index,
            t
        );

        let (start, end, line, middle_point) = {
            let seg = self.get(index);
            (seg.start_vertex, seg.end_vertex, seg.line.clone(), seg.seg2d().from_time(t))
        };

        let middle = self.vertices.get_or_create(middle_point);
        let first = self.get_or_create(start, middle, line.clone());
        let second = self.get_or_create(middle, end, line);
        (first, second)
    }
}

fn table_key(a: VertexIndex, b: VertexIndex) -> (VertexIndex, VertexIndex) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::geometry::Point2D;
    use assert_approx_eq::assert_approx_eq;

    fn allocator() -> SegmentAllocator {
        SegmentAllocator::new(VertexAllocator::new(0.005))
    }

    #[test]
    fn test_create_empty_allocator() {
        let segments = allocator();
        assert!(segments.is_empty());
        assert_eq!(segments.iter().count(), 0);
    }

    #[test]
    fn test_allocate_segment() {
        let mut segments = allocator();
        let start = segments.vertices_mut().get_or_create(Point2D::new(1.0, 2.0));
        let end = segments.vertices_mut().get_or_create(Point2D::new(3.0, 4.0));
        let index = segments.get_or_create(start, end, None);

        let seg = segments.get(index);
        assert_eq!(seg.start_vertex, start);
        assert_eq!(seg.end_vertex, end);
        assert_eq!(seg.end, Point2D::new(3.0, 4.0));
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_both_directions_yield_same_segment() {
        let mut segments = allocator();
        let start = segments.vertices_mut().get_or_create(Point2D::new(1.0, 2.0));
        let end = segments.vertices_mut().get_or_create(Point2D::new(3.0, 4.0));

        let first = segments.get_or_create(start, end, None);
        let second = segments.get_or_create(end, start, None);
        assert_eq!(first, second);
        assert_eq!(segments.len(), 1);
        assert!(segments.contains_segment(end, start));
    }

    #[test]
    fn test_split_preserves_geometry_and_line() {
        let mut segments = allocator();
        let line = Arc::new(LineDef::new(3, 0, 1, true));
        let start = segments.vertices_mut().get_or_create(Point2D::new(5.0, -5.0));
        let end = segments.vertices_mut().get_or_create(Point2D::new(5.0, 5.0));
        let original = segments.get_or_create(start, end, Some(line));

        let (a, b) = segments.split(original, 0.5);
        assert_ne!(a, original);
        assert_ne!(b, original);

        let (a, b, original) = (segments.get(a), segments.get(b), segments.get(original));
        assert_eq!(a.start_vertex, original.start_vertex);
        assert_eq!(b.end_vertex, original.end_vertex);
        assert_eq!(a.end_vertex, b.start_vertex);
        assert_eq!(a.end, Point2D::new(5.0, 0.0));
        assert_approx_eq!(a.length() + b.length(), original.length());
        assert!(a.one_sided());
        assert_eq!(b.line.as_ref().map(|l| l.id), Some(3));
    }

    #[test]
    #[should_panic]
    fn test_split_at_endpoint_panics() {
        let mut segments = allocator();
        let start = segments.vertices_mut().get_or_create(Point2D::new(0.0, 0.0));
        let end = segments.vertices_mut().get_or_create(Point2D::new(1.0, 0.0));
        let index = segments.get_or_create(start, end, None);
        segments.split(index, 1.0);
    }
}
