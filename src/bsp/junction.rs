// src/bsp/junction.rs
//! Junctions track where one-sided segments meet, so that miniseg generation
//! can later tell whether a connection between two vertices would run through
//! the inside of the map or out into the void.

use std::collections::HashMap;

use log::warn;

use crate::bsp::segment::BspSegment;
use crate::bsp::vertex::VertexIndex;
use crate::utils::geometry::Point2D;

/// Receives the two halves whenever the partitioner splits a one-sided
/// segment.
pub trait JunctionSink {
    fn add_split_junction(&mut self, inbound: &BspSegment, outbound: &BspSegment);
}

/// Two one-sided segments meeting at a vertex: `inbound` ends on it and
/// `outbound` starts on it. The space between them on their right hand side
/// is inside the map.
#[derive(Debug, Clone)]
pub struct JunctionWedge {
    pub inbound: BspSegment,
    pub outbound: BspSegment,
}

impl JunctionWedge {
    pub fn new(inbound: BspSegment, outbound: BspSegment) -> Self {
        JunctionWedge { inbound, outbound }
    }

    /// True if the point lies inside the angle the wedge opens towards.
    pub fn between(&self, point: &Point2D) -> bool {
        let inbound = self.inbound.seg2d();
        let outbound = self.outbound.seg2d();

        if inbound.on_right(&self.outbound.end) {
            inbound.on_right(point) && outbound.on_right(point)
        } else {
            inbound.on_right(point) || outbound.on_right(point)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Junction {
    pub inbound_segments: Vec<BspSegment>,
    pub outbound_segments: Vec<BspSegment>,
    pub wedges: Vec<JunctionWedge>,
}

impl Junction {
    /// Lower scores are tighter angles. Only meaningful for ordering.
    fn angle_score(inbound: &BspSegment, outbound: &BspSegment) -> f64 {
        let end_to_origin = inbound.start.minus(&inbound.end);
        let start_to_origin = outbound.end.minus(&outbound.start);

        let dot = start_to_origin.dot(&end_to_origin);
        let length = start_to_origin.length() * end_to_origin.length();
        let cos_theta = dot / length;

        if inbound.seg2d().on_right(&outbound.end) {
            -cos_theta
        } else {
            cos_theta + 2.0
        }
    }

    /// Pairs every inbound segment with the outbound one closest to it in
    /// angle.
    pub fn generate_wedges(&mut self) {
        assert!(self.wedges.is_empty(), "Trying to create junction wedges when they already exist");

        for inbound in &self.inbound_segments {
            let closest = self.outbound_segments.iter().min_by(|a, b| {
                Self::angle_score(inbound, a).total_cmp(&Self::angle_score(inbound, b))
            });
            if let Some(outbound) = closest {
                self.wedges.push(JunctionWedge::new(inbound.clone(), outbound.clone()));
            }
        }
    }

    pub fn add_wedge(&mut self, inbound: BspSegment, outbound: BspSegment) {
        self.wedges.push(JunctionWedge::new(inbound, outbound));
    }

    pub fn between_wedge(&self, point: &Point2D) -> bool {
        self.wedges.iter().any(|wedge| wedge.between(point))
    }

    /// A balanced junction has as many lines coming in as going out.
    pub fn has_unexpected_seg_count(&self) -> bool {
        self.inbound_segments.len() != self.outbound_segments.len()
    }
}

#[derive(Debug, Default)]
pub struct JunctionClassifier {
    vertex_to_junction: HashMap<VertexIndex, Junction>,
}

impl JunctionClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vertex_to_junction.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_to_junction.is_empty()
    }

    pub fn junction(&self, vertex: VertexIndex) -> Option<&Junction> {
        self.vertex_to_junction.get(&vertex)
    }

    /// Registers a one-sided map segment. Wedges are not built until
    /// [`notify_done_adding_one_sided_segments`](Self::notify_done_adding_one_sided_segments).
    pub fn add_one_sided_segment(&mut self, segment: &BspSegment) {
        assert!(segment.one_sided(), "Adding a non one-sided segment {} to the junction classifier", segment);

        let end_junction = self.vertex_to_junction.entry(segment.end_vertex).or_default();
        assert!(
            !end_junction.inbound_segments.iter().any(|s| s.index == segment.index),
            "Adding {} to an inbound junction twice",
            segment
        );
        end_junction.inbound_segments.push(segment.clone());

        let start_junction = self.vertex_to_junction.entry(segment.start_vertex).or_default();
        assert!(
            !start_junction.outbound_segments.iter().any(|s| s.index == segment.index),
            "Adding {} to an outbound junction twice",
            segment
        );
        start_junction.outbound_segments.push(segment.clone());
    }

    pub fn notify_done_adding_one_sided_segments(&mut self) {
        for (vertex, junction) in self.vertex_to_junction.iter_mut() {
            if junction.has_unexpected_seg_count() {
                warn!(
                    "BSP junction at {} has a mismatched number of one-sided lines ({} in, {} out), tree is likely malformed",
                    vertex,
                    junction.inbound_segments.len(),
                    junction.outbound_segments.len()
                );
            }
            junction.generate_wedges();
        }
    }

    /// True when a junction exists at `vertex` and `point` falls outside all
    /// of its wedges.
    pub fn check_crossing_void(&self, vertex: VertexIndex, point: &Point2D) -> bool {
        self.vertex_to_junction
            .get(&vertex)
            .is_some_and(|junction| !junction.between_wedge(point))
    }
}

impl JunctionSink for JunctionClassifier {
    fn add_split_junction(&mut self, inbound: &BspSegment, outbound: &BspSegment) {
        assert!(
            inbound.index != outbound.index,
            "Trying to add {} as both the inbound and outbound side of a junction",
            inbound
        );
        let middle = inbound.end_vertex;
        assert!(
            outbound.start_vertex == middle,
            "Split junction halves {} and {} are not connected",
            inbound,
            outbound
        );
        assert!(
            !self.vertex_to_junction.contains_key(&middle),
            "Split junction vertex {} already has a junction",
            middle
        );

        let mut junction = Junction::default();
        junction.inbound_segments.push(inbound.clone());
        junction.outbound_segments.push(outbound.clone());
        junction.add_wedge(inbound.clone(), outbound.clone());
        self.vertex_to_junction.insert(middle, junction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::allocator::{SegmentAllocator, SegmentPool};
    use crate::bsp::segment::SegIndex;
    use crate::bsp::vertex::VertexAllocator;
    use crate::map::LineDef;
    use std::sync::Arc;

    // A clockwise square, so the inside is on the right of every line.
    fn square(segments: &mut SegmentAllocator) -> Vec<SegIndex> {
        let corners = [(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)];
        let vertices: Vec<VertexIndex> = corners
            .iter()
            .map(|&(x, y)| segments.vertices_mut().get_or_create(Point2D::new(x, y)))
            .collect();

        (0..4)
            .map(|i| {
                let line = Arc::new(LineDef::new(i, i, (i + 1) % 4, true));
                segments.get_or_create(vertices[i], vertices[(i + 1) % 4], Some(line))
            })
            .collect()
    }

    #[test]
    fn test_square_junctions() {
        let mut segments = SegmentAllocator::new(VertexAllocator::new(0.005));
        let sides = square(&mut segments);

        let mut classifier = JunctionClassifier::new();
        for &side in &sides {
            classifier.add_one_sided_segment(segments.get(side));
        }
        classifier.notify_done_adding_one_sided_segments();

        assert_eq!(classifier.len(), 4);
        let corner = segments.get(sides[0]).start_vertex;
        let junction = classifier.junction(corner).unwrap();
        assert_eq!(junction.wedges.len(), 1);
        assert!(!junction.has_unexpected_seg_count());

        // From the origin corner, the middle of the square is inside and a
        // point diagonally away from it is not.
        assert!(!classifier.check_crossing_void(corner, &Point2D::new(5.0, 5.0)));
        assert!(classifier.check_crossing_void(corner, &Point2D::new(-5.0, -5.0)));
    }

    #[test]
    fn test_no_junction_means_no_void() {
        let classifier = JunctionClassifier::new();
        assert!(!classifier.check_crossing_void(VertexIndex(0), &Point2D::new(1.0, 1.0)));
    }

    #[test]
    fn test_split_junction() {
        let mut segments = SegmentAllocator::new(VertexAllocator::new(0.005));
        let sides = square(&mut segments);
        let (a, b) = segments.split(sides[1], 0.5);

        let mut classifier = JunctionClassifier::new();
        classifier.add_split_junction(segments.get(a), segments.get(b));

        let middle = segments.get(a).end_vertex;
        let junction = classifier.junction(middle).unwrap();
        assert_eq!(junction.wedges.len(), 1);
        // The split point sits on the top edge; below it is inside.
        assert!(!classifier.check_crossing_void(middle, &Point2D::new(5.0, 5.0)));
        assert!(classifier.check_crossing_void(middle, &Point2D::new(5.0, 15.0)));
    }

    #[test]
    #[should_panic]
    fn test_two_sided_segment_rejected() {
        let mut segments = SegmentAllocator::new(VertexAllocator::new(0.005));
        let start = segments.vertices_mut().get_or_create(Point2D::new(0.0, 0.0));
        let end = segments.vertices_mut().get_or_create(Point2D::new(1.0, 0.0));
        let line = Arc::new(LineDef::new(0, 0, 1, false));
        let index = segments.get_or_create(start, end, Some(line));

        JunctionClassifier::new().add_one_sided_segment(segments.get(index));
    }
}
