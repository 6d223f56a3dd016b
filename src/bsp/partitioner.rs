// src/bsp/partitioner.rs
//! Splits the segments of one BSP node by a splitter, one segment per call
//! to [`Partitioner::execute`], so a debugger can pause between steps.

use log::{debug, warn};

use crate::bsp::allocator::SegmentPool;
use crate::bsp::config::BspConfig;
use crate::bsp::error::PartitionError;
use crate::bsp::junction::JunctionSink;
use crate::bsp::partition::{PartitionProgress, PartitionState};
use crate::bsp::segment::{BspSegment, Endpoint, SegIndex};
use crate::utils::geometry::Rotation;
use crate::utils::util::in_normal_range;

pub struct Partitioner {
    config: BspConfig,
    state: PartitionState,
}

impl Partitioner {
    pub fn new(config: BspConfig) -> Self {
        Partitioner {
            config,
            state: PartitionState::default(),
        }
    }

    pub fn state(&self) -> &PartitionState {
        &self.state
    }

    pub fn progress(&self) -> PartitionProgress {
        self.state.progress
    }

    /// Hands the finished (or partial) state to the caller, leaving an empty
    /// one behind.
    pub fn take_state(&mut self) -> PartitionState {
        std::mem::take(&mut self.state)
    }

    /// Prepares to partition `segments` by `splitter`. The splitter must
    /// appear exactly once among the segments.
    ///
    /// # Panics
    ///
    /// If there is no splitter, the splitter is a miniseg, or it is missing
    /// from (or repeated in) `segments`. All of these mean the splitter selection upstream is
    /// broken.
    pub fn load<P: SegmentPool>(&mut self, pool: &P, splitter: Option<SegIndex>, segments: Vec<SegIndex>) {
        let Some(splitter) = splitter else {
            panic!("No splitter to partition with (likely a convex subsector that was classified as splittable)");
        };
        assert!(
            !pool.segment(splitter).is_miniseg(),
            "Cannot use miniseg {} as a splitter",
            pool.segment(splitter)
        );
        let occurrences = segments.iter().filter(|&&index| index == splitter).count();
        assert!(
            occurrences == 1,
            "Splitter {} must appear exactly once among the segments being partitioned, found {}",
            splitter,
            occurrences
        );

        debug!("Loaded splitter {} with {} segments", pool.segment(splitter), segments.len());
        self.state = PartitionState::new(splitter, segments);
    }

    /// Classifies the next pending segment.
    ///
    /// # Panics
    ///
    /// If called after the partition has finished, or before anything was
    /// loaded.
    pub fn execute<P, J>(&mut self, pool: &mut P, junctions: &mut J) -> Result<(), PartitionError>
    where
        P: SegmentPool,
        J: JunctionSink,
    {
        assert!(
            self.state.progress != PartitionProgress::Finished,
            "Trying to partition when it's already completed"
        );
        let Some(splitter_index) = self.state.splitter else {
            panic!("Executing a partition step with no splitter loaded");
        };

        let index = self.state.pending[self.state.cursor];
        self.state.cursor += 1;
        self.state.progress = if self.state.cursor >= self.state.pending.len() {
            PartitionProgress::Finished
        } else {
            PartitionProgress::Working
        };

        let splitter = pool.segment(splitter_index).clone();
        if index == splitter_index {
            self.handle_splitter(&splitter);
            return Ok(());
        }

        let segment = pool.segment(index).clone();
        debug!("Partitioning {} against {}", segment, splitter);

        let Some((splitter_time, segment_time)) =
            splitter.seg2d().intersection_as_line(&segment.seg2d(), self.config.parallel_epsilon)
        else {
            self.handle_parallel_segment(&splitter, &segment);
            return Ok(());
        };

        // Segments sharing an endpoint with the splitter can compute a
        // crossing time a hair outside [0, 1] (or inside it) from rounding.
        // The lines already meet at the shared vertex, so the segment is
        // wholly on one side.
        if splitter.shares_any_endpoints(&segment) {
            self.handle_segment_on_side(&splitter, &segment);
        } else if in_normal_range(segment_time) {
            self.handle_crossing(pool, junctions, &splitter, &segment, splitter_time, segment_time)?;
        } else {
            self.handle_segment_on_side(&splitter, &segment);
        }

        Ok(())
    }

    /// Steps until every pending segment has been classified.
    pub fn run<P, J>(&mut self, pool: &mut P, junctions: &mut J) -> Result<(), PartitionError>
    where
        P: SegmentPool,
        J: JunctionSink,
    {
        while !self.state.is_finished() {
            self.execute(pool, junctions)?;
        }
        Ok(())
    }

    fn between_endpoints(&self, splitter_time: f64) -> bool {
        let epsilon = self.config.vertex_weld_epsilon;
        epsilon < splitter_time && splitter_time < 1.0 - epsilon
    }

    // Distances rather than a vertex lookup: an unrelated vertex from some
    // earlier split could be sitting right where this crossing happens.
    fn intersection_at_endpoint(&self, segment: &BspSegment, segment_time: f64) -> Option<Endpoint> {
        let point = segment.seg2d().from_time(segment_time);
        let epsilon = self.config.vertex_weld_epsilon;

        if point.distance_to(&segment.start) <= epsilon {
            Some(Endpoint::Start)
        } else if point.distance_to(&segment.end) <= epsilon {
            Some(Endpoint::End)
        } else {
            None
        }
    }

    fn handle_splitter(&mut self, splitter: &BspSegment) {
        // Lines attached to the splitter no longer put their shared vertices
        // into the collinear set, so miniseg generation needs these two as
        // reference points.
        self.state.collinear_vertices.insert(splitter.start_vertex);
        self.state.collinear_vertices.insert(splitter.end_vertex);

        self.state.right.push(splitter.index);
        if splitter.two_sided() {
            self.state.left.push(splitter.index);
        }
    }

    fn handle_collinear_segment(&mut self, splitter: &BspSegment, segment: &BspSegment) {
        assert!(!segment.is_miniseg(), "Miniseg {} should never be collinear to a splitter", segment);

        self.state.collinear_vertices.insert(segment.start_vertex);
        self.state.collinear_vertices.insert(segment.end_vertex);

        // A one-sided line only faces one half of the partition.
        if segment.one_sided() {
            if splitter.seg2d().same_direction(&segment.seg2d()) {
                self.state.right.push(segment.index);
            } else {
                self.state.left.push(segment.index);
            }
        } else {
            self.state.right.push(segment.index);
            self.state.left.push(segment.index);
        }
    }

    fn handle_parallel_segment(&mut self, splitter: &BspSegment, segment: &BspSegment) {
        let splitter_line = splitter.seg2d();

        if splitter_line.collinear(&segment.seg2d(), self.config.parallel_epsilon) {
            self.handle_collinear_segment(splitter, segment);
        } else if splitter_line.on_right(&segment.start) {
            self.state.right.push(segment.index);
        } else {
            self.state.left.push(segment.index);
        }
    }

    fn handle_crossing<P, J>(
        &mut self,
        pool: &mut P,
        junctions: &mut J,
        splitter: &BspSegment,
        segment: &BspSegment,
        splitter_time: f64,
        segment_time: f64,
    ) -> Result<(), PartitionError>
    where
        P: SegmentPool,
        J: JunctionSink,
    {
        if self.between_endpoints(splitter_time) {
            if self.config.reject_splitter_crossings {
                return Err(PartitionError::SplitterCrossed {
                    splitter: splitter.clone(),
                    segment: segment.clone(),
                    splitter_time,
                    segment_time,
                });
            }
            debug!("{} crosses splitter {} at splitter t = {}", segment, splitter, splitter_time);
        }

        match self.intersection_at_endpoint(segment, segment_time) {
            Some(endpoint) => self.handle_endpoint_crossing(splitter, segment, endpoint, segment_time),
            None => self.handle_split(pool, junctions, splitter, segment, segment_time),
        }
    }

    /// The splitter passes through one endpoint, so the segment lies wholly
    /// on the side of its other endpoint.
    fn handle_endpoint_crossing(
        &mut self,
        splitter: &BspSegment,
        segment: &BspSegment,
        endpoint: Endpoint,
        segment_time: f64,
    ) -> Result<(), PartitionError> {
        let opposite = segment.position_from(endpoint.opposite());
        match splitter.seg2d().to_side(&opposite, self.config.side_epsilon) {
            Rotation::Right => self.state.right.push(segment.index),
            Rotation::Left => self.state.left.push(segment.index),
            Rotation::On => {
                return Err(PartitionError::AmbiguousSide {
                    splitter: splitter.clone(),
                    segment: segment.clone(),
                    segment_time,
                })
            }
        }

        self.state.collinear_vertices.insert(segment.vertex_from(endpoint));
        Ok(())
    }

    fn handle_split<P, J>(
        &mut self,
        pool: &mut P,
        junctions: &mut J,
        splitter: &BspSegment,
        segment: &BspSegment,
        segment_time: f64,
    ) -> Result<(), PartitionError>
    where
        P: SegmentPool,
        J: JunctionSink,
    {
        let (first, second) = pool.split(segment.index, segment_time);
        let first = pool.segment(first).clone();
        let second = pool.segment(second).clone();

        //    first  |  second
        // [S]=======M=========[E]
        //           |
        //           | splitter
        //
        // The side of S tells us where `first` goes; `second` goes opposite.
        let splitter_line = splitter.seg2d();
        let mut side = splitter_line.to_side(&first.start, self.config.side_epsilon);

        if side == Rotation::On {
            warn!("Very tight endpoint split performed on {}", segment);

            side = match splitter_line.to_side(&segment.end, self.config.side_epsilon) {
                Rotation::Left => Rotation::Right,
                Rotation::Right => Rotation::Left,
                Rotation::On => {
                    return Err(PartitionError::AmbiguousSide {
                        splitter: splitter.clone(),
                        segment: segment.clone(),
                        segment_time,
                    })
                }
            };
        }

        if side == Rotation::Right {
            self.state.right.push(first.index);
            self.state.left.push(second.index);
        } else {
            self.state.left.push(first.index);
            self.state.right.push(second.index);
        }

        self.state.collinear_vertices.insert(first.end_vertex);

        if segment.one_sided() {
            junctions.add_split_junction(&first, &second);
        }

        Ok(())
    }

    fn handle_segment_on_side(&mut self, splitter: &BspSegment, segment: &BspSegment) {
        if splitter.seg2d().on_right_seg(&segment.seg2d()) {
            self.state.right.push(segment.index);
        } else {
            self.state.left.push(segment.index);
        }
    }
}
