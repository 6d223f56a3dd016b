// src/bsp/error.rs

use thiserror::Error;

use crate::bsp::segment::BspSegment;

/// A partition that cannot be completed without producing a wrong tree.
/// None of these are retryable; the enclosing build should abort.
#[derive(Debug, Error)]
pub enum PartitionError {
    #[error(
        "segment {segment} crosses the interior of splitter {splitter} \
         (splitter t = {splitter_time}, segment t = {segment_time})"
    )]
    SplitterCrossed {
        splitter: BspSegment,
        segment: BspSegment,
        splitter_time: f64,
        segment_time: f64,
    },

    #[error(
        "segment {segment} is too small to tell which side of splitter {splitter} \
         it is on (segment t = {segment_time})"
    )]
    AmbiguousSide {
        splitter: BspSegment,
        segment: BspSegment,
        segment_time: f64,
    },
}
