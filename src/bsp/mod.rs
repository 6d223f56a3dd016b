// src/bsp/mod.rs
pub mod allocator;
pub mod config;
pub mod error;
pub mod junction;
pub mod partition;
pub mod partitioner;
pub mod segment;
pub mod vertex;

pub use allocator::{SegmentAllocator, SegmentPool};
pub use config::BspConfig;
pub use error::PartitionError;
pub use junction::{Junction, JunctionClassifier, JunctionSink, JunctionWedge};
pub use partition::{PartitionProgress, PartitionState};
pub use partitioner::Partitioner;
pub use segment::{BspSegment, Endpoint, SegIndex};
pub use vertex::{BspVertex, VertexAllocator, VertexIndex};
