// src/bsp/partition.rs

use std::collections::HashSet;

use crate::bsp::segment::SegIndex;
use crate::bsp::vertex::VertexIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartitionProgress {
    #[default]
    Loaded,
    Working,
    Finished,
}

/// Everything the partitioner knows about the node it is currently
/// splitting. Rebuilt from scratch on every load.
#[derive(Debug, Clone, Default)]
pub struct PartitionState {
    pub progress: PartitionProgress,
    pub splitter: Option<SegIndex>,
    pub pending: Vec<SegIndex>,
    pub cursor: usize,
    pub right: Vec<SegIndex>,
    pub left: Vec<SegIndex>,
    /// Vertices lying on the splitter's line, for miniseg generation.
    pub collinear_vertices: HashSet<VertexIndex>,
}

impl PartitionState {
    pub fn new(splitter: SegIndex, pending: Vec<SegIndex>) -> Self {
        PartitionState {
            splitter: Some(splitter),
            pending,
            ..Default::default()
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress == PartitionProgress::Finished
    }

    pub fn remaining(&self) -> usize {
        self.pending.len() - self.cursor
    }
}
