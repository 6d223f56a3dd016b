// src/map/linedef.rs
use serde::{Deserialize, Serialize};

/// The map line a BSP segment originates from. Only the parts the
/// partitioner cares about are kept: an identity and whether the line has a
/// back side at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineDef {
    pub id: usize,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub one_sided: bool,
}

impl LineDef {
    pub fn new(id: usize, start: usize, end: usize, one_sided: bool) -> Self {
        LineDef {
            id,
            start,
            end,
            one_sided,
        }
    }

    pub fn two_sided(&self) -> bool {
        !self.one_sided
    }
}
