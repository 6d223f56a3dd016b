#![warn(non_snake_case)]
//! # bsp-partition
//!
//! Loads map geometry from a JSON file, partitions it once by a chosen
//! splitter line, and prints which segments ended up on each side. Set
//! `RUST_LOG=debug` to watch every step of the partitioner.
//!
//! ```text
//! bsp-partition <map.json> [splitter-line-id]
//! ```
//!
//! ## License
//! Licensed under the MIT License.

use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

use log::{debug, error, info, warn};
use serde::Serialize;

use rusted_bsp::bsp::{
    BspSegment, JunctionClassifier, Partitioner, SegIndex, SegmentAllocator, SegmentPool, VertexAllocator,
};
use rusted_bsp::map::MapGeometry;
use rusted_bsp::utils::geometry::Point2D;

#[derive(Serialize)]
struct SegmentSummary {
    index: usize,
    line: Option<usize>,
    one_sided: bool,
    start: Point2D,
    end: Point2D,
}

impl From<&BspSegment> for SegmentSummary {
    fn from(seg: &BspSegment) -> Self {
        SegmentSummary {
            index: seg.index.0,
            line: seg.line.as_ref().map(|line| line.id),
            one_sided: seg.one_sided(),
            start: seg.start,
            end: seg.end,
        }
    }
}

#[derive(Serialize)]
struct PartitionSummary {
    splitter: SegmentSummary,
    right: Vec<SegmentSummary>,
    left: Vec<SegmentSummary>,
    collinear_vertices: Vec<Point2D>,
    segments_allocated: usize,
}

/// Turns every linedef into a BSP segment, welding vertices as it goes.
fn build_segments(map: &MapGeometry) -> (SegmentAllocator, Vec<(usize, SegIndex)>) {
    let mut segments = SegmentAllocator::new(VertexAllocator::new(map.config.vertex_weld_epsilon));
    let mut created = Vec::with_capacity(map.linedefs.len());

    for line in &map.linedefs {
        let start = segments.vertices_mut().get_or_create(map.vertices[line.start].position());
        let end = segments.vertices_mut().get_or_create(map.vertices[line.end].position());
        if start == end {
            warn!("Linedef {} collapses to a point after welding, skipping it", line.id);
            continue;
        }
        if segments.contains_segment(start, end) {
            warn!("Linedef {} overlaps an existing segment, skipping it", line.id);
            continue;
        }

        let index = segments.get_or_create(start, end, Some(Arc::new(line.clone())));
        created.push((line.id, index));
    }

    (segments, created)
}

fn run(path: &str, splitter_line: Option<usize>) -> Result<PartitionSummary, Box<dyn Error>> {
    let map = MapGeometry::from_file(path)?;
    info!(
        "Loaded {} vertices and {} linedefs from {}",
        map.vertices.len(),
        map.linedefs.len(),
        path
    );

    let (mut segments, created) = build_segments(&map);

    let mut junctions = JunctionClassifier::new();
    for &(_, index) in &created {
        let seg = segments.get(index);
        if seg.one_sided() {
            junctions.add_one_sided_segment(seg);
        }
    }
    junctions.notify_done_adding_one_sided_segments();

    let splitter = match splitter_line {
        Some(id) => created
            .iter()
            .find(|(line, _)| *line == id)
            .map(|&(_, index)| index)
            .ok_or_else(|| format!("No usable linedef with id {}", id))?,
        None => created
            .first()
            .map(|&(_, index)| index)
            .ok_or("Map has no usable linedefs")?,
    };

    let pending: Vec<SegIndex> = created.iter().map(|&(_, index)| index).collect();
    let mut partitioner = Partitioner::new(map.config.clone());
    partitioner.load(&segments, Some(splitter), pending);

    while !partitioner.state().is_finished() {
        partitioner.execute(&mut segments, &mut junctions)?;
        let state = partitioner.state();
        debug!(
            "Step {}/{}: {} right, {} left, {} collinear vertices",
            state.cursor,
            state.pending.len(),
            state.right.len(),
            state.left.len(),
            state.collinear_vertices.len()
        );
    }

    let state = partitioner.take_state();
    let mut collinear: Vec<_> = state.collinear_vertices.iter().copied().collect();
    collinear.sort();

    Ok(PartitionSummary {
        splitter: segments.segment(splitter).into(),
        right: state.right.iter().map(|&i| segments.segment(i).into()).collect(),
        left: state.left.iter().map(|&i| segments.segment(i).into()).collect(),
        collinear_vertices: collinear.iter().map(|&v| segments.vertices().position(v)).collect(),
        segments_allocated: segments.len(),
    })
}

fn main() -> ExitCode {
    // Initialize logging.
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("usage: {} <map.json> [splitter-line-id]", args[0]);
        return ExitCode::from(2);
    };
    let splitter_line = match args.get(2).map(|raw| raw.parse::<usize>()) {
        None => None,
        Some(Ok(id)) => Some(id),
        Some(Err(e)) => {
            error!("Invalid splitter line id: {}", e);
            return ExitCode::from(2);
        }
    };

    let summary = match run(path, splitter_line) {
        Ok(summary) => summary,
        Err(e) => {
            error!("Partition failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => {
            println!("{}", json);
            info!(
                "Partitioned into {} right and {} left segments",
                summary.right.len(),
                summary.left.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize partition summary: {}", e);
            ExitCode::FAILURE
        }
    }
}
