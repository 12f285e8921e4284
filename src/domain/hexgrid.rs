//! Offset-hex geometry for sector maps.
//!
//! Map columns are flat-top hex files with even-numbered columns sitting
//! half a hex lower than odd ones. Distances convert the offset
//! coordinates to cube coordinates and take the standard hex metric;
//! row/column deltas alone undercount diagonal moves.

use std::collections::HashMap;

use thiserror::Error;

use super::entities::{HexCoord, World, SECTOR_COLUMNS, SECTOR_ROWS};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DistanceError {
    #[error("{0} and {1} lie in different sectors and no frame places both")]
    CrossSectorUnsupported(String, String),
}

fn axial(column: i64, row: i64) -> (i64, i64) {
    let q = column;
    let r = row - (column + (column & 1)) / 2;
    (q, r)
}

fn axial_distance(a: (i64, i64), b: (i64, i64)) -> u32 {
    let dq = a.0 - b.0;
    let dr = a.1 - b.1;
    let ds = -dq - dr;
    dq.abs().max(dr.abs()).max(ds.abs()) as u32
}

/// Distance in parsecs between two hexes of the same coordinate frame.
pub fn hex_distance(a: HexCoord, b: HexCoord) -> u32 {
    axial_distance(
        axial(a.column as i64, a.row as i64),
        axial(b.column as i64, b.row as i64),
    )
}

/// Placement of sectors on the absolute grid.
///
/// Each sector occupies a 32x40 block; offsets are whole sectors, so a
/// sector at (1, 0) starts 32 columns to the right of one at (0, 0).
#[derive(Clone, Debug, Default)]
pub struct SectorFrame {
    offsets: HashMap<String, (i32, i32)>,
}

impl SectorFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&mut self, sector: impl Into<String>, x: i32, y: i32) {
        self.offsets.insert(sector.into(), (x, y));
    }

    fn absolute(&self, sector: &str, hex: HexCoord) -> Option<(i64, i64)> {
        let (sx, sy) = self.offsets.get(sector)?;
        let column = *sx as i64 * SECTOR_COLUMNS as i64 + hex.column as i64;
        let row = *sy as i64 * SECTOR_ROWS as i64 + hex.row as i64;
        Some((column, row))
    }
}

/// Jump distance between two worlds in parsecs.
///
/// Same-sector pairs use their coordinates directly; cross-sector pairs
/// need a frame that places both sectors, otherwise the computation fails
/// and the caller excludes the edge.
pub fn distance(a: &World, b: &World, frame: Option<&SectorFrame>) -> Result<u32, DistanceError> {
    if a.sector == b.sector {
        return Ok(hex_distance(a.hex, b.hex));
    }
    let unsupported =
        || DistanceError::CrossSectorUnsupported(a.name.clone(), b.name.clone());
    let frame = frame.ok_or_else(unsupported)?;
    match (
        frame.absolute(&a.sector, a.hex),
        frame.absolute(&b.sector, b.hex),
    ) {
        (Some(pa), Some(pb)) => Ok(axial_distance(axial(pa.0, pa.1), axial(pb.0, pb.1))),
        _ => Err(unsupported()),
    }
}

/// Pairwise distances for one analysis run.
///
/// Built once per run and discarded with it; never shared across runs so
/// a later run with a different frame cannot observe stale entries.
/// Pairs with no common frame hold `None`.
#[derive(Debug)]
pub struct DistanceCache {
    count: usize,
    matrix: Vec<Option<u32>>,
}

impl DistanceCache {
    pub fn build(worlds: &[World], frame: Option<&SectorFrame>) -> Self {
        let count = worlds.len();
        let mut matrix = vec![None; count * count];
        for i in 0..count {
            matrix[i * count + i] = Some(0);
            for j in (i + 1)..count {
                let entry = distance(&worlds[i], &worlds[j], frame).ok();
                matrix[i * count + j] = entry;
                matrix[j * count + i] = entry;
            }
        }
        Self { count, matrix }
    }

    /// Distance between the run's worlds `i` and `j`, or `None` when no
    /// common frame exists.
    pub fn get(&self, i: usize, j: usize) -> Option<u32> {
        self.matrix[i * self.count + j]
    }
}
