#![deny(unsafe_code)]
//! Truchet maze generator.
//!
//! Fills a row-major grid with quarter-arc tiles. Each tile joins the
//! midpoints of two pairs of adjacent edges, so every edge of every cell
//! carries an arc end and paths run unbroken from tile to tile. The variant
//! choice is weighted by the left and top neighbors: each one adds
//! `continuity` weight toward repeating its own variant, which lengthens the
//! sweeping curves the eye follows through the maze.

use glam::DVec2;
use motif_core::config::TruchetOptions;
use motif_core::prng::Xorshift64;
use motif_core::shape::{TruchetTile, TruchetVariant};

/// A cell edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    North,
    East,
    South,
    West,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::North, Edge::East, Edge::South, Edge::West];

    /// The same edge seen from the neighboring cell.
    pub fn opposite(self) -> Edge {
        match self {
            Edge::North => Edge::South,
            Edge::East => Edge::West,
            Edge::South => Edge::North,
            Edge::West => Edge::East,
        }
    }

    /// Grid step toward the neighbor across this edge.
    fn step(self) -> (isize, isize) {
        match self {
            Edge::North => (0, -1),
            Edge::East => (1, 0),
            Edge::South => (0, 1),
            Edge::West => (-1, 0),
        }
    }
}

/// The two edge pairs a variant joins.
pub fn connections(variant: TruchetVariant) -> [(Edge, Edge); 2] {
    match variant {
        TruchetVariant::NeSw => [(Edge::North, Edge::East), (Edge::South, Edge::West)],
        TruchetVariant::NwSe => [(Edge::North, Edge::West), (Edge::East, Edge::South)],
    }
}

/// The edge a path leaves through after entering at `entry`.
pub fn exit(variant: TruchetVariant, entry: Edge) -> Edge {
    match (variant, entry) {
        (TruchetVariant::NeSw, Edge::North) => Edge::East,
        (TruchetVariant::NeSw, Edge::East) => Edge::North,
        (TruchetVariant::NeSw, Edge::South) => Edge::West,
        (TruchetVariant::NeSw, Edge::West) => Edge::South,
        (TruchetVariant::NwSe, Edge::North) => Edge::West,
        (TruchetVariant::NwSe, Edge::West) => Edge::North,
        (TruchetVariant::NwSe, Edge::East) => Edge::South,
        (TruchetVariant::NwSe, Edge::South) => Edge::East,
    }
}

/// Cells visited by one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    pub cells: Vec<(usize, usize)>,
    /// The path came back to its starting cell edge instead of leaving
    /// the grid.
    pub closed: bool,
}

/// A grid of truchet variants in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct TruchetGrid {
    cols: usize,
    rows: usize,
    cells: Vec<TruchetVariant>,
}

impl TruchetGrid {
    /// Generates a `cols × rows` grid. Cells are chosen row by row, left to
    /// right, one PRNG draw each.
    #[tracing::instrument(level = "debug", skip(rng))]
    pub fn generate(cols: usize, rows: usize, continuity: f64, rng: &mut Xorshift64) -> Self {
        let continuity = if continuity.is_finite() {
            continuity.max(0.0)
        } else {
            0.0
        };
        let mut cells: Vec<TruchetVariant> = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let left = (col > 0).then(|| cells[row * cols + col - 1]);
                let top = (row > 0).then(|| cells[(row - 1) * cols + col]);
                let weight = |v: TruchetVariant| {
                    1.0 + [left, top]
                        .iter()
                        .filter(|n| **n == Some(v))
                        .count() as f64
                        * continuity
                };
                let ne = weight(TruchetVariant::NeSw);
                let nw = weight(TruchetVariant::NwSe);
                let pick = if rng.next_f64() * (ne + nw) < ne {
                    TruchetVariant::NeSw
                } else {
                    TruchetVariant::NwSe
                };
                cells.push(pick);
            }
        }
        Self { cols, rows, cells }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, col: usize, row: usize) -> Option<TruchetVariant> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    /// Cells in row-major order as `(col, row, variant)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, TruchetVariant)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &v)| (i % self.cols, i / self.cols, v))
    }

    /// Follows a path entering `(col, row)` through `entry` until it leaves
    /// the grid or returns to its starting cell edge.
    pub fn trace_path(&self, col: usize, row: usize, entry: Edge) -> Trace {
        let mut cells = Vec::new();
        let start = (col as isize, row as isize, entry);
        let (mut c, mut r, mut e) = start;
        // A path crosses each of a cell's two arcs at most once.
        let limit = 2 * self.cells.len();
        while cells.len() < limit {
            let Some(variant) = self.get_signed(c, r) else {
                break;
            };
            cells.push((c as usize, r as usize));
            let out = exit(variant, e);
            let (dc, dr) = out.step();
            c += dc;
            r += dr;
            e = out.opposite();
            if (c, r, e) == start {
                return Trace { cells, closed: true };
            }
        }
        Trace {
            cells,
            closed: false,
        }
    }

    fn get_signed(&self, col: isize, row: isize) -> Option<TruchetVariant> {
        if col < 0 || row < 0 {
            return None;
        }
        self.get(col as usize, row as usize)
    }

    /// Tile centers and payloads for `cell.x × cell.y` cells, with the
    /// grid's top-left corner at the origin.
    pub fn tiles(&self, cell: DVec2, options: &TruchetOptions, stroke_weight: f64) -> Vec<(DVec2, TruchetTile)> {
        self.iter()
            .map(|(col, row, variant)| {
                let center = DVec2::new(col as f64 + 0.5, row as f64 + 0.5) * cell;
                let tile = TruchetTile {
                    variant,
                    arc_weight: options.arc_weight.clamp(0.05, 1.0),
                    concentric: options.concentric.clamp(1, 5),
                    double_stroke: options.double_stroke,
                    stroke_weight,
                    stretch: cell.y / cell.x,
                };
                (center, tile)
            })
            .collect()
    }
}

/// Most cells across the shorter side.
pub const MAX_DENSITY: u32 = 128;

/// Most cells in one grid.
pub const MAX_CELLS: usize = 16_384;

/// Grid exactly covering a `width × height` canvas with near-square cells,
/// about `density` of them across the shorter side. Returns
/// `(cols, rows, cell)` where `cols · cell.x == width` and
/// `rows · cell.y == height`, so the maze wraps at the canvas edges.
pub fn layout(width: f64, height: f64, density: u32) -> (usize, usize, DVec2) {
    let density = density.clamp(1, MAX_DENSITY);
    let side = (width.min(height) / f64::from(density)).max((width * height / MAX_CELLS as f64).sqrt());
    let cols = ((width / side).round() as usize).clamp(1, MAX_CELLS);
    let rows = ((height / side).round() as usize).clamp(1, MAX_CELLS / cols);
    let cell = DVec2::new(width / cols as f64, height / rows as f64);
    (cols, rows, cell)
}
