use crate::extract::MovementEvent;
use crate::maze::{CellKind, MazeGrid};
use serde::Serialize;

/// Maps a maze-space position to its `(row, col)` cell.
///
/// Coordinates are rounded half-to-even and clamped into the grid, so positions
/// slightly outside the maze still land on the nearest edge cell.
#[inline(always)]
pub fn cell_for_position(x: f32, y: f32, rows: usize, cols: usize) -> (usize, usize) {
    let clamp_axis = |v: f32, dim: usize| -> usize {
        let max = dim.saturating_sub(1) as f32;
        let r = v.round_ties_even();
        // f32::max discards NaN, so unusable coordinates land on 0
        r.max(0.0).min(max) as usize
    };
    (clamp_axis(y, rows), clamp_axis(x, cols))
}

/// Maze-aligned visitation frequencies, row-major, normalised to a peak of 1.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityGrid {
    rows: usize,
    cols: usize,
    cells: Vec<f32>,
}

impl DensityGrid {
    /// An all-zero grid with the maze's dimensions.
    pub fn empty(maze: &MazeGrid) -> Self {
        DensityGrid {
            rows: maze.rows(),
            cols: maze.cols(),
            cells: vec![0.0; maze.rows() * maze.cols()],
        }
    }

    /// Counts events per cell, then divides by the busiest cell's count.
    /// With no events the grid stays all zero.
    pub fn aggregate<'a, I>(events: I, maze: &MazeGrid) -> Self
    where
        I: IntoIterator<Item = &'a MovementEvent>,
    {
        let (rows, cols) = (maze.rows(), maze.cols());
        let mut counts = vec![0u32; rows * cols];
        for event in events {
            let (row, col) = cell_for_position(event.x, event.y, rows, cols);
            counts[row * cols + col] += 1;
        }

        let max = counts.iter().copied().max().unwrap_or(0);
        let cells = if max > 0 {
            let peak = max as f32;
            counts.iter().map(|&c| c as f32 / peak).collect()
        } else {
            vec![0.0; counts.len()]
        };

        DensityGrid { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    pub fn max(&self) -> f32 {
        self.cells.iter().copied().fold(0.0, f32::max)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == 0.0)
    }

    /// Composite ready for colour mapping: walls become -1.0, every other cell keeps its density.
    pub fn overlay(&self, maze: &MazeGrid) -> Vec<f32> {
        self.cells
            .iter()
            .zip(maze.cells())
            .map(|(&d, kind)| if kind == CellKind::Wall { -1.0 } else { d })
            .collect()
    }
}
