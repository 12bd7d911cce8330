use crate::error::AnalysisError;
use heatmap_common::{MazeInfo, Vec2};
use serde::Serialize;

/// Kind of a single maze cell. The discriminant is the numeric code renderers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum CellKind {
    Open = 0,
    Wall = 1,
    Start = 2,
    Goal = 3,
}

impl CellKind {
    /// `#` and `B` (border) are walls; anything unrecognised is open floor.
    pub fn from_symbol(c: char) -> Self {
        match c {
            '#' | 'B' => CellKind::Wall,
            'S' => CellKind::Start,
            'G' => CellKind::Goal,
            _ => CellKind::Open,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Immutable rectangular maze, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MazeGrid {
    rows: usize,
    cols: usize,
    cells: Vec<CellKind>,
}

impl MazeGrid {
    /// Parses a textual layout, one string per row.
    pub fn parse<S: AsRef<str>>(layout: &[S]) -> Result<Self, AnalysisError> {
        let first = layout
            .first()
            .ok_or_else(|| AnalysisError::MalformedMaze("layout has no rows".to_string()))?;
        let cols = first.as_ref().chars().count();
        if cols == 0 {
            return Err(AnalysisError::MalformedMaze("layout rows are empty".to_string()));
        }

        let mut cells = Vec::with_capacity(cols * layout.len());
        for (row_idx, row) in layout.iter().enumerate() {
            let row = row.as_ref();
            let len = row.chars().count();
            if len != cols {
                return Err(AnalysisError::MalformedMaze(format!(
                    "row {} has {} cells, expected {}",
                    row_idx, len, cols
                )));
            }
            cells.extend(row.chars().map(CellKind::from_symbol));
        }

        Ok(MazeGrid { rows: layout.len(), cols, cells })
    }

    /// Parses the layout carried by a log's `maze_info` block.
    pub fn from_info(info: &MazeInfo) -> Result<Self, AnalysisError> {
        let rows = info.layout_rows();
        Self::parse(rows.as_slice())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<CellKind> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Row-major iterator over all cells.
    pub fn cells(&self) -> impl Iterator<Item = CellKind> + '_ {
        self.cells.iter().copied()
    }

    /// Numeric encoding `{Open:0, Wall:1, Start:2, Goal:3}`, one inner vector per row.
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|c| c.code()).collect())
            .collect()
    }

    /// First cell of the given kind in row-major order, as `[x = col, y = row]`.
    pub fn find(&self, kind: CellKind) -> Option<Vec2> {
        self.cells
            .iter()
            .position(|&c| c == kind)
            .map(|idx| Vec2::new((idx % self.cols) as f32, (idx / self.cols) as f32))
    }
}

/// Start and goal positions to annotate a panel with.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MazeMarkers {
    pub start: Option<Vec2>,
    pub goal: Option<Vec2>,
}

impl MazeMarkers {
    /// Prefers explicit `maze_info` coordinates, falling back to the `S`/`G` cells of the grid.
    pub fn resolve(info: Option<&MazeInfo>, grid: &MazeGrid) -> Self {
        let start = info.and_then(|i| i.start).map(Vec2::from);
        let goal = info.and_then(|i| i.goal).map(Vec2::from);
        MazeMarkers {
            start: start.or_else(|| grid.find(CellKind::Start)),
            goal: goal.or_else(|| grid.find(CellKind::Goal)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_symbols_to_codes() {
        let maze = MazeGrid::parse(&["O#SG"]).unwrap();
        assert_eq!(maze.to_codes(), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn border_and_unknown_symbols() {
        let maze = MazeGrid::parse(&["B?x", "O.G"]).unwrap();
        assert_eq!(maze.rows(), 2);
        assert_eq!(maze.cols(), 3);
        assert_eq!(maze.cell(0, 0), Some(CellKind::Wall));
        assert_eq!(maze.cell(0, 1), Some(CellKind::Open));
        assert_eq!(maze.cell(0, 2), Some(CellKind::Open));
        assert_eq!(maze.cell(1, 2), Some(CellKind::Goal));
        assert_eq!(maze.cell(2, 0), None);
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = MazeGrid::parse(&["OOO", "OO"]).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedMaze(_)));
    }

    #[test]
    fn rejects_empty_layout() {
        let empty: [&str; 0] = [];
        assert!(matches!(MazeGrid::parse(&empty), Err(AnalysisError::MalformedMaze(_))));
        assert!(matches!(MazeGrid::parse(&[""]), Err(AnalysisError::MalformedMaze(_))));
    }

    #[test]
    fn markers_fall_back_to_grid_cells() {
        let maze = MazeGrid::parse(&["####", "#SO#", "#OG#", "####"]).unwrap();
        let markers = MazeMarkers::resolve(None, &maze);
        assert_eq!(markers.start, Some(Vec2::new(1.0, 1.0)));
        assert_eq!(markers.goal, Some(Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn markers_prefer_maze_info() {
        let maze = MazeGrid::parse(&["SOG"]).unwrap();
        let info: MazeInfo = serde_json::from_value(serde_json::json!({
            "layout": ["SOG"],
            "goal": [1, 0]
        }))
        .unwrap();
        let markers = MazeMarkers::resolve(Some(&info), &maze);
        assert_eq!(markers.start, Some(Vec2::new(0.0, 0.0)));
        assert_eq!(markers.goal, Some(Vec2::new(1.0, 0.0)));
    }
}
