//! Turns per-step logs of maze-exploring robots into density heatmaps,
//! filtered comparison views, path groupings and summary statistics.
//!
//! Pipeline: `load` / `extract` produce a flat list of [`MovementEvent`]s,
//! which [`DensityGrid`], [`Statistics`], [`PathAnalysis`] and
//! [`ComparativeAnalysis`] consume. [`report`] packages results for an
//! external renderer.

pub mod compare;
pub mod error;
pub mod extract;
pub mod grid;
pub mod load;
pub mod maze;
pub mod paths;
pub mod report;
pub mod stats;
pub mod synth;

pub use compare::{select_generations, AnalysisView, ComparativeAnalysis, FilterSpec, Overview};
pub use error::{AnalysisError, LoadError};
pub use extract::{extract_movements, parse_log, parse_log_str, ExtractFilter, Extraction, MovementEvent};
pub use grid::{cell_for_position, DensityGrid};
pub use maze::{CellKind, MazeGrid, MazeMarkers};
pub use paths::{PathAnalysis, Trajectory};
pub use stats::Statistics;
pub use synth::{AnimationFrame, Playback, RandomWalk};
