//! Loader boundary: turns files on disk into validated typed records.

use crate::error::{AnalysisError, LoadError};
use crate::extract::parse_log;
use heatmap_common::{LayoutRow, MazeInfo, SimulationLog};
use log::info;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn read_json(path: &Path) -> Result<serde_json::Value, LoadError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io { path: path.to_path_buf(), source: e },
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| LoadError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Reads and validates a simulation log.
pub fn load_log<P: AsRef<Path>>(path: P) -> Result<SimulationLog, LoadError> {
    let path = path.as_ref();
    let log = parse_log(read_json(path)?)?;
    info!("Loaded {} generations from {}", log.generations.len(), path.display());
    Ok(log)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MazeDocument {
    Info(MazeInfo),
    Layout(Vec<LayoutRow>),
}

/// Reads a standalone maze file: either a full `maze_info` object or a bare layout array.
pub fn load_maze_info<P: AsRef<Path>>(path: P) -> Result<MazeInfo, LoadError> {
    let path = path.as_ref();
    let doc: MazeDocument = serde_json::from_value(read_json(path)?)
        .map_err(|e| AnalysisError::MalformedMaze(format!("{}: {}", path.display(), e)))?;
    let info = match doc {
        MazeDocument::Info(info) => info,
        MazeDocument::Layout(layout) => MazeInfo {
            kind: None,
            width: None,
            height: None,
            start: None,
            goal: None,
            layout,
        },
    };
    info!("Loaded maze layout ({} rows) from {}", info.layout.len(), path.display());
    Ok(info)
}
