//! Renderer boundary: everything a plotting backend needs to draw a result
//! without further numeric work, and the writers that hand it over.

use crate::compare::{AnalysisView, Overview};
use crate::extract::ExtractFilter;
use crate::maze::{MazeGrid, MazeMarkers};
use crate::paths::PathAnalysis;
use crate::stats::Statistics;
use crate::synth::Playback;
use anyhow::{Context, Result};
use heatmap_common::RenderConfig;
use log::{info, warn};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_TITLE: &str = "Robot Movement Heatmap";

/// Serialization format of a written report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Bincode,
    MessagePack,
}

impl OutputFormat {
    /// Unknown names fall back to JSON with a warning.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.unwrap_or("json") {
            "json" => OutputFormat::Json,
            "bincode" => OutputFormat::Bincode,
            "messagepack" => OutputFormat::MessagePack,
            other => {
                warn!("Unknown output format: {}. Using JSON instead.", other);
                OutputFormat::Json
            }
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Bincode => "bin",
            OutputFormat::MessagePack => "msgpack",
        }
    }
}

/// Title used for the default overview, reflecting the active filter.
pub fn report_title(filter: &ExtractFilter) -> String {
    let mut title = DEFAULT_TITLE.to_string();
    if let Some(g) = filter.generation {
        title.push_str(&format!(" - Generation {}", g));
    }
    if filter.best_only {
        title.push_str(" (best individuals)");
    }
    title
}

/// Maze context shared by every panel of a report.
#[derive(Debug, Clone, Serialize)]
pub struct MazeSummary {
    pub rows: usize,
    pub cols: usize,
    pub codes: Vec<Vec<u8>>,
    pub markers: MazeMarkers,
}

impl MazeSummary {
    pub fn new(maze: &MazeGrid, markers: MazeMarkers) -> Self {
        MazeSummary {
            rows: maze.rows(),
            cols: maze.cols(),
            codes: maze.to_codes(),
            markers,
        }
    }
}

/// A density view together with its wall-masked composite.
#[derive(Debug, Clone, Serialize)]
pub struct Panel<'a> {
    pub view: &'a AnalysisView,
    pub overlay: Vec<f32>,
}

impl<'a> Panel<'a> {
    pub fn new(view: &'a AnalysisView, maze: &MazeGrid) -> Self {
        Panel { view, overlay: view.density_grid.overlay(maze) }
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum ReportBody<'a> {
    Overview {
        panels: Vec<Panel<'a>>,
        statistics: Option<&'a Statistics>,
        summary: Option<String>,
    },
    Comparison(Vec<Panel<'a>>),
    Evolution(Vec<Panel<'a>>),
    Paths(&'a PathAnalysis),
    Animation(&'a Playback),
}

impl<'a> ReportBody<'a> {
    pub fn overview(overview: &'a Overview, maze: &MazeGrid) -> Self {
        let mut panels = vec![Panel::new(&overview.all, maze), Panel::new(&overview.successful, maze)];
        panels.extend(overview.latest_generation.as_ref().map(|v| Panel::new(v, maze)));
        ReportBody::Overview {
            panels,
            statistics: overview.statistics.as_ref(),
            summary: overview.statistics.as_ref().map(|s| s.to_string()),
        }
    }

    pub fn comparison(views: &'a [AnalysisView], maze: &MazeGrid) -> Self {
        ReportBody::Comparison(views.iter().map(|v| Panel::new(v, maze)).collect())
    }

    pub fn evolution(views: &'a [AnalysisView], maze: &MazeGrid) -> Self {
        ReportBody::Evolution(views.iter().map(|v| Panel::new(v, maze)).collect())
    }
}

/// Complete hand-over document for one analysis mode.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub title: String,
    pub filter: ExtractFilter,
    pub maze: Option<MazeSummary>,
    pub render: &'a RenderConfig,
    pub body: ReportBody<'a>,
}

/// `<base><suffix>.<ext>`
pub fn output_path(base: &str, suffix: &str, format: OutputFormat) -> PathBuf {
    PathBuf::from(format!("{}{}.{}", base, suffix, format.extension()))
}

/// Serializes `report` to `path` in the requested format.
pub fn write_report(report: &Report<'_>, path: &Path, format: OutputFormat) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Error creating report file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut writer, report).context("Error serializing report to JSON")?;
        }
        OutputFormat::Bincode => {
            bincode::serialize_into(&mut writer, report).context("Error serializing report to bincode")?;
        }
        OutputFormat::MessagePack => {
            rmp_serde::encode::write_named(&mut writer, report)
                .context("Error serializing report to MessagePack")?;
        }
    }
    writer.flush()?;

    info!("Report '{}' saved to {}", report.title, path.display());
    Ok(())
}

/// Writes start and end positions of every trajectory as CSV.
pub fn write_endpoints_csv(paths: &PathAnalysis, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Error creating CSV file '{}'", path.display()))?;
    writer.write_record(["kind", "generation", "individual_id", "reached_goal", "x", "y"])?;

    for t in &paths.trajectories {
        for (kind, pos) in [("start", t.start()), ("end", t.end())] {
            if let Some(p) = pos {
                writer.write_record(&[
                    kind.to_string(),
                    t.generation.to_string(),
                    t.individual_id.to_string(),
                    t.reached_goal.to_string(),
                    format!("{:.4}", p.x),
                    format!("{:.4}", p.y),
                ])?;
            }
        }
    }
    writer.flush()?;
    info!("Start/end positions saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::ComparativeAnalysis;
    use crate::extract::MovementEvent;
    use std::fs;
    use tempfile::tempdir;

    fn events() -> Vec<MovementEvent> {
        [(1u32, 0u32, 1.0f32, 1.0f32, true), (1, 1, 2.0, 1.0, true), (2, 0, 1.0, 1.0, false)]
            .into_iter()
            .map(|(id, step, x, y, reached_goal)| MovementEvent {
                x,
                y,
                generation: 0,
                individual_id: id,
                fitness: 1.0,
                step,
                action: "FORWARD".to_string(),
                reached_goal,
            })
            .collect()
    }

    #[test]
    fn title_reflects_filter() {
        assert_eq!(report_title(&ExtractFilter::default()), "Robot Movement Heatmap");
        let filter = ExtractFilter { generation: Some(3), best_only: true };
        assert_eq!(report_title(&filter), "Robot Movement Heatmap - Generation 3 (best individuals)");
    }

    #[test]
    fn format_names() {
        assert_eq!(OutputFormat::from_name(None), OutputFormat::Json);
        assert_eq!(OutputFormat::from_name(Some("messagepack")), OutputFormat::MessagePack);
        assert_eq!(OutputFormat::from_name(Some("yaml")), OutputFormat::Json);
        assert_eq!(
            output_path("out/heatmap", "_evolution", OutputFormat::Bincode),
            PathBuf::from("out/heatmap_evolution.bin")
        );
    }

    #[test]
    fn writes_comparison_report_in_each_format() {
        let maze = MazeGrid::parse(&["####", "#OO#", "####"]).unwrap();
        let events = events();
        let views = ComparativeAnalysis::new(&maze, &events).outcome_split().unwrap();
        let render = RenderConfig::default();
        let report = Report {
            title: "Comparison".to_string(),
            filter: ExtractFilter::default(),
            maze: Some(MazeSummary::new(&maze, MazeMarkers::resolve(None, &maze))),
            render: &render,
            body: ReportBody::comparison(&views, &maze),
        };

        let dir = tempdir().unwrap();
        for format in [OutputFormat::Json, OutputFormat::Bincode, OutputFormat::MessagePack] {
            let path = dir.path().join(format!("report.{}", format.extension()));
            write_report(&report, &path, format).unwrap();
            assert!(fs::metadata(&path).unwrap().len() > 0);
        }

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
        assert_eq!(json["title"], "Comparison");
        let panels = json["body"]["Comparison"].as_array().unwrap();
        assert_eq!(panels.len(), 3);
        // row 0 is wall: composite marks it -1
        assert_eq!(panels[0]["overlay"][0], -1.0);
        assert_eq!(json["render"]["heat_colors"][0], "#000000");
    }

    #[test]
    fn endpoints_csv_has_one_row_per_end() {
        let analysis = PathAnalysis::analyze(&events());
        let dir = tempdir().unwrap();
        let path = dir.path().join("endpoints.csv");
        write_endpoints_csv(&analysis, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "kind,generation,individual_id,reached_goal,x,y");
        assert_eq!(lines.len(), 5);
        assert!(content.contains("end,0,1,true,2.0000,1.0000"));
    }
}
