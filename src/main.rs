use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use heatmap_common::{AnalysisConfig, MazeInfo, SimulationLog};
use log::{debug, info, warn, LevelFilter};
use maze_heatmap::extract::best_individual;
use maze_heatmap::load::{load_log, load_maze_info};
use maze_heatmap::report::{
    output_path, report_title, write_endpoints_csv, write_report, MazeSummary, OutputFormat, Report, ReportBody,
};
use maze_heatmap::{
    extract_movements, AnalysisError, ComparativeAnalysis, ExtractFilter, MazeGrid, MazeMarkers, MovementEvent,
    PathAnalysis, Playback,
};
use std::path::PathBuf;
use std::time::Instant;

/// Command-line arguments for the heatmap analyzer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input JSON log written by the robot simulation
    #[arg(short, long, default_value = "robot_log.json")]
    input: PathBuf,

    /// Separate maze file; replaces the maze_info found in the log
    #[arg(short, long)]
    maze: Option<PathBuf>,

    /// Only analyse this generation
    #[arg(short, long)]
    generation: Option<u32>,

    /// Only analyse individuals flagged as best
    #[arg(short, long)]
    best_only: bool,

    /// Path analysis: grouped trajectories and start/end distributions
    #[arg(short, long)]
    paths: bool,

    /// All / successful / failed comparison
    #[arg(short, long)]
    comparison: bool,

    /// Evolution sequence of sampled generations
    #[arg(short, long)]
    evolution: bool,

    /// Synthesized playback walk for the best individual
    #[arg(short, long)]
    animate: bool,

    /// Output base filename (mode suffix and extension are appended)
    #[arg(short, long)]
    output: Option<String>,

    /// Output format: json, bincode or messagepack
    #[arg(long)]
    format: Option<String>,

    /// Optional analysis config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Overview,
    Paths,
    Comparison,
    Evolution,
    Animation,
}

impl Mode {
    fn from_args(args: &Args) -> Self {
        if args.paths {
            Mode::Paths
        } else if args.comparison {
            Mode::Comparison
        } else if args.evolution {
            Mode::Evolution
        } else if args.animate {
            Mode::Animation
        } else {
            Mode::Overview
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Mode::Overview => "",
            Mode::Paths => "_paths",
            Mode::Comparison => "_comparison",
            Mode::Evolution => "_evolution",
            Mode::Animation => "_animation",
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    run_with_args(args)
}

fn logger_builder(verbose: bool, env_filters: Option<&str>) -> Builder {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let mut builder = Builder::new();
    builder.filter_level(level);
    if let Some(filters) = env_filters {
        builder.parse_filters(filters);
    }
    builder
}

fn run_with_args(args: Args) -> Result<()> {
    // Initialize logger; RUST_LOG is applied last so it wins over -v
    let env_filters = std::env::var(env_logger::DEFAULT_FILTER_ENV).ok();
    logger_builder(args.verbose, env_filters.as_deref()).init();

    info!("Starting Maze Heatmap Analyzer...");
    info!("Input file: {}", args.input.display());

    // --- Load Configuration ---
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if args.generation.is_some() {
        config.filter.generation = args.generation;
    }
    config.filter.best_only |= args.best_only;
    if let Some(base) = &args.output {
        config.output.base_filename = base.clone();
    }
    if args.format.is_some() {
        config.output.format = args.format.clone();
    }
    config.validate()?;
    debug!("Analysis config: {:#?}", config);

    let log = load_log(&args.input).with_context(|| format!("Failed to load log '{}'", args.input.display()))?;
    let maze_override = match &args.maze {
        Some(path) => Some(load_maze_info(path).with_context(|| format!("Failed to load maze '{}'", path.display()))?),
        None => None,
    };

    let mode = Mode::from_args(&args);
    info!("Running {:?} analysis", mode);
    let start_time = Instant::now();

    match run_mode(mode, &config, &log, maze_override) {
        Ok(()) => {}
        Err(e) => match e.downcast_ref::<AnalysisError>() {
            Some(analysis_err) if analysis_err.is_no_data() => {
                warn!("Nothing to report: {}", analysis_err);
                return Ok(());
            }
            _ => return Err(e),
        },
    }

    info!("Analysis finished in {:.2?}", start_time.elapsed());
    Ok(())
}

/// Flattened events and the maze they are binned against.
struct EventInputs {
    maze: MazeGrid,
    markers: MazeMarkers,
    events: Vec<MovementEvent>,
}

impl EventInputs {
    fn prepare(log: &SimulationLog, filter: ExtractFilter, maze_override: Option<MazeInfo>) -> Result<Self> {
        let extraction = extract_movements(log, filter);
        let maze_info = maze_override
            .or(extraction.maze_info)
            .ok_or_else(|| AnalysisError::NoData("log carries no maze_info".to_string()))?;
        let maze = MazeGrid::from_info(&maze_info)?;
        let markers = MazeMarkers::resolve(Some(&maze_info), &maze);
        info!("Maze {}x{} | {} movement events", maze.cols(), maze.rows(), extraction.events.len());
        Ok(EventInputs { maze, markers, events: extraction.events })
    }

    fn analysis(&self) -> ComparativeAnalysis<'_> {
        ComparativeAnalysis::new(&self.maze, &self.events)
    }
}

fn run_mode(mode: Mode, config: &AnalysisConfig, log: &SimulationLog, maze_override: Option<MazeInfo>) -> Result<()> {
    let filter = ExtractFilter {
        generation: config.filter.generation,
        best_only: config.filter.best_only,
    };
    let format = OutputFormat::from_name(config.output.format.as_deref());
    let report_path = output_path(&config.output.base_filename, mode.suffix(), format);

    let write = |title: String, maze: Option<MazeSummary>, body: ReportBody<'_>| -> Result<()> {
        let report = Report {
            title,
            filter,
            maze,
            render: &config.render,
            body,
        };
        write_report(&report, &report_path, format)
    };

    let inputs = match mode {
        Mode::Animation => {
            let playback = synthesize_playback(config, log)?;
            info!("Synthesized {} playback frames", playback.frames().len());
            let title = format!("Generation {} playback", playback.generation);
            return write(title, None, ReportBody::Animation(&playback));
        }
        Mode::Overview => {
            let inputs = EventInputs::prepare(log, filter, maze_override)?;
            let overview = inputs.analysis().overview()?;
            if let Some(stats) = &overview.statistics {
                info!("\n{}", stats);
            }
            let summary = MazeSummary::new(&inputs.maze, inputs.markers);
            write(report_title(&filter), Some(summary), ReportBody::overview(&overview, &inputs.maze))?;
            inputs
        }
        Mode::Comparison => {
            let inputs = EventInputs::prepare(log, filter, maze_override)?;
            let views = inputs.analysis().outcome_split()?;
            let summary = MazeSummary::new(&inputs.maze, inputs.markers);
            write(
                "Movement comparison".to_string(),
                Some(summary),
                ReportBody::comparison(&views, &inputs.maze),
            )?;
            inputs
        }
        Mode::Evolution => {
            let inputs = EventInputs::prepare(log, filter, maze_override)?;
            let views = inputs.analysis().evolution(config.evolution.views)?;
            let summary = MazeSummary::new(&inputs.maze, inputs.markers);
            write(
                "Evolution of movement patterns".to_string(),
                Some(summary),
                ReportBody::evolution(&views, &inputs.maze),
            )?;
            inputs
        }
        Mode::Paths => {
            let inputs = EventInputs::prepare(log, filter, maze_override)?;
            if inputs.events.is_empty() {
                return Err(AnalysisError::NoData("path analysis: no movement events".to_string()).into());
            }
            let paths = PathAnalysis::analyze(&inputs.events);
            info!(
                "{} trajectories ({} successful, {} failed)",
                paths.trajectories.len(),
                paths.successful.len(),
                paths.failed.len()
            );
            let summary = MazeSummary::new(&inputs.maze, inputs.markers);
            write("Route analysis".to_string(), Some(summary), ReportBody::Paths(&paths))?;
            inputs
        }
    };

    if config.output.save_positions {
        let paths = PathAnalysis::analyze(&inputs.events);
        let csv_path = PathBuf::from(format!("{}{}_endpoints.csv", config.output.base_filename, mode.suffix()));
        write_endpoints_csv(&paths, &csv_path)?;
    }

    Ok(())
}

/// Builds the playback walk; its length comes from config or the best individual's step count.
fn synthesize_playback(config: &AnalysisConfig, log: &SimulationLog) -> Result<Playback> {
    let best = best_individual(log, config.filter.generation);
    let generation = best
        .map(|(g, _)| g)
        .or(config.filter.generation)
        .unwrap_or(0);

    let steps = match config.animation.steps {
        Some(steps) => steps,
        None => {
            let (_, individual) = best.ok_or_else(|| {
                AnalysisError::NoData("no individual flagged as best to take a step count from".to_string())
            })?;
            individual
                .steps_taken
                .map(|s| s as usize)
                .or_else(|| individual.movements.as_ref().map(Vec::len))
                .unwrap_or(0)
        }
    };

    debug!(
        "Synthesizing {} steps (seed {}, bound {})",
        steps, config.animation.seed, config.animation.bound
    );
    Ok(Playback::synthesize(generation, steps, config.animation.seed, config.animation.bound))
}
