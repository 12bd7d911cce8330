use serde::{Deserialize, Serialize};
use anyhow::Result;
use std::path::Path;

// Which movements enter the analysis
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct FilterConfig {
    #[serde(default)]
    pub generation: Option<u32>,
    #[serde(default)]
    pub best_only: bool,
}

// Evolution sequence sampling
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct EvolutionConfig {
    #[serde(default = "default_evolution_views")]
    pub views: usize,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        EvolutionConfig { views: default_evolution_views() }
    }
}

// Synthetic walk used for playback
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AnimationConfig {
    #[serde(default = "default_animation_seed")]
    pub seed: u64,
    #[serde(default = "default_animation_bound")]
    pub bound: f32,
    /// Walk length. Taken from the best individual of the last generation when unset.
    #[serde(default)]
    pub steps: Option<usize>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            seed: default_animation_seed(),
            bound: default_animation_bound(),
            steps: None,
        }
    }
}

// Configuration for output settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_base_filename")]
    pub base_filename: String,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
    #[serde(default)]
    pub save_positions: bool, // Start/end position CSV next to the report
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            base_filename: default_base_filename(),
            format: None,
            save_positions: false,
        }
    }
}

/// Colour scheme handed to the renderer with every report. Carried as-is; nothing here maps colours.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RenderConfig {
    #[serde(default = "default_heat_colors")]
    pub heat_colors: Vec<String>,
    #[serde(default = "default_maze_colors")]
    pub maze_colors: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            heat_colors: default_heat_colors(),
            maze_colors: default_maze_colors(),
        }
    }
}

// Main analysis configuration structure, loaded from a TOML file.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub evolution: EvolutionConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl AnalysisConfig {
    /// Loads the analysis configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config = Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config in '{}': {}", path_ref.display(), e))?;

        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.evolution.views == 0 {
            anyhow::bail!("evolution.views must be greater than 0.");
        }
        if !(self.animation.bound > 0.0) {
            anyhow::bail!("animation.bound must be positive.");
        }
        if self.output.base_filename.trim().is_empty() {
            anyhow::bail!("output.base_filename must not be empty.");
        }
        Ok(())
    }
}

fn default_evolution_views() -> usize {
    4
}

fn default_animation_seed() -> u64 {
    42
}

fn default_animation_bound() -> f32 {
    50.0
}

fn default_base_filename() -> String {
    "heatmap".to_string()
}

// black, red, yellow, green
fn default_heat_colors() -> Vec<String> {
    ["#000000", "#FF0000", "#FFFF00", "#00FF00"].iter().map(|c| c.to_string()).collect()
}

// black, grey, white, blue, red
fn default_maze_colors() -> Vec<String> {
    ["#000000", "#808080", "#FFFFFF", "#0000FF", "#FF0000"].iter().map(|c| c.to_string()).collect()
}
