pub mod config;
pub mod log_record;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{AnalysisConfig, AnimationConfig, EvolutionConfig, FilterConfig, OutputConfig, RenderConfig};
pub use log_record::{
    FinalPosition, GenerationRecord, GenerationStats, IndividualRecord, LayoutRow, MazeInfo, MovementRecord,
    SimulationInfo, SimulationLog,
};
pub use vecmath::{clamp, Vec2};
