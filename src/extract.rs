//! Flattening of the hierarchical simulation log into movement events.
//!
//! The log is validated once into typed records (`SimulationLog`); everything
//! downstream works on the flat `MovementEvent` list produced here.

use crate::error::AnalysisError;
use heatmap_common::{GenerationRecord, IndividualRecord, MazeInfo, SimulationLog};
use log::{debug, info};
use serde::Serialize;

/// One recorded step of one individual, in maze coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementEvent {
    pub x: f32,
    pub y: f32,
    pub generation: u32,
    pub individual_id: u32,
    pub fitness: f32,
    pub step: u32,
    pub action: String,
    pub reached_goal: bool,
}

/// Restricts extraction to one generation and/or the flagged best individuals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractFilter {
    pub generation: Option<u32>,
    pub best_only: bool,
}

/// Result of flattening a log.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub events: Vec<MovementEvent>,
    /// `maze_info` of the first matching generation that carried one.
    pub maze_info: Option<MazeInfo>,
}

/// Validates an already parsed JSON document into a typed log.
pub fn parse_log(value: serde_json::Value) -> Result<SimulationLog, AnalysisError> {
    match value.as_object() {
        Some(obj) if obj.contains_key("generations") => {}
        Some(_) => {
            return Err(AnalysisError::InvalidLogStructure(
                "missing top-level `generations` key".to_string(),
            ))
        }
        None => {
            return Err(AnalysisError::InvalidLogStructure(
                "top level is not a JSON object".to_string(),
            ))
        }
    }
    serde_json::from_value(value).map_err(|e| AnalysisError::InvalidLogStructure(e.to_string()))
}

/// Convenience wrapper over `parse_log` for in-memory JSON text.
pub fn parse_log_str(text: &str) -> Result<SimulationLog, AnalysisError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| AnalysisError::InvalidLogStructure(e.to_string()))?;
    parse_log(value)
}

/// Flattens `log` into movement events in log order.
///
/// Generation blocks that do not match the filter are skipped whole, including
/// their `maze_info`. Individuals without a `movements` field contribute nothing.
pub fn extract_movements(log: &SimulationLog, filter: ExtractFilter) -> Extraction {
    let mut extraction = Extraction::default();

    for gen in &log.generations {
        if filter.generation.is_some_and(|g| g != gen.generation) {
            continue;
        }

        if extraction.maze_info.is_none() {
            extraction.maze_info = gen.maze_info.clone();
        }

        for individual in &gen.individuals {
            if filter.best_only && !individual.is_best {
                continue;
            }
            let Some(movements) = &individual.movements else {
                debug!(
                    "Generation {}: individual {} has no movement log, skipping.",
                    gen.generation, individual.id
                );
                continue;
            };

            extraction.events.extend(movements.iter().map(|m| MovementEvent {
                x: m.position[0],
                y: m.position[1],
                generation: gen.generation,
                individual_id: individual.id,
                fitness: individual.fitness,
                step: m.step,
                action: m.action.clone(),
                reached_goal: individual.reached_goal,
            }));
        }
    }

    info!("Extracted {} movements", extraction.events.len());
    extraction
}

/// The individual flagged `is_best` in the given generation, or in the highest
/// generation of the log when none is given.
pub fn best_individual(log: &SimulationLog, generation: Option<u32>) -> Option<(u32, &IndividualRecord)> {
    let gen: &GenerationRecord = match generation {
        Some(g) => log.generations.iter().find(|rec| rec.generation == g)?,
        None => log.generations.iter().max_by_key(|rec| rec.generation)?,
    };
    gen.individuals
        .iter()
        .find(|ind| ind.is_best)
        .map(|ind| (gen.generation, ind))
}
