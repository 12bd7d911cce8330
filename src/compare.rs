//! Named density views built from one event list: outcome split,
//! single generation, and the sampled evolution sequence.

use crate::error::AnalysisError;
use crate::extract::MovementEvent;
use crate::grid::DensityGrid;
use crate::maze::MazeGrid;
use crate::stats::Statistics;
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Default number of panels in an evolution sequence.
pub const DEFAULT_EVOLUTION_VIEWS: usize = 4;

/// Predicate selecting the events behind a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterSpec {
    All,
    Successful,
    Failed,
    Generation(u32),
}

impl FilterSpec {
    pub fn matches(&self, event: &MovementEvent) -> bool {
        match *self {
            FilterSpec::All => true,
            FilterSpec::Successful => event.reached_goal,
            FilterSpec::Failed => !event.reached_goal,
            FilterSpec::Generation(g) => event.generation == g,
        }
    }
}

/// One named comparison panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisView {
    pub label: String,
    pub source_filter: FilterSpec,
    pub density_grid: DensityGrid,
    pub event_count: usize,
    pub individual_count: usize,
}

/// Default panel set: everything, the successful routes, the latest
/// generation (only with more than one generation) and the statistics.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub all: AnalysisView,
    pub successful: AnalysisView,
    pub latest_generation: Option<AnalysisView>,
    pub statistics: Option<Statistics>,
}

/// Picks `k` evenly spaced generations: stride `max(1, n / k)`, first `k` picks.
pub fn select_generations(generations: &[u32], k: usize) -> Vec<u32> {
    if k == 0 {
        return Vec::new();
    }
    let stride = (generations.len() / k).max(1);
    generations.iter().step_by(stride).take(k).copied().collect()
}

/// Builds views over a shared maze and event list without copying either.
#[derive(Debug, Clone, Copy)]
pub struct ComparativeAnalysis<'a> {
    maze: &'a MazeGrid,
    events: &'a [MovementEvent],
}

impl<'a> ComparativeAnalysis<'a> {
    pub fn new(maze: &'a MazeGrid, events: &'a [MovementEvent]) -> Self {
        ComparativeAnalysis { maze, events }
    }

    /// Distinct generations present, ascending.
    pub fn generations(&self) -> Vec<u32> {
        self.events
            .iter()
            .map(|e| e.generation)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Aggregates the events matching `filter` into a labelled view.
    pub fn view(&self, filter: FilterSpec) -> AnalysisView {
        let matching: Vec<&MovementEvent> = self.events.iter().filter(|e| filter.matches(e)).collect();
        let individual_count = matching
            .iter()
            .map(|e| e.individual_id)
            .collect::<HashSet<_>>()
            .len();
        let label = match filter {
            FilterSpec::All => "All movements".to_string(),
            FilterSpec::Successful => format!("Successful routes ({} individuals)", individual_count),
            FilterSpec::Failed => "Failed routes".to_string(),
            FilterSpec::Generation(g) => format!("Generation {}", g),
        };
        debug!("View '{}': {} events", label, matching.len());

        AnalysisView {
            label,
            source_filter: filter,
            density_grid: DensityGrid::aggregate(matching.iter().copied(), self.maze),
            event_count: matching.len(),
            individual_count,
        }
    }

    /// All, successful and failed views, in that order.
    pub fn outcome_split(&self) -> Result<Vec<AnalysisView>, AnalysisError> {
        self.require_events("outcome comparison")?;
        let filters = [FilterSpec::All, FilterSpec::Successful, FilterSpec::Failed];
        Ok(filters.par_iter().map(|&f| self.view(f)).collect())
    }

    /// View of one generation; the highest generation present when none is requested.
    pub fn generation_view(&self, generation: Option<u32>) -> Result<AnalysisView, AnalysisError> {
        self.require_events("generation view")?;
        let generation = match generation {
            Some(g) => g,
            None => self
                .events
                .iter()
                .map(|e| e.generation)
                .max()
                .ok_or_else(|| AnalysisError::NoData("generation view".to_string()))?,
        };
        Ok(self.view(FilterSpec::Generation(generation)))
    }

    /// One view per sampled generation, oldest first.
    pub fn evolution(&self, views: usize) -> Result<Vec<AnalysisView>, AnalysisError> {
        self.require_events("evolution sequence")?;
        let generations = self.generations();
        if generations.len() < 2 {
            return Err(AnalysisError::InsufficientGenerations { found: generations.len() });
        }

        let selected = select_generations(&generations, views);
        info!("Evolution sequence over generations {:?}", selected);
        Ok(selected
            .par_iter()
            .map(|&g| self.view(FilterSpec::Generation(g)))
            .collect())
    }

    pub fn overview(&self) -> Result<Overview, AnalysisError> {
        self.require_events("overview")?;
        let (all, successful) = rayon::join(
            || self.view(FilterSpec::All),
            || self.view(FilterSpec::Successful),
        );
        let latest_generation = if self.generations().len() > 1 {
            Some(self.generation_view(None)?)
        } else {
            None
        };

        Ok(Overview {
            all,
            successful,
            latest_generation,
            statistics: Statistics::calculate(self.events),
        })
    }

    fn require_events(&self, what: &str) -> Result<(), AnalysisError> {
        if self.events.is_empty() {
            Err(AnalysisError::NoData(format!("{}: no movement events", what)))
        } else {
            Ok(())
        }
    }
}
