use crate::extract::MovementEvent;
use heatmap_common::Vec2;
use serde::Serialize;
use std::collections::BTreeMap;

/// The ordered steps of one individual in one generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    pub generation: u32,
    pub individual_id: u32,
    /// Taken from the first event; the whole trajectory counts as successful or failed.
    pub reached_goal: bool,
    pub events: Vec<MovementEvent>,
}

impl Trajectory {
    pub fn start(&self) -> Option<Vec2> {
        self.events.first().map(|e| Vec2::new(e.x, e.y))
    }

    pub fn end(&self) -> Option<Vec2> {
        self.events.last().map(|e| Vec2::new(e.x, e.y))
    }
}

/// Trajectories grouped from a flat event list, with their outcome split and
/// the start/end position clouds a renderer can bin.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PathAnalysis {
    pub trajectories: Vec<Trajectory>,
    /// Indices into `trajectories`.
    pub successful: Vec<usize>,
    pub failed: Vec<usize>,
    pub start_positions: Vec<Vec2>,
    pub end_positions: Vec<Vec2>,
}

impl PathAnalysis {
    pub fn analyze(events: &[MovementEvent]) -> Self {
        let mut grouped: BTreeMap<(u32, u32), Vec<MovementEvent>> = BTreeMap::new();
        for e in events {
            grouped
                .entry((e.generation, e.individual_id))
                .or_default()
                .push(e.clone());
        }

        let mut analysis = PathAnalysis::default();
        for ((generation, individual_id), mut steps) in grouped {
            // stable, so duplicate step numbers keep log order
            steps.sort_by_key(|e| e.step);
            let trajectory = Trajectory {
                generation,
                individual_id,
                reached_goal: steps[0].reached_goal,
                events: steps,
            };

            let idx = analysis.trajectories.len();
            if trajectory.reached_goal {
                analysis.successful.push(idx);
            } else {
                analysis.failed.push(idx);
            }
            analysis.start_positions.extend(trajectory.start());
            analysis.end_positions.extend(trajectory.end());
            analysis.trajectories.push(trajectory);
        }
        analysis
    }

    pub fn successful_paths(&self) -> impl Iterator<Item = &Trajectory> + '_ {
        self.successful.iter().map(move |&i| &self.trajectories[i])
    }

    pub fn failed_paths(&self) -> impl Iterator<Item = &Trajectory> + '_ {
        self.failed.iter().map(move |&i| &self.trajectories[i])
    }
}
