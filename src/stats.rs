use crate::extract::MovementEvent;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Scalar summary of a set of movement events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub generation_range: (u32, u32),
    /// Distinct `individual_id` values.
    pub individual_count: usize,
    pub successful_count: usize,
    /// Percentage in `[0, 100]`.
    pub success_rate: f64,
    pub total_movements: usize,
    pub avg_steps_per_individual: f64,
    pub fitness_min: f32,
    pub fitness_max: f32,
    pub fitness_mean: f64,
}

impl Statistics {
    /// Summarises `events`. Returns `None` ("no data") for an empty list.
    ///
    /// Fitness figures are taken per event, so individuals with longer
    /// movement logs weigh more in the mean.
    pub fn calculate(events: &[MovementEvent]) -> Option<Self> {
        let first = events.first()?;

        let mut gen_min = first.generation;
        let mut gen_max = first.generation;
        let mut fitness_min = first.fitness;
        let mut fitness_max = first.fitness;
        let mut fitness_sum = 0.0f64;
        let mut individuals = HashSet::new();
        let mut successful = HashSet::new();

        for e in events {
            gen_min = gen_min.min(e.generation);
            gen_max = gen_max.max(e.generation);
            fitness_min = fitness_min.min(e.fitness);
            fitness_max = fitness_max.max(e.fitness);
            fitness_sum += e.fitness as f64;
            individuals.insert(e.individual_id);
            if e.reached_goal {
                successful.insert(e.individual_id);
            }
        }

        let individual_count = individuals.len();
        let successful_count = successful.len();
        let total_movements = events.len();

        Some(Statistics {
            generation_range: (gen_min, gen_max),
            individual_count,
            successful_count,
            success_rate: successful_count as f64 * 100.0 / individual_count as f64,
            total_movements,
            avg_steps_per_individual: total_movements as f64 / individual_count as f64,
            fitness_min,
            fitness_max,
            fitness_mean: fitness_sum / total_movements as f64,
        })
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MOVEMENT STATISTICS")?;
        writeln!(f, " Generations: {} - {}", self.generation_range.0, self.generation_range.1)?;
        writeln!(f, " Individuals: {}", self.individual_count)?;
        writeln!(
            f,
            " Successful individuals: {} ({:.1}%)",
            self.successful_count, self.success_rate
        )?;
        writeln!(f, " Total movements: {}", self.total_movements)?;
        writeln!(f, " Avg steps/individual: {:.1}", self.avg_steps_per_individual)?;
        writeln!(f, " Fitness range: {:.1} - {:.1}", self.fitness_min, self.fitness_max)?;
        write!(f, " Fitness mean: {:.1}", self.fitness_mean)
    }
}
