//! Seeded random-walk trajectories for illustrative playback, and the
//! in-memory frame sequence a renderer turns into an animation.

use heatmap_common::Vec2;
use rand::prelude::*;
use serde::Serialize;

/// Every synthesized walk begins here.
pub const WALK_ORIGIN: Vec2 = Vec2 { x: 1.0, y: 1.0 };

/// Lazily yields `steps + 1` positions: the origin, then one uniform
/// `[-1, 1)` jitter per axis per step, clamped into `[0, bound]`.
///
/// Restart by constructing a new walk with the same seed, or by cloning
/// one that has not been advanced yet.
#[derive(Debug, Clone)]
pub struct RandomWalk {
    rng: StdRng,
    current: Vec2,
    bound: f32,
    remaining: usize,
    emitted_origin: bool,
}

impl RandomWalk {
    pub fn new(steps: usize, seed: u64, bound: f32) -> Self {
        RandomWalk {
            rng: StdRng::seed_from_u64(seed),
            current: WALK_ORIGIN,
            bound,
            remaining: steps,
            emitted_origin: false,
        }
    }
}

impl Iterator for RandomWalk {
    type Item = Vec2;

    fn next(&mut self) -> Option<Vec2> {
        if !self.emitted_origin {
            self.emitted_origin = true;
            return Some(self.current);
        }
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let dx = self.rng.random_range(-1.0f32..1.0);
        let dy = self.rng.random_range(-1.0f32..1.0);
        self.current = (self.current + Vec2::new(dx, dy)).clamp_axes(0.0, self.bound);
        Some(self.current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.remaining + usize::from(!self.emitted_origin);
        (left, Some(left))
    }
}

impl ExactSizeIterator for RandomWalk {}

/// A fully materialised walk plus what a renderer needs to title and scale it.
#[derive(Debug, Clone, Serialize)]
pub struct Playback {
    pub generation: u32,
    pub seed: u64,
    pub bound: f32,
    pub positions: Vec<Vec2>,
}

impl Playback {
    pub fn synthesize(generation: u32, steps: usize, seed: u64, bound: f32) -> Self {
        Playback {
            generation,
            seed,
            bound,
            positions: RandomWalk::new(steps, seed, bound).collect(),
        }
    }

    /// One frame per position, in order.
    pub fn frames(&self) -> impl ExactSizeIterator<Item = AnimationFrame<'_>> + '_ {
        self.positions.iter().enumerate().map(move |(i, &current)| AnimationFrame {
            index: i,
            title: format!("Generation {}, Step {}", self.generation, i),
            trail: &self.positions[..i],
            current,
            bounds: (0.0, self.bound),
        })
    }
}

/// Frame `i` shows the path up to (not including) step `i` and a marker at step `i`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationFrame<'a> {
    pub index: usize,
    pub title: String,
    pub trail: &'a [Vec2],
    pub current: Vec2,
    pub bounds: (f32, f32),
}
