//! Simulated Annealing for the TSP.
//!
//! Starts from a uniformly random tour and repeatedly proposes segment
//! reversals. Improving moves are always taken; worsening moves are taken
//! with the Metropolis probability `exp(-delta / T)`. The temperature decays
//! geometrically after every `iterations_per_temperature` proposals until it
//! reaches the floor. The best tour seen at any point is returned.

use crate::error::{Result, TspError};
use crate::heuristics::cooling::GeometricCooling;
use crate::heuristics::neighborhood::{reversal_delta, reverse_segment_into, SegmentReversal};
use crate::heuristics::random::{random_permutation, seeded_rng, RandomSource};
use crate::instance::{validate_matrix, TspInstance};
use crate::solution::Solution;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Simulated Annealing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealingConfig {
    /// Starting temperature
    pub initial_temperature: f64,
    /// Multiplicative decay applied after each inner loop, in (0, 1)
    pub cooling_rate: f64,
    /// Proposals evaluated at each temperature
    pub iterations_per_temperature: usize,
    /// The search stops once the temperature is no longer above this
    pub min_temperature: f64,
    /// Random seed; `None` draws one from OS entropy
    pub seed: Option<u64>,
    /// Evaluate reversals with the O(1) boundary-edge delta instead of a full
    /// recompute. Ignored for asymmetric matrices.
    pub incremental: bool,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        AnnealingConfig {
            initial_temperature: 10000.0,
            cooling_rate: 0.99,
            iterations_per_temperature: 15000,
            min_temperature: 1.0,
            seed: None,
            incremental: false,
        }
    }
}

impl AnnealingConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }

    pub fn schedule(&self) -> GeometricCooling {
        GeometricCooling::new(self.initial_temperature, self.cooling_rate, self.min_temperature)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.min_temperature > 0.0 && self.min_temperature.is_finite()) {
            return Err(TspError::Config(format!(
                "min_temperature must be positive, got {}",
                self.min_temperature
            )));
        }
        if !(self.initial_temperature.is_finite() && self.initial_temperature > self.min_temperature) {
            return Err(TspError::Config(format!(
                "initial_temperature must be finite and above min_temperature ({}), got {}",
                self.min_temperature, self.initial_temperature
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(TspError::Config(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if self.iterations_per_temperature == 0 {
            return Err(TspError::Config(
                "iterations_per_temperature must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of one annealing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnealingResult {
    /// Best tour seen during the run
    pub best_tour: Vec<usize>,
    /// Length of `best_tour`
    pub best_length: f64,
    /// Proposals evaluated
    pub iterations: usize,
    /// Temperature levels visited
    pub temperature_steps: usize,
    /// Accepted proposals, improving or not
    pub accepted_moves: usize,
    /// Accepted proposals with a negative delta
    pub improving_moves: usize,
    /// Temperature when the loop stopped
    pub final_temperature: f64,
    /// Best length after each temperature level
    pub best_history: Vec<f64>,
}

impl AnnealingResult {
    pub fn acceptance_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.accepted_moves as f64 / self.iterations as f64
        }
    }

    pub fn into_solution(self, seed: Option<u64>, computation_time: f64) -> Solution {
        Solution {
            tour: self.best_tour,
            cost: self.best_length,
            algorithm: "SimulatedAnnealing".to_string(),
            computation_time,
            iterations: Some(self.iterations),
            seed,
        }
    }
}

/// Probability of taking a move of length change `delta` at `temperature`
#[inline]
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    if delta < 0.0 {
        1.0
    } else {
        (-delta / temperature).exp()
    }
}

/// Metropolis criterion. Improving moves do not consume a random draw.
#[inline]
pub fn metropolis_accept<R: RandomSource + ?Sized>(delta: f64, temperature: f64, rng: &mut R) -> bool {
    delta < 0.0 || rng.next_unit() < (-delta / temperature).exp()
}

/// Simulated Annealing
///
/// Metaheuristic that accepts worse tours with decreasing probability.
pub struct SimulatedAnnealing {
    pub config: AnnealingConfig,
    neighborhood: SegmentReversal,
}

impl SimulatedAnnealing {
    pub fn new() -> Self {
        Self::with_config(AnnealingConfig::default())
    }

    pub fn with_config(config: AnnealingConfig) -> Self {
        SimulatedAnnealing {
            config,
            neighborhood: SegmentReversal::new(),
        }
    }

    /// Seed a generator from the configuration and run.
    pub fn solve(&self, instance: &TspInstance) -> Result<Solution> {
        let (mut rng, seed) = seeded_rng(self.config.seed);
        let start = Instant::now();
        let result = self.run(instance, &mut rng)?;
        Ok(result.into_solution(Some(seed), start.elapsed().as_secs_f64()))
    }

    /// Run the search with an injected random source.
    ///
    /// The configuration and the distance matrix are checked before any
    /// randomness is consumed.
    pub fn run<R: RandomSource + ?Sized>(
        &self,
        instance: &TspInstance,
        rng: &mut R,
    ) -> Result<AnnealingResult> {
        self.config.validate()?;
        let n = validate_matrix(&instance.distance_matrix)?;
        let matrix = &instance.distance_matrix;
        let schedule = self.config.schedule();

        if n <= 1 {
            log::debug!("Single point instance, skipping search");
            return Ok(AnnealingResult {
                best_tour: (0..n).collect(),
                best_length: 0.0,
                iterations: 0,
                temperature_steps: 0,
                accepted_moves: 0,
                improving_moves: 0,
                final_temperature: self.config.initial_temperature,
                best_history: Vec::new(),
            });
        }

        let incremental = if self.config.incremental && !instance.is_symmetric() {
            log::warn!("Incremental evaluation needs a symmetric matrix, using full recomputation");
            false
        } else {
            self.config.incremental
        };

        log::info!(
            "Annealing {} points: T0={} rate={} floor={} iters/T={} ({} levels)",
            n,
            self.config.initial_temperature,
            self.config.cooling_rate,
            self.config.min_temperature,
            self.config.iterations_per_temperature,
            schedule.steps()
        );

        let mut current = random_permutation(n, rng);
        let mut current_length = instance.tour_length(&current);
        let mut best_tour = current.clone();
        let mut best_length = current_length;
        let mut candidate: Vec<usize> = Vec::with_capacity(n);

        let mut iterations = 0usize;
        let mut temperature_steps = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut best_history = Vec::with_capacity(schedule.steps());

        for temperature in schedule.temperatures() {
            let best_before = best_length;

            for _ in 0..self.config.iterations_per_temperature {
                let (i, j) = self.neighborhood.pick(n, rng);

                let new_length = if incremental {
                    current_length + reversal_delta(&current, i, j, matrix)
                } else {
                    reverse_segment_into(&current, i, j, &mut candidate);
                    instance.tour_length(&candidate)
                };
                let delta = new_length - current_length;
                iterations += 1;

                if metropolis_accept(delta, temperature, rng) {
                    accepted_moves += 1;
                    if delta < 0.0 {
                        improving_moves += 1;
                    }

                    if incremental {
                        current[i..=j].reverse();
                    } else {
                        std::mem::swap(&mut current, &mut candidate);
                    }
                    current_length = new_length;

                    if current_length < best_length {
                        if incremental {
                            // Summed deltas drift; resync before recording a best.
                            current_length = instance.tour_length(&current);
                        }
                        if current_length < best_length {
                            best_tour.copy_from_slice(&current);
                            best_length = current_length;
                        }
                    }
                }
            }

            temperature_steps += 1;
            best_history.push(best_length);
            if best_length < best_before {
                log::debug!(
                    "T={:.4}: best {:.4} -> {:.4}",
                    temperature,
                    best_before,
                    best_length
                );
            }
        }

        log::info!(
            "Annealing finished: best={:.4} iterations={} accepted={} improving={}",
            best_length,
            iterations,
            accepted_moves,
            improving_moves
        );

        Ok(AnnealingResult {
            best_tour,
            best_length,
            iterations,
            temperature_steps,
            accepted_moves,
            improving_moves,
            final_temperature: schedule.final_temperature(),
            best_history,
        })
    }
}

impl Default for SimulatedAnnealing {
    fn default() -> Self {
        Self::new()
    }
}
