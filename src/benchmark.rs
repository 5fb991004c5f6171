//! Benchmarking module for the annealer.
//!
//! Runs the annealer several times on one instance with consecutive seeds,
//! one run after another, and collects per-run results and aggregate
//! statistics.

use crate::error::Result;
use crate::heuristics::annealing::{AnnealingConfig, SimulatedAnnealing};
use crate::heuristics::random::seeded_rng;
use crate::instance::TspInstance;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

/// Result of a single annealing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Run index, starting at 0
    pub run: usize,
    /// Seed of the run
    pub seed: u64,
    /// Instance name
    pub instance: String,
    /// Instance dimension
    pub dimension: usize,
    /// Best tour length found
    pub length: f64,
    /// Computation time in seconds
    pub time: f64,
    /// Proposals evaluated
    pub iterations: usize,
    /// Fraction of proposals accepted
    pub acceptance_rate: f64,
}

/// Aggregated statistics over all runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkStatistics {
    pub runs: usize,
    pub best_length: f64,
    pub best_seed: u64,
    pub worst_length: f64,
    pub mean_length: f64,
    /// Sample standard deviation, 0 for a single run
    pub std_length: f64,
    pub avg_time: f64,
    pub total_time: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of runs
    pub num_runs: usize,
    /// Seed of the first run; run k uses `base_seed + k`
    pub base_seed: u64,
    /// Annealer settings shared by every run (its seed is ignored)
    pub annealing: AnnealingConfig,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 5,
            base_seed: 0,
            annealing: AnnealingConfig::default(),
            show_progress: false,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Run the configured number of seeded annealing runs on an instance
    pub fn run(&mut self, instance: &TspInstance) -> Result<()> {
        log::info!(
            "Running benchmark on instance: {} ({} runs)",
            instance.name,
            self.config.num_runs
        );

        let progress = if self.config.show_progress {
            let bar = ProgressBar::new(self.config.num_runs as u64);
            if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} runs [{elapsed_precise}] {msg}") {
                bar.set_style(style);
            }
            bar
        } else {
            ProgressBar::hidden()
        };

        let sa = SimulatedAnnealing::with_config(self.config.annealing.clone());

        for run in 0..self.config.num_runs {
            let seed = self.config.base_seed.wrapping_add(run as u64);
            let (mut rng, _) = seeded_rng(Some(seed));

            let start = Instant::now();
            let outcome = sa.run(instance, &mut rng)?;
            let time = start.elapsed().as_secs_f64();

            log::info!("Run {} (seed {}): length {:.4} in {:.3}s", run, seed, outcome.best_length, time);
            progress.set_message(format!("last {:.2}", outcome.best_length));
            progress.inc(1);

            self.results.push(RunResult {
                run,
                seed,
                instance: instance.name.clone(),
                dimension: instance.dimension,
                length: outcome.best_length,
                time,
                iterations: outcome.iterations,
                acceptance_rate: outcome.acceptance_rate(),
            });
        }

        progress.finish_and_clear();
        Ok(())
    }

    /// Aggregate statistics, `None` before any run
    pub fn compute_statistics(&self) -> Option<BenchmarkStatistics> {
        let best = self
            .results
            .iter()
            .min_by(|a, b| a.length.total_cmp(&b.length))?;

        let lengths: Vec<f64> = self.results.iter().map(|r| r.length).collect();
        let times: Vec<f64> = self.results.iter().map(|r| r.time).collect();

        let std_length = if lengths.len() > 1 {
            lengths.iter().std_dev()
        } else {
            0.0
        };

        Some(BenchmarkStatistics {
            runs: self.results.len(),
            best_length: best.length,
            best_seed: best.seed,
            worst_length: lengths.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            mean_length: lengths.iter().mean(),
            std_length,
            avg_time: times.iter().mean(),
            total_time: times.iter().sum::<f64>(),
        })
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("     TSP Simulated Annealing Report\n");
        report.push_str("========================================\n");
        report.push_str(&format!(
            "Generated: {}\n\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        let cfg = &self.config.annealing;
        report.push_str(&format!(
            "T0={} rate={} floor={} iterations/T={} incremental={}\n\n",
            cfg.initial_temperature,
            cfg.cooling_rate,
            cfg.min_temperature,
            cfg.iterations_per_temperature,
            cfg.incremental
        ));

        report.push_str(&format!("{:>5} {:>12} {:>14} {:>10} {:>10}\n", "Run", "Seed", "Length", "Time", "Accept%"));
        report.push_str("-".repeat(55).as_str());
        report.push('\n');

        for result in &self.results {
            report.push_str(&format!(
                "{:>5} {:>12} {:>14.4} {:>10.3} {:>10.2}\n",
                result.run,
                result.seed,
                result.length,
                result.time,
                result.acceptance_rate * 100.0
            ));
        }

        report.push_str("-".repeat(55).as_str());
        report.push('\n');

        match self.compute_statistics() {
            Some(stats) => {
                report.push_str(&format!("Best:    {:.4} (seed {})\n", stats.best_length, stats.best_seed));
                report.push_str(&format!("Worst:   {:.4}\n", stats.worst_length));
                report.push_str(&format!("Mean:    {:.4} +/- {:.4}\n", stats.mean_length, stats.std_length));
                report.push_str(&format!("Avg time: {:.3}s (total {:.3}s)\n", stats.avg_time, stats.total_time));
            }
            None => report.push_str("No runs recorded.\n"),
        }

        report
    }

    /// Get all results
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }
}
