//! TSP Annealer - Command Line Interface
//!
//! Solves a Traveling Salesman instance given as a distance matrix file
//! and/or a coordinate file.

use clap::{Args, Parser, Subcommand, ValueEnum};
use tsp_anneal::benchmark::{Benchmark, BenchmarkConfig};
use tsp_anneal::heuristics::annealing::{AnnealingConfig, SimulatedAnnealing};
use tsp_anneal::heuristics::construction::{ConstructionHeuristic, NearestNeighborHeuristic};
use tsp_anneal::heuristics::random::seeded_rng;
use tsp_anneal::instance::TspInstance;
use tsp_anneal::solution::Solution;
use tsp_anneal::visualization::Visualizer;

use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "tsp-anneal")]
#[command(version = "1.0")]
#[command(about = "Simulated annealing solver for the Traveling Salesman Problem")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct InstanceArgs {
    /// Distance matrix file, one whitespace-separated row per line
    #[arg(short, long)]
    distances: Option<PathBuf>,

    /// Coordinate file, one `x y` pair per line
    #[arg(short, long)]
    coords: Option<PathBuf>,
}

#[derive(Args, Clone)]
struct AnnealingArgs {
    /// Starting temperature
    #[arg(long, default_value = "10000.0")]
    initial_temperature: f64,

    /// Multiplicative cooling factor in (0, 1)
    #[arg(long, default_value = "0.99")]
    cooling_rate: f64,

    /// Proposals evaluated at each temperature
    #[arg(short, long, default_value = "15000")]
    iterations: usize,

    /// Stop once the temperature drops to this value
    #[arg(long, default_value = "1.0")]
    min_temperature: f64,

    /// Use the O(1) reversal delta (symmetric matrices only)
    #[arg(long)]
    incremental: bool,
}

impl AnnealingArgs {
    fn to_config(&self) -> AnnealingConfig {
        AnnealingConfig::default()
            .with_initial_temperature(self.initial_temperature)
            .with_cooling_rate(self.cooling_rate)
            .with_iterations_per_temperature(self.iterations)
            .with_min_temperature(self.min_temperature)
            .with_incremental(self.incremental)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an instance
    Solve {
        #[command(flatten)]
        instance: InstanceArgs,

        /// Algorithm to use
        #[arg(short, long, value_enum, default_value = "sa")]
        algorithm: Algorithm,

        #[command(flatten)]
        annealing: AnnealingArgs,

        /// Random seed (drawn from the OS when omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output solution to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write an SVG drawing of the tour (needs coordinates)
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run the annealer several times with consecutive seeds
    Benchmark {
        #[command(flatten)]
        instance: InstanceArgs,

        #[command(flatten)]
        annealing: AnnealingArgs,

        /// Number of runs
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Seed of the first run
        #[arg(long, default_value = "0")]
        base_seed: u64,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },

    /// Analyze an instance
    Analyze {
        #[command(flatten)]
        instance: InstanceArgs,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Algorithm {
    /// Simulated Annealing
    Sa,
    /// Nearest Neighbor construction
    Nn,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { instance, algorithm, annealing, seed, output, svg, verbose } => {
            solve_instance(&instance, algorithm, &annealing, seed, output, svg, verbose);
        }

        Commands::Benchmark { instance, annealing, runs, base_seed, output } => {
            run_benchmark(&instance, &annealing, runs, base_seed, &output);
        }

        Commands::Analyze { instance } => {
            analyze_instance(&instance);
        }
    }
}

fn load_instance(args: &InstanceArgs) -> TspInstance {
    match TspInstance::from_files(args.distances.as_deref(), args.coords.as_deref()) {
        Ok(inst) => inst,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    }
}

fn solve_instance(
    args: &InstanceArgs,
    algorithm: Algorithm,
    annealing: &AnnealingArgs,
    seed: Option<u64>,
    output: Option<PathBuf>,
    svg: Option<PathBuf>,
    verbose: bool,
) {
    let instance = load_instance(args);

    if verbose {
        println!("{}", instance.statistics());
    }

    println!("Solving {} (n={}) with {:?}...", instance.name, instance.dimension, algorithm);
    let start = Instant::now();

    let result = match algorithm {
        Algorithm::Sa => {
            let mut config = annealing.to_config();
            config.seed = seed;
            let sa = SimulatedAnnealing::with_config(config);
            let (mut rng, used_seed) = seeded_rng(seed);

            sa.run(&instance, &mut rng).map(|outcome| {
                if verbose {
                    println!("Temperature levels: {}", outcome.temperature_steps);
                    println!("Final temperature: {:.4}", outcome.final_temperature);
                    println!(
                        "Accepted moves: {} ({:.2}%), improving: {}",
                        outcome.accepted_moves,
                        outcome.acceptance_rate() * 100.0,
                        outcome.improving_moves
                    );
                }
                outcome.into_solution(Some(used_seed), start.elapsed().as_secs_f64())
            })
        }

        Algorithm::Nn => NearestNeighborHeuristic::new().construct(&instance),
    };

    let solution = match result {
        Ok(sol) => sol,
        Err(e) => {
            eprintln!("Solver error: {}", e);
            std::process::exit(1);
        }
    };

    let elapsed = start.elapsed();

    println!("\n========== Results ==========");
    println!("Algorithm: {}", solution.algorithm);
    println!("Best route: {:?}", solution.tour);
    println!("Length of the best route: {:.4}", solution.cost);
    if let Some(used_seed) = solution.seed {
        println!("Seed: {}", used_seed);
    }
    if let Some(iter) = solution.iterations {
        println!("Iterations: {}", iter);
    }
    println!("Execution time: {:.4}s ({} ms)", elapsed.as_secs_f64(), elapsed.as_millis());

    if let Some(out_path) = output {
        write_solution(&solution, &out_path);
    }

    if let Some(svg_path) = svg {
        match Visualizer::new().render_to_file(&instance, &solution, &svg_path) {
            Ok(()) => println!("Visualization saved to {:?}", svg_path),
            Err(e) => {
                eprintln!("Cannot draw tour: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn write_solution(solution: &Solution, path: &PathBuf) {
    let written = serde_json::to_string_pretty(solution)
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));

    match written {
        Ok(()) => println!("\nSolution saved to {:?}", path),
        Err(e) => {
            eprintln!("Failed to write solution: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_benchmark(
    args: &InstanceArgs,
    annealing: &AnnealingArgs,
    runs: usize,
    base_seed: u64,
    output: &PathBuf,
) {
    let instance = load_instance(args);

    println!("Benchmarking {} (n={}) over {} runs...", instance.name, instance.dimension, runs);

    if let Err(e) = std::fs::create_dir_all(output) {
        eprintln!("Failed to create output directory: {}", e);
        std::process::exit(1);
    }

    let config = BenchmarkConfig {
        num_runs: runs,
        base_seed,
        annealing: annealing.to_config(),
        show_progress: true,
    };

    let mut benchmark = Benchmark::new(config);
    if let Err(e) = benchmark.run(&instance) {
        eprintln!("Benchmark failed: {}", e);
        std::process::exit(1);
    }

    let results_path = output.join("results.csv");
    match benchmark.export_to_csv(&results_path) {
        Ok(()) => println!("Results exported to {:?}", results_path),
        Err(e) => eprintln!("Failed to export results: {}", e),
    }

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    match std::fs::write(&report_path, &report) {
        Ok(()) => println!("Report saved to {:?}", report_path),
        Err(e) => eprintln!("Failed to save report: {}", e),
    }
}

fn analyze_instance(args: &InstanceArgs) {
    let instance = load_instance(args);

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());

    match NearestNeighborHeuristic::new().construct(&instance) {
        Ok(nn_sol) => {
            println!("Quick Solution Estimate:");
            println!("  Nearest Neighbor: {:.2}", nn_sol.cost);
        }
        Err(e) => eprintln!("Nearest neighbor failed: {}", e),
    }
}
