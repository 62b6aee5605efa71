// src/bin/temperature_scan.rs - Independent runs over a temperature grid
//
// Every (T, seed) task owns its lattice and statistics; tasks run in
// parallel and are averaged over seeds per temperature.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ising2d::analysis::{onsager_magnetization, CRITICAL_TEMPERATURE};
use ising2d::config::{DEFAULT_MOMENT, DEFAULT_SIZE};
use ising2d::output::write_results;
use ising2d::simulation::{run_with, NullObserver};
use ising2d::utils::rng::stream_seed;
use ising2d::{ResultRecord, Result, SimulationConfig, SnapshotPolicy};
use rayon::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "temperature_scan", about = "Scan the 2D Ising model over temperature")]
struct Cli {
    /// Lowest temperature
    #[arg(long, default_value_t = 1.0)]
    t_min: f64,

    /// Highest temperature
    #[arg(long, default_value_t = 4.0)]
    t_max: f64,

    /// Number of temperatures on the grid (inclusive of both ends)
    #[arg(long, default_value_t = 31)]
    points: usize,

    /// External magnetic field
    #[arg(long, default_value_t = 0.0)]
    field: f64,

    /// Master seed; each task derives its own
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Independent runs per temperature
    #[arg(long, short, default_value_t = 1)]
    replicas: usize,

    /// Lattice side length L
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Sweeps per run
    #[arg(long, default_value_t = 20_000)]
    sweeps: usize,

    /// Magnetic moment of each spin
    #[arg(long, default_value_t = DEFAULT_MOMENT)]
    moment: f64,

    #[arg(long, default_value = "results.txt")]
    output: PathBuf,
}

fn temperature_grid(t_min: f64, t_max: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![t_min],
        _ => {
            let step = (t_max - t_min) / (points - 1) as f64;
            (0..points).map(|k| t_min + step * k as f64).collect()
        }
    }
}

/// Average replicas of the same temperature field by field.
fn average(temperature: f64, runs: &[ResultRecord]) -> ResultRecord {
    let n = runs.len() as f64;
    ResultRecord {
        temperature,
        energy: runs.iter().map(|r| r.energy).sum::<f64>() / n,
        magnetization: runs.iter().map(|r| r.magnetization).sum::<f64>() / n,
        heat_capacity: runs.iter().map(|r| r.heat_capacity).sum::<f64>() / n,
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let temps = temperature_grid(cli.t_min, cli.t_max, cli.points);
    let replicas = cli.replicas.max(1);

    let configs: Vec<(usize, SimulationConfig)> = temps
        .iter()
        .enumerate()
        .flat_map(move |(t_idx, &t)| {
            (0..replicas).map(move |rep| {
                let seed = stream_seed(cli.seed, ((t_idx as u64) << 20) | rep as u64);
                let cfg = SimulationConfig::new(t, seed, cli.field)
                    .with_size(cli.size)
                    .with_sweeps(cli.sweeps)
                    .with_moment(cli.moment)
                    .with_snapshots(SnapshotPolicy::none());
                (t_idx, cfg)
            })
        })
        .collect();

    // Reject bad parameters before any thread starts.
    for (_, cfg) in &configs {
        cfg.validate()?;
    }

    println!(
        "Scanning {} temperatures x {} replicas, L={}, {} sweeps each",
        temps.len(),
        replicas,
        cli.size,
        cli.sweeps
    );

    let bar = ProgressBar::new(configs.len() as u64);
    bar.set_style(
        ProgressStyle::with_template(" {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let runs: Vec<(usize, ResultRecord)> = configs
        .par_iter()
        .map(|(t_idx, cfg)| -> Result<(usize, ResultRecord)> {
            let result = run_with(cfg, &mut NullObserver)?;
            bar.inc(1);
            Ok((*t_idx, result))
        })
        .collect::<Result<_>>()?;
    bar.finish();

    let mut rows: Vec<ResultRecord> = temps
        .iter()
        .enumerate()
        .map(|(t_idx, &t)| {
            let group: Vec<ResultRecord> = runs
                .iter()
                .filter(|(idx, _)| *idx == t_idx)
                .map(|(_, r)| *r)
                .collect();
            average(t, &group)
        })
        .collect();
    rows.sort_by(|a, b| a.temperature.total_cmp(&b.temperature));

    write_results(&cli.output, &rows)?;

    println!("{:>8} {:>12} {:>12} {:>12} {:>12}", "T", "E", "|M|", "Onsager", "C");
    for r in &rows {
        println!(
            "{:>8.4} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
            r.temperature,
            r.energy,
            r.magnetization,
            onsager_magnetization(r.temperature),
            r.heat_capacity
        );
    }
    if let Some(peak) = rows.iter().max_by(|a, b| a.heat_capacity.total_cmp(&b.heat_capacity)) {
        println!(
            "Heat capacity peak at T = {:.4} (exact T_c = {:.4})",
            peak.temperature, CRITICAL_TEMPERATURE
        );
    }
    println!("Scan complete → {}", cli.output.display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = execute(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
