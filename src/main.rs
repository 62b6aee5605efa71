// src/main.rs - Single 2D Ising run at one (temperature, seed, field) triple
//
// Writes `thermodynamic_results_T<T>_B<B>.txt` and, for snapshot
// temperatures, one `T<T>/lattice_step<t>.txt` file per captured sweep.

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::Parser;
use ising2d::config::{
    DEFAULT_MOMENT, DEFAULT_SAVE_FREQ, DEFAULT_SIZE, DEFAULT_SNAPSHOT_TEMPERATURES, DEFAULT_SWEEPS,
};
use ising2d::output::{results_file_name, snapshot_dir_name, write_results, SnapshotWriter};
use ising2d::simulation::{run_with, RunObserver, SnapshotRecord};
use ising2d::{Error, Result, SimulationConfig, SnapshotPolicy, SweepRng};

#[derive(Parser, Debug)]
#[command(name = "ising2d", about = "Metropolis Monte Carlo for the 2D Ising model")]
struct Cli {
    /// Temperature, must be positive
    #[arg(allow_negative_numbers = true)]
    temperature: f64,

    /// Seed for the initial lattice (and the sweeps, unless --entropy-sweeps)
    seed: u64,

    /// External magnetic field, between 0 and 10
    #[arg(allow_negative_numbers = true)]
    field: f64,

    /// Lattice side length L
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Number of Monte Carlo sweeps
    #[arg(long, default_value_t = DEFAULT_SWEEPS)]
    sweeps: usize,

    /// Magnetic moment of each spin
    #[arg(long, default_value_t = DEFAULT_MOMENT)]
    moment: f64,

    /// Sweeps between lattice snapshots
    #[arg(long, default_value_t = DEFAULT_SAVE_FREQ)]
    save_freq: usize,

    /// Temperatures that get lattice snapshots
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SNAPSHOT_TEMPERATURES)]
    snapshot_temps: Vec<f64>,

    /// Never write lattice snapshots
    #[arg(long)]
    no_snapshots: bool,

    /// Reseed the sweep RNG from the OS every sweep (not reproducible)
    #[arg(long)]
    entropy_sweeps: bool,

    /// Directory for the result file and snapshot directories
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

impl Cli {
    fn config(&self) -> SimulationConfig {
        let snapshots = if self.no_snapshots {
            SnapshotPolicy::none()
        } else {
            SnapshotPolicy::new(self.snapshot_temps.clone())
        };
        let sweep_rng = if self.entropy_sweeps { SweepRng::Entropy } else { SweepRng::Seeded };

        SimulationConfig::new(self.temperature, self.seed, self.field)
            .with_size(self.size)
            .with_sweeps(self.sweeps)
            .with_moment(self.moment)
            .with_save_freq(self.save_freq)
            .with_snapshots(snapshots)
            .with_sweep_rng(sweep_rng)
    }
}

/// Prints progress lines and forwards snapshots to disk when enabled.
struct CliObserver {
    temperature: f64,
    snapshots: Option<SnapshotWriter>,
}

impl RunObserver for CliObserver {
    fn on_snapshot(&mut self, snapshot: SnapshotRecord) -> Result<()> {
        match self.snapshots.as_mut() {
            Some(writer) => writer.on_snapshot(snapshot),
            None => Ok(()),
        }
    }

    fn on_progress(&mut self, sweep: usize, total: usize) {
        println!("T: {}  Progress: {}%", self.temperature, 100 * sweep / total);
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let config = cli.config();
    config.validate()?;

    let start = Instant::now();

    std::fs::create_dir_all(&cli.output_dir).map_err(|e| Error::Io {
        path: cli.output_dir.clone(),
        source: e,
    })?;

    let snapshots = if config.snapshots_enabled() {
        Some(SnapshotWriter::create(cli.output_dir.join(snapshot_dir_name(config.temperature)))?)
    } else {
        None
    };
    let mut observer = CliObserver { temperature: config.temperature, snapshots };

    println!(
        "Simulating for T = {} with seed = {} and B = {}",
        config.temperature, config.seed, config.field
    );
    let result = run_with(&config, &mut observer)?;

    let path = cli.output_dir.join(results_file_name(config.temperature, config.field));
    write_results(&path, &[result])?;

    println!("Simulation completed in {} seconds.", start.elapsed().as_secs_f64());
    println!("Results written to {}", path.display());
    if let Some(writer) = &observer.snapshots {
        println!("{} snapshots written to {}", writer.written(), writer.dir().display());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprint!("{e}");
            process::exit(1);
        }
    };

    if let Err(e) = execute(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
