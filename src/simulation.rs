// src/simulation.rs - Drives one Monte Carlo run
//
// Initialise the lattice, sweep it `N` times, accumulate per-sweep energy
// and magnetization, and derive the thermodynamic averages.
//
// Sweeps run strictly in order on a lattice owned by the run. Snapshots and
// progress go out through a `RunObserver` and never feed back into the
// chain.

use log::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::energy::{total_energy, total_magnetization};
use crate::error::Result;
use crate::lattice::Lattice;
use crate::metropolis::MetropolisSampler;

/// Running sums of per-site energy and magnetization, one push per sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStatistics {
    n: u64,
    sum_e: f64,
    sum_e2: f64,
    sum_m: f64,
}

impl RunningStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulators with known contents.
    pub fn from_sums(n: u64, sum_e: f64, sum_e2: f64, sum_m: f64) -> Self {
        Self { n, sum_e, sum_e2, sum_m }
    }

    pub fn push(&mut self, energy: f64, magnetization: f64) {
        self.n += 1;
        self.sum_e += energy;
        self.sum_e2 += energy * energy;
        self.sum_m += magnetization;
    }

    pub fn count(&self) -> u64 {
        self.n
    }

    pub fn sum_energy(&self) -> f64 {
        self.sum_e
    }

    pub fn sum_energy_sq(&self) -> f64 {
        self.sum_e2
    }

    pub fn sum_magnetization(&self) -> f64 {
        self.sum_m
    }

    /// ΣE / N
    pub fn mean_energy(&self) -> f64 {
        self.sum_e / self.n as f64
    }

    /// ΣM / N
    pub fn mean_magnetization(&self) -> f64 {
        self.sum_m / self.n as f64
    }

    /// (ΣE²/N - (ΣE/N)²) / T²
    pub fn heat_capacity(&self, temperature: f64) -> f64 {
        let n = self.n as f64;
        let mean_e = self.sum_e / n;
        (self.sum_e2 / n - mean_e * mean_e) / (temperature * temperature)
    }

    /// Final averages at `temperature`. Requires at least one push.
    pub fn finish(&self, temperature: f64) -> ResultRecord {
        ResultRecord {
            temperature,
            energy: self.mean_energy(),
            magnetization: self.mean_magnetization(),
            heat_capacity: self.heat_capacity(temperature),
        }
    }
}

/// Thermodynamic estimates of a completed run, all per site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultRecord {
    pub temperature: f64,
    pub energy: f64,
    pub magnetization: f64,
    pub heat_capacity: f64,
}

/// Copy of the lattice taken after sweep `sweep`, spins encoded as
/// 1 for +1 and 0 for -1, row-major. Only built by [`SnapshotRecord::capture`],
/// so `spins` always holds `size²` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    sweep: usize,
    size: usize,
    spins: Vec<u8>,
}

impl SnapshotRecord {
    pub fn capture(sweep: usize, lattice: &Lattice) -> Self {
        let spins = lattice.spins().iter().map(|&s| u8::from(s == 1)).collect();
        Self { sweep, size: lattice.size(), spins }
    }

    #[inline(always)]
    pub fn sweep(&self) -> usize {
        self.sweep
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Encoded spins, row-major.
    pub fn spins(&self) -> &[u8] {
        &self.spins
    }

    /// Encoded spin at row `i`, column `j`.
    pub fn spin01(&self, i: usize, j: usize) -> u8 {
        self.spins[i * self.size + j]
    }

    /// Decode back into a lattice.
    pub fn to_lattice(&self) -> Option<Lattice> {
        let spins = self
            .spins
            .iter()
            .map(|&b| match b {
                1 => 1,
                0 => -1,
                _ => 0,
            })
            .collect();
        Lattice::from_spins(self.size, spins)
    }
}

/// Side channel for the outputs of a run that are not part of the result.
pub trait RunObserver {
    /// Called with a fresh copy of the lattice every `save_freq` sweeps when
    /// snapshots are enabled. An error aborts the run.
    fn on_snapshot(&mut self, snapshot: SnapshotRecord) -> Result<()>;

    /// Called every `N/10` sweeps (at least every sweep for `N < 10`).
    fn on_progress(&mut self, _sweep: usize, _total: usize) {}
}

/// Keeps every snapshot in memory.
#[derive(Debug, Default)]
pub struct SnapshotCollector {
    pub snapshots: Vec<SnapshotRecord>,
}

impl RunObserver for SnapshotCollector {
    fn on_snapshot(&mut self, snapshot: SnapshotRecord) -> Result<()> {
        self.snapshots.push(snapshot);
        Ok(())
    }
}

/// Discards snapshots and progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl RunObserver for NullObserver {
    fn on_snapshot(&mut self, _snapshot: SnapshotRecord) -> Result<()> {
        Ok(())
    }
}

/// Run `config` to completion, collecting snapshots in memory.
pub fn run(config: &SimulationConfig) -> Result<(ResultRecord, Vec<SnapshotRecord>)> {
    let mut collector = SnapshotCollector::default();
    let result = run_with(config, &mut collector)?;
    Ok((result, collector.snapshots))
}

/// Run `config` to completion, streaming snapshots and progress to `observer`.
pub fn run_with(config: &SimulationConfig, observer: &mut impl RunObserver) -> Result<ResultRecord> {
    config.validate()?;

    let SimulationConfig { temperature, field, moment, sweeps, save_freq, .. } = *config;

    let mut lattice = Lattice::initialize(config.size, config.seed);
    let mut sampler = MetropolisSampler::new(config.sweep_rng, config.seed);
    if !sampler.is_reproducible() {
        warn!("sweeps draw from OS entropy; this run cannot be reproduced from seed {}", config.seed);
    }

    let take_snapshots = config.snapshots_enabled();
    let progress_every = config.progress_interval();

    info!(
        "run start: T={temperature} B={field} mu={moment} L={} sweeps={sweeps} seed={} snapshots={take_snapshots}",
        config.size, config.seed,
    );

    let mut stats = RunningStatistics::new();
    let mut accepted = 0u64;

    for t in 0..sweeps {
        let info = sampler.sweep(&mut lattice, temperature, field, moment);
        accepted += info.accepted as u64;

        let e = total_energy(&lattice, field, moment);
        let m = total_magnetization(&lattice);
        stats.push(e, m);

        if take_snapshots && t % save_freq == 0 {
            debug!("snapshot at sweep {t}");
            observer.on_snapshot(SnapshotRecord::capture(t, &lattice))?;
        }

        if t % progress_every == 0 {
            observer.on_progress(t, sweeps);
        }
    }

    let result = stats.finish(temperature);
    let acceptance = accepted as f64 / (sweeps as f64 * lattice.n_sites() as f64);
    info!(
        "run done: T={temperature} E={:.6} M={:.6} C={:.6} acceptance={acceptance:.4}",
        result.energy, result.magnetization, result.heat_capacity,
    );
    Ok(result)
}
