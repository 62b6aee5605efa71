// src/config.rs - Run configuration (single source of truth for one simulation)

use crate::error::ConfigError;
use crate::metropolis::SweepRng;

pub const DEFAULT_SIZE: usize = 40;
pub const DEFAULT_SWEEPS: usize = 300_000;
pub const DEFAULT_MOMENT: f64 = 1.0;
pub const DEFAULT_SAVE_FREQ: usize = 100;
pub const DEFAULT_SNAPSHOT_TEMPERATURES: [f64; 3] = [1.6, 2.3, 3.3];

/// Allowed external field, inclusive.
pub const FIELD_MIN: f64 = 0.0;
pub const FIELD_MAX: f64 = 10.0;

/// Decides which temperatures get lattice snapshots.
///
/// Temperatures are matched within `tolerance` rather than by `==`, so a
/// value parsed as `2.3` and one computed as `2.0 + 0.3` select the same runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotPolicy {
    pub temperatures: Vec<f64>,
    pub tolerance: f64,
}

impl SnapshotPolicy {
    pub fn new(temperatures: Vec<f64>) -> Self {
        Self { temperatures, tolerance: 1e-9 }
    }

    /// Never snapshot.
    pub fn none() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn enabled_for(&self, temperature: f64) -> bool {
        self.temperatures
            .iter()
            .any(|&t| (t - temperature).abs() <= self.tolerance)
    }
}

impl Default for SnapshotPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_TEMPERATURES.to_vec())
    }
}

/// Immutable parameters of one (temperature, seed, field) run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub temperature: f64,
    pub field: f64,
    pub moment: f64,
    pub size: usize,
    pub sweeps: usize,
    pub seed: u64,
    pub save_freq: usize,
    pub snapshots: SnapshotPolicy,
    pub sweep_rng: SweepRng,
}

impl SimulationConfig {
    /// Defaults for everything except the three per-run inputs.
    pub fn new(temperature: f64, seed: u64, field: f64) -> Self {
        Self {
            temperature,
            field,
            moment: DEFAULT_MOMENT,
            size: DEFAULT_SIZE,
            sweeps: DEFAULT_SWEEPS,
            seed,
            save_freq: DEFAULT_SAVE_FREQ,
            snapshots: SnapshotPolicy::default(),
            sweep_rng: SweepRng::default(),
        }
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_sweeps(mut self, sweeps: usize) -> Self {
        self.sweeps = sweeps;
        self
    }

    pub fn with_moment(mut self, moment: f64) -> Self {
        self.moment = moment;
        self
    }

    pub fn with_save_freq(mut self, save_freq: usize) -> Self {
        self.save_freq = save_freq;
        self
    }

    pub fn with_snapshots(mut self, snapshots: SnapshotPolicy) -> Self {
        self.snapshots = snapshots;
        self
    }

    pub fn with_sweep_rng(mut self, sweep_rng: SweepRng) -> Self {
        self.sweep_rng = sweep_rng;
        self
    }

    /// Whether this run emits lattice snapshots.
    pub fn snapshots_enabled(&self) -> bool {
        self.snapshots.enabled_for(self.temperature)
    }

    /// Sweeps between progress events, never zero.
    pub fn progress_interval(&self) -> usize {
        (self.sweeps / 10).max(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.temperature.is_finite() {
            return Err(ConfigError::NonFiniteTemperature(self.temperature));
        }
        if self.temperature <= 0.0 {
            return Err(ConfigError::NonPositiveTemperature(self.temperature));
        }
        // NaN fails the range check as well.
        if !(FIELD_MIN..=FIELD_MAX).contains(&self.field) {
            return Err(ConfigError::FieldOutOfRange {
                value: self.field,
                min: FIELD_MIN,
                max: FIELD_MAX,
            });
        }
        if !self.moment.is_finite() {
            return Err(ConfigError::NonFiniteMoment(self.moment));
        }
        if self.size == 0 {
            return Err(ConfigError::ZeroSize);
        }
        if self.sweeps == 0 {
            return Err(ConfigError::ZeroSweeps);
        }
        if self.save_freq == 0 {
            return Err(ConfigError::ZeroSaveFreq);
        }
        Ok(())
    }
}
