// src/lib.rs - 2D Ising model Metropolis Monte Carlo

pub mod lattice;
pub mod energy;
pub mod metropolis;
pub mod simulation;
pub mod config;
pub mod error;
pub mod output;
pub mod analysis;
pub mod utils;

pub use config::{SimulationConfig, SnapshotPolicy};
pub use error::{ConfigError, Error, Result};
pub use lattice::Lattice;
pub use metropolis::{MetropolisSampler, SweepRng};
pub use simulation::{run, run_with, ResultRecord, RunningStatistics, SnapshotRecord};
