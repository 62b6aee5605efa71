// src/utils/mod.rs - Shared helpers

pub mod rng;
