// src/energy.rs - Energy and magnetization of a lattice configuration
//
// Conventions (kept exactly, downstream magnitudes depend on them):
// * the interaction term `-2 s Σ_nn s'` is summed over every site, so each
//   bond is counted twice with no compensating 1/2;
// * magnetization is reported as |Σ s| / L², discarding the global sign.

use crate::lattice::Lattice;

/// Energy per site:
/// `[Σ_sites -2 s (Σ 4 neighbours) - μ B Σ s] / L²`.
pub fn total_energy(lattice: &Lattice, field: f64, moment: f64) -> f64 {
    let l = lattice.size();
    let mut interaction = 0i64;
    for i in 0..l {
        for j in 0..l {
            let s = lattice.spin(i, j) as i64;
            interaction += -2 * s * lattice.neighbor_sum(i, j) as i64;
        }
    }
    let e = interaction as f64 - moment * field * lattice.spin_sum() as f64;
    e / lattice.n_sites() as f64
}

/// Absolute magnetization per site, always in [0, 1].
pub fn total_magnetization(lattice: &Lattice) -> f64 {
    lattice.spin_sum().abs() as f64 / lattice.n_sites() as f64
}

/// Cost of flipping (i, j) alone: `2 s (Σ 4 neighbours) + 2 μ B s`.
///
/// O(1): only the four neighbours are read.
#[inline(always)]
pub fn flip_energy_delta(lattice: &Lattice, i: usize, j: usize, field: f64, moment: f64) -> f64 {
    let s = lattice.spin(i, j) as f64;
    let neighbors = lattice.neighbor_sum(i, j) as f64;
    2.0 * s * neighbors + 2.0 * moment * field * s
}
