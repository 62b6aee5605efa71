//! Metropolis acceptance rule and sweep mechanics.

use ising2d::energy::total_magnetization;
use ising2d::lattice::Lattice;
use ising2d::metropolis::{accept_flip, sweep_with, MetropolisSampler, SweepRng};

use rand::rngs::mock::StepRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_pcg::Pcg64;

#[test]
fn test_non_positive_delta_always_accepts() {
    let almost_one = 1.0 - f64::EPSILON;
    assert!(accept_flip(-8.0, 2.0, almost_one));
    assert!(accept_flip(0.0, 2.0, almost_one));
    assert!(accept_flip(0.0, 1e-12, almost_one));
}

#[test]
fn test_positive_delta_threshold() {
    let p = (-4.0f64 / 2.0).exp();
    assert!(accept_flip(4.0, 2.0, p * 0.999));
    assert!(!accept_flip(4.0, 2.0, p * 1.001));
    assert!(!accept_flip(4.0, 2.0, 1.0 - f64::EPSILON));
}

/// A generator stuck at `u64::MAX` always proposes site (3, 3) on a 4×4
/// lattice and its uniform draw is just below 1, which rejects every
/// energy-raising flip.
#[test]
fn test_downhill_flip_accepted_with_rejecting_source() {
    let mut rng = StepRng::new(u64::MAX, 0);
    let mut lattice = Lattice::uniform(4, 1);
    lattice.set(3, 3, -1);

    let info = sweep_with(&mut rng, &mut lattice, 2.0, 0.0, 1.0);

    // First attempt goes downhill (-8) and flips; the remaining 15 would
    // cost +8 and are rejected.
    assert_eq!(info.attempts, 16);
    assert_eq!(info.accepted, 1);
    assert_eq!(lattice, Lattice::uniform(4, 1));
}

#[test]
fn test_acceptance_rule_frequency() {
    let mut rng = Pcg64::seed_from_u64(0xDEADBEEF);
    let (delta, temperature) = (4.0f64, 2.0f64);
    let expected = (-delta / temperature).exp();

    let trials = 200_000;
    let accepted = (0..trials)
        .filter(|_| accept_flip(delta, temperature, rng.gen::<f64>()))
        .count();
    let freq = accepted as f64 / trials as f64;

    assert!(
        (freq - expected).abs() < 0.005,
        "acceptance frequency {freq:.4}, expected {expected:.4}"
    );
}

/// On a 1×1 torus every neighbour is the site itself, so each proposal costs
/// exactly 8 at B = 0 and the sampler's acceptance rate must be exp(-8/T).
#[test]
fn test_sampler_acceptance_frequency_single_site() {
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    let mut lattice = Lattice::uniform(1, 1);
    let temperature = 4.0;
    let expected = (-8.0f64 / temperature).exp();

    let sweeps = 100_000;
    let mut accepted = 0;
    for _ in 0..sweeps {
        accepted += sweep_with(&mut rng, &mut lattice, temperature, 0.0, 1.0).accepted;
    }
    let freq = accepted as f64 / sweeps as f64;

    assert!(
        (freq - expected).abs() < 0.006,
        "sampler acceptance {freq:.4}, expected {expected:.4}"
    );
}

#[test]
fn test_sweep_attempts_every_site_count() {
    let mut sampler = MetropolisSampler::seeded(1);
    let mut lattice = Lattice::initialize(7, 1);
    let info = sampler.sweep(&mut lattice, 2.5, 0.0, 1.0);
    assert_eq!(info.attempts, 49);
    assert!(info.accepted <= info.attempts);
    assert!((0.0..=1.0).contains(&info.acceptance_rate()));
    assert!(lattice.spins().iter().all(|&s| s == 1 || s == -1));
}

#[test]
fn test_seeded_sampler_is_reproducible() {
    let mut a = Lattice::initialize(16, 5);
    let mut b = a.clone();
    let mut sa = MetropolisSampler::new(SweepRng::Seeded, 5);
    let mut sb = MetropolisSampler::new(SweepRng::Seeded, 5);
    assert!(sa.is_reproducible());

    for _ in 0..20 {
        sa.sweep(&mut a, 2.3, 0.1, 1.0);
        sb.sweep(&mut b, 2.3, 0.1, 1.0);
    }
    assert_eq!(a, b);
}

#[test]
fn test_entropy_sampler_keeps_valid_spins() {
    let mut sampler = MetropolisSampler::new(SweepRng::Entropy, 0);
    assert!(!sampler.is_reproducible());

    let mut lattice = Lattice::initialize(10, 3);
    for _ in 0..10 {
        let info = sampler.sweep(&mut lattice, 3.0, 0.0, 1.0);
        assert_eq!(info.attempts, 100);
    }
    assert!(lattice.spins().iter().all(|&s| s == 1 || s == -1));
}

#[test]
fn test_ordered_state_survives_low_temperature() {
    let mut sampler = MetropolisSampler::seeded(11);
    let mut lattice = Lattice::uniform(20, 1);
    for _ in 0..50 {
        sampler.sweep(&mut lattice, 1.0, 0.0, 1.0);
    }
    let m = total_magnetization(&lattice);
    assert!(m > 0.95, "|M| = {m:.3} after 50 sweeps at T = 1");
}

#[test]
fn test_strong_field_aligns_spins() {
    let mut sampler = MetropolisSampler::seeded(3);
    let mut lattice = Lattice::uniform(12, -1);
    for _ in 0..100 {
        sampler.sweep(&mut lattice, 2.0, 10.0, 1.0);
    }
    // With B = 10 the field term dominates the neighbour term.
    let up = lattice.spins().iter().filter(|&&s| s == 1).count();
    assert!(up as f64 / lattice.n_sites() as f64 > 0.95);
}
