// src/lattice.rs - Square lattice of Ising spins with periodic boundaries

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// The four nearest-neighbour directions on the square lattice.
///
/// `Up`/`Down` move along rows, `Left`/`Right` along columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
}

/// An L×L grid of spins, each exactly +1 or -1, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    size: usize,
    spins: Vec<i8>,
}

impl Lattice {
    /// Random 50/50 configuration, fully determined by `(size, seed)`.
    pub fn initialize(size: usize, seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        Self::random_with(&mut rng, size)
    }

    /// Random 50/50 configuration drawn from a caller-supplied RNG.
    pub fn random_with(rng: &mut impl Rng, size: usize) -> Self {
        let spins = (0..size * size)
            .map(|_| if rng.gen_bool(0.5) { 1 } else { -1 })
            .collect();
        Self { size, spins }
    }

    /// Every site set to `spin`.
    pub fn uniform(size: usize, spin: i8) -> Self {
        debug_assert!(spin == 1 || spin == -1);
        Self { size, spins: vec![spin; size * size] }
    }

    /// Build from row-major spins. Returns `None` unless there are exactly
    /// `size²` values, all ±1.
    pub fn from_spins(size: usize, spins: Vec<i8>) -> Option<Self> {
        if spins.len() != size * size || spins.iter().any(|&s| s != 1 && s != -1) {
            return None;
        }
        Some(Self { size, spins })
    }

    /// Side length L.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of sites, L².
    #[inline(always)]
    pub fn n_sites(&self) -> usize {
        self.spins.len()
    }

    #[inline(always)]
    pub fn spin(&self, i: usize, j: usize) -> i8 {
        self.spins[i * self.size + j]
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, spin: i8) {
        debug_assert!(spin == 1 || spin == -1);
        self.spins[i * self.size + j] = spin;
    }

    /// Reverse the spin at (i, j).
    #[inline(always)]
    pub fn flip(&mut self, i: usize, j: usize) {
        let idx = i * self.size + j;
        self.spins[idx] = -self.spins[idx];
    }

    /// Coordinates of the neighbour of (i, j) in `dir`, wrapping as a torus:
    /// `(index ± 1 + L) mod L`.
    #[inline(always)]
    pub fn neighbor(&self, i: usize, j: usize, dir: Direction) -> (usize, usize) {
        let l = self.size;
        match dir {
            Direction::Up => ((i + l - 1) % l, j),
            Direction::Down => ((i + 1) % l, j),
            Direction::Left => (i, (j + l - 1) % l),
            Direction::Right => (i, (j + 1) % l),
        }
    }

    /// Sum of the four periodic neighbour spins of (i, j).
    #[inline(always)]
    pub fn neighbor_sum(&self, i: usize, j: usize) -> i32 {
        Direction::ALL
            .iter()
            .map(|&d| {
                let (ni, nj) = self.neighbor(i, j, d);
                self.spin(ni, nj) as i32
            })
            .sum()
    }

    /// Σ s over all sites.
    pub fn spin_sum(&self) -> i64 {
        self.spins.iter().map(|&s| s as i64).sum()
    }

    /// Row-major view of the spins.
    pub fn spins(&self) -> &[i8] {
        &self.spins
    }
}
