//! Random sources for draws.
//!
//! Production draws seed a ChaCha-based `StdRng` from the platform entropy
//! source once per widget; tests inject fixed or seeded sources so outcomes
//! can be asserted.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform random draws consumed by the draw engines.
pub trait RandomSource {
    /// Uniform index over `[0, len)`. `len` is always non-zero.
    fn next_index(&mut self, len: usize) -> usize;
    /// Uniform float over `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

pub struct DrawRng {
    inner: StdRng,
}

impl DrawRng {
    /// Seeds from the browser (or OS) entropy source.
    pub fn from_entropy() -> Result<Self, String> {
        let mut seed = [0u8; 32];
        getrandom::fill(&mut seed).map_err(|err| format!("entropy unavailable: {err}"))?;
        Ok(Self {
            inner: StdRng::from_seed(seed),
        })
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for DrawRng {
    fn next_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    fn next_unit(&mut self) -> f64 {
        self.inner.gen_range(0.0..1.0)
    }
}

/// Replays a fixed list of indices and unit values, cycling when exhausted.
#[cfg(test)]
pub(crate) struct ScriptedRandom {
    indices: Vec<usize>,
    units: Vec<f64>,
    index_pos: usize,
    unit_pos: usize,
}

#[cfg(test)]
impl ScriptedRandom {
    pub(crate) fn new(indices: Vec<usize>, units: Vec<f64>) -> Self {
        Self {
            indices,
            units,
            index_pos: 0,
            unit_pos: 0,
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn next_index(&mut self, len: usize) -> usize {
        let value = self.indices[self.index_pos % self.indices.len()];
        self.index_pos += 1;
        value % len
    }

    fn next_unit(&mut self) -> f64 {
        let value = self.units[self.unit_pos % self.units.len()];
        self.unit_pos += 1;
        value
    }
}
