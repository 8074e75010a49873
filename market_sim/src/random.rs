//! Pluggable sources of uniform random numbers.
//!
//! The generator and the live updater never call a global RNG; they draw from a
//! [`RandomSource`] handed to them, so tests can pin every draw.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// A source of uniform samples in `[0, 1)`.
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// `StdRng`-backed source, seeded explicitly or from the OS.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded when `seed` is given, OS-seeded otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_os, Self::new)
    }
}

impl RandomSource for SeededSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Returns the same value on every draw.
#[derive(Debug, Clone, Copy)]
pub struct FixedSource(pub f64);

impl RandomSource for FixedSource {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// Cycles through a fixed script of values.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    pos: usize,
}

impl SequenceSource {
    /// # Panics
    /// Panics if `values` is empty.
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "SequenceSource needs at least one value");
        Self { values, pos: 0 }
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        let v = self.values[self.pos];
        self.pos = (self.pos + 1) % self.values.len();
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sources_repeat() {
        let mut a = SeededSource::new(7);
        let mut b = SeededSource::new(7);
        for _ in 0..16 {
            let x = a.next_unit();
            assert_eq!(x, b.next_unit());
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn sequence_wraps() {
        let mut s = SequenceSource::new(vec![0.1, 0.9]);
        let drawn: Vec<f64> = (0..5).map(|_| s.next_unit()).collect();
        assert_eq!(drawn, vec![0.1, 0.9, 0.1, 0.9, 0.1]);
    }

    #[test]
    fn boxed_source_delegates() {
        let mut boxed: Box<dyn RandomSource> = Box::new(FixedSource(0.25));
        assert_eq!(boxed.next_unit(), 0.25);
    }
}
