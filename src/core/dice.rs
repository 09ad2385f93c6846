//! Random source used by every probabilistic decision in the game.
//!
//! Generation, combat and chests never touch a global RNG; they take a
//! `&mut impl Dice` so tests can swap in [`ScriptedDice`].

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

/// Uniform random source.
///
/// Implementors supply the two primitive draws; the composite operations
/// are built on top of them.
pub trait Dice {
    /// Uniform float in `[0, 1)`.
    fn roll_f64(&mut self) -> f64;

    /// Uniform integer in `[lo, hi]`. Returns `lo` when `hi < lo`.
    fn roll_range(&mut self, lo: i32, hi: i32) -> i32;

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.roll_f64() < p
    }

    /// Weighted pick over `weights`.
    ///
    /// Draws a value in `[0, total)` and returns the first index whose
    /// cumulative weight reaches it. The last index is the fallback for
    /// floating-point drift. `None` only for an empty slice.
    fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        if weights.is_empty() {
            return None;
        }
        let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
        let draw = self.roll_f64() * total;
        let mut upto = 0.0;
        for (i, w) in weights.iter().enumerate() {
            upto += w.max(0.0);
            if upto >= draw {
                return Some(i);
            }
        }
        Some(weights.len() - 1)
    }

    /// In-place Fisher-Yates shuffle.
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.roll_range(0, i as i32) as usize;
            items.swap(i, j);
        }
    }

    /// `k` distinct indices out of `0..len`, without replacement.
    fn sample_indices(&mut self, len: usize, k: usize) -> Vec<usize>
    where
        Self: Sized,
    {
        let mut pool: Vec<usize> = (0..len).collect();
        self.shuffle(&mut pool);
        pool.truncate(k.min(len));
        pool
    }
}

/// Adapter from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandDice<R: Rng> {
    rng: R,
}

impl<R: Rng> RandDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandDice<rand::rngs::ThreadRng> {
    pub fn thread() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> Dice for RandDice<R> {
    fn roll_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn roll_range(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    fn sample_indices(&mut self, len: usize, k: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.rng, len, k.min(len)).into_vec()
    }
}

/// Deterministic dice that replay queued draws.
///
/// Floats and integers have separate queues. Once a queue runs dry the
/// fallback is used: `float_fallback` for floats, the low bound for
/// integers. Queued integers are clamped into the requested range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    floats: VecDeque<f64>,
    ints: VecDeque<i32>,
    float_fallback: f64,
}

impl ScriptedDice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every float draw returns `value` once the queue is empty.
    pub fn with_float_fallback(mut self, value: f64) -> Self {
        self.float_fallback = value;
        self
    }

    pub fn with_floats(mut self, values: &[f64]) -> Self {
        self.floats.extend(values.iter().copied());
        self
    }

    pub fn with_ints(mut self, values: &[i32]) -> Self {
        self.ints.extend(values.iter().copied());
        self
    }
}

impl Dice for ScriptedDice {
    fn roll_f64(&mut self) -> f64 {
        self.floats.pop_front().unwrap_or(self.float_fallback)
    }

    fn roll_range(&mut self, lo: i32, hi: i32) -> i32 {
        match self.ints.pop_front() {
            Some(v) if hi >= lo => v.clamp(lo, hi),
            _ => lo,
        }
    }
}
