//! Injectable randomness for scene generation.
//!
//! The generator consumes plain unit samples in `[0, 1)`, one per decision,
//! so a test can script every coin flip and jitter exactly.

use std::collections::VecDeque;

use rand::rngs::{StdRng, ThreadRng};
use rand::Rng;

/// A source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize {
        let idx = (self.next_unit() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }

    /// Uniform value in `min..max`.
    fn between(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_unit() * (max - min)
    }
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

impl RandomSource for ThreadRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Replays a fixed sequence of samples, then repeats the last one.
///
/// Values are clamped into `[0, 1)`. An empty script yields `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    queue: VecDeque<f64>,
    last: f64,
    drawn: usize,
}

impl ScriptedRandom {
    pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
        Self {
            queue: samples.into_iter().map(clamp_unit).collect(),
            last: 0.0,
            drawn: 0,
        }
    }

    /// Append more samples to the script.
    pub fn extend(&mut self, samples: impl IntoIterator<Item = f64>) {
        self.queue.extend(samples.into_iter().map(clamp_unit));
    }

    /// Number of samples consumed so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    /// Samples left before the script starts repeating.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        self.drawn += 1;
        if let Some(v) = self.queue.pop_front() {
            self.last = v;
        }
        self.last
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
