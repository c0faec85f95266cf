//! Randomness source injected into every entity constructor and update step.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait Entropy {
    /// Uniform sample in `[0, 1)`.
    fn unit(&mut self) -> f32;

    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.unit()
    }

    /// `true` with probability `p`; `p >= 1.0` always fires.
    fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }
}

pub struct SeededEntropy {
    rng: StdRng,
}

impl SeededEntropy {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from the browser's `Math.random` mixed with the wall clock.
    #[cfg(target_arch = "wasm32")]
    pub fn from_clock() -> Self {
        let noise = (js_sys::Math::random() * u32::MAX as f64) as u64;
        let clock = js_sys::Date::now() as u64;
        Self::from_seed((noise << 32) ^ clock)
    }
}

impl Entropy for SeededEntropy {
    fn unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}
