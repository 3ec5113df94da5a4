//! The renderer's seeded pseudo-random stream. A Park-Miller/Lehmer linear congruential
//! generator: `s <- (s * 16807) mod 2147483647`, output `(s - 1) / 2147483646`.
//!
//! The exact call order of [`Rng::jitter`]/[`Rng::jitter_point`] during a render defines the
//! output byte-for-byte (the determinism invariant) — reordering draws changes every subsequent
//! value.

const SEED: i64 = 42;
const MULTIPLIER: i64 = 16807;
const MODULUS: i64 = 2_147_483_647;

#[derive(Debug, Clone)]
pub struct Rng {
    state: i64,
}

impl Default for Rng {
    fn default() -> Self {
        Self::new()
    }
}

impl Rng {
    pub fn new() -> Self {
        Self { state: SEED }
    }

    /// Resets the stream to its initial seed. Must be called once at the start of each render.
    pub fn reset(&mut self) {
        self.state = SEED;
    }

    /// Draws the next value in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER) % MODULUS;
        (self.state - 1) as f64 / (MODULUS - 1) as f64
    }

    /// `v + (rand() - 0.5) * 2 * amount`, one draw.
    pub fn jitter(&mut self, v: f64, amount: f64) -> f64 {
        v + (self.next() - 0.5) * 2.0 * amount
    }

    /// Jitters a point, drawing `x` then `y` (two consecutive draws).
    pub fn jitter_point(&mut self, x: f64, y: f64, amount: f64) -> (f64, f64) {
        let jx = self.jitter(x, amount);
        let jy = self.jitter(y, amount);
        (jx, jy)
    }
}
