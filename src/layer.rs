//! Layer state — one independent background selector.
//!
//! A layer holds a single integer in `[0, MAX_LAYER_VALUE)`. Shifting may
//! push it out of range; the value is only folded back in on the next
//! randomize. Layer mutation is infallible and immediately observable.

use rand::Rng;

/// Exclusive upper bound of the layer value space.
pub const MAX_LAYER_VALUE: i32 = 327;

/// Randomize draws uniformly from `[0, RANDOM_SPAN)` before the extra
/// offset and modulo reduction are applied.
pub const RANDOM_SPAN: i32 = 150;

/// Startup values for the two layers.
pub const DEFAULT_LAYER_1: i32 = 86;
pub const DEFAULT_LAYER_2: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerState {
    value: i32,
}

impl LayerState {
    pub fn new(initial: i32) -> Self {
        LayerState { value: initial }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Add a signed delta. No bound enforcement; the value may leave
    /// `[0, MAX_LAYER_VALUE)` until the next randomize.
    pub fn shift(&mut self, delta: i32) {
        self.value += delta;
    }

    /// `value = (uniform[0,150) + extra) mod 327`.
    pub fn randomize(&mut self, rng: &mut impl Rng, extra: i32) {
        self.value = (rng.gen_range(0..RANDOM_SPAN) + extra).rem_euclid(MAX_LAYER_VALUE);
    }

    pub fn zero(&mut self) {
        self.value = 0;
    }

    /// Direct assignment, used when a catalog group dictates the pair.
    pub fn set(&mut self, value: i32) {
        self.value = value;
    }
}
