//! Cross-context pitch factor hand-off.
//!
//! The render context must never block, so the control surface is a single
//! atomic slot holding the latest requested factor as `f32` bits. Writes
//! from the control context are latest-value-wins; lost intermediate values
//! are fine because only the settled value matters perceptually.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Lowest supported pitch factor (one octave down).
pub const FACTOR_MIN: f32 = 0.5;
/// Highest supported pitch factor (one octave up).
pub const FACTOR_MAX: f32 = 2.0;

/// Single-slot atomic pitch factor store shared between the control and
/// render contexts.
#[derive(Debug)]
pub struct PitchControl {
    bits: AtomicU32,
}

impl PitchControl {
    /// Creates a control slot holding the given initial factor, clamped.
    pub fn new(factor: f32) -> Self {
        Self {
            bits: AtomicU32::new(clamp_factor(factor).to_bits()),
        }
    }

    /// Stores a new target factor, clamped to the supported range.
    ///
    /// Non-finite values are ignored; a UI-driven parameter change must
    /// never stall or corrupt playback.
    pub fn set(&self, factor: f32) {
        if !factor.is_finite() {
            return;
        }
        self.bits
            .store(factor.clamp(FACTOR_MIN, FACTOR_MAX).to_bits(), Ordering::Relaxed);
    }

    /// Returns the most recently stored factor.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// Cloneable setter handle for the control (UI) context.
///
/// Obtained from [`PitchShifter::handle`]; the engine keeps reading the
/// shared slot once per hop regardless of which handle wrote it.
///
/// [`PitchShifter::handle`]: crate::PitchShifter::handle
#[derive(Debug, Clone)]
pub struct PitchHandle {
    control: Arc<PitchControl>,
}

impl PitchHandle {
    pub(crate) fn new(control: Arc<PitchControl>) -> Self {
        Self { control }
    }

    /// Requests a new pitch factor, effective from the next hop boundary.
    pub fn set_pitch_factor(&self, factor: f32) {
        self.control.set(factor);
    }

    /// Returns the last committed target factor.
    pub fn pitch_factor(&self) -> f32 {
        self.control.get()
    }
}

/// Clamps a factor into the supported range, mapping non-finite input to 1.0.
#[inline]
pub(crate) fn clamp_factor(factor: f32) -> f32 {
    if factor.is_finite() {
        factor.clamp(FACTOR_MIN, FACTOR_MAX)
    } else {
        1.0
    }
}
