use serde::{Deserialize, Serialize};

use crate::error::ShiftError;
use crate::shift::control::{FACTOR_MAX, FACTOR_MIN};

/// A single audio sample (32-bit float, nominal range -1.0 to 1.0).
pub type Sample = f32;

/// Default frame size in samples (must be a power of two).
pub const DEFAULT_FRAME_SIZE: usize = 2048;

/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Smallest supported frame size. Below this the quarter-frame hop leaves
/// too few samples for meaningful phase tracking.
pub const MIN_FRAME_SIZE: usize = 64;

/// Analysis frames advance by a quarter frame (75% overlap), which the
/// double Hann windowing requires for constant overlap-add reconstruction.
pub const OVERLAP_FACTOR: usize = 4;

/// Parameters fixed at pitch shifter construction.
///
/// `frame_size` and `sample_rate` cannot change for the life of an engine
/// instance; only the pitch factor is adjustable at runtime. Parameters are
/// serializable so a host can persist playback settings.
///
/// # Example
///
/// ```
/// use pitchshift::ShiftParams;
///
/// let params = ShiftParams::new()
///     .with_sample_rate(48000)
///     .with_frame_size(4096)
///     .with_pitch_factor(1.2);
/// assert_eq!(params.hop_size(), 1024);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftParams {
    /// Sample rate in Hz (default: 44100).
    pub sample_rate: u32,
    /// FFT frame size, a power of two (default: 2048).
    pub frame_size: usize,
    /// Initial pitch factor: >1.0 raises pitch, <1.0 lowers it
    /// (default: 1.0). Clamped to the supported range at use.
    pub pitch_factor: f32,
}

impl ShiftParams {
    /// Creates parameters with default values.
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            frame_size: DEFAULT_FRAME_SIZE,
            pitch_factor: 1.0,
        }
    }

    /// Sets the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Sets the frame size. Must be a power of two.
    pub fn with_frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size;
        self
    }

    /// Sets the initial pitch factor, clamped to the supported range.
    pub fn with_pitch_factor(mut self, factor: f32) -> Self {
        self.pitch_factor = if factor.is_finite() {
            factor.clamp(FACTOR_MIN, FACTOR_MAX)
        } else {
            1.0
        };
        self
    }

    /// Returns the hop size (frame advance between analysis frames).
    #[inline]
    pub fn hop_size(&self) -> usize {
        self.frame_size / OVERLAP_FACTOR
    }

    /// Returns the number of spectral bins (`frame_size / 2 + 1`).
    #[inline]
    pub fn num_bins(&self) -> usize {
        self.frame_size / 2 + 1
    }

    /// Validates all parameters.
    ///
    /// Configuration errors fail here, at construction; an engine can never
    /// be instantiated in an invalid configuration.
    pub fn validate(&self) -> Result<(), ShiftError> {
        if self.frame_size < MIN_FRAME_SIZE || !self.frame_size.is_power_of_two() {
            return Err(ShiftError::InvalidFrameSize(self.frame_size));
        }
        if self.sample_rate == 0 {
            return Err(ShiftError::InvalidSampleRate(self.sample_rate));
        }
        Ok(())
    }
}

impl Default for ShiftParams {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ShiftParams::new();
        assert_eq!(params.sample_rate, 44100);
        assert_eq!(params.frame_size, 2048);
        assert_eq!(params.pitch_factor, 1.0);
        assert_eq!(params.hop_size(), 512);
        assert_eq!(params.num_bins(), 1025);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let params = ShiftParams::new()
            .with_sample_rate(48000)
            .with_frame_size(4096)
            .with_pitch_factor(0.8);
        assert_eq!(params.sample_rate, 48000);
        assert_eq!(params.frame_size, 4096);
        assert_eq!(params.pitch_factor, 0.8);
        assert_eq!(params.hop_size(), 1024);
    }

    #[test]
    fn test_invalid_frame_size() {
        let params = ShiftParams::new().with_frame_size(1000);
        assert!(matches!(
            params.validate(),
            Err(ShiftError::InvalidFrameSize(1000))
        ));

        let params = ShiftParams::new().with_frame_size(0);
        assert!(params.validate().is_err());

        let params = ShiftParams::new().with_frame_size(32);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_invalid_sample_rate() {
        let params = ShiftParams::new().with_sample_rate(0);
        assert!(matches!(
            params.validate(),
            Err(ShiftError::InvalidSampleRate(0))
        ));
    }

    #[test]
    fn test_pitch_factor_clamped() {
        let params = ShiftParams::new().with_pitch_factor(10.0);
        assert_eq!(params.pitch_factor, FACTOR_MAX);

        let params = ShiftParams::new().with_pitch_factor(0.01);
        assert_eq!(params.pitch_factor, FACTOR_MIN);

        let params = ShiftParams::new().with_pitch_factor(f32::NAN);
        assert_eq!(params.pitch_factor, 1.0);
    }

    #[test]
    fn test_serde_round_trip() {
        let params = ShiftParams::new()
            .with_sample_rate(48000)
            .with_pitch_factor(1.5);
        let json = serde_json::to_string(&params).unwrap();
        let back: ShiftParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
