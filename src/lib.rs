#![forbid(unsafe_code)]
//! Pure Rust real-time pitch shifting for streaming audio playback.
//!
//! `pitchshift` changes the perceived pitch of an audio stream without
//! changing its duration, using a phase vocoder: overlapping analysis
//! frames are transformed to the spectral domain, per-bin phases are
//! re-accumulated at pitch-scaled true frequencies, and the results are
//! overlap-added back into a continuous stream. The engine is built for a
//! periodic low-latency render callback: after construction the streaming
//! path performs no allocation, no I/O, and takes no locks.
//!
//! # Streaming
//!
//! One [`PitchShifter`] instance handles one channel of one playback
//! session (stereo = two instances). Feed it blocks of any length and it
//! returns exactly as many samples as it was given:
//!
//! ```
//! use pitchshift::{PitchShifter, ShiftParams};
//!
//! let params = ShiftParams::new().with_sample_rate(44100);
//! let mut shifter = PitchShifter::new(params).unwrap();
//! shifter.set_pitch_factor(1.5);
//!
//! let input = vec![0.0f32; 512];
//! let mut output = vec![0.0f32; 512];
//! // Inside the render callback:
//! shifter.process_into(&input, &mut output).unwrap();
//! ```
//!
//! The pitch factor may be updated from a separate control thread through
//! a [`PitchHandle`] (see [`PitchShifter::handle`]); updates take effect at
//! the next hop boundary.
//!
//! # One-shot
//!
//! For offline use, [`shift`] processes a whole mono buffer and
//! compensates the engine's inherent latency:
//!
//! ```
//! use pitchshift::ShiftParams;
//!
//! // 1 second of 440 Hz sine at 44.1 kHz
//! let input: Vec<f32> = (0..44100)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
//!     .collect();
//!
//! let params = ShiftParams::new().with_sample_rate(44100);
//! let output = pitchshift::shift(&input, &params, 2.0).unwrap();
//! assert_eq!(output.len(), input.len()); // same duration, one octave up
//! ```

pub mod core;
pub mod error;
pub mod shift;
pub mod stream;

pub use crate::core::types::{Sample, ShiftParams};
pub use crate::error::ShiftError;
pub use crate::shift::control::{PitchHandle, FACTOR_MAX, FACTOR_MIN};
pub use crate::stream::PitchShifter;

/// Rejects one-shot input containing NaN or infinity.
#[inline]
fn ensure_finite(input: &[Sample]) -> Result<(), ShiftError> {
    if input.iter().copied().all(f32::is_finite) {
        Ok(())
    } else {
        Err(ShiftError::NonFiniteInput)
    }
}

/// Splits interleaved audio into one vector per channel.
fn split_channels(input: &[Sample], num_channels: usize) -> Vec<Vec<Sample>> {
    let frames = input.len() / num_channels;
    let mut channels = vec![Vec::with_capacity(frames); num_channels];
    for frame in input.chunks(num_channels) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }
    channels
}

/// Re-interleaves per-channel vectors, stopping at the shortest channel.
fn merge_channels(channels: &[Vec<Sample>]) -> Vec<Sample> {
    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    let mut out = Vec::with_capacity(frames * channels.len());
    for i in 0..frames {
        for channel in channels {
            out.push(channel[i]);
        }
    }
    out
}

/// Pitch-shifts a whole mono buffer.
///
/// Runs a fresh engine over `input`, flushes the engine's inherent
/// look-ahead with zero padding, and returns output aligned to the input:
/// same length, same timing, pitch scaled by `factor` (clamped to
/// `[0.5, 2.0]`).
///
/// # Errors
///
/// Returns [`ShiftError::NonFiniteInput`] if the input contains NaN or
/// infinity, or a configuration error from [`PitchShifter::new`].
///
/// # Example
///
/// ```
/// use pitchshift::ShiftParams;
///
/// let input: Vec<f32> = (0..44100)
///     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
///     .collect();
/// let params = ShiftParams::new().with_sample_rate(44100);
/// let down = pitchshift::shift(&input, &params, 0.5).unwrap();
/// assert_eq!(down.len(), input.len());
/// ```
pub fn shift(input: &[Sample], params: &ShiftParams, factor: f32) -> Result<Vec<Sample>, ShiftError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    ensure_finite(input)?;

    let mut shifter = PitchShifter::new(params.clone().with_pitch_factor(factor))?;
    let latency = shifter.latency_samples();

    let mut output = shifter.process(input)?;
    let flush = vec![0.0; latency];
    let tail = shifter.process(&flush)?;
    output.extend_from_slice(&tail);

    // Drop the silent look-ahead so output lines up with input.
    output.drain(..latency);
    output.truncate(input.len());
    Ok(output)
}

/// Pitch-shifts interleaved multi-channel audio.
///
/// Each channel runs through its own independent engine instance, then the
/// results are re-interleaved. `num_channels` of zero is treated as mono.
///
/// # Errors
///
/// Same as [`shift`].
pub fn shift_interleaved(
    input: &[Sample],
    num_channels: usize,
    params: &ShiftParams,
    factor: f32,
) -> Result<Vec<Sample>, ShiftError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    ensure_finite(input)?;

    let num_channels = num_channels.max(1);
    if num_channels == 1 {
        return shift(input, params, factor);
    }

    let channels = split_channels(input, num_channels);
    let mut outputs = Vec::with_capacity(num_channels);
    for channel_data in &channels {
        outputs.push(shift(channel_data, params, factor)?);
    }
    Ok(merge_channels(&outputs))
}
