//! Error types for the pitchshift crate.

use std::fmt;

/// Errors that can occur when constructing or driving a pitch shifter.
///
/// All of these surface either at construction time or at an API misuse
/// boundary. The steady-state render path never fails: out-of-range pitch
/// factors are clamped and degenerate spectral values are zeroed locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShiftError {
    /// Frame size must be a power of two, at least 64.
    InvalidFrameSize(usize),
    /// Sample rate must be greater than zero.
    InvalidSampleRate(u32),
    /// `process_into` was called with input and output blocks of
    /// different lengths.
    BlockMismatch { input: usize, output: usize },
    /// One-shot input contained NaN or infinity.
    NonFiniteInput,
}

impl fmt::Display for ShiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftError::InvalidFrameSize(n) => {
                write!(
                    f,
                    "invalid frame size: {} (must be a power of two, at least 64)",
                    n
                )
            }
            ShiftError::InvalidSampleRate(sr) => {
                write!(f, "invalid sample rate: {} (must be greater than zero)", sr)
            }
            ShiftError::BlockMismatch { input, output } => {
                write!(
                    f,
                    "block length mismatch: {} input samples, {} output samples",
                    input, output
                )
            }
            ShiftError::NonFiniteInput => {
                write!(f, "input contains NaN or infinite samples")
            }
        }
    }
}

impl std::error::Error for ShiftError {}
