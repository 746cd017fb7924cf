//! The pitch transform itself: phase vocoder core and the cross-context
//! parameter controller.

pub mod control;
pub mod vocoder;

pub use control::{PitchControl, PitchHandle, FACTOR_MAX, FACTOR_MIN};
pub use vocoder::PhaseVocoder;
