//! Streaming orchestration: the block-synchronous engine external callers
//! drive from the audio render callback.

pub mod processor;

pub use processor::PitchShifter;
