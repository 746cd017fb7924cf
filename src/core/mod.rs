//! Core building blocks: transform kernel, window, ring buffers, and
//! engine parameters. Nothing in this module is pitch-specific; a future
//! time-stretch processor could reuse it unchanged.

pub mod fft;
pub mod frame;
pub mod ring_buffer;
pub mod types;
pub mod window;

pub use frame::FrameAccumulator;
pub use ring_buffer::RingBuffer;
pub use types::{Sample, ShiftParams};
