//! Frame accumulation: decouples caller block sizes from the engine's
//! fixed frame/hop geometry.
//!
//! Input side: arbitrary-length blocks accumulate in a ring buffer and are
//! exposed as fixed-size analysis frames that overlap by `frame - hop`
//! samples. Output side: synthesis frames are summed (overlap-add) into a
//! circular accumulator and drained in caller-sized blocks.

use crate::core::ring_buffer::RingBuffer;
use crate::core::types::Sample;

/// Overlapping frame extraction and overlap-add resynthesis buffers.
#[derive(Debug)]
pub struct FrameAccumulator {
    frame_size: usize,
    hop_size: usize,
    input: RingBuffer,
    /// Circular overlap-add accumulator. Cells are zeroed as they are
    /// drained so later frames always add onto clean ground.
    ola: Vec<Sample>,
    ola_read: usize,
    ola_write: usize,
    /// Synthesized samples not yet drained.
    ready: usize,
}

impl FrameAccumulator {
    /// Creates buffers for the given frame geometry.
    ///
    /// The input ring holds one frame plus one hop of headroom; the
    /// overlap-add ring holds two frames, enough for a full frame of
    /// in-flight overlap plus a hop of undrained slack.
    pub fn new(frame_size: usize, hop_size: usize) -> Self {
        Self {
            frame_size,
            hop_size,
            input: RingBuffer::with_capacity(frame_size + hop_size),
            ola: vec![0.0; frame_size * 2],
            ola_read: 0,
            ola_write: 0,
            ready: 0,
        }
    }

    /// Appends input samples. Callers must not exceed the hop-sized
    /// headroom between consume passes; the orchestrator feeds at most
    /// one hop at a time.
    pub fn push_input(&mut self, samples: &[Sample]) {
        let pushed = self.input.push_slice(samples);
        debug_assert_eq!(pushed, samples.len(), "input ring overflow");
    }

    /// True once a full analysis frame is buffered.
    #[inline]
    pub fn frame_ready(&self) -> bool {
        self.input.len() >= self.frame_size
    }

    /// Copies the next analysis frame into `frame` and advances the read
    /// cursor by one hop (not one frame), producing 75% overlap between
    /// successive frames.
    ///
    /// Returns false without touching `frame` if a full frame is not
    /// buffered yet.
    pub fn consume_frame(&mut self, frame: &mut [Sample]) -> bool {
        debug_assert_eq!(frame.len(), self.frame_size);
        if !self.frame_ready() {
            return false;
        }
        let copied = self.input.peek_slice(frame);
        debug_assert_eq!(copied, self.frame_size);
        self.input.discard(self.hop_size);
        true
    }

    /// Accumulates a synthesis frame into the output ring at the current
    /// write position, then advances the write position by one hop.
    ///
    /// One hop of samples becomes ready for draining per call; the rest of
    /// the frame stays in flight awaiting later overlapping frames.
    pub fn add_synthesis(&mut self, frame: &[Sample]) {
        debug_assert_eq!(frame.len(), self.frame_size);
        let cap = self.ola.len();
        // The new frame spans [write, write + frame); it may not wrap onto
        // undrained samples behind the read cursor.
        debug_assert!(self.ready + self.frame_size <= cap, "overlap-add ring overflow");
        let mut pos = self.ola_write;
        for &s in frame {
            self.ola[pos] += s;
            pos += 1;
            if pos == cap {
                pos = 0;
            }
        }
        self.ola_write = (self.ola_write + self.hop_size) % cap;
        self.ready += self.hop_size;
    }

    /// Drains output samples from the front of the overlap-add ring.
    ///
    /// If fewer than `out.len()` samples have been synthesized, the
    /// shortfall is filled with silence at the front. This is the engine's
    /// inherent look-ahead latency, not an error.
    pub fn pull_output(&mut self, out: &mut [Sample]) {
        let cap = self.ola.len();
        let have = self.ready.min(out.len());
        let silence = out.len() - have;
        for s in out[..silence].iter_mut() {
            *s = 0.0;
        }
        for s in out[silence..].iter_mut() {
            *s = self.ola[self.ola_read];
            self.ola[self.ola_read] = 0.0;
            self.ola_read = (self.ola_read + 1) % cap;
        }
        self.ready -= have;
    }

    /// Number of synthesized samples ready to drain.
    #[inline]
    pub fn ready_samples(&self) -> usize {
        self.ready
    }

    /// Clears all buffered input and synthesized output. Used on stream
    /// discontinuities (seek, restart).
    pub fn clear(&mut self) {
        self.input.clear();
        self.ola.iter_mut().for_each(|s| *s = 0.0);
        self.ola_read = 0;
        self.ola_write = 0;
        self.ready = 0;
    }
}
