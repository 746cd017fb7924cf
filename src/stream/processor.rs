use std::sync::Arc;

use crate::core::frame::FrameAccumulator;
use crate::core::types::{Sample, ShiftParams};
use crate::error::ShiftError;
use crate::shift::control::{clamp_factor, PitchControl, PitchHandle};
use crate::shift::vocoder::PhaseVocoder;

/// Per-hop smoothing factor applied when moving toward a new pitch target.
const FACTOR_SMOOTHING: f32 = 0.1;
/// Distance below which the smoothed factor snaps onto the target.
const FACTOR_SNAP: f32 = 1e-4;

/// Streaming pitch shifter for one audio channel.
///
/// The single steady-state entry point is [`process_into`]: push a block of
/// samples, receive exactly as many back, pitch-shifted. Block length is
/// caller-defined and may vary call to call; internally the engine runs on
/// fixed analysis/synthesis hops and absorbs the mismatch in ring buffers.
///
/// Stereo content uses two independent instances, one per channel.
///
/// # Example
///
/// ```
/// use pitchshift::{PitchShifter, ShiftParams};
///
/// let params = ShiftParams::new().with_sample_rate(44100);
/// let mut shifter = PitchShifter::new(params).unwrap();
/// shifter.set_pitch_factor(1.5);
///
/// let input = vec![0.0f32; 1024];
/// let mut output = vec![0.0f32; 1024];
/// shifter.process_into(&input, &mut output).unwrap();
/// ```
///
/// [`process_into`]: PitchShifter::process_into
pub struct PitchShifter {
    params: ShiftParams,
    accumulator: FrameAccumulator,
    vocoder: PhaseVocoder,
    control: Arc<PitchControl>,
    /// Factor in effect for the current hop; follows the control target
    /// with one-pole smoothing so step changes do not click.
    committed_factor: f32,
    analysis_frame: Vec<Sample>,
    synthesis_frame: Vec<Sample>,
}

impl PitchShifter {
    /// Builds an engine instance for one channel of one playback session.
    ///
    /// # Errors
    ///
    /// Returns [`ShiftError::InvalidFrameSize`] or
    /// [`ShiftError::InvalidSampleRate`] for invalid configuration; an
    /// engine can never exist in an invalid state, so no configuration
    /// error surfaces mid-stream.
    pub fn new(params: ShiftParams) -> Result<Self, ShiftError> {
        params.validate()?;
        let frame_size = params.frame_size;
        let hop_size = params.hop_size();
        let initial = clamp_factor(params.pitch_factor);

        log::debug!(
            "pitch shifter: sample_rate={} frame={} hop={} latency={}",
            params.sample_rate,
            frame_size,
            hop_size,
            frame_size - hop_size
        );

        Ok(Self {
            params,
            accumulator: FrameAccumulator::new(frame_size, hop_size),
            vocoder: PhaseVocoder::new(frame_size, hop_size),
            control: Arc::new(PitchControl::new(initial)),
            committed_factor: initial,
            analysis_frame: vec![0.0; frame_size],
            synthesis_frame: vec![0.0; frame_size],
        })
    }

    /// Pitch-shifts one block of samples without allocating.
    ///
    /// Emits exactly `input.len()` samples into `output`; the first
    /// [`latency_samples`](Self::latency_samples) samples of a fresh stream
    /// are silence while the analysis window fills.
    ///
    /// # Errors
    ///
    /// Returns [`ShiftError::BlockMismatch`] if the blocks differ in length.
    pub fn process_into(
        &mut self,
        input: &[Sample],
        output: &mut [Sample],
    ) -> Result<(), ShiftError> {
        if input.len() != output.len() {
            return Err(ShiftError::BlockMismatch {
                input: input.len(),
                output: output.len(),
            });
        }

        // Feed at most one hop at a time so the fixed-capacity rings absorb
        // arbitrary caller block sizes.
        let hop = self.params.hop_size();
        let mut offset = 0;
        while offset < input.len() {
            let chunk = hop.min(input.len() - offset);
            self.accumulator.push_input(&input[offset..offset + chunk]);
            while self.accumulator.frame_ready() {
                self.step_hop();
            }
            self.accumulator
                .pull_output(&mut output[offset..offset + chunk]);
            offset += chunk;
        }
        Ok(())
    }

    /// Allocating convenience wrapper around [`process_into`].
    ///
    /// [`process_into`]: Self::process_into
    pub fn process(&mut self, input: &[Sample]) -> Result<Vec<Sample>, ShiftError> {
        let mut output = vec![0.0; input.len()];
        self.process_into(input, &mut output)?;
        Ok(output)
    }

    /// Runs one analysis/synthesis hop. The pitch factor is committed once
    /// here, so a single hop never sees two different factors.
    fn step_hop(&mut self) {
        self.commit_factor();
        self.accumulator.consume_frame(&mut self.analysis_frame);
        self.vocoder.process_hop(
            &self.analysis_frame,
            self.committed_factor,
            &mut self.synthesis_frame,
        );
        self.accumulator.add_synthesis(&self.synthesis_frame);
    }

    /// Moves the committed factor toward the control target. Updates from
    /// the control context take effect starting at the next hop boundary.
    fn commit_factor(&mut self) {
        let target = self.control.get();
        self.committed_factor += FACTOR_SMOOTHING * (target - self.committed_factor);
        if (self.committed_factor - target).abs() < FACTOR_SNAP {
            self.committed_factor = target;
        }
    }

    /// Requests a new pitch factor, clamped to `[0.5, 2.0]`.
    pub fn set_pitch_factor(&self, factor: f32) {
        self.control.set(factor);
    }

    /// Returns the factor committed for the most recent hop.
    pub fn current_factor(&self) -> f32 {
        self.committed_factor
    }

    /// Returns a cloneable handle for updating the pitch factor from a
    /// non-real-time control context.
    pub fn handle(&self) -> PitchHandle {
        PitchHandle::new(Arc::clone(&self.control))
    }

    /// Clears ring buffers and phase state on a stream discontinuity
    /// (seek or restart). Safe to call between `process` invocations only.
    pub fn reset(&mut self) {
        self.accumulator.clear();
        self.vocoder.reset();
        self.committed_factor = self.control.get();
        log::debug!("pitch shifter reset");
    }

    /// The engine's inherent end-to-end delay in samples
    /// (`frame_size - hop_size`), exposed so callers can compensate.
    pub fn latency_samples(&self) -> usize {
        self.params.frame_size - self.params.hop_size()
    }

    /// Returns the construction parameters.
    pub fn params(&self) -> &ShiftParams {
        &self.params
    }
}

impl std::fmt::Debug for PitchShifter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PitchShifter")
            .field("params", &self.params)
            .field("committed_factor", &self.committed_factor)
            .finish()
    }
}
