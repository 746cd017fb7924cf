//! Phase vocoder pitch transform, applied once per hop.
//!
//! Each analysis frame is windowed and transformed, then every bin's
//! energy is moved to the bin nearest its pitch-scaled frequency and
//! re-synthesized with a phase that advances at that scaled frequency.
//! The true per-bin frequency comes from the phase drift between
//! consecutive hops: a bin's measured phase advance minus its nominal
//! advance, unwrapped into `(-pi, pi]`, reveals how far the actual
//! frequency sits from the bin center. Transposing requires both halves:
//! relocating the magnitude alone detunes the inter-frame phase
//! progression, and scaling the phase advance alone leaves the spectral
//! energy at the source frequency.

use rustfft::num_complex::Complex;
use std::f32::consts::PI;

use crate::core::fft::{Fft, COMPLEX_ZERO};
use crate::core::types::Sample;
use crate::core::window::{hann_window, ola_norm};

const TWO_PI: f32 = 2.0 * PI;

/// Per-channel spectral pitch shifter state.
///
/// Phase state persists across hops for the life of the instance and is
/// cleared on [`reset`](PhaseVocoder::reset) when the stream becomes
/// discontinuous. All buffers are sized at construction; `process_hop`
/// performs no allocation.
pub struct PhaseVocoder {
    frame_size: usize,
    hop_size: usize,
    num_bins: usize,
    fft: Fft,
    window: Vec<f32>,
    /// Reciprocal overlap-add normalization, one entry per hop offset.
    inv_ola_norm: Vec<f32>,
    /// Nominal phase advance per hop for each bin: `2*pi*k*hop/frame`.
    expected_advance: Vec<f32>,
    /// Analysis phase of the previous hop, per bin.
    prev_phase: Vec<f32>,
    /// Cumulative synthesis phase, per bin.
    phase_accum: Vec<f32>,
    /// Remapped magnitudes for the current hop, per synthesis bin.
    synth_mag: Vec<f32>,
    /// Pitch-scaled phase advance for the current hop, per synthesis bin.
    synth_advance: Vec<f32>,
    /// False until a first hop has established reference phases.
    primed: bool,
    /// Reusable spectral frame.
    spectrum: Vec<Complex<f32>>,
}

impl PhaseVocoder {
    /// Creates a vocoder for the given frame geometry.
    ///
    /// `frame_size` is validated upstream; `hop_size` is `frame_size / 4`.
    pub fn new(frame_size: usize, hop_size: usize) -> Self {
        let num_bins = frame_size / 2 + 1;
        let window = hann_window(frame_size);
        let inv_ola_norm = ola_norm(&window, hop_size)
            .iter()
            .map(|&n| if n > f32::EPSILON { 1.0 / n } else { 0.0 })
            .collect();

        let expected_advance = (0..num_bins)
            .map(|bin| TWO_PI * bin as f32 * hop_size as f32 / frame_size as f32)
            .collect();

        Self {
            frame_size,
            hop_size,
            num_bins,
            fft: Fft::new(frame_size),
            window,
            inv_ola_norm,
            expected_advance,
            prev_phase: vec![0.0; num_bins],
            phase_accum: vec![0.0; num_bins],
            synth_mag: vec![0.0; num_bins],
            synth_advance: vec![0.0; num_bins],
            primed: false,
            spectrum: vec![COMPLEX_ZERO; frame_size],
        }
    }

    /// Transforms one analysis frame into one synthesis frame.
    ///
    /// `pitch_factor` is read once by the caller for the whole hop. The
    /// output frame is analysis- and synthesis-windowed and normalized for
    /// overlap-add; the caller hands it straight to the accumulator.
    pub fn process_hop(&mut self, frame: &[Sample], pitch_factor: f32, out: &mut [Sample]) {
        debug_assert_eq!(frame.len(), self.frame_size);
        debug_assert_eq!(out.len(), self.frame_size);

        // Analysis window, then forward transform.
        for ((c, &sample), &w) in self
            .spectrum
            .iter_mut()
            .zip(frame.iter())
            .zip(self.window.iter())
        {
            *c = Complex::new(sample * w, 0.0);
        }
        self.fft.forward(&mut self.spectrum);

        if self.primed {
            self.synth_mag.iter_mut().for_each(|m| *m = 0.0);
            self.synth_advance.iter_mut().for_each(|a| *a = 0.0);

            // Analysis: the unwrapped drift from the nominal bin advance
            // gives each bin's true frequency. Its magnitude moves to the
            // bin nearest the pitch-scaled frequency, carrying the scaled
            // advance; several source bins may land on one target when
            // shifting down.
            for bin in 0..self.num_bins {
                let c = self.spectrum[bin];
                let magnitude = c.norm();
                let phase = c.arg();
                let expected = self.expected_advance[bin];
                let deviation = wrap_phase(phase - self.prev_phase[bin] - expected);
                self.prev_phase[bin] = phase;

                let target = (bin as f32 * pitch_factor).round() as usize;
                if target >= self.num_bins {
                    continue;
                }
                self.synth_mag[target] += magnitude;
                self.synth_advance[target] = (expected + deviation) * pitch_factor;
            }

            // Synthesis: run each bin's cumulative phase forward at the
            // remapped advance and rebuild the spectrum. A degenerate bin
            // must not poison the whole frame, and must never stick in the
            // running phase.
            for bin in 0..self.num_bins {
                let advance = self.synth_advance[bin];
                if advance.is_finite() {
                    self.phase_accum[bin] = wrap_phase(self.phase_accum[bin] + advance);
                }
                let magnitude = self.synth_mag[bin];
                self.spectrum[bin] = if magnitude.is_finite() && magnitude > 0.0 {
                    Complex::from_polar(magnitude, self.phase_accum[bin])
                } else {
                    COMPLEX_ZERO
                };
            }
        } else {
            // First hop of a stream: no previous phase to diff against, so
            // synthesis passes the measured analysis spectrum through and
            // frequency estimation starts on the second hop.
            for bin in 0..self.num_bins {
                let c = self.spectrum[bin];
                if !(c.re.is_finite() && c.im.is_finite()) {
                    self.spectrum[bin] = COMPLEX_ZERO;
                    self.prev_phase[bin] = 0.0;
                    self.phase_accum[bin] = 0.0;
                    continue;
                }
                let phase = c.arg();
                self.prev_phase[bin] = phase;
                self.phase_accum[bin] = phase;
            }
            self.primed = true;
        }

        // Mirror conjugate bins so the inverse transform yields a real frame.
        for bin in 1..self.num_bins - 1 {
            self.spectrum[self.frame_size - bin] = self.spectrum[bin].conj();
        }

        // Inverse transform (normalized by 1/N in the kernel), synthesis
        // window, and overlap-add normalization.
        self.fft.inverse(&mut self.spectrum);
        for (i, o) in out.iter_mut().enumerate() {
            *o = self.spectrum[i].re * self.window[i] * self.inv_ola_norm[i % self.hop_size];
        }
    }

    /// Clears phase state. The next hop re-establishes reference phases as
    /// if the instance were freshly constructed.
    pub fn reset(&mut self) {
        self.prev_phase.iter_mut().for_each(|p| *p = 0.0);
        self.phase_accum.iter_mut().for_each(|p| *p = 0.0);
        self.primed = false;
    }
}

impl std::fmt::Debug for PhaseVocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseVocoder")
            .field("frame_size", &self.frame_size)
            .field("hop_size", &self.hop_size)
            .field("primed", &self.primed)
            .finish()
    }
}

/// Reduces a phase to its principal value by removing whole turns.
#[inline]
fn wrap_phase(phase: f32) -> f32 {
    (phase + PI).rem_euclid(TWO_PI) - PI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_phase() {
        // Values already in the principal range pass through.
        assert_eq!(wrap_phase(0.0), 0.0);
        assert!((wrap_phase(1.25) - 1.25).abs() < 1e-6);
        assert!((wrap_phase(-2.5) + 2.5).abs() < 1e-6);

        // Arbitrary values land in range and keep their angle modulo 2*PI.
        for &p in &[3.5f32, -4.0, 12.0, -9.0, 55.0, -123.0] {
            let w = wrap_phase(p);
            assert!((-PI..=PI).contains(&w), "{} wrapped to {}", p, w);
            let turns = (p - w) / TWO_PI;
            assert!(
                (turns - turns.round()).abs() < 1e-3,
                "{} wrapped to {}",
                p,
                w
            );
        }
    }

    #[test]
    fn test_first_hop_passes_spectrum_through() {
        // On the first hop synthesis phase equals analysis phase, so the
        // output must be the doubly windowed, normalized input frame for
        // any pitch factor.
        let frame_size = 256;
        let hop = frame_size / 4;
        let mut pv = PhaseVocoder::new(frame_size, hop);

        let frame: Vec<f32> = (0..frame_size)
            .map(|i| (2.0 * PI * 4.0 * i as f32 / frame_size as f32).sin())
            .collect();
        let mut out = vec![0.0f32; frame_size];
        pv.process_hop(&frame, 2.0, &mut out);

        let window = hann_window(frame_size);
        let inv_norm: Vec<f32> = ola_norm(&window, hop).iter().map(|&n| 1.0 / n).collect();
        for i in 0..frame_size {
            let expected = frame[i] * window[i] * window[i] * inv_norm[i % hop];
            assert!(
                (out[i] - expected).abs() < 1e-4,
                "sample {}: {} vs {}",
                i,
                out[i],
                expected
            );
        }
    }

    // Correlates a frame against the tone at a given bin center.
    fn energy_at_bin(frame: &[f32], bin: usize) -> f32 {
        let mut re = 0.0f32;
        let mut im = 0.0f32;
        for (i, &s) in frame.iter().enumerate() {
            let angle = 2.0 * PI * bin as f32 * i as f32 / frame.len() as f32;
            re += s * angle.cos();
            im += s * angle.sin();
        }
        (re * re + im * im).sqrt()
    }

    #[test]
    fn test_energy_moves_to_scaled_bin() {
        let frame_size = 256;
        let hop = frame_size / 4;
        let mut pv = PhaseVocoder::new(frame_size, hop);

        // Bin-centered tone, phase-continuous across hop-advanced frames.
        let signal: Vec<f32> = (0..frame_size + 4 * hop)
            .map(|i| (2.0 * PI * 8.0 * i as f32 / frame_size as f32).cos())
            .collect();

        let mut out = vec![0.0f32; frame_size];
        for h in 0..4 {
            let start = h * hop;
            pv.process_hop(&signal[start..start + frame_size], 2.0, &mut out);
        }

        // After the priming hop, doubling must leave the output frame's
        // energy at bin 16, not at the source bin 8.
        let source = energy_at_bin(&out, 8);
        let shifted = energy_at_bin(&out, 16);
        assert!(
            shifted > source * 10.0,
            "energy stayed at the source bin: shifted {} vs source {}",
            shifted,
            source
        );
    }

    #[test]
    fn test_silent_frames_stay_silent() {
        let frame_size = 512;
        let mut pv = PhaseVocoder::new(frame_size, frame_size / 4);
        let silence = vec![0.0f32; frame_size];
        let mut out = vec![0.0f32; frame_size];

        for _ in 0..8 {
            pv.process_hop(&silence, 1.3, &mut out);
            assert!(out.iter().all(|s| s.abs() < 1e-9));
        }
    }

    #[test]
    fn test_output_always_finite() {
        let frame_size = 256;
        let mut pv = PhaseVocoder::new(frame_size, frame_size / 4);
        // Extreme amplitudes should not produce NaN/Inf downstream.
        let frame = vec![1.0e20f32; frame_size];
        let mut out = vec![0.0f32; frame_size];
        pv.process_hop(&frame, 2.0, &mut out);
        pv.process_hop(&frame, 0.5, &mut out);
        assert!(out.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_reset_restores_first_hop_behavior() {
        let frame_size = 256;
        let hop = frame_size / 4;
        let frame: Vec<f32> = (0..frame_size)
            .map(|i| (2.0 * PI * 3.0 * i as f32 / frame_size as f32).cos())
            .collect();

        let mut fresh = PhaseVocoder::new(frame_size, hop);
        let mut out_fresh = vec![0.0f32; frame_size];
        fresh.process_hop(&frame, 1.5, &mut out_fresh);

        let mut reused = PhaseVocoder::new(frame_size, hop);
        let mut out_reused = vec![0.0f32; frame_size];
        reused.process_hop(&frame, 1.5, &mut out_reused);
        reused.process_hop(&frame, 1.5, &mut out_reused);
        reused.reset();
        reused.process_hop(&frame, 1.5, &mut out_reused);

        for (a, b) in out_fresh.iter().zip(out_reused.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }
}
