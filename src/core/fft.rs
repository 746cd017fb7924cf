//! Forward/inverse transform kernel over power-of-two frame sizes.
//!
//! Wraps [`rustfft`] with plans created once at construction. The forward
//! transform leaves unnormalized spectral coefficients; the inverse divides
//! by `N`, so a forward/inverse round trip reproduces the input.

use std::sync::Arc;

use rustfft::{num_complex::Complex, FftPlanner};

/// Zero-valued complex number, used for spectral buffer initialization.
pub const COMPLEX_ZERO: Complex<f32> = Complex::new(0.0, 0.0);

/// Pre-planned in-place FFT pair for a fixed power-of-two size.
///
/// Plans and scratch space are allocated once; `forward` and `inverse`
/// never allocate, which keeps them usable inside a render callback.
/// Size validation happens upstream in [`ShiftParams::validate`], so a
/// non-power-of-two length never reaches this kernel.
///
/// [`ShiftParams::validate`]: crate::ShiftParams::validate
pub struct Fft {
    size: usize,
    forward: Arc<dyn rustfft::Fft<f32>>,
    inverse: Arc<dyn rustfft::Fft<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl Fft {
    /// Plans forward and inverse transforms of the given size.
    pub fn new(size: usize) -> Self {
        debug_assert!(size.is_power_of_two(), "FFT size must be a power of two");
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        Self {
            size,
            forward,
            inverse,
            scratch: vec![COMPLEX_ZERO; scratch_len],
        }
    }

    /// Returns the transform size.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// In-place forward transform. Coefficients are left unnormalized.
    pub fn forward(&mut self, buffer: &mut [Complex<f32>]) {
        debug_assert_eq!(buffer.len(), self.size);
        self.forward.process_with_scratch(buffer, &mut self.scratch);
    }

    /// In-place inverse transform, normalized by `1/N`.
    pub fn inverse(&mut self, buffer: &mut [Complex<f32>]) {
        debug_assert_eq!(buffer.len(), self.size);
        self.inverse.process_with_scratch(buffer, &mut self.scratch);
        let norm = 1.0 / self.size as f32;
        for c in buffer.iter_mut() {
            *c *= norm;
        }
    }
}

impl std::fmt::Debug for Fft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fft").field("size", &self.size).finish()
    }
}
