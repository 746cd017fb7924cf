//! Hann analysis/synthesis window and overlap-add normalization.
//!
//! The engine applies the window twice per frame (before the forward
//! transform and after the inverse), so reconstruction divides by the sum
//! of squared window values at hop-aligned offsets. For a Hann window at
//! 75% overlap that sum is flat across the frame (the COLA property), which
//! is what makes artifact-free resynthesis possible.

use std::f64::consts::PI;

/// Generates a Hann window: `0.5 * (1 - cos(2*pi*i/(n-1)))`.
pub fn hann_window(size: usize) -> Vec<f32> {
    match size {
        0 => return vec![],
        1 => return vec![1.0],
        _ => {}
    }
    let n = size as f64;
    (0..size)
        .map(|i| {
            let x = (2.0 * PI * i as f64) / (n - 1.0);
            (0.5 * (1.0 - x.cos())) as f32
        })
        .collect()
}

/// Applies a window function to a slice in-place.
#[inline]
pub fn apply_window(data: &mut [f32], window: &[f32]) {
    for (sample, &w) in data.iter_mut().zip(window.iter()) {
        *sample *= w;
    }
}

/// Computes the overlap-add normalization curve for double windowing.
///
/// Entry `j` is the sum of `window[j + m*hop]^2` over all hop-aligned
/// frame offsets `m`. Synthesis output at stream position `n` divides by
/// entry `n % hop`, which makes overlap-add reconstruction exact even
/// though the symmetric Hann is COLA-flat only to about 1e-3.
pub fn ola_norm(window: &[f32], hop: usize) -> Vec<f32> {
    let mut norm = vec![0.0f32; hop];
    for (j, entry) in norm.iter_mut().enumerate() {
        let mut sum = 0.0f64;
        let mut i = j;
        while i < window.len() {
            sum += (window[i] as f64) * (window[i] as f64);
            i += hop;
        }
        *entry = sum as f32;
    }
    norm
}
