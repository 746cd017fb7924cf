use std::f32::consts::PI;

pub fn gen_sine(freq_hz: f32, sample_rate: u32, n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| (2.0 * PI * freq_hz * i as f32 / sample_rate as f32).sin())
        .collect()
}

pub fn gen_two_tone(
    freq_a: f32,
    amp_a: f32,
    freq_b: f32,
    amp_b: f32,
    sample_rate: u32,
    n: usize,
) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            amp_a * (2.0 * PI * freq_a * t).sin() + amp_b * (2.0 * PI * freq_b * t).sin()
        })
        .collect()
}

pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| s as f64 * s as f64).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

/// Goertzel-style energy at a single frequency, normalized by length.
pub fn energy_at_freq(samples: &[f32], sample_rate: u32, freq_hz: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut re = 0.0f64;
    let mut im = 0.0f64;
    for (i, &s) in samples.iter().enumerate() {
        let angle = 2.0 * std::f64::consts::PI * freq_hz * i as f64 / sample_rate as f64;
        re += s as f64 * angle.cos();
        im -= s as f64 * angle.sin();
    }
    (re * re + im * im).sqrt() / samples.len() as f64
}

/// Returns the frequency carrying the most energy anywhere in the usable
/// spectrum (50 Hz up to a quarter of the sample rate), so a strong peak
/// left at the source frequency cannot hide from the assertion. Coarse
/// pass first, then a 1 Hz refinement around the coarse winner.
pub fn dominant_freq(samples: &[f32], sample_rate: u32) -> f64 {
    let hi = sample_rate as f64 / 4.0;
    let coarse = scan_peak(samples, sample_rate, 50.0, hi, 4.0);
    scan_peak(samples, sample_rate, coarse - 6.0, coarse + 6.0, 1.0)
}

fn scan_peak(samples: &[f32], sample_rate: u32, lo_hz: f64, hi_hz: f64, step_hz: f64) -> f64 {
    let mut best_freq = lo_hz;
    let mut best_energy = f64::NEG_INFINITY;
    let mut freq = lo_hz;
    while freq <= hi_hz {
        let e = energy_at_freq(samples, sample_rate, freq);
        if e > best_energy {
            best_energy = e;
            best_freq = freq;
        }
        freq += step_hz;
    }
    best_freq
}

pub fn assert_all_finite(samples: &[f32], label: &str) {
    for (i, &s) in samples.iter().enumerate() {
        assert!(
            s.is_finite(),
            "{}: sample {} is not finite ({})",
            label,
            i,
            s
        );
    }
}
