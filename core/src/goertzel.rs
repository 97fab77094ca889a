use crate::segmenter::Frame;
use crate::tones::{NUM_BINS, TONE_BINS};

/// Power at each entry of the tone bin table for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerVector(pub [f32; NUM_BINS]);

impl PowerVector {
    /// Loudest bin power (0.0 for an all-zero vector)
    pub fn max(&self) -> f32 {
        self.0.iter().copied().fold(0.0f32, f32::max)
    }

    pub fn get(&self, bin: usize) -> f32 {
        self.0[bin]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

/// Run the Goertzel recurrence for one coefficient and return the
/// squared magnitude `u0^2 + u1^2 - coef * u0 * u1`.
pub fn goertzel_power(samples: &[f32], coef: f32) -> f32 {
    let mut u0 = 0.0f32;
    let mut u1 = 0.0f32;

    for &sample in samples {
        let t = u0;
        u0 = sample + coef * u0 - u1;
        u1 = t;
    }

    u0 * u0 + u1 * u1 - coef * u0 * u1
}

/// Estimate the power of every monitored tone in `frame`.
///
/// Pure function of the frame; no state survives between calls.
pub fn estimate(frame: &Frame) -> PowerVector {
    let samples = frame.samples();
    let mut powers = [0.0f32; NUM_BINS];

    for (power, bin) in powers.iter_mut().zip(TONE_BINS.iter()) {
        *power = goertzel_power(samples, bin.coef);
    }

    PowerVector(powers)
}
