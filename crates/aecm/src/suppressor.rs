//! Per-frame echo suppression core.
//!
//! Time-domain suppression: estimate how much of the near-end frame is
//! explained by the far-end reference, then subtract the scaled reference.
//! The estimate is smoothed across frames so isolated correlation spikes
//! (double talk) do not cause dropouts.

use crate::config::{AecmConfig, CngMode};

/// Q15 unity gain.
const GAIN_UNITY_Q15: i32 = 32_768;

/// Smoothing shift for the echo gain estimate (new estimate weighted 1/4).
const GAIN_SMOOTHING_SHIFT: u32 = 2;

/// Mean absolute amplitude below which a processed frame counts as silence
/// for comfort noise purposes.
const CNG_SILENCE_THRESHOLD: i32 = 16;

/// Peak amplitude of generated comfort noise.
const CNG_AMPLITUDE: i32 = 3;

#[derive(Debug, Clone)]
pub(crate) struct EchoSuppressor {
    /// Smoothed echo gain estimate, Q15.
    gain_q15: i32,
    /// Comfort noise generator state (xorshift).
    noise_state: u32,
}

impl EchoSuppressor {
    pub(crate) fn new() -> Self {
        Self {
            gain_q15: 0,
            noise_state: 0x2545_F491,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.gain_q15 = 0;
        self.noise_state = 0x2545_F491;
    }

    /// Processes one frame of near-end audio against its far-end reference,
    /// writing the echo-suppressed result to `output`.
    ///
    /// All three slices must have the same length.
    pub(crate) fn process(
        &mut self,
        nearend: &[i16],
        reference: &[i16],
        config: AecmConfig,
        output: &mut [i16],
    ) {
        debug_assert_eq!(nearend.len(), reference.len());
        debug_assert_eq!(nearend.len(), output.len());

        self.update_gain(nearend, reference);

        let scale_q15 = (self.gain_q15 * config.routing.suppression_q15()) >> 15;
        for ((&near, &far), out) in nearend.iter().zip(reference).zip(output.iter_mut()) {
            let echo_estimate = (i32::from(far) * scale_q15) >> 15;
            let cancelled = i32::from(near) - echo_estimate;
            *out = cancelled.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
        }

        if config.cng == CngMode::Enabled && is_near_silent(output) {
            self.fill_comfort_noise(output);
        }
    }

    /// Updates the smoothed echo gain from the normalized cross-power of
    /// the current frame.
    fn update_gain(&mut self, nearend: &[i16], reference: &[i16]) {
        let mut cross: i64 = 0;
        let mut ref_energy: i64 = 0;
        for (&near, &far) in nearend.iter().zip(reference) {
            cross += i64::from(near) * i64::from(far);
            ref_energy += i64::from(far) * i64::from(far);
        }

        let instant_q15 = if ref_energy > 0 {
            ((cross.max(0) << 15) / ref_energy).min(i64::from(GAIN_UNITY_Q15)) as i32
        } else {
            0
        };

        self.gain_q15 += (instant_q15 - self.gain_q15) >> GAIN_SMOOTHING_SHIFT;
    }

    fn fill_comfort_noise(&mut self, output: &mut [i16]) {
        for out in output.iter_mut() {
            // xorshift32
            self.noise_state ^= self.noise_state << 13;
            self.noise_state ^= self.noise_state >> 17;
            self.noise_state ^= self.noise_state << 5;
            let span = 2 * CNG_AMPLITUDE + 1;
            *out = ((self.noise_state % span as u32) as i32 - CNG_AMPLITUDE) as i16;
        }
    }
}

fn is_near_silent(frame: &[i16]) -> bool {
    let sum: i64 = frame.iter().map(|&s| i64::from(s).abs()).sum();
    sum < i64::from(CNG_SILENCE_THRESHOLD) * frame.len() as i64
}
