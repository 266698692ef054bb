//! Subdivides arbitrary-length audio buffers into engine-sized frames.
//!
//! The engine consumes audio strictly in 10 ms frames. [`process_stream`]
//! accepts near-end and far-end buffers of any (equal) length, walks them
//! frame by frame through the engine's buffer-then-process cycle, and
//! overwrites the near-end buffer with the cancelled audio as it goes.

use aecm::{EchoControlMobile, Error as EngineError, MAX_FRAME_LENGTH};

// ─── Error ───────────────────────────────────────────────────────────

/// Errors returned by [`process_stream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    /// Buffering far-end samples failed. The engine's own error is not
    /// preserved at this layer; only the fact that far-end buffering was
    /// the step that failed.
    FarendBuffering,
    /// The engine rejected a near-end frame; carries the engine error
    /// unchanged.
    Engine(EngineError),
}

impl std::fmt::Display for StreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FarendBuffering => write!(f, "far-end buffering failed"),
            Self::Engine(e) => write!(f, "engine rejected frame: {e}"),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FarendBuffering => None,
            Self::Engine(e) => Some(e),
        }
    }
}

// ─── Frame subdivision ──────────────────────────────────────────────

/// Returns the processing frame length for `sample_rate_hz`: 10 ms of
/// audio, capped at the engine's maximum frame of [`MAX_FRAME_LENGTH`]
/// samples.
pub const fn frame_length(sample_rate_hz: usize) -> usize {
    let samples_per_10ms = sample_rate_hz / 100;
    if samples_per_10ms < MAX_FRAME_LENGTH {
        samples_per_10ms
    } else {
        MAX_FRAME_LENGTH
    }
}

/// Runs echo cancellation over a pair of equal-length sample buffers.
///
/// The buffers are split into frames of [`frame_length`] samples. For each
/// frame, the far-end chunk is buffered into the engine and the near-end
/// chunk is processed and overwritten in place with the cancelled audio.
/// `buffer_delay_ms` is forwarded verbatim to every per-frame process
/// call.
///
/// Trailing samples beyond the last complete frame are not consumed by
/// the engine and keep their original values; callers that need every
/// sample cancelled must supply frame-aligned buffer lengths.
///
/// On the first per-frame failure the loop stops: frames already written
/// stay written, later frames keep their original input, and the error is
/// returned ([`StreamError::FarendBuffering`] for a far-end buffering
/// failure, the engine's error unchanged otherwise). There are no retries
/// and no rollback.
pub fn process_stream<E: EchoControlMobile>(
    engine: &mut E,
    nearend: &mut [i16],
    farend: &[i16],
    sample_rate_hz: usize,
    buffer_delay_ms: i16,
) -> Result<(), StreamError> {
    debug_assert_eq!(nearend.len(), farend.len());

    let frame_len = frame_length(sample_rate_hz);
    if frame_len == 0 {
        return Ok(());
    }
    let frame_count = nearend.len() / frame_len;

    let mut cancelled = [0i16; MAX_FRAME_LENGTH];
    for i in 0..frame_count {
        let offset = i * frame_len;

        engine
            .buffer_farend(&farend[offset..offset + frame_len])
            .map_err(|_| StreamError::FarendBuffering)?;

        engine
            .process_frame(
                &nearend[offset..offset + frame_len],
                None,
                &mut cancelled[..frame_len],
                buffer_delay_ms,
            )
            .map_err(StreamError::Engine)?;

        nearend[offset..offset + frame_len].copy_from_slice(&cancelled[..frame_len]);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use aecm::{AecmConfig, MobileEchoControl};
    use proptest::prelude::*;
    use test_strategy::proptest;

    use super::*;

    // ─── Scripted engine ─────────────────────────────────────────

    /// Engine double that records the per-frame call sequence and can be
    /// scripted to fail at a given frame index.
    #[derive(Default)]
    struct ScriptedEngine {
        farend_frames: Vec<Vec<i16>>,
        process_calls: usize,
        fail_farend_at: Option<usize>,
        fail_process_at: Option<(usize, EngineError)>,
    }

    impl ScriptedEngine {
        fn new() -> Self {
            Self::default()
        }
    }

    impl EchoControlMobile for ScriptedEngine {
        fn init(&mut self, _sample_rate_hz: usize) -> Result<(), EngineError> {
            Ok(())
        }

        fn set_config(&mut self, _config: AecmConfig) -> Result<(), EngineError> {
            Ok(())
        }

        fn buffer_farend(&mut self, farend: &[i16]) -> Result<(), EngineError> {
            if self.fail_farend_at == Some(self.farend_frames.len()) {
                return Err(EngineError::Uninitialized);
            }
            self.farend_frames.push(farend.to_vec());
            Ok(())
        }

        fn process_frame(
            &mut self,
            nearend: &[i16],
            _nearend_clean: Option<&[i16]>,
            output: &mut [i16],
            _delay_ms: i16,
        ) -> Result<(), EngineError> {
            if let Some((at, error)) = self.fail_process_at
                && at == self.process_calls
            {
                return Err(error);
            }
            self.process_calls += 1;
            // Negate so "engine output" is distinguishable from input.
            for (out, &near) in output.iter_mut().zip(nearend) {
                *out = near.wrapping_neg();
            }
            Ok(())
        }
    }

    fn ramp(len: usize) -> Vec<i16> {
        (0..len).map(|i| i as i16 + 1).collect()
    }

    // ─── Frame length derivation ─────────────────────────────────

    #[test]
    fn frame_length_is_10ms_capped_at_160() {
        assert_eq!(frame_length(8000), 80);
        assert_eq!(frame_length(16000), 160);
        // Above 16 kHz the engine maximum applies, not rate / 100.
        assert_eq!(frame_length(48000), 160);
        assert_eq!(frame_length(44100), 160);
    }

    // ─── Full coverage ───────────────────────────────────────────

    #[test]
    fn aligned_buffer_is_fully_overwritten() {
        let mut engine = ScriptedEngine::new();
        let mut nearend = ramp(320);
        let farend = vec![9i16; 320];

        process_stream(&mut engine, &mut nearend, &farend, 16000, 40).unwrap();

        assert_eq!(engine.process_calls, 2);
        assert_eq!(engine.farend_frames.len(), 2);
        let expected: Vec<i16> = ramp(320).iter().map(|&s| -s).collect();
        assert_eq!(nearend, expected);
    }

    #[test]
    fn farend_frames_advance_in_lockstep() {
        let mut engine = ScriptedEngine::new();
        let mut nearend = vec![0i16; 240];
        let farend = ramp(240);

        process_stream(&mut engine, &mut nearend, &farend, 8000, 0).unwrap();

        assert_eq!(engine.farend_frames.len(), 3);
        for (i, frame) in engine.farend_frames.iter().enumerate() {
            assert_eq!(frame.as_slice(), &farend[i * 80..(i + 1) * 80]);
        }
    }

    // ─── Remainder preservation ──────────────────────────────────

    #[test]
    fn trailing_remainder_keeps_original_input() {
        let mut engine = ScriptedEngine::new();
        let mut nearend = ramp(400);
        let farend = vec![0i16; 400];

        process_stream(&mut engine, &mut nearend, &farend, 16000, 0).unwrap();

        assert_eq!(engine.process_calls, 2);
        // 400 = 2 * 160 + 80: the last 80 samples stay uncancelled.
        assert_eq!(&nearend[320..], &ramp(400)[320..]);
        let expected_head: Vec<i16> = ramp(400)[..320].iter().map(|&s| -s).collect();
        assert_eq!(&nearend[..320], expected_head.as_slice());
    }

    #[test]
    fn buffer_shorter_than_one_frame_is_untouched() {
        let mut engine = ScriptedEngine::new();
        let mut nearend = ramp(100);
        let farend = vec![0i16; 100];

        process_stream(&mut engine, &mut nearend, &farend, 16000, 0).unwrap();

        assert_eq!(engine.process_calls, 0);
        assert_eq!(nearend, ramp(100));
    }

    // ─── Failure semantics ───────────────────────────────────────

    #[test]
    fn farend_failure_stops_loop_and_keeps_committed_frames() {
        let mut engine = ScriptedEngine::new();
        engine.fail_farend_at = Some(1);
        let mut nearend = ramp(480);
        let farend = vec![0i16; 480];

        let result = process_stream(&mut engine, &mut nearend, &farend, 16000, 0);

        assert_eq!(result, Err(StreamError::FarendBuffering));
        // Frame 0 committed, frames 1.. untouched.
        let expected_head: Vec<i16> = ramp(480)[..160].iter().map(|&s| -s).collect();
        assert_eq!(&nearend[..160], expected_head.as_slice());
        assert_eq!(&nearend[160..], &ramp(480)[160..]);
        assert_eq!(engine.process_calls, 1);
    }

    #[test]
    fn engine_error_is_propagated_verbatim() {
        let mut engine = ScriptedEngine::new();
        engine.fail_process_at = Some((1, EngineError::BadDelay));
        let mut nearend = ramp(480);
        let farend = vec![0i16; 480];

        let result = process_stream(&mut engine, &mut nearend, &farend, 16000, 0);

        assert_eq!(result, Err(StreamError::Engine(EngineError::BadDelay)));
        let expected_head: Vec<i16> = ramp(480)[..160].iter().map(|&s| -s).collect();
        assert_eq!(&nearend[..160], expected_head.as_slice());
        assert_eq!(&nearend[160..], &ramp(480)[160..]);
        // The failing frame's far-end chunk was already buffered.
        assert_eq!(engine.farend_frames.len(), 2);
    }

    #[test]
    fn failure_on_first_frame_leaves_everything_unchanged() {
        let mut engine = ScriptedEngine::new();
        engine.fail_farend_at = Some(0);
        let mut nearend = ramp(320);
        let farend = vec![0i16; 320];

        let result = process_stream(&mut engine, &mut nearend, &farend, 16000, 0);

        assert_eq!(result, Err(StreamError::FarendBuffering));
        assert_eq!(nearend, ramp(320));
        assert_eq!(engine.process_calls, 0);
    }

    // ─── Real engine integration ─────────────────────────────────

    #[test]
    fn lifecycle_without_processing() {
        let mut engine = MobileEchoControl::new();
        engine.init(16000).unwrap();
        drop(engine);
    }

    #[test]
    fn two_frame_stream_through_real_engine() {
        let mut engine = MobileEchoControl::new();
        engine.init(16000).unwrap();

        let mut nearend = vec![1000i16; 320];
        let farend = vec![1000i16; 320];
        process_stream(&mut engine, &mut nearend, &farend, 16000, 0).unwrap();
        // Two full frames processed; the whole buffer was rewritten by the
        // engine (suppression makes it quieter than the input).
        let residual: i64 = nearend.iter().map(|&s| i64::from(s).abs()).sum();
        assert!(residual < 1000 * 320);
    }

    #[test]
    fn delay_out_of_range_surfaces_engine_error() {
        let mut engine = MobileEchoControl::new();
        engine.init(16000).unwrap();

        let mut nearend = vec![0i16; 160];
        let farend = vec![0i16; 160];
        let result = process_stream(&mut engine, &mut nearend, &farend, 16000, 600);
        assert_eq!(result, Err(StreamError::Engine(EngineError::BadDelay)));
    }

    // ─── Properties ──────────────────────────────────────────────

    #[proptest]
    fn remainder_is_never_modified(
        #[strategy(0..2000usize)] sample_count: usize,
        #[strategy(prop::sample::select(vec![8000usize, 16000]))] rate: usize,
    ) {
        let mut engine = ScriptedEngine::new();
        let original = ramp(sample_count);
        let mut nearend = original.clone();
        let farend = vec![0i16; sample_count];

        process_stream(&mut engine, &mut nearend, &farend, rate, 0).unwrap();

        let frame_len = frame_length(rate);
        let cancelled_len = (sample_count / frame_len) * frame_len;
        prop_assert_eq!(&nearend[cancelled_len..], &original[cancelled_len..]);
        prop_assert_eq!(engine.process_calls, sample_count / frame_len);
    }

    #[proptest]
    fn every_complete_frame_is_overwritten(#[strategy(0..1500usize)] sample_count: usize) {
        let mut engine = ScriptedEngine::new();
        let original = ramp(sample_count);
        let mut nearend = original.clone();
        let farend = vec![0i16; sample_count];

        process_stream(&mut engine, &mut nearend, &farend, 16000, 0).unwrap();

        let cancelled_len = (sample_count / 160) * 160;
        for i in 0..cancelled_len {
            prop_assert_eq!(nearend[i], -original[i]);
        }
    }
}
