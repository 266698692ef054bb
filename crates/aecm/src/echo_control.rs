//! The engine boundary: the [`EchoControlMobile`] trait and its concrete
//! implementation, [`MobileEchoControl`].
//!
//! The trait captures the engine's per-call contract — initialization,
//! configuration, far-end buffering, per-frame processing — so callers
//! (notably the frame adapter in `aecm-bridge`) can be exercised against
//! scripted engines in tests.

use crate::config::AecmConfig;
use crate::farend_buffer::FarendBuffer;
use crate::suppressor::EchoSuppressor;
use crate::{MAX_DELAY_MS, MAX_FRAME_LENGTH, SUPPORTED_SAMPLE_RATES};

// ─── Error ───────────────────────────────────────────────────────────

/// Errors reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Sample rate passed to `init` is not 8000 or 16000.
    UnsupportedRate,
    /// The engine was used before `init`.
    Uninitialized,
    /// A buffer length does not match the engine frame length.
    BadFrameLength,
    /// Reported sound-card delay is outside `[0, 500]` ms.
    BadDelay,
    /// Raw comfort-noise mode is not 0 or 1.
    BadCngMode,
    /// Raw routing mode is outside `0..=4`.
    BadEchoMode,
}

impl Error {
    /// The engine's native status code for this error.
    ///
    /// Codes are negative and disjoint from the generic statuses used at
    /// the C boundary (`0`, `-1`, `-2`, `-3`).
    pub const fn status_code(self) -> i32 {
        match self {
            Self::UnsupportedRate => -10,
            Self::Uninitialized => -11,
            Self::BadFrameLength => -12,
            Self::BadDelay => -13,
            Self::BadCngMode => -14,
            Self::BadEchoMode => -15,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedRate => write!(f, "unsupported sample rate"),
            Self::Uninitialized => write!(f, "engine not initialized"),
            Self::BadFrameLength => write!(f, "bad frame length"),
            Self::BadDelay => write!(f, "sound-card delay out of range"),
            Self::BadCngMode => write!(f, "bad comfort noise mode"),
            Self::BadEchoMode => write!(f, "bad routing mode"),
        }
    }
}

impl std::error::Error for Error {}

// ─── Boundary trait ──────────────────────────────────────────────────

/// Per-call contract of a mobile echo control engine.
///
/// Calling any method other than [`init`](Self::init) on an engine that
/// has not been initialized returns [`Error::Uninitialized`].
pub trait EchoControlMobile {
    /// Initializes the engine for `sample_rate_hz` (8000 or 16000),
    /// resetting all internal state including the applied configuration.
    fn init(&mut self, sample_rate_hz: usize) -> Result<(), Error>;

    /// Applies a new configuration.
    fn set_config(&mut self, config: AecmConfig) -> Result<(), Error>;

    /// Buffers far-end (loudspeaker) reference samples. `farend` must be a
    /// non-empty multiple of the engine frame length.
    fn buffer_farend(&mut self, farend: &[i16]) -> Result<(), Error>;

    /// Processes one near-end frame against the buffered far-end
    /// reference, writing the echo-suppressed frame to `output`.
    ///
    /// `nearend_clean`, when provided, is a noise-suppressed copy of the
    /// near-end frame and is used as the signal to clean up instead of the
    /// raw input. All slices must have exactly the engine frame length.
    /// `delay_ms` is the reported hardware buffering delay in `[0, 500]`.
    fn process_frame(
        &mut self,
        nearend: &[i16],
        nearend_clean: Option<&[i16]>,
        output: &mut [i16],
        delay_ms: i16,
    ) -> Result<(), Error>;
}

// ─── Engine ──────────────────────────────────────────────────────────

/// Far-end history capacity: the maximum reportable delay plus one frame
/// of slack, at the highest supported rate.
const FAREND_CAPACITY: usize = 16_000 * MAX_DELAY_MS as usize / 1000 + MAX_FRAME_LENGTH;

/// The mobile echo control engine.
///
/// Create with [`MobileEchoControl::new`], then [`init`](EchoControlMobile::init)
/// before any other call. Dropping the engine releases all resources.
///
/// Not thread-safe beyond what `&mut self` already enforces: one call at a
/// time per instance.
#[derive(derive_more::Debug)]
pub struct MobileEchoControl {
    sample_rate_hz: usize,
    frame_len: usize,
    initialized: bool,
    config: AecmConfig,
    #[debug(skip)]
    farend: FarendBuffer,
    suppressor: EchoSuppressor,
}

impl MobileEchoControl {
    pub fn new() -> Self {
        Self {
            sample_rate_hz: 0,
            frame_len: 0,
            initialized: false,
            config: AecmConfig::default(),
            farend: FarendBuffer::new(FAREND_CAPACITY),
            suppressor: EchoSuppressor::new(),
        }
    }

    /// The configuration currently in effect.
    pub fn config(&self) -> AecmConfig {
        self.config
    }

    /// The sample rate the engine was initialized with, if any.
    pub fn sample_rate_hz(&self) -> Option<usize> {
        self.initialized.then_some(self.sample_rate_hz)
    }

    fn check_initialized(&self) -> Result<(), Error> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::Uninitialized)
        }
    }
}

impl Default for MobileEchoControl {
    fn default() -> Self {
        Self::new()
    }
}

impl EchoControlMobile for MobileEchoControl {
    fn init(&mut self, sample_rate_hz: usize) -> Result<(), Error> {
        if !SUPPORTED_SAMPLE_RATES.contains(&sample_rate_hz) {
            return Err(Error::UnsupportedRate);
        }
        self.sample_rate_hz = sample_rate_hz;
        self.frame_len = crate::frame_length_for_rate(sample_rate_hz);
        self.config = AecmConfig::default();
        self.farend.clear();
        self.suppressor.reset();
        self.initialized = true;
        Ok(())
    }

    fn set_config(&mut self, config: AecmConfig) -> Result<(), Error> {
        self.check_initialized()?;
        self.config = config;
        Ok(())
    }

    fn buffer_farend(&mut self, farend: &[i16]) -> Result<(), Error> {
        self.check_initialized()?;
        if farend.is_empty() || farend.len() % self.frame_len != 0 {
            return Err(Error::BadFrameLength);
        }

        for chunk in farend.chunks(self.frame_len) {
            let flushed = self.farend.write(chunk);
            if flushed > 0 {
                tracing::warn!(flushed, "far-end buffer overflow, oldest samples dropped");
            }
        }
        Ok(())
    }

    fn process_frame(
        &mut self,
        nearend: &[i16],
        nearend_clean: Option<&[i16]>,
        output: &mut [i16],
        delay_ms: i16,
    ) -> Result<(), Error> {
        self.check_initialized()?;
        if nearend.len() != self.frame_len || output.len() != self.frame_len {
            return Err(Error::BadFrameLength);
        }
        if let Some(clean) = nearend_clean
            && clean.len() != self.frame_len
        {
            return Err(Error::BadFrameLength);
        }
        if !(0..=MAX_DELAY_MS).contains(&delay_ms) {
            return Err(Error::BadDelay);
        }

        // The echo in this near-end frame was played `delay_ms` ago, so the
        // reference is consumed only once the buffered history spans that
        // far back. Until then the frame passes through uncancelled.
        let delay_samples = delay_ms as usize * self.sample_rate_hz / 1000;
        let target_depth = delay_samples + self.frame_len;
        let excess = self.farend.len().saturating_sub(target_depth + self.frame_len);
        if excess > 0 {
            let discarded = self.farend.discard(excess);
            tracing::warn!(discarded, "far-end buffer ran ahead, trimmed to delay");
        }

        let mut reference = [0i16; MAX_FRAME_LENGTH];
        if self.farend.len() >= target_depth {
            self.farend.read(&mut reference[..self.frame_len]);
        }

        let input = nearend_clean.unwrap_or(nearend);
        self.suppressor
            .process(input, &reference[..self.frame_len], self.config, output);
        Ok(())
    }
}
