//! Mobile echo control (AECM) engine.
//!
//! A low-complexity acoustic echo canceller for mobile use cases: the
//! far-end (loudspeaker) reference is buffered ahead of time, and each
//! near-end (microphone) frame is processed against a delay-aligned slice
//! of that reference.
//!
//! The engine works on fixed 10 ms frames of 16-bit samples at 8 or
//! 16 kHz. Callers that hold arbitrary-length buffers should use the
//! frame adapter in the `aecm-bridge` crate instead of calling the
//! per-frame API directly.

#![deny(unsafe_code)]

pub mod config;
mod echo_control;
mod farend_buffer;
mod suppressor;

pub use config::{AecmConfig, CngMode, RoutingMode};
pub use echo_control::{EchoControlMobile, Error, MobileEchoControl};

/// Samples per 10 ms frame at 8 kHz.
pub const FRAME_LENGTH_8KHZ: usize = 80;

/// Samples per 10 ms frame at 16 kHz, and the largest frame the engine
/// accepts.
pub const MAX_FRAME_LENGTH: usize = 160;

/// Sample rates the engine can be initialized with.
pub const SUPPORTED_SAMPLE_RATES: [usize; 2] = [8000, 16000];

/// Upper bound on the reported sound-card buffering delay.
pub const MAX_DELAY_MS: i16 = 500;

/// Returns the engine frame length for a supported sample rate.
pub const fn frame_length_for_rate(sample_rate_hz: usize) -> usize {
    sample_rate_hz / 100
}
