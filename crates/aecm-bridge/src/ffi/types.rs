//! C-compatible type definitions for the AECM C API.
//!
//! All types here are `#[repr(C)]`/`#[repr(i32)]` and are safe to pass
//! across FFI boundaries.

use aecm::MobileEchoControl;

// ---------------------------------------------------------------------------
// Status codes
// ---------------------------------------------------------------------------

/// Status codes returned by C API functions.
///
/// `0` = success. `-1..=-3` are generic bridge statuses; `-10` and below
/// are the engine's native codes, forwarded unchanged by the processing
/// entry points.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AecmStatus {
    /// Operation succeeded.
    None = 0,
    /// Far-end buffering failed inside the stream loop. The engine's own
    /// code is not reported for this step.
    FarendBuffering = -1,
    /// Null pointer passed to a function that requires non-null.
    NullPointer = -2,
    /// Internal error (panic caught at FFI boundary).
    Internal = -3,
    /// Engine: sample rate is not 8000 or 16000.
    UnsupportedRate = -10,
    /// Engine: used before initialization.
    Uninitialized = -11,
    /// Engine: buffer length does not match the frame length.
    BadFrameLength = -12,
    /// Engine: sound-card delay out of range.
    BadDelay = -13,
    /// Engine: comfort noise mode is not 0 or 1.
    BadCngMode = -14,
    /// Engine: routing mode is outside 0..=4.
    BadEchoMode = -15,
}

// ---------------------------------------------------------------------------
// Opaque handle
// ---------------------------------------------------------------------------

/// Opaque handle to one echo control instance.
///
/// Created via `aecm_create()`, destroyed via `aecm_free()`.
///
/// **NOT thread-safe**: all calls on the same handle must be serialized.
pub struct AecmHandle {
    pub(crate) inner: MobileEchoControl,
}
