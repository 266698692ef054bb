//! Exported `extern "C"` functions for the AECM C API.
//!
//! # Symbol prefix
//!
//! All public symbols use the `aecm_` prefix.

use std::slice;

use aecm::{EchoControlMobile, MobileEchoControl};

use crate::frame_adapter::process_stream;

use super::conversions::config_from_raw;
use super::panic_guard::{ffi_guard, ffi_guard_ptr};
use super::types::{AecmHandle, AecmStatus};

// ─── Version ─────────────────────────────────────────────────────────

/// Returns a pointer to a static null-terminated version string.
///
/// The returned pointer is valid for the lifetime of the process.
#[unsafe(no_mangle)]
pub extern "C" fn aecm_version() -> *const std::ffi::c_char {
    // Safety: the byte string is a static literal with a trailing NUL.
    c"0.1.0".as_ptr()
}

// ─── Lifecycle ───────────────────────────────────────────────────────

/// Creates a new, uninitialized echo control instance.
///
/// Returns `NULL` on allocation failure or internal error. The caller
/// owns the returned pointer and must free it with [`aecm_free()`].
#[unsafe(no_mangle)]
pub extern "C" fn aecm_create() -> *mut AecmHandle {
    ffi_guard_ptr! {
        let boxed = Box::new(AecmHandle {
            inner: MobileEchoControl::new(),
        });
        Box::into_raw(boxed)
    }
}

/// Destroys an echo control instance and frees its memory.
///
/// Passing `NULL` is a safe no-op. After this call the pointer is invalid.
#[unsafe(no_mangle)]
pub extern "C" fn aecm_free(handle: *mut AecmHandle) {
    if !handle.is_null() {
        // Safety: we created this pointer via Box::into_raw in aecm_create,
        // and the caller guarantees single ownership.
        let _ = unsafe { Box::from_raw(handle) };
    }
}

/// Initializes the instance for `sample_rate_hz` (8000 or 16000),
/// resetting all internal state.
///
/// Must be called before any buffering or processing call.
#[unsafe(no_mangle)]
pub extern "C" fn aecm_init(handle: *mut AecmHandle, sample_rate_hz: i32) -> AecmStatus {
    ffi_guard! {
        if handle.is_null() {
            return AecmStatus::NullPointer;
        }
        if sample_rate_hz <= 0 {
            return AecmStatus::UnsupportedRate;
        }
        // Safety: the caller guarantees the pointer is valid and not aliased.
        let handle = unsafe { &mut *handle };
        match handle.inner.init(sample_rate_hz as usize) {
            Ok(()) => AecmStatus::None,
            Err(e) => e.into(),
        }
    }
}

// ─── Configuration ───────────────────────────────────────────────────

/// Applies comfort-noise and routing configuration.
///
/// `cng_mode` is 0 (off) or 1 (on); `echo_mode` selects the routing mode
/// in `0..=4`, from quiet earpiece/headset up to loud speakerphone.
#[unsafe(no_mangle)]
pub extern "C" fn aecm_set_config(
    handle: *mut AecmHandle,
    cng_mode: i16,
    echo_mode: i16,
) -> AecmStatus {
    ffi_guard! {
        if handle.is_null() {
            return AecmStatus::NullPointer;
        }
        // Safety: the caller guarantees the pointer is valid and not aliased.
        let handle = unsafe { &mut *handle };
        let config = match config_from_raw(cng_mode, echo_mode) {
            Ok(config) => config,
            Err(e) => return e.into(),
        };
        match handle.inner.set_config(config) {
            Ok(()) => AecmStatus::None,
            Err(e) => e.into(),
        }
    }
}

// ─── Caller-framed processing ────────────────────────────────────────

/// Buffers `num_samples` far-end reference samples (pre-chunked callers).
///
/// `num_samples` must be a non-empty multiple of the engine frame length
/// (80 at 8 kHz, 160 at 16 kHz).
#[unsafe(no_mangle)]
pub extern "C" fn aecm_buffer_farend(
    handle: *mut AecmHandle,
    farend: *const i16,
    num_samples: usize,
) -> AecmStatus {
    ffi_guard! {
        if handle.is_null() || farend.is_null() {
            return AecmStatus::NullPointer;
        }
        // Safety: the caller guarantees `farend` points to `num_samples`
        // readable samples, and the handle is valid and not aliased.
        let handle = unsafe { &mut *handle };
        let farend = unsafe { slice::from_raw_parts(farend, num_samples) };
        match handle.inner.buffer_farend(farend) {
            Ok(()) => AecmStatus::None,
            Err(e) => e.into(),
        }
    }
}

/// Processes exactly one near-end frame against the buffered far-end
/// reference (pre-chunked callers).
///
/// `nearend_clean` may be `NULL`; when non-null it is a noise-suppressed
/// copy of the frame and is used as the signal to clean up. `frame_len`
/// must equal the engine frame length. The cancelled frame is written to
/// `output`, which may not overlap `nearend`.
#[unsafe(no_mangle)]
pub extern "C" fn aecm_process_frame(
    handle: *mut AecmHandle,
    nearend: *const i16,
    nearend_clean: *const i16,
    output: *mut i16,
    frame_len: usize,
    delay_ms: i16,
) -> AecmStatus {
    ffi_guard! {
        if handle.is_null() || nearend.is_null() || output.is_null() {
            return AecmStatus::NullPointer;
        }
        // Safety: the caller guarantees `nearend` (and `nearend_clean`
        // when non-null) point to `frame_len` readable samples, `output`
        // to `frame_len` writable samples not overlapping them, and the
        // handle is valid and not aliased.
        let handle = unsafe { &mut *handle };
        let nearend = unsafe { slice::from_raw_parts(nearend, frame_len) };
        let clean = if nearend_clean.is_null() {
            None
        } else {
            Some(unsafe { slice::from_raw_parts(nearend_clean, frame_len) })
        };
        let output = unsafe { slice::from_raw_parts_mut(output, frame_len) };
        match handle.inner.process_frame(nearend, clean, output, delay_ms) {
            Ok(()) => AecmStatus::None,
            Err(e) => e.into(),
        }
    }
}

// ─── Adapter-framed processing ───────────────────────────────────────

/// Runs echo cancellation over arbitrary-length buffers, framing them
/// internally.
///
/// `nearend` and `farend` must both hold `num_samples` samples at
/// `sample_rate_hz`. The near-end buffer is overwritten in place with the
/// cancelled audio, one engine frame at a time; trailing samples beyond
/// the last complete frame keep their original values. `delay_ms` is the
/// estimated hardware buffering delay, forwarded to every frame.
///
/// Stops at the first per-frame failure: already-written frames stay
/// written, and the return value is `-1` if far-end buffering failed or
/// the engine's own status code otherwise.
#[unsafe(no_mangle)]
pub extern "C" fn aecm_process(
    handle: *mut AecmHandle,
    nearend: *mut i16,
    farend: *const i16,
    num_samples: usize,
    sample_rate_hz: i32,
    delay_ms: i16,
) -> AecmStatus {
    ffi_guard! {
        if handle.is_null() || nearend.is_null() || farend.is_null() {
            return AecmStatus::NullPointer;
        }
        // Safety: the caller guarantees `nearend` points to `num_samples`
        // writable samples, `farend` to `num_samples` readable samples not
        // overlapping them, and the handle is valid and not aliased.
        let handle = unsafe { &mut *handle };
        let nearend = unsafe { slice::from_raw_parts_mut(nearend, num_samples) };
        let farend = unsafe { slice::from_raw_parts(farend, num_samples) };
        let rate = sample_rate_hz.max(0) as usize;
        match process_stream(&mut handle.inner, nearend, farend, rate, delay_ms) {
            Ok(()) => AecmStatus::None,
            Err(e) => e.into(),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
