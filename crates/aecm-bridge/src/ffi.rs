//! C-compatible FFI layer for the AECM bridge.
//!
//! This module exposes `extern "C"` functions and `#[repr(C)]` types that
//! allow C and C++ consumers to use the engine and the frame adapter.
//!
//! # Symbol prefix
//!
//! - Functions: `aecm_*`
//! - Types: `Aecm*`
//!
//! # Binding shapes
//!
//! Two entry points cover both caller sophistication levels:
//! [`aecm_process`](functions::aecm_process) takes arbitrary-length
//! buffers and frames them internally, while
//! [`aecm_buffer_farend`](functions::aecm_buffer_farend) plus
//! [`aecm_process_frame`](functions::aecm_process_frame) give pre-chunking
//! callers direct per-frame control.
//!
//! # Thread safety
//!
//! **NOT thread-safe.** All calls on the same [`AecmHandle`](types::AecmHandle)
//! must be serialized by the caller.

pub mod types;

mod conversions;
pub mod functions;
mod panic_guard;
