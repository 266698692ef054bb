//! Frame adapter and C API for the AECM engine.
//!
//! The engine in the `aecm` crate only accepts fixed 10 ms frames, while
//! applications typically hold audio in arbitrary-length buffers. This
//! crate bridges the two: [`process_stream`] subdivides caller buffers
//! into engine frames, drives the buffer-then-process cycle per frame,
//! and writes the cancelled audio back in place.
//!
//! The [`ffi`] module exposes the whole surface with C linkage for
//! consumption from other languages.

pub mod ffi;
mod frame_adapter;

pub use frame_adapter::{frame_length, process_stream, StreamError};
