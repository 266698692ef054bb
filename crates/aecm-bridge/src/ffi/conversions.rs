//! Conversions between Rust error types and C status codes.

use aecm::{AecmConfig, CngMode, Error as EngineError, RoutingMode};

use crate::frame_adapter::StreamError;

use super::types::AecmStatus;

impl From<EngineError> for AecmStatus {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::UnsupportedRate => Self::UnsupportedRate,
            EngineError::Uninitialized => Self::Uninitialized,
            EngineError::BadFrameLength => Self::BadFrameLength,
            EngineError::BadDelay => Self::BadDelay,
            EngineError::BadCngMode => Self::BadCngMode,
            EngineError::BadEchoMode => Self::BadEchoMode,
        }
    }
}

impl From<StreamError> for AecmStatus {
    fn from(error: StreamError) -> Self {
        match error {
            StreamError::FarendBuffering => Self::FarendBuffering,
            StreamError::Engine(e) => e.into(),
        }
    }
}

/// Validates raw C configuration values into a typed [`AecmConfig`].
pub(crate) fn config_from_raw(cng_mode: i16, echo_mode: i16) -> Result<AecmConfig, EngineError> {
    Ok(AecmConfig {
        cng: CngMode::try_from(cng_mode)?,
        routing: RoutingMode::try_from(echo_mode)?,
    })
}
