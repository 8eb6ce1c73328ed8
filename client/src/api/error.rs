//! Error types for the marketplace API gateway

use thiserror::Error;

/// Normalized errors surfaced by the API gateway
///
/// Every failure mode of an outbound request collapses into one of these
/// variants so callers can surface a single user-visible message.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The service reported a failure
    ///
    /// Either a non-2xx response or a `success: false` envelope. Displays as
    /// exactly the service-provided message.
    #[error("{message}")]
    Api {
        /// HTTP status, when the failure came from a non-2xx response
        status: Option<u16>,
        /// Service-provided message (or a generic HTTP-status message)
        message: String,
    },

    /// HTTP request failed before a response was received
    #[error("Request failed: {0}")]
    Transport(String),

    /// Response body could not be parsed as an envelope
    #[error("Response parsing failed: {0}")]
    Parse(String),
}
