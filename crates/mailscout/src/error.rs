//! Error types for settings discovery.

use thiserror::Error;

/// Errors that can cross the discovery boundary.
///
/// Per-provider failures (network, DNS, malformed documents) never surface
/// here; they only drive fallback to the next provider.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The input was not a `local@domain` address.
    #[error("invalid email address: {0:?}")]
    InvalidAddress(String),

    /// Every provider was tried and none produced a configuration.
    #[error("unable to discover mail configuration for {0:?}")]
    Unresolvable(String),
}

/// Result type alias using our error type.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
