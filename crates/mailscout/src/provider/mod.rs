//! Discovery strategy providers.
//!
//! Each provider maps `(local_part, domain)` to a [`LookupOutcome`]. The
//! orchestrator in [`crate::discovery`] only depends on this contract; how a
//! provider reaches its answer (static table, HTTP fetch, DNS lookup) is its
//! own business.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::Config;

mod autoconfig;
mod document;
mod ispdb;
mod known;
mod mx;

pub use autoconfig::DomainAutoconfigLookup;
pub(crate) use autoconfig::{HTTP_TIMEOUT, http_client};
pub use ispdb::MozillaAutoconfigLookup;
pub use known::KnownDomainLookup;
pub use mx::MxRecordLookup;

/// Failure inside a single provider.
///
/// These never cross the discovery boundary; the orchestrator logs them and
/// moves on to the next provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP transport failure (connect, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// DNS resolution failure.
    #[error("DNS lookup failed: {0}")]
    Dns(#[from] hickory_resolver::error::ResolveError),

    /// The server answered, but with an unusable status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The fetched document could not be parsed into a configuration.
    #[error("malformed autoconfig document: {0}")]
    Document(String),
}

/// Result of invoking one provider.
///
/// Absence is a value, not a failure: a provider that ran fine but has no
/// answer returns [`LookupOutcome::NotFound`]. Only a transport or parse
/// failure inside the provider produces [`LookupOutcome::Failed`].
#[derive(Debug)]
pub enum LookupOutcome {
    /// The provider produced a configuration.
    Found(Config),
    /// The provider ran successfully but has no match for this domain.
    NotFound,
    /// The provider itself failed (network, DNS, malformed document).
    Failed(ProviderError),
}

impl LookupOutcome {
    /// Extract the configuration, if any.
    #[must_use]
    pub fn into_config(self) -> Option<Config> {
        match self {
            Self::Found(config) => Some(config),
            Self::NotFound | Self::Failed(_) => None,
        }
    }
}

impl From<Result<Config, ProviderError>> for LookupOutcome {
    fn from(result: Result<Config, ProviderError>) -> Self {
        match result {
            Ok(config) => Self::Found(config),
            Err(err) => Self::Failed(err),
        }
    }
}

/// A single discovery strategy.
///
/// Implementations must be cheap to share across calls; the orchestrator
/// holds them for its lifetime and may invoke them concurrently.
#[async_trait]
pub trait StrategyProvider: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Try to resolve a configuration for `local_part@domain`.
    async fn resolve(&self, local_part: &str, domain: &str) -> LookupOutcome;
}
