//! Mozilla ISPDB directory lookup.

use async_trait::async_trait;

use super::autoconfig::{HTTP_TIMEOUT, http_client};
use super::{LookupOutcome, ProviderError, StrategyProvider, document};

const ISPDB_BASE: &str = "https://autoconfig.thunderbird.net/v1.1";

/// Third-priority strategy: the community-maintained ISPDB.
///
/// Not authoritative for the domain, but it covers most well-known
/// providers. Serves the same document format as domain autoconfig.
pub struct MozillaAutoconfigLookup {
    client: reqwest::Client,
    base_url: String,
}

impl MozillaAutoconfigLookup {
    /// Create a lookup against the public ISPDB.
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(http_client(HTTP_TIMEOUT))
    }

    /// Create a lookup over a caller-configured HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: ISPDB_BASE.to_owned(),
        }
    }

    /// Point the lookup at a different directory service.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch(&self, domain: &str) -> Result<Option<String>, ProviderError> {
        let url = format!("{}/{domain}", self.base_url);
        tracing::debug!(%url, "querying ISPDB");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status.is_client_error() {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }
        Ok(Some(response.text().await?))
    }
}

impl Default for MozillaAutoconfigLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StrategyProvider for MozillaAutoconfigLookup {
    fn name(&self) -> &'static str {
        "mozilla-ispdb"
    }

    async fn resolve(&self, _local_part: &str, domain: &str) -> LookupOutcome {
        match self.fetch(domain).await {
            Ok(Some(xml)) => document::parse(&xml).into(),
            Ok(None) => LookupOutcome::NotFound,
            Err(err) => LookupOutcome::Failed(err),
        }
    }
}
