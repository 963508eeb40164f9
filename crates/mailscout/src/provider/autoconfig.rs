//! Autoconfig documents hosted by the domain itself.

use std::time::Duration;

use async_trait::async_trait;

use super::{LookupOutcome, ProviderError, StrategyProvider, document};

/// Default per-request timeout for autoconfig fetches.
pub(crate) const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Build an HTTP client with the per-request timeout applied.
///
/// A builder carrying nothing but a timeout cannot fail to build, so the
/// fallback arm is never taken.
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Second-priority strategy: the domain's own autoconfig endpoint.
///
/// Authoritative (the domain vouches for itself) but needs a live network
/// round trip. Tries the Thunderbird-convention URLs in order: the
/// `autoconfig.` subdomain, then the well-known path on the domain itself.
pub struct DomainAutoconfigLookup {
    client: reqwest::Client,
}

impl DomainAutoconfigLookup {
    /// Create a lookup with the default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(http_client(HTTP_TIMEOUT))
    }

    /// Create a lookup over a caller-configured HTTP client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch one candidate URL.
    ///
    /// `Ok(None)` means the server answered negatively (4xx): the document
    /// simply is not there, which is a clean no-match for this URL.
    async fn fetch(&self, url: &str) -> Result<Option<String>, ProviderError> {
        tracing::debug!(url, "fetching autoconfig document");
        let response = self.client.get(url).send().await?;
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

impl Default for DomainAutoconfigLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StrategyProvider for DomainAutoconfigLookup {
    fn name(&self) -> &'static str {
        "domain-autoconfig"
    }

    async fn resolve(&self, local_part: &str, domain: &str) -> LookupOutcome {
        let urls = [
            format!(
                "https://autoconfig.{domain}/mail/config-v1.1.xml?emailaddress={local_part}@{domain}"
            ),
            format!("https://{domain}/.well-known/autoconfig/mail/config-v1.1.xml"),
        ];

        let mut last_failure = None;
        for url in &urls {
            match self.fetch(url).await {
                Ok(Some(xml)) => return document::parse(&xml).into(),
                Ok(None) => {}
                Err(err) => {
                    tracing::debug!(%url, %err, "autoconfig fetch failed");
                    last_failure = Some(err);
                }
            }
        }

        // A negative answer from every URL is a clean miss; a transport
        // failure on the last attempt is a provider failure.
        last_failure.map_or(LookupOutcome::NotFound, LookupOutcome::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_client_builds_with_timeout() {
        // The timeout-only builder path must never fall back to a
        // default-configured client.
        let _client = http_client(Duration::from_secs(1));
        let _client = http_client(HTTP_TIMEOUT);
    }
}
