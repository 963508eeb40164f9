//! The resolution orchestrator.

use futures::future::join_all;

use crate::address::EmailAddress;
use crate::config::Config;
use crate::error::{DiscoveryError, Result};
use crate::provider::{
    DomainAutoconfigLookup, KnownDomainLookup, LookupOutcome, MozillaAutoconfigLookup,
    MxRecordLookup, StrategyProvider,
};

/// Orchestrates the discovery strategies in fixed priority order.
///
/// The order is a design decision, not an accident: each step trades
/// authority for availability. Curated data comes first (correct and free),
/// then the domain's own autoconfig declaration, then the community ISPDB,
/// and finally heuristic inference from MX records.
///
/// The provider list is built once and read-only afterwards; a `Discovery`
/// holds no per-call state and can be shared freely across tasks.
pub struct Discovery {
    providers: Vec<Box<dyn StrategyProvider>>,
}

impl Discovery {
    /// Create an orchestrator over the four default strategies.
    #[must_use]
    pub fn new() -> Self {
        let client = crate::provider::http_client(crate::provider::HTTP_TIMEOUT);
        Self::with_providers(vec![
            Box::new(KnownDomainLookup::new()),
            Box::new(DomainAutoconfigLookup::with_client(client.clone())),
            Box::new(MozillaAutoconfigLookup::with_client(client)),
            Box::new(MxRecordLookup::new()),
        ])
    }

    /// Create an orchestrator over an explicit, ordered provider list.
    ///
    /// Earlier entries take priority. Intended for callers that want to
    /// reorder, drop, or substitute strategies, and for tests injecting
    /// doubles.
    #[must_use]
    pub fn with_providers(providers: Vec<Box<dyn StrategyProvider>>) -> Self {
        Self { providers }
    }

    /// Resolve the cheapest acceptable configuration for an address.
    ///
    /// Providers are tried strictly in priority order and evaluation stops
    /// at the first hit. A provider that finds nothing and a provider that
    /// fails outright are treated the same way: fall through to the next
    /// one. Failures are logged, never propagated.
    ///
    /// # Errors
    ///
    /// [`DiscoveryError::InvalidAddress`] if the input is not a
    /// `local@domain` string, or [`DiscoveryError::Unresolvable`] when every
    /// provider has been tried without a hit.
    pub async fn discover_first(&self, raw_email: &str) -> Result<Config> {
        let address = EmailAddress::parse(raw_email)?;

        for provider in &self.providers {
            match provider
                .resolve(&address.local_part, &address.domain)
                .await
            {
                LookupOutcome::Found(config) => {
                    tracing::info!(
                        provider = provider.name(),
                        domain = %address.domain,
                        "configuration discovered"
                    );
                    return Ok(config);
                }
                LookupOutcome::NotFound => {
                    tracing::debug!(
                        provider = provider.name(),
                        domain = %address.domain,
                        "no match"
                    );
                }
                LookupOutcome::Failed(err) => {
                    tracing::warn!(
                        provider = provider.name(),
                        domain = %address.domain,
                        %err,
                        "provider failed, trying next"
                    );
                }
            }
        }

        Err(DiscoveryError::Unresolvable(address.domain))
    }

    /// Resolve every candidate configuration for an address.
    ///
    /// All providers run regardless of each other's outcomes, concurrently,
    /// so one early success never suppresses a lower-priority candidate.
    /// The result preserves provider priority order, not completion order,
    /// and an empty list is a valid answer rather than an error.
    ///
    /// # Errors
    ///
    /// Only [`DiscoveryError::InvalidAddress`]; exhaustion is represented by
    /// the empty list.
    pub async fn discover_all(&self, raw_email: &str) -> Result<Vec<Config>> {
        let address = EmailAddress::parse(raw_email)?;

        // join_all yields results in input order, which is priority order.
        let outcomes = join_all(
            self.providers
                .iter()
                .map(|provider| provider.resolve(&address.local_part, &address.domain)),
        )
        .await;

        let configs = self
            .providers
            .iter()
            .zip(outcomes)
            .filter_map(|(provider, outcome)| {
                if let LookupOutcome::Failed(err) = &outcome {
                    tracing::warn!(
                        provider = provider.name(),
                        domain = %address.domain,
                        %err,
                        "provider failed, omitting from results"
                    );
                }
                outcome.into_config()
            })
            .collect();

        Ok(configs)
    }
}

impl Default for Discovery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::config::{Security, ServerConfig, UsernamePattern};
    use crate::provider::ProviderError;

    /// What a scripted provider should answer with.
    enum Script {
        Found(Config),
        NotFound,
        Fail,
    }

    /// Test double: a provider with a fixed answer and a call counter.
    struct Scripted {
        name: &'static str,
        script: Script,
        calls: Arc<AtomicUsize>,
    }

    impl Scripted {
        fn new(name: &'static str, script: Script) -> (Box<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let double = Box::new(Self {
                name,
                script,
                calls: Arc::clone(&calls),
            });
            (double, calls)
        }
    }

    #[async_trait]
    impl StrategyProvider for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn resolve(&self, _local_part: &str, _domain: &str) -> LookupOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.script {
                Script::Found(config) => LookupOutcome::Found(config.clone()),
                Script::NotFound => LookupOutcome::NotFound,
                Script::Fail => LookupOutcome::Failed(ProviderError::Status(500)),
            }
        }
    }

    fn config_for(host: &str) -> Config {
        Config {
            provider: None,
            incoming: ServerConfig::new(host, 993, Security::Ssl),
            outgoing: ServerConfig::new(host, 465, Security::Ssl),
            username: UsernamePattern::FullAddress,
        }
    }

    #[tokio::test]
    async fn default_orchestrator_constructs_with_all_strategies() {
        // Wires the four default providers, including the shared HTTP
        // client; a malformed address fails fast without touching any.
        let discovery = Discovery::default();
        assert!(matches!(
            discovery.discover_first("noatsign").await,
            Err(DiscoveryError::InvalidAddress(_))
        ));
    }

    mod discover_first_tests {
        use super::*;

        #[tokio::test]
        async fn short_circuits_on_first_hit() {
            let (first, first_calls) =
                Scripted::new("first", Script::Found(config_for("imap.one.test")));
            let (second, second_calls) = Scripted::new("second", Script::NotFound);
            let (third, third_calls) = Scripted::new("third", Script::NotFound);
            let (fourth, fourth_calls) = Scripted::new("fourth", Script::NotFound);
            let discovery = Discovery::with_providers(vec![first, second, third, fourth]);

            let config = discovery.discover_first("a@one.test").await.unwrap();

            assert_eq!(config.incoming.host, "imap.one.test");
            assert_eq!(first_calls.load(Ordering::SeqCst), 1);
            assert_eq!(second_calls.load(Ordering::SeqCst), 0);
            assert_eq!(third_calls.load(Ordering::SeqCst), 0);
            assert_eq!(fourth_calls.load(Ordering::SeqCst), 0);
        }

        #[tokio::test]
        async fn priority_wins_over_lower_match() {
            let (first, _) = Scripted::new("known", Script::Found(config_for("imap.known.test")));
            let (second, _) = Scripted::new("autoconfig", Script::NotFound);
            let (third, _) = Scripted::new("ispdb", Script::NotFound);
            let (fourth, _) = Scripted::new("mx", Script::Found(config_for("imap.mx.test")));
            let discovery = Discovery::with_providers(vec![first, second, third, fourth]);

            let config = discovery.discover_first("a@b.test").await.unwrap();
            assert_eq!(config.incoming.host, "imap.known.test");
        }

        #[tokio::test]
        async fn failure_falls_through_to_next() {
            let (first, _) = Scripted::new("first", Script::Fail);
            let (second, _) = Scripted::new("second", Script::Found(config_for("imap.two.test")));
            let discovery = Discovery::with_providers(vec![first, second]);

            let config = discovery.discover_first("a@b.test").await.unwrap();
            assert_eq!(config.incoming.host, "imap.two.test");
        }

        #[tokio::test]
        async fn exhaustion_is_unresolvable() {
            let (first, _) = Scripted::new("first", Script::NotFound);
            let (second, _) = Scripted::new("second", Script::Fail);
            let (third, _) = Scripted::new("third", Script::NotFound);
            let (fourth, _) = Scripted::new("fourth", Script::Fail);
            let discovery = Discovery::with_providers(vec![first, second, third, fourth]);

            assert!(matches!(
                discovery.discover_first("a@b.test").await,
                Err(DiscoveryError::Unresolvable(domain)) if domain == "b.test"
            ));
        }

        #[tokio::test]
        async fn invalid_address_is_rejected_before_any_provider() {
            let (first, first_calls) = Scripted::new("first", Script::NotFound);
            let discovery = Discovery::with_providers(vec![first]);

            assert!(matches!(
                discovery.discover_first("not-an-address").await,
                Err(DiscoveryError::InvalidAddress(_))
            ));
            assert_eq!(first_calls.load(Ordering::SeqCst), 0);
        }
    }

    mod discover_all_tests {
        use super::*;

        #[tokio::test]
        async fn collects_hits_in_priority_order() {
            let (first, _) = Scripted::new("known", Script::Found(config_for("imap.known.test")));
            let (second, _) = Scripted::new("autoconfig", Script::NotFound);
            let (third, _) = Scripted::new("ispdb", Script::Found(config_for("imap.ispdb.test")));
            let (fourth, _) = Scripted::new("mx", Script::NotFound);
            let discovery = Discovery::with_providers(vec![first, second, third, fourth]);

            let configs = discovery.discover_all("a@b.test").await.unwrap();

            assert_eq!(configs.len(), 2);
            assert_eq!(configs[0].incoming.host, "imap.known.test");
            assert_eq!(configs[1].incoming.host, "imap.ispdb.test");
        }

        #[tokio::test]
        async fn invokes_every_provider_despite_early_hit() {
            let (first, first_calls) =
                Scripted::new("first", Script::Found(config_for("imap.one.test")));
            let (second, second_calls) = Scripted::new("second", Script::NotFound);
            let (third, third_calls) = Scripted::new("third", Script::Fail);
            let (fourth, fourth_calls) =
                Scripted::new("fourth", Script::Found(config_for("imap.four.test")));
            let discovery = Discovery::with_providers(vec![first, second, third, fourth]);

            let configs = discovery.discover_all("a@b.test").await.unwrap();

            assert_eq!(configs.len(), 2);
            assert_eq!(first_calls.load(Ordering::SeqCst), 1);
            assert_eq!(second_calls.load(Ordering::SeqCst), 1);
            assert_eq!(third_calls.load(Ordering::SeqCst), 1);
            assert_eq!(fourth_calls.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn no_matches_is_an_empty_list_not_an_error() {
            let (first, _) = Scripted::new("first", Script::NotFound);
            let (second, _) = Scripted::new("second", Script::Fail);
            let discovery = Discovery::with_providers(vec![first, second]);

            let configs = discovery.discover_all("a@b.test").await.unwrap();
            assert!(configs.is_empty());
        }

        #[tokio::test]
        async fn invalid_address_still_fails() {
            let discovery = Discovery::with_providers(vec![]);
            assert!(matches!(
                discovery.discover_all("a@b@c").await,
                Err(DiscoveryError::InvalidAddress(_))
            ));
        }
    }
}
