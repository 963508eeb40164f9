//! MX-record provider inference.

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;

use super::{LookupOutcome, StrategyProvider};
use crate::config::{Config, Security, ServerConfig, UsernamePattern};

/// Lowest-priority strategy: infer the provider from the domain's MX host.
///
/// Purely heuristic. Two unrelated domains can route mail through the same
/// exchange while using different access settings, so this only runs when
/// every more authoritative source has come up empty.
pub struct MxRecordLookup {
    resolver: TokioAsyncResolver,
}

impl MxRecordLookup {
    /// Create a lookup using the system resolver configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_resolver(TokioAsyncResolver::tokio(
            ResolverConfig::default(),
            ResolverOpts::default(),
        ))
    }

    /// Create a lookup over a caller-configured resolver.
    #[must_use]
    pub const fn with_resolver(resolver: TokioAsyncResolver) -> Self {
        Self { resolver }
    }
}

impl Default for MxRecordLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StrategyProvider for MxRecordLookup {
    fn name(&self) -> &'static str {
        "mx-record"
    }

    async fn resolve(&self, _local_part: &str, domain: &str) -> LookupOutcome {
        let lookup = match self.resolver.mx_lookup(domain).await {
            Ok(lookup) => lookup,
            Err(err) => {
                // A domain with no MX records is a clean miss, not a failure.
                if matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. }) {
                    return LookupOutcome::NotFound;
                }
                return LookupOutcome::Failed(err.into());
            }
        };

        let mut records: Vec<_> = lookup.iter().collect();
        records.sort_by_key(|mx| mx.preference());

        for mx in records {
            let exchange = mx
                .exchange()
                .to_utf8()
                .trim_end_matches('.')
                .to_lowercase();
            tracing::debug!(domain, %exchange, "inspecting MX record");
            if let Some(config) = match_signature(&exchange) {
                return LookupOutcome::Found(config);
            }
        }

        LookupOutcome::NotFound
    }
}

/// Shorthand for one signature entry.
fn inferred(
    provider: &str,
    imap: (&str, u16, Security),
    smtp: (&str, u16, Security),
) -> Config {
    Config {
        provider: Some(provider.to_owned()),
        incoming: ServerConfig::new(imap.0, imap.1, imap.2),
        outgoing: ServerConfig::new(smtp.0, smtp.1, smtp.2),
        username: UsernamePattern::FullAddress,
    }
}

/// Match an exchange hostname against known hosted-mail signatures.
fn match_signature(exchange: &str) -> Option<Config> {
    use Security::{Ssl, StartTls};

    // Match on label boundaries only: "aspmx.l.google.com" matches
    // "google.com", "evilgoogle.com" does not.
    let matches_any = |suffixes: &[&str]| {
        suffixes
            .iter()
            .any(|s| exchange == *s || exchange.ends_with(&format!(".{s}")))
    };

    if matches_any(&["google.com", "googlemail.com"]) {
        return Some(inferred(
            "Google Workspace",
            ("imap.gmail.com", 993, Ssl),
            ("smtp.gmail.com", 587, StartTls),
        ));
    }
    if matches_any(&["protection.outlook.com", "outlook.com"]) {
        return Some(inferred(
            "Microsoft 365",
            ("outlook.office365.com", 993, Ssl),
            ("smtp.office365.com", 587, StartTls),
        ));
    }
    if matches_any(&["zoho.com", "zoho.eu"]) {
        return Some(inferred(
            "Zoho Mail",
            ("imap.zoho.com", 993, Ssl),
            ("smtp.zoho.com", 465, Ssl),
        ));
    }
    if matches_any(&["protonmail.ch", "proton.ch"]) {
        return Some(inferred(
            "Proton Mail (Bridge)",
            ("127.0.0.1", 1143, StartTls),
            ("127.0.0.1", 1025, StartTls),
        ));
    }
    if matches_any(&["fastmail.com", "messagingengine.com"]) {
        return Some(inferred(
            "Fastmail",
            ("imap.fastmail.com", 993, Ssl),
            ("smtp.fastmail.com", 587, StartTls),
        ));
    }
    if matches_any(&["yandex.ru", "yandex.net"]) {
        return Some(inferred(
            "Yandex Mail",
            ("imap.yandex.com", 993, Ssl),
            ("smtp.yandex.com", 465, Ssl),
        ));
    }
    if matches_any(&["mail.ru"]) {
        return Some(inferred(
            "Mail.ru",
            ("imap.mail.ru", 993, Ssl),
            ("smtp.mail.ru", 465, Ssl),
        ));
    }
    if matches_any(&["ovh.net", "ovh.com"]) {
        return Some(inferred(
            "OVH",
            ("ssl0.ovh.net", 993, Ssl),
            ("ssl0.ovh.net", 587, StartTls),
        ));
    }
    if matches_any(&["secureserver.net"]) {
        return Some(inferred(
            "GoDaddy",
            ("imap.secureserver.net", 993, Ssl),
            ("smtpout.secureserver.net", 465, Ssl),
        ));
    }
    if matches_any(&["privateemail.com"]) {
        return Some(inferred(
            "Namecheap",
            ("mail.privateemail.com", 993, Ssl),
            ("mail.privateemail.com", 465, Ssl),
        ));
    }
    if matches_any(&["titan.email"]) {
        return Some(inferred(
            "Titan",
            ("imap.titan.email", 993, Ssl),
            ("smtp.titan.email", 465, Ssl),
        ));
    }

    None
}
