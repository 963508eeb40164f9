//! Curated known-domain lookup.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{LookupOutcome, StrategyProvider};
use crate::config::{Config, Security, ServerConfig, UsernamePattern};

/// Highest-priority strategy: a curated domain-to-profile table.
///
/// No network involved, so this is both the cheapest and the most
/// trustworthy source. Ships with presets for the major providers; callers
/// can replace the table wholesale via [`KnownDomainLookup::with_table`].
pub struct KnownDomainLookup {
    table: HashMap<String, Config>,
}

impl KnownDomainLookup {
    /// Create a lookup over the built-in preset table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: presets(),
        }
    }

    /// Create a lookup over a caller-supplied table.
    #[must_use]
    pub fn with_table(table: HashMap<String, Config>) -> Self {
        Self { table }
    }
}

impl Default for KnownDomainLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StrategyProvider for KnownDomainLookup {
    fn name(&self) -> &'static str {
        "known-domain"
    }

    async fn resolve(&self, _local_part: &str, domain: &str) -> LookupOutcome {
        self.table
            .get(domain)
            .cloned()
            .map_or(LookupOutcome::NotFound, LookupOutcome::Found)
    }
}

/// Shorthand for one preset entry.
fn preset(
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

/// Built-in presets for widely used providers.
fn presets() -> HashMap<String, Config> {
    use Security::{Ssl, StartTls};

    let mut table = HashMap::new();
    let mut add = |domains: &[&str], config: Config| {
        for domain in domains {
            table.insert((*domain).to_owned(), config.clone());
        }
    };

    add(
        &["gmail.com", "googlemail.com"],
        preset(
            "Gmail",
            ("imap.gmail.com", 993, Ssl),
            ("smtp.gmail.com", 465, Ssl),
        ),
    );
    add(
        &["outlook.com", "hotmail.com", "live.com", "msn.com"],
        preset(
            "Outlook",
            ("outlook.office365.com", 993, Ssl),
            ("smtp.office365.com", 587, StartTls),
        ),
    );
    add(
        &["yahoo.com", "ymail.com", "rocketmail.com"],
        preset(
            "Yahoo Mail",
            ("imap.mail.yahoo.com", 993, Ssl),
            ("smtp.mail.yahoo.com", 465, Ssl),
        ),
    );
    add(
        &["icloud.com", "me.com", "mac.com"],
        preset(
            "iCloud",
            ("imap.mail.me.com", 993, Ssl),
            ("smtp.mail.me.com", 587, StartTls),
        ),
    );
    add(
        &["aol.com"],
        preset(
            "AOL Mail",
            ("imap.aol.com", 993, Ssl),
            ("smtp.aol.com", 587, StartTls),
        ),
    );
    add(
        &["zoho.com", "zohomail.com"],
        preset(
            "Zoho Mail",
            ("imap.zoho.com", 993, Ssl),
            ("smtp.zoho.com", 465, Ssl),
        ),
    );
    add(
        &["gmx.com", "gmx.net", "gmx.de"],
        preset(
            "GMX",
            ("imap.gmx.com", 993, Ssl),
            ("mail.gmx.com", 587, StartTls),
        ),
    );
    add(
        &["fastmail.com", "fastmail.fm"],
        preset(
            "Fastmail",
            ("imap.fastmail.com", 993, Ssl),
            ("smtp.fastmail.com", 587, StartTls),
        ),
    );
    add(
        &["yandex.com", "yandex.ru", "ya.ru"],
        preset(
            "Yandex Mail",
            ("imap.yandex.com", 993, Ssl),
            ("smtp.yandex.com", 465, Ssl),
        ),
    );
    // Proton requires the local Bridge; these are its loopback endpoints.
    add(
        &["protonmail.com", "proton.me", "pm.me"],
        preset(
            "Proton Mail (Bridge)",
            ("127.0.0.1", 1143, StartTls),
            ("127.0.0.1", 1025, StartTls),
        ),
    );
    add(
        &["mail.com"],
        preset(
            "Mail.com",
            ("imap.mail.com", 993, Ssl),
            ("smtp.mail.com", 587, StartTls),
        ),
    );

    table
}
