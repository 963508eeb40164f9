//! # mailscout
//!
//! Mail server settings discovery for email-client setup flows.
//!
//! Given an email address, `mailscout` produces a ready-to-use connection
//! profile (IMAP/SMTP host, port, security mode, username pattern) by trying
//! four strategies in decreasing order of authority:
//!
//! 1. a curated known-domain table (no network),
//! 2. the domain's own autoconfig document,
//! 3. the Mozilla ISPDB community directory,
//! 4. heuristic inference from the domain's MX records.
//!
//! [`Discovery::discover_first`] stops at the first hit;
//! [`Discovery::discover_all`] collects every candidate for diagnostics or
//! user choice.
//!
//! ```no_run
//! # async fn run() -> mailscout::Result<()> {
//! let discovery = mailscout::Discovery::new();
//! let config = discovery.discover_first("alice@gmail.com").await?;
//! println!("{}:{}", config.incoming.host, config.incoming.port);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod config;
mod discovery;
mod error;
pub mod provider;

pub use address::EmailAddress;
pub use config::{Config, Security, ServerConfig, UsernamePattern};
pub use discovery::Discovery;
pub use error::{DiscoveryError, Result};
pub use provider::{
    DomainAutoconfigLookup, KnownDomainLookup, LookupOutcome, MozillaAutoconfigLookup,
    MxRecordLookup, ProviderError, StrategyProvider,
};
