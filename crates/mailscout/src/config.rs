//! Connection profile types produced by discovery.

use serde::{Deserialize, Serialize};

use crate::address::EmailAddress;

/// Security/encryption mode for connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Security {
    /// No encryption (not recommended).
    None,
    /// Implicit TLS (connect directly with TLS).
    #[default]
    Ssl,
    /// STARTTLS upgrade after plaintext connect.
    StartTls,
}

impl Security {
    /// Get display name for the security mode.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::None => "None (insecure)",
            Self::Ssl => "SSL/TLS",
            Self::StartTls => "STARTTLS",
        }
    }

    /// Default IMAP port for the security mode.
    #[must_use]
    pub const fn default_imap_port(self) -> u16 {
        match self {
            Self::None | Self::StartTls => 143,
            Self::Ssl => 993,
        }
    }

    /// Default SMTP submission port for the security mode.
    #[must_use]
    pub const fn default_smtp_port(self) -> u16 {
        match self {
            Self::None => 25,
            Self::StartTls => 587,
            Self::Ssl => 465,
        }
    }
}

/// One server endpoint of a connection profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Security mode.
    pub security: Security,
}

impl ServerConfig {
    /// Create a server endpoint.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16, security: Security) -> Self {
        Self {
            host: host.into(),
            port,
            security,
        }
    }
}

/// How the login username is derived from the email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UsernamePattern {
    /// The full `local@domain` address.
    #[default]
    FullAddress,
    /// Only the part before the `@`.
    LocalPart,
}

/// A discovered mail-access profile.
///
/// Immutable: produced by one provider, never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Provider display name, when the source document or table knows it.
    pub provider: Option<String>,
    /// Incoming (IMAP) server.
    pub incoming: ServerConfig,
    /// Outgoing (SMTP) server.
    pub outgoing: ServerConfig,
    /// How to render the login username.
    pub username: UsernamePattern,
}

impl Config {
    /// Render the login username for the given address.
    #[must_use]
    pub fn username_for(&self, address: &EmailAddress) -> String {
        match self.username {
            UsernamePattern::FullAddress => address.to_string(),
            UsernamePattern::LocalPart => address.local_part.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod security_tests {
        use super::*;

        #[test]
        fn default_is_ssl() {
            assert_eq!(Security::default(), Security::Ssl);
        }

        #[test]
        fn display_names() {
            assert_eq!(Security::None.display_name(), "None (insecure)");
            assert_eq!(Security::Ssl.display_name(), "SSL/TLS");
            assert_eq!(Security::StartTls.display_name(), "STARTTLS");
        }

        #[test]
        fn imap_ports() {
            assert_eq!(Security::Ssl.default_imap_port(), 993);
            assert_eq!(Security::StartTls.default_imap_port(), 143);
            assert_eq!(Security::None.default_imap_port(), 143);
        }

        #[test]
        fn smtp_ports() {
            assert_eq!(Security::Ssl.default_smtp_port(), 465);
            assert_eq!(Security::StartTls.default_smtp_port(), 587);
            assert_eq!(Security::None.default_smtp_port(), 25);
        }
    }

    mod config_tests {
        use super::*;

        fn sample() -> Config {
            Config {
                provider: Some("Example".to_string()),
                incoming: ServerConfig::new("imap.example.org", 993, Security::Ssl),
                outgoing: ServerConfig::new("smtp.example.org", 587, Security::StartTls),
                username: UsernamePattern::FullAddress,
            }
        }

        #[test]
        fn username_full_address() {
            let addr = EmailAddress::parse("alice@example.org").unwrap();
            assert_eq!(sample().username_for(&addr), "alice@example.org");
        }

        #[test]
        fn json_round_trip() {
            let config = sample();
            let json = serde_json::to_string(&config).unwrap();
            let back: Config = serde_json::from_str(&json).unwrap();
            assert_eq!(back, config);
        }

        #[test]
        fn username_local_part() {
            let addr = EmailAddress::parse("alice@example.org").unwrap();
            let config = Config {
                username: UsernamePattern::LocalPart,
                ..sample()
            };
            assert_eq!(config.username_for(&addr), "alice");
        }
    }
}
