//! Email address parsing.

use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, Result};

/// An email address split into its local part and domain.
///
/// Parsing only enforces that the raw string contains exactly one `@`.
/// Either segment may be empty (`"@b.com"`, `"a@"`); nonsensical domains
/// are left to the provider layer, which will simply find no match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Everything before the `@`.
    pub local_part: String,
    /// Everything after the `@`, lowercased.
    pub domain: String,
}

impl EmailAddress {
    /// Parse a raw address string.
    ///
    /// The domain is lowercased so providers can match it directly.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidAddress`] unless the input contains
    /// exactly one `@`.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(local_part), Some(domain), None) => Ok(Self {
                local_part: local_part.to_owned(),
                domain: domain.to_lowercase(),
            }),
            _ => Err(DiscoveryError::InvalidAddress(raw.to_owned())),
        }
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.local_part, self.domain)
    }
}
