//! Thunderbird-style autoconfig document parsing.
//!
//! Both the domain-hosted autoconfig endpoint and the Mozilla ISPDB serve
//! the same `config-v1.1.xml` format: a `clientConfig` element with one or
//! more `incomingServer`/`outgoingServer` sections carrying `hostname`,
//! `port`, `socketType` and `username` children.

use quick_xml::Reader;
use quick_xml::events::Event;

use super::ProviderError;
use crate::config::{Config, Security, ServerConfig, UsernamePattern};

/// The server section currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Incoming,
    Outgoing,
    /// A server type we do not want (e.g. a second SMTP entry).
    Skipped,
}

/// Accumulates one server's fields while walking its section.
#[derive(Debug, Default)]
struct ServerDraft {
    host: Option<String>,
    port: Option<u16>,
    security: Option<Security>,
    username: Option<UsernamePattern>,
}

/// Parse a `config-v1.1.xml` document into a [`Config`].
///
/// Prefers an IMAP incoming server; a POP3 section is used only when the
/// document offers no IMAP one at all. Documents missing an incoming or
/// outgoing hostname are rejected.
pub(super) fn parse(xml: &str) -> Result<Config, ProviderError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut provider = None;
    let mut incoming = ServerDraft::default();
    let mut incoming_is_imap = false;
    let mut outgoing: Option<ServerDraft> = None;
    let mut section = Section::None;
    let mut element = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => {
                element = start.name().as_ref().to_vec();
                match element.as_slice() {
                    b"incomingServer" => {
                        section = match server_type(&start)?.as_deref() {
                            Some("imap") if !incoming_is_imap => {
                                incoming = ServerDraft::default();
                                incoming_is_imap = true;
                                Section::Incoming
                            }
                            Some("pop3") if !incoming_is_imap && incoming.host.is_none() => {
                                Section::Incoming
                            }
                            _ => Section::Skipped,
                        };
                    }
                    b"outgoingServer" => {
                        section = match server_type(&start)?.as_deref() {
                            Some("smtp") if outgoing.is_none() => {
                                outgoing = Some(ServerDraft::default());
                                Section::Outgoing
                            }
                            _ => Section::Skipped,
                        };
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(text)) => {
                let value = text
                    .unescape()
                    .map_err(|e| ProviderError::Document(e.to_string()))?
                    .into_owned();
                let draft = match section {
                    Section::Incoming => Some(&mut incoming),
                    Section::Outgoing => outgoing.as_mut(),
                    Section::None => {
                        if matches!(element.as_slice(), b"displayName" | b"displayShortName")
                            && provider.is_none()
                        {
                            provider = Some(value.clone());
                        }
                        None
                    }
                    Section::Skipped => None,
                };
                if let Some(draft) = draft {
                    apply_field(draft, &element, &value);
                }
            }
            Ok(Event::End(end)) => {
                if matches!(end.name().as_ref(), b"incomingServer" | b"outgoingServer") {
                    section = Section::None;
                }
                element.clear();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(ProviderError::Document(e.to_string())),
        }
        buf.clear();
    }

    let incoming = incoming
        .build(Security::default_imap_port)
        .ok_or_else(|| ProviderError::Document("no usable incoming server".to_string()))?;
    let outgoing = outgoing
        .and_then(|draft| draft.build(Security::default_smtp_port))
        .ok_or_else(|| ProviderError::Document("no usable outgoing server".to_string()))?;
    let username = incoming.username_pattern();

    Ok(Config {
        provider,
        username,
        incoming: incoming.server,
        outgoing: outgoing.server,
    })
}

/// A built server plus the username pattern its section declared.
struct BuiltServer {
    server: ServerConfig,
    username: Option<UsernamePattern>,
}

impl BuiltServer {
    fn username_pattern(&self) -> UsernamePattern {
        self.username.unwrap_or_default()
    }
}

impl ServerDraft {
    fn build(self, default_port: impl Fn(Security) -> u16) -> Option<BuiltServer> {
        let security = self.security.unwrap_or_default();
        Some(BuiltServer {
            server: ServerConfig {
                host: self.host?,
                port: self.port.unwrap_or_else(|| default_port(security)),
                security,
            },
            username: self.username,
        })
    }
}

/// Read the `type` attribute of a server element.
fn server_type(start: &quick_xml::events::BytesStart<'_>) -> Result<Option<String>, ProviderError> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| ProviderError::Document(e.to_string()))?;
        if attr.key.as_ref() == b"type" {
            return Ok(Some(
                String::from_utf8_lossy(&attr.value).to_lowercase(),
            ));
        }
    }
    Ok(None)
}

/// Apply one child-element value to the draft being built.
fn apply_field(draft: &mut ServerDraft, element: &[u8], value: &str) {
    match element {
        b"hostname" => draft.host = Some(value.to_owned()),
        b"port" => draft.port = value.parse().ok(),
        b"socketType" => {
            draft.security = Some(match value.to_uppercase().as_str() {
                "SSL" | "TLS" => Security::Ssl,
                "STARTTLS" => Security::StartTls,
                _ => Security::None,
            });
        }
        b"username" => {
            draft.username = Some(if value.contains("%EMAILLOCALPART%") {
                UsernamePattern::LocalPart
            } else {
                UsernamePattern::FullAddress
            });
        }
        _ => {}
    }
}
