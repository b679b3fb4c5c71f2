//! Default relay addresses computed once at startup.
//!
//! Nothing here runs implicitly: the owning application calls
//! [`initialize_defaults`] during its own startup and keeps the returned
//! [`RelayDefaults`] as read-only configuration.

use crate::base::error::DnsError;
use crate::dns::{FallbackResolver, IpPreference, Name, Resolve};
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_RELAY: &str = "croc.schollz.com";
pub const DEFAULT_RELAY6: &str = "croc6.schollz.com";
pub const DEFAULT_PORT: u16 = 9009;
pub const DEFAULT_PASSPHRASE: &str = "pass123";

/// Which hosts to resolve and what to attach to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySettings {
    /// Hostname resolved preferring IPv4
    pub relay_host: String,
    /// Hostname resolved preferring IPv6
    pub relay6_host: String,
    pub port: u16,
    pub passphrase: String,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            relay_host: DEFAULT_RELAY.to_string(),
            relay6_host: DEFAULT_RELAY6.to_string(),
            port: DEFAULT_PORT,
            passphrase: DEFAULT_PASSPHRASE.to_string(),
        }
    }
}

impl RelaySettings {
    /// Settings for the public croc relays.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the IPv4-preferring relay hostname.
    pub fn relay_host(mut self, host: impl Into<String>) -> Self {
        self.relay_host = host.into();
        self
    }

    /// Set the IPv6-preferring relay hostname.
    pub fn relay6_host(mut self, host: impl Into<String>) -> Self {
        self.relay6_host = host.into();
        self
    }

    /// Set the port appended to both relay addresses.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the default passphrase.
    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = passphrase.into();
        self
    }
}

/// Ready-to-dial defaults.
///
/// An empty `relay` or `relay6` means the host could not be resolved and
/// the application must be configured with an explicit relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayDefaults {
    pub relay: String,
    pub relay6: String,
    pub port: u16,
    pub passphrase: String,
}

impl RelayDefaults {
    /// Resolves the built-in relay hosts through the public-DNS fallback.
    pub async fn init() -> Self {
        initialize_defaults(&FallbackResolver::new(), &RelaySettings::default()).await
    }

    /// Whether the IPv4-preferring relay resolved.
    pub fn has_relay(&self) -> bool {
        !self.relay.is_empty()
    }

    /// Whether the IPv6-preferring relay resolved.
    pub fn has_relay6(&self) -> bool {
        !self.relay6.is_empty()
    }
}

/// Resolves both relay hosts concurrently and formats them with the port.
///
/// Never fails: a host that cannot be resolved yields an empty address.
pub async fn initialize_defaults<R>(resolver: &R, settings: &RelaySettings) -> RelayDefaults
where
    R: Resolve + ?Sized,
{
    let relay = Name::new(settings.relay_host.as_str());
    let relay6 = Name::new(settings.relay6_host.as_str()).prefer(IpPreference::Ipv6);

    let (relay, relay6) = tokio::join!(resolver.resolve(relay), resolver.resolve(relay6));

    RelayDefaults {
        relay: default_address(&settings.relay_host, relay, settings.port),
        relay6: default_address(&settings.relay6_host, relay6, settings.port),
        port: settings.port,
        passphrase: settings.passphrase.clone(),
    }
}

/// `ip:port`, `[ipv6]:port`, or `""` when resolution failed.
pub fn format_address(resolved: Result<IpAddr, DnsError>, port: u16) -> String {
    resolved
        .map(|ip| SocketAddr::new(ip, port).to_string())
        .unwrap_or_default()
}

fn default_address(host: &str, resolved: Result<IpAddr, DnsError>, port: u16) -> String {
    if let Err(e) = &resolved {
        tracing::warn!(host = %host, error = %e, "no default relay address");
    }
    format_address(resolved, port)
}
