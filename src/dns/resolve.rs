//! Core DNS resolution types and traits.
//!
//! This module defines the `Resolve` and `ResolveVia` traits and the
//! supporting types shared by the local, per-server and fallback resolvers.

use crate::base::error::DnsError;
use std::{
    fmt,
    future::Future,
    net::{IpAddr, SocketAddr},
    pin::Pin,
    sync::Arc,
};

/// Which address family to return when a host has both.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub enum IpPreference {
    #[default]
    Ipv4,
    Ipv6,
}

impl IpPreference {
    pub(crate) fn matches(self, ip: &IpAddr) -> bool {
        match self {
            IpPreference::Ipv4 => ip.is_ipv4(),
            IpPreference::Ipv6 => ip.is_ipv6(),
        }
    }
}

/// A hostname to resolve, plus the address family the caller prefers.
///
/// The preference steers direct server queries; the system resolver's
/// ordering is taken as-is.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct Name {
    host: Box<str>,
    preference: IpPreference,
}

impl Name {
    /// Creates a new [`Name`] preferring IPv4 answers.
    #[inline]
    pub fn new(host: impl Into<Box<str>>) -> Self {
        Self {
            host: host.into(),
            preference: IpPreference::Ipv4,
        }
    }

    /// Same hostname, different family preference.
    #[inline]
    pub fn prefer(mut self, preference: IpPreference) -> Self {
        self.preference = preference;
        self
    }

    /// View the hostname as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.host
    }

    /// The address family to ask servers for first.
    #[inline]
    pub fn preference(&self) -> IpPreference {
        self.preference
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::new(value)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.host, f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.host, f)
    }
}

/// Alias for the `Future` type returned by a resolver.
pub type Resolving = Pin<Box<dyn Future<Output = Result<IpAddr, DnsError>> + Send>>;

/// Resolves a name through whatever source the implementation is bound to.
///
/// Implementations must be thread-safe and return a single address.
pub trait Resolve: Send + Sync {
    fn resolve(&self, name: Name) -> Resolving;
}

/// Resolves a name by asking one explicitly chosen DNS server.
///
/// Each call is independent; nothing is shared between calls.
pub trait ResolveVia: Send + Sync {
    fn resolve_via(&self, name: Name, server: SocketAddr) -> Resolving;
}

impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    fn resolve(&self, name: Name) -> Resolving {
        (**self).resolve(name)
    }
}

impl<R: ResolveVia + ?Sized> ResolveVia for Arc<R> {
    fn resolve_via(&self, name: Name, server: SocketAddr) -> Resolving {
        (**self).resolve_via(name, server)
    }
}

/// Picks the first address of the preferred family, else the first address.
pub(crate) fn pick_address<I>(addrs: I, preference: IpPreference) -> Option<IpAddr>
where
    I: IntoIterator<Item = IpAddr>,
{
    let mut first = None;
    for ip in addrs {
        if preference.matches(&ip) {
            return Some(ip);
        }
        first.get_or_insert(ip);
    }
    first
}
