//! Per-server DNS resolver using hickory-dns.
//!
//! Each lookup first dials the server with a connected UDP socket, so routing
//! and permission errors surface as dial failures instead of silent timeouts.
//! It then builds a throwaway hickory resolver whose only name server is the
//! one requested, speaking plain UDP. Nothing is cached or pooled across
//! calls, and a failed query is not retried.

use super::{resolve::pick_address, IpPreference, Name, ResolveVia, Resolving};
use crate::base::{
    context::ServerResultExt,
    error::{DnsError, FailureReason},
};
use crate::dns::config::DEFAULT_LOOKUP_TIMEOUT;
use hickory_resolver::{
    config::{LookupIpStrategy, NameServerConfig, ResolverConfig},
    name_server::TokioConnectionProvider,
    proto::xfer::Protocol,
    TokioResolver,
};
use std::{
    io,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr},
    time::Duration,
};
use tokio::net::UdpSocket;

/// Resolver that queries a caller-chosen DNS server directly.
///
/// # Example
///
/// ```rust,ignore
/// use relaydns::dns::{Name, ResolveVia, ServerResolver};
///
/// let resolver = ServerResolver::new();
/// let ip = resolver
///     .resolve_via(Name::new("example.com"), "1.1.1.1:53".parse()?)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ServerResolver {
    timeout: Duration,
}

impl ServerResolver {
    /// Creates a resolver with the default one second timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_LOOKUP_TIMEOUT)
    }

    /// Creates a resolver that bounds dial plus query by `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The per-lookup bound.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Connects a fresh UDP socket to `server`. Nothing is sent.
    async fn dial(server: SocketAddr) -> io::Result<()> {
        let local: SocketAddr = if server.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(server).await
    }

    fn build(&self, server: SocketAddr, preference: IpPreference) -> TokioResolver {
        let mut config = ResolverConfig::new();
        config.add_name_server(NameServerConfig::new(server, Protocol::Udp));

        let mut builder =
            TokioResolver::builder_with_config(config, TokioConnectionProvider::default());
        let opts = builder.options_mut();
        opts.timeout = self.timeout;
        opts.attempts = 0;
        opts.cache_size = 0;
        opts.ip_strategy = match preference {
            IpPreference::Ipv4 => LookupIpStrategy::Ipv4thenIpv6,
            IpPreference::Ipv6 => LookupIpStrategy::Ipv6thenIpv4,
        };

        builder.build()
    }
}

impl Default for ServerResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolveVia for ServerResolver {
    fn resolve_via(&self, name: Name, server: SocketAddr) -> Resolving {
        let this = self.clone();
        Box::pin(async move {
            let resolver = this.build(server, name.preference());
            let timeout = this.timeout;
            let domain = name.as_str();
            tracing::debug!(domain = %domain, %server, "resolving via hickory-dns");

            let query = async {
                Self::dial(server).await.server_context(domain, server)?;
                resolver.lookup_ip(domain).await.server_context(domain, server)
            };

            let lookup = match tokio::time::timeout(timeout, query).await {
                Ok(result) => result?,
                Err(_) => {
                    tracing::debug!(domain = %domain, %server, "hickory-dns lookup timed out");
                    return Err(DnsError::remote(domain, server, FailureReason::Timeout));
                }
            };

            let ip = pick_address(lookup.iter(), name.preference())
                .ok_or_else(|| DnsError::remote(domain, server, FailureReason::NoAnswer))?;

            tracing::debug!(domain = %domain, %server, %ip, "hickory-dns resolution complete");
            Ok(ip)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use tokio::net::UdpSocket;

    #[test]
    fn test_default_timeout() {
        assert_eq!(ServerResolver::new().timeout(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_ip_literal_needs_no_query() {
        // Nothing listens on this port; an IP literal must not be sent out.
        let server: SocketAddr = "127.0.0.1:9".parse().unwrap();
        let resolver = ServerResolver::new();
        let ip = resolver
            .resolve_via(Name::new("192.0.2.7"), server)
            .await
            .unwrap();
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(192, 0, 2, 7)));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_broadcast_server_is_dial_failure() {
        // Connecting a UDP socket to the broadcast address without
        // SO_BROADCAST is refused by the kernel.
        let server: SocketAddr = "255.255.255.255:53".parse().unwrap();
        let started = std::time::Instant::now();
        let err = ServerResolver::new()
            .resolve_via(Name::new("relay.example.com"), server)
            .await
            .unwrap_err();

        assert!(
            matches!(err.reason(), Some(FailureReason::Unreachable(_))),
            "got {err:?}"
        );
        assert_eq!(err.host(), "relay.example.com");
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        // Bound but never read: queries vanish.
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server = silent.local_addr().unwrap();

        let resolver = ServerResolver::with_timeout(Duration::from_millis(200));
        let started = std::time::Instant::now();
        let err = resolver
            .resolve_via(Name::new("relay.test"), server)
            .await
            .unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(2));
        match err {
            DnsError::RemoteLookup { host, server: s, .. } => {
                assert_eq!(host, "relay.test");
                assert_eq!(s, server);
            }
            other => panic!("Unexpected error type: {other:?}"),
        }
    }
}
