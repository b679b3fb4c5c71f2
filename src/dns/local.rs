//! System DNS resolver using getaddrinfo.
//!
//! This resolver uses the operating system's native resolution via
//! `getaddrinfo`, executed on the blocking thread pool so it never stalls the
//! async runtime. Every lookup is bounded by a fixed timeout and tried once.

use super::{Name, Resolve, Resolving};
use crate::base::{
    context::LocalResultExt,
    error::{DnsError, FailureReason},
};
use crate::dns::config::DEFAULT_LOOKUP_TIMEOUT;
use std::{net::ToSocketAddrs, time::Duration};

/// System resolver, bounded by a per-lookup timeout.
///
/// Returns the first address `getaddrinfo` reports; the [`Name`] family
/// preference only applies to direct server queries.
///
/// When the timeout elapses the lookup is reported as failed immediately;
/// the blocking `getaddrinfo` call itself cannot be interrupted and is left
/// to finish on the blocking pool.
#[derive(Clone, Debug)]
pub struct SystemResolver {
    timeout: Duration,
}

impl SystemResolver {
    /// Creates a resolver with the default one second timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_LOOKUP_TIMEOUT)
    }

    /// Creates a resolver that gives up on a lookup after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The per-lookup bound.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for SystemResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolve for SystemResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let timeout = self.timeout;
        Box::pin(async move {
            let domain = name.as_str().to_string();
            let host = domain.clone();

            let task = tokio::task::spawn_blocking(move || {
                tracing::debug!(host = %host, "resolving via getaddrinfo");
                (host.as_str(), 0u16)
                    .to_socket_addrs()
                    .map(|iter| iter.map(|addr| addr.ip()).collect::<Vec<_>>())
            });

            let addrs = match tokio::time::timeout(timeout, task).await {
                Ok(joined) => joined
                    .map_err(|e| {
                        tracing::error!(error = %e, "DNS resolution task failed");
                        DnsError::local(domain.as_str(), FailureReason::resolver(e))
                    })?
                    .local_context(&domain)?,
                Err(_) => {
                    tracing::debug!(domain = %domain, ?timeout, "getaddrinfo timed out");
                    return Err(DnsError::local(domain, FailureReason::Timeout));
                }
            };

            // First reported address, whatever its family.
            let count = addrs.len();
            let ip = addrs
                .first()
                .copied()
                .ok_or_else(|| DnsError::local(domain.as_str(), FailureReason::NoAnswer))?;

            tracing::debug!(domain = %domain, %ip, count, "local resolution complete");
            Ok(ip)
        })
    }
}
