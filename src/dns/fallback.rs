//! Local-first resolution with a public-DNS race as fallback.
//!
//! A lookup moves through at most two phases:
//!
//! 1. **Local attempt.** The system resolver is asked once. A success ends
//!    the lookup and no packet is sent to any public server.
//! 2. **Fallback race.** One worker per roster entry queries that server
//!    directly. Outcomes arrive on a channel sized to the number of
//!    workers; the first address received wins. If every worker fails the
//!    lookup fails with [`DnsError::AllServersFailed`].
//!
//! Workers are never cancelled. Each one is bounded by the lookup timeout
//! and can always deposit its outcome without blocking, so stragglers that
//! finish after a winner was chosen simply go unread.

use super::{
    config::LookupConfig, local::SystemResolver, remote::ServerResolver, roster::Roster, Name,
    Resolve, ResolveVia, Resolving,
};
use crate::base::error::{DnsError, FailureReason};
use std::{fmt, net::IpAddr, sync::Arc, time::Duration};
use tokio::sync::mpsc;

/// Resolver that falls back to racing public DNS servers.
///
/// # Example
///
/// ```rust,ignore
/// use relaydns::dns::{FallbackResolver, Name, Resolve};
///
/// let resolver = FallbackResolver::new();
/// let ip = resolver.resolve(Name::new("example.com")).await?;
/// ```
#[derive(Clone)]
pub struct FallbackResolver {
    local: Arc<dyn Resolve>,
    remote: Arc<dyn ResolveVia>,
    roster: Roster,
    timeout: Duration,
}

impl FallbackResolver {
    /// System resolver first, then the public roster, one second per lookup.
    pub fn new() -> Self {
        Self::with_config(LookupConfig::default())
    }

    /// System resolver and hickory per-server lookups, bounded by `config.timeout`.
    pub fn with_config(config: LookupConfig) -> Self {
        Self::with_resolvers(
            Arc::new(SystemResolver::with_timeout(config.timeout)),
            Arc::new(ServerResolver::with_timeout(config.timeout)),
            config,
        )
    }

    /// Builds a resolver around explicit local and per-server resolvers.
    ///
    /// `config.timeout` additionally bounds every race worker, whatever the
    /// per-server resolver does internally.
    pub fn with_resolvers(
        local: Arc<dyn Resolve>,
        remote: Arc<dyn ResolveVia>,
        config: LookupConfig,
    ) -> Self {
        Self {
            local,
            remote,
            roster: config.roster,
            timeout: config.timeout,
        }
    }

    async fn lookup(self, name: Name) -> Result<IpAddr, DnsError> {
        match self.local.resolve(name.clone()).await {
            Ok(ip) => return Ok(ip),
            Err(e) => {
                tracing::warn!(domain = %name, error = %e, "local lookup failed, racing public DNS");
            }
        }
        self.race(name).await
    }

    async fn race(&self, name: Name) -> Result<IpAddr, DnsError> {
        let host = name.as_str().to_string();
        if self.roster.is_empty() {
            return Err(DnsError::AllServersFailed { host });
        }

        // One slot per worker: a send can never wait, even once nobody reads.
        let (tx, mut rx) = mpsc::channel(self.roster.len());
        for server in self.roster.iter() {
            let tx = tx.clone();
            let remote = self.remote.clone();
            let name = name.clone();
            let timeout = self.timeout;
            tokio::spawn(async move {
                let lookup = remote.resolve_via(name.clone(), server);
                let outcome = tokio::time::timeout(timeout, lookup).await.unwrap_or_else(|_| {
                    Err(DnsError::remote(name.as_str(), server, FailureReason::Timeout))
                });
                let _ = tx.send(outcome).await;
            });
        }
        drop(tx);

        while let Some(outcome) = rx.recv().await {
            match outcome {
                Ok(ip) => {
                    tracing::debug!(domain = %host, %ip, "fallback race won");
                    return Ok(ip);
                }
                Err(e) => tracing::debug!(error = %e, "fallback server failed"),
            }
        }

        tracing::debug!(domain = %host, servers = self.roster.len(), "every DNS server failed");
        Err(DnsError::AllServersFailed { host })
    }
}

impl Default for FallbackResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolve for FallbackResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(self.clone().lookup(name))
    }
}

impl fmt::Debug for FallbackResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackResolver")
            .field("servers", &self.roster.len())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
