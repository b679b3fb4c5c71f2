//! Error types for hostname resolution.
//!
//! Only [`DnsError::AllServersFailed`] ever escapes a fallback lookup; the
//! local and per-server variants are absorbed by the race and exist so the
//! adapters can be used (and logged) on their own.

use std::{fmt, net::SocketAddr, sync::Arc};
use thiserror::Error;

/// Why a single lookup produced no address.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FailureReason {
    #[error("timed out")]
    Timeout,
    /// The server could not be dialed or reached (socket or transport error).
    #[error("server unreachable: {0}")]
    Unreachable(Arc<str>),
    /// The resolver answered, but with zero addresses.
    #[error("no addresses in answer")]
    NoAnswer,
    #[error("{0}")]
    Resolver(Arc<str>),
}

impl FailureReason {
    pub(crate) fn resolver(msg: impl fmt::Display) -> Self {
        FailureReason::Resolver(msg.to_string().into())
    }

    pub(crate) fn unreachable(msg: impl fmt::Display) -> Self {
        FailureReason::Unreachable(msg.to_string().into())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DnsError {
    /// The system resolver failed for `host`.
    #[error("local lookup of {host} failed: {reason}")]
    LocalLookup { host: String, reason: FailureReason },

    /// A single public DNS server failed for `host`.
    #[error("lookup of {host} via {server} failed: {reason}")]
    RemoteLookup {
        host: String,
        server: SocketAddr,
        reason: FailureReason,
    },

    /// The local resolver and every roster server failed.
    #[error("failed to lookup {host} at any DNS server")]
    AllServersFailed { host: String },
}

impl DnsError {
    /// A system resolver failure for `host`.
    pub fn local(host: impl Into<String>, reason: FailureReason) -> Self {
        DnsError::LocalLookup {
            host: host.into(),
            reason,
        }
    }

    /// A failure of `server` to resolve `host`.
    pub fn remote(host: impl Into<String>, server: SocketAddr, reason: FailureReason) -> Self {
        DnsError::RemoteLookup {
            host: host.into(),
            server,
            reason,
        }
    }

    /// The hostname the failed lookup was for.
    pub fn host(&self) -> &str {
        match self {
            DnsError::LocalLookup { host, .. }
            | DnsError::RemoteLookup { host, .. }
            | DnsError::AllServersFailed { host } => host,
        }
    }

    /// The per-lookup reason, if this error describes a single lookup.
    pub fn reason(&self) -> Option<&FailureReason> {
        match self {
            DnsError::LocalLookup { reason, .. } | DnsError::RemoteLookup { reason, .. } => {
                Some(reason)
            }
            DnsError::AllServersFailed { .. } => None,
        }
    }

    /// True for a single lookup that ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self.reason(), Some(FailureReason::Timeout))
    }
}
