//! Ergonomic error context helpers.
//!
//! Extension traits that attach the hostname (and server) being looked up
//! to raw resolver errors, producing context-rich [`DnsError`] values.

use crate::base::error::{DnsError, FailureReason};
use hickory_resolver::{
    proto::{ProtoError, ProtoErrorKind},
    ResolveError,
};
use std::{io, net::SocketAddr};

/// Extension trait for system resolver results.
pub trait LocalResultExt<T> {
    /// Tag a failure as coming from the system resolver.
    ///
    /// # Example
    /// ```ignore
    /// use relaydns::base::context::LocalResultExt;
    ///
    /// let addrs = (host, 0).to_socket_addrs().local_context(host)?;
    /// // Error: "local lookup of example.com failed: ..."
    /// ```
    fn local_context(self, host: &str) -> Result<T, DnsError>;
}

/// Extension trait for results of talking to one specific DNS server.
pub trait ServerResultExt<T> {
    /// Tag a failure with the host being looked up and the server asked.
    fn server_context(self, host: &str, server: SocketAddr) -> Result<T, DnsError>;
}

impl<T> LocalResultExt<T> for Result<T, io::Error> {
    fn local_context(self, host: &str) -> Result<T, DnsError> {
        self.map_err(|e| DnsError::local(host, local_io_reason(&e)))
    }
}

/// Socket errors while reaching a server are dial failures.
impl<T> ServerResultExt<T> for Result<T, io::Error> {
    fn server_context(self, host: &str, server: SocketAddr) -> Result<T, DnsError> {
        self.map_err(|e| {
            let reason = match e.kind() {
                io::ErrorKind::TimedOut => FailureReason::Timeout,
                _ => FailureReason::unreachable(&e),
            };
            DnsError::remote(host, server, reason)
        })
    }
}

impl<T> ServerResultExt<T> for Result<T, ResolveError> {
    fn server_context(self, host: &str, server: SocketAddr) -> Result<T, DnsError> {
        self.map_err(|e| DnsError::remote(host, server, resolve_reason(&e)))
    }
}

fn local_io_reason(e: &io::Error) -> FailureReason {
    match e.kind() {
        io::ErrorKind::TimedOut => FailureReason::Timeout,
        io::ErrorKind::NotFound => FailureReason::NoAnswer,
        _ => FailureReason::resolver(e),
    }
}

fn resolve_reason(e: &ResolveError) -> FailureReason {
    if e.is_no_records_found() {
        return FailureReason::NoAnswer;
    }
    match e.proto().map(ProtoError::kind) {
        Some(ProtoErrorKind::Timeout) => FailureReason::Timeout,
        Some(ProtoErrorKind::Io(_) | ProtoErrorKind::NoConnections) => {
            FailureReason::unreachable(e)
        }
        _ => FailureReason::resolver(e),
    }
}
