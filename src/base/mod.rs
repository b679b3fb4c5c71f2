//! Base types and error handling.
//!
//! - [`DnsError`](error::DnsError): lookup failures, local, per-server and aggregate
//! - [`LocalResultExt`](context::LocalResultExt) / [`ServerResultExt`](context::ServerResultExt): attach host/server context to raw errors

pub mod context;
pub mod error;
