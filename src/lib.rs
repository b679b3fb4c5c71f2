//! # relaydns
//!
//! Startup-time hostname resolution that keeps working when the local DNS
//! resolver does not.
//!
//! `relaydns` asks the system resolver first. When that fails it races a
//! fixed roster of public DNS servers and takes the first answer. On top of
//! that it derives the default relay addresses a transfer client dials.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use relaydns::relay::RelayDefaults;
//!
//! #[tokio::main]
//! async fn main() {
//!     let defaults = RelayDefaults::init().await;
//!     if defaults.has_relay() {
//!         println!("relay: {}", defaults.relay);
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error types and context helpers
//! - [`dns`] - Local, per-server and fallback resolvers
//! - [`relay`] - Default relay addresses derived at startup

pub mod base;
pub mod dns;
pub mod relay;
