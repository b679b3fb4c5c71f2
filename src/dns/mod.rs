//! DNS Resolution Module
//!
//! Resolves hostnames even when the local resolver is broken:
//! - System resolver (getaddrinfo via thread pool), tried first
//! - Per-server hickory-dns resolver, one UDP query to one chosen server
//! - Fallback resolver racing the public DNS roster when the local lookup fails
//!
//! # Example
//!
//! ```rust,ignore
//! use relaydns::dns::{FallbackResolver, Name, Resolve};
//!
//! let resolver = FallbackResolver::new();
//! let ip = resolver.resolve(Name::new("example.com")).await?;
//! println!("Resolved: {}", ip);
//! ```

pub mod config;
mod fallback;
mod local;
mod remote;
mod resolve;
pub mod roster;

pub use config::LookupConfig;
pub use fallback::FallbackResolver;
pub use local::SystemResolver;
pub use remote::ServerResolver;
pub use resolve::{IpPreference, Name, Resolve, ResolveVia, Resolving};
pub use roster::Roster;
