//! Relay startup configuration.
//!
//! Provides the defaults a transfer client needs before any user input:
//! - [`RelayDefaults`]: resolved relay addresses, port and passphrase
//! - [`initialize_defaults`]: resolves them explicitly, once, at startup

pub mod defaults;

pub use defaults::{
    format_address, initialize_defaults, RelayDefaults, RelaySettings, DEFAULT_PASSPHRASE,
    DEFAULT_PORT, DEFAULT_RELAY, DEFAULT_RELAY6,
};

/// Maximum transfer packet size.
pub const TCP_BUFFER_SIZE: usize = 1024 * 64;
