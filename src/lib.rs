//! A transparent SOCKS5-to-SOCKS5 relay gateway
//!
//! The gateway accepts inbound SOCKS5 clients, validates their
//! credentials against an auth authority, then opens its own SOCKS5
//! connection to a selected downstream country relay and splices the
//! two TCP streams together. Application bytes flow end to end without
//! the gateway ever inspecting payload.
//!
//! - Features:
//!     - Dual-role SOCKS5: server toward the client, client toward the relay
//!     - Username/Password authentication only (RFC 1929)
//!     - Pluggable auth authority and relay selection policy
//!     - One async task per session, bounded handshake and dial timeouts
//!     - Mutex-guarded registry of active sessions
//! - [SOCKS5 (RFC 1928)](https://datatracker.ietf.org/doc/html/rfc1928)
//! - [Username/Password Authentication (RFC 1929)](https://datatracker.ietf.org/doc/html/rfc1929)
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use relaygate::{Gateway, StaticAuthority, StaticSelector, RELAY_PORT};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let authority = Arc::new(StaticAuthority::new().with_user("alice", "secret"));
//!     let selector = Arc::new(StaticSelector::new("it.skynetproxy.com", RELAY_PORT));
//!     let mut gateway = Gateway::new("0.0.0.0:10000", authority, selector);
//!     gateway.run().await
//! }
//! ```

pub mod authority;
pub mod error;
pub mod forward;
pub mod gateway;
pub mod inbound;
pub mod outbound;
pub mod protocol;
pub mod registry;
pub mod selector;

// Re-export main types at crate root for convenience
pub use authority::{AuthAuthority, StaticAuthority, UserPass};
pub use error::SessionError;
pub use gateway::Gateway;
pub use protocol::{AuthMethod, AuthStatus, Version};
pub use registry::SessionRegistry;
pub use selector::{RELAY_PORT, RelaySelector, RelayTarget, StaticSelector};
