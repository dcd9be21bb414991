use thiserror::Error;

/// SessionError enumerates every way a session can abort before
/// reaching the forwarding stage. The orchestrator handles all of
/// these locally: none escapes the session task, and every one leads
/// to the same cleanup (unregister + close what was opened).
#[derive(Error, Debug)]
pub enum SessionError {
    /// Malformed or unsupported inbound negotiation
    #[error("inbound handshake failed: {0}")]
    HandshakeFailed(String),

    /// The auth authority declined the client's credentials
    #[error("invalid username or password for {0:?}")]
    AuthRejected(String),

    /// The relay selector had no relay to offer
    #[error("no country relay available")]
    NoRelayAvailable,

    /// TCP connect to the selected relay failed
    #[error("error opening connection to country relay: {0}")]
    RelayDialFailed(String),

    /// The relay answered the method proposal with something other
    /// than username/password
    #[error("relay handshake failed: {0}")]
    RelayHandshakeFailed(String),

    /// The relay rejected the gateway's service credentials
    #[error("relay rejected gateway credentials")]
    RelayAuthFailed,
}
