// The gateway speaks SOCKS5 on both sides of a session: it is the
// server toward the connecting client and the client toward the
// selected country relay. Only the authentication portion of the
// protocol is exercised -- after auth, bytes are spliced verbatim.

/// Version represents available SOCKS proxy versions
/// I included this for readability and clarity, but this
/// implementation only supports SOCKS5
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Version {
    SOCKS5 = 0x05,
}

/// AuthMethod represents available SOCKS5
/// authentication methods
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthMethod {
    // NoAuth = 0x00, not accepted by the gateway
    // Gssapi = 0x01, not implemented
    UserPass = 0x02,
    // 0x03 - 0x7f: IANA reserved
    // 0x80 - 0xFE: private methods
    NoAcceptable = 0xFF,
}

/// AuthMethod implementation block
impl AuthMethod {
    /// from_byte converts a byte to its related authentication method
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x02 => Some(AuthMethod::UserPass),
            0xFF => Some(AuthMethod::NoAcceptable),
            _ => None,
        }
    }
}

// Sub-negotiation version for username/password auth (RFC 1929)
pub const USERPASS_VERSION: u8 = 0x01;

/// AuthStatus represents the single status byte closing the
/// username/password sub-negotiation
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthStatus {
    Success = 0x00,
    Failure = 0x01,
}

/// AuthStatus implementation block
impl AuthStatus {
    /// from_byte converts a status byte; any non-zero value is a failure
    /// per the RFC
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x00 => AuthStatus::Success,
            _ => AuthStatus::Failure,
        }
    }
}
