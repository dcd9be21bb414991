use crate::authority::UserPass;
use crate::error::SessionError;
use crate::protocol::{AuthMethod, AuthStatus, USERPASS_VERSION, Version};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

type Result<T> = std::result::Result<T, SessionError>;

/// handshake runs the client-side SOCKS5 handshake against a freshly
/// connected country relay: propose username/password, validate the
/// relay's method choice, then authenticate with the gateway's own
/// service credentials (never the end user's).
pub async fn handshake(stream: &mut TcpStream, creds: &UserPass) -> Result<()> {
    propose_method(stream).await?;
    authenticate(stream, creds).await?;
    Ok(())
}

/// propose_method sends the version/method proposal and validates the
/// relay's selection
async fn propose_method(stream: &mut TcpStream) -> Result<()> {
    // ClientHello format
    // +----+----------+----------+
    // |VER | NMETHODS | METHODS  |
    // +----+----------+----------+
    // | 1  |    1     | 1 to 255 |
    // +----+----------+----------+

    // Propose exactly one method: username/password
    stream
        .write_all(&[Version::SOCKS5 as u8, 1, AuthMethod::UserPass as u8])
        .await
        .map_err(handshake_err)?;

    // Read the relay's choice: VER + METHOD
    let mut choice = [0u8; 2];
    stream.read_exact(&mut choice).await.map_err(handshake_err)?;

    // Ensure version is 0x05 -> SOCKS5
    if choice[0] != Version::SOCKS5 as u8 {
        return Err(SessionError::RelayHandshakeFailed(format!(
            "relay is not SOCKS5 (version byte {:#04x})",
            choice[0]
        )));
    }

    // Anything but username/password is a refusal
    if AuthMethod::from_byte(choice[1]) != Some(AuthMethod::UserPass) {
        return Err(SessionError::RelayHandshakeFailed(format!(
            "relay selected unsupported method {:#04x}",
            choice[1]
        )));
    }

    Ok(())
}

/// authenticate sends the RFC 1929 request built from the gateway's
/// service credentials and validates the status reply
async fn authenticate(stream: &mut TcpStream, creds: &UserPass) -> Result<()> {
    // Client Username/Password Request
    // +----+------+----------+------+----------+
    // |VER | ULEN |  UNAME   | PLEN |  PASSWD  |
    // +----+------+----------+------+----------+
    // | 1  |  1   | 1 to 255 |  1   | 1 to 255 |
    // +----+------+----------+------+----------+

    // Length fields are a single byte on the wire
    if creds.username.len() > 255 || creds.password.len() > 255 {
        return Err(SessionError::RelayHandshakeFailed(
            "service credentials exceed 255 bytes".into(),
        ));
    }

    // Build the request
    let mut request = vec![USERPASS_VERSION, creds.username.len() as u8];
    request.extend_from_slice(creds.username.as_bytes());
    request.push(creds.password.len() as u8);
    request.extend_from_slice(creds.password.as_bytes());

    // Write request to the relay
    stream.write_all(&request).await.map_err(handshake_err)?;

    // Read status reply: VER + STATUS
    let mut reply = [0u8; 2];
    stream.read_exact(&mut reply).await.map_err(handshake_err)?;

    // Check subnegotiation version, same as the inbound role does
    if reply[0] != USERPASS_VERSION {
        return Err(SessionError::RelayHandshakeFailed(format!(
            "invalid username/password subnegotiation version {:#04x} in relay reply",
            reply[0]
        )));
    }

    // Validate authentication status
    match AuthStatus::from_byte(reply[1]) {
        AuthStatus::Success => Ok(()),
        AuthStatus::Failure => Err(SessionError::RelayAuthFailed),
    }
}

// Truncated reads and transport errors during the outbound negotiation
// count as a failed relay handshake
fn handshake_err(e: std::io::Error) -> SessionError {
    SessionError::RelayHandshakeFailed(e.to_string())
}
