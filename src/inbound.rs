use crate::authority::UserPass;
use crate::error::SessionError;
use crate::protocol::{AuthMethod, AuthStatus, USERPASS_VERSION, Version};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

type Result<T> = std::result::Result<T, SessionError>;

/// negotiate_method runs the server-side method negotiation with a
/// freshly accepted client. Username/password is the only method the
/// gateway accepts; a client that does not offer it gets the
/// no-acceptable reply and the session is aborted.
pub async fn negotiate_method(stream: &mut TcpStream) -> Result<()> {
    // ClientHello format
    // +----+----------+----------+
    // |VER | NMETHODS | METHODS  |
    // +----+----------+----------+
    // | 1  |    1     | 1 to 255 |
    // +----+----------+----------+

    // Instantiate handshake buffer & read
    let mut buf = [0u8; 2];
    stream.read_exact(&mut buf).await.map_err(handshake_err)?;

    // Parse version and client methods from handshake
    let version = buf[0];
    let n_methods = buf[1];

    // Ensure version is 0x05 -> SOCKS5
    if version != Version::SOCKS5 as u8 {
        return Err(SessionError::HandshakeFailed(format!(
            "not SOCKS5 (version byte {version:#04x})"
        )));
    }

    // Read the client's proposed auth methods
    let mut methods = vec![0u8; n_methods as usize];
    stream.read_exact(&mut methods).await.map_err(handshake_err)?;

    // ServerChoice method selection reply format
    // +----+--------+
    // |VER | METHOD |
    // +----+--------+
    // | 1  |   1    |
    // +----+--------+

    // Username/password or nothing
    if !methods.contains(&(AuthMethod::UserPass as u8)) {
        let _ = stream
            .write_all(&[Version::SOCKS5 as u8, AuthMethod::NoAcceptable as u8])
            .await;
        return Err(SessionError::HandshakeFailed(
            "client offered no acceptable auth method".into(),
        ));
    }

    // Write response to client with selected method
    stream
        .write_all(&[Version::SOCKS5 as u8, AuthMethod::UserPass as u8])
        .await
        .map_err(handshake_err)?;

    Ok(())
}

/// read_credentials reads the username/password sub-negotiation request
/// (RFC 1929) and returns the pair to the caller. Validation is the
/// auth authority's job, not this role's.
pub async fn read_credentials(stream: &mut TcpStream) -> Result<UserPass> {
    // Client Username/Password Request
    // +----+------+----------+------+----------+
    // |VER | ULEN |  UNAME   | PLEN |  PASSWD  |
    // +----+------+----------+------+----------+
    // | 1  |  1   | 1 to 255 |  1   | 1 to 255 |
    // +----+------+----------+------+----------+

    // Get subnegotiation version -> 0x01 expected
    let mut ver = [0u8; 1];
    stream.read_exact(&mut ver).await.map_err(handshake_err)?;

    // Check version number
    if ver[0] != USERPASS_VERSION {
        return Err(SessionError::HandshakeFailed(format!(
            "invalid username/password subnegotiation version {:#04x}",
            ver[0]
        )));
    }

    // Instantiate buffer & read username length
    let mut username_len = [0u8; 1];
    stream
        .read_exact(&mut username_len)
        .await
        .map_err(handshake_err)?;

    // Read username
    let mut username = vec![0u8; username_len[0] as usize];
    stream.read_exact(&mut username).await.map_err(handshake_err)?;

    // Read password length
    let mut password_len = [0u8; 1];
    stream
        .read_exact(&mut password_len)
        .await
        .map_err(handshake_err)?;

    // Read password
    let mut password = vec![0u8; password_len[0] as usize];
    stream.read_exact(&mut password).await.map_err(handshake_err)?;

    // Convert username/password to owned strings
    let username = String::from_utf8(username)
        .map_err(|_| SessionError::HandshakeFailed("username is not valid UTF-8".into()))?;
    let password = String::from_utf8(password)
        .map_err(|_| SessionError::HandshakeFailed("password is not valid UTF-8".into()))?;

    Ok(UserPass { username, password })
}

/// complete writes the sub-negotiation success status once the caller
/// has confirmed the credentials with the auth authority
pub async fn complete(stream: &mut TcpStream) -> Result<()> {
    // Username/Password Server response
    // +----+--------+
    // |VER | STATUS |
    // +----+--------+
    // | 1  |   1    |
    // +----+--------+
    stream
        .write_all(&[USERPASS_VERSION, AuthStatus::Success as u8])
        .await
        .map_err(handshake_err)?;
    Ok(())
}

/// reject writes the failure status. The caller closes the socket right
/// after, so a write error here is not worth surfacing on its own.
pub async fn reject(stream: &mut TcpStream) {
    let _ = stream
        .write_all(&[USERPASS_VERSION, AuthStatus::Failure as u8])
        .await;
}

// Truncated reads and transport errors all count as a failed handshake
fn handshake_err(e: std::io::Error) -> SessionError {
    SessionError::HandshakeFailed(e.to_string())
}
