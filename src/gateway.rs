use crate::authority::{AuthAuthority, UserPass};
use crate::error::SessionError;
use crate::forward::Exchange;
use crate::inbound;
use crate::outbound;
use crate::registry::SessionRegistry;
use crate::selector::{RelaySelector, RelayTarget};
use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tracing::{info, warn};

// Bounds how long a misbehaving or idle client can hold a handshake slot
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

// Bounds the relay dial plus outbound handshake so a stalled relay
// cannot leak a session task indefinitely
pub const RELAY_TIMEOUT: Duration = Duration::from_secs(5);

/// Gateway accepts SOCKS5 clients, authenticates them against the auth
/// authority, connects each one to a selected country relay, and
/// splices the two streams together without inspecting payload
pub struct Gateway {
    pub listen_addr: String,
    authority: Arc<dyn AuthAuthority>,
    selector: Arc<dyn RelaySelector>,
    service_creds: Arc<UserPass>,
    registry: Arc<SessionRegistry>,
    listener: Option<TcpListener>,
}

/// Gateway implementation block
impl Gateway {
    /// new is a constructor for the Gateway type
    pub fn new(
        listen_addr: impl Into<String>,
        authority: Arc<dyn AuthAuthority>,
        selector: Arc<dyn RelaySelector>,
    ) -> Self {
        Self {
            listen_addr: listen_addr.into(),
            authority,
            selector,
            // Fixed credentials the gateway presents to relays
            service_creds: Arc::new(UserPass {
                username: "gateway".into(),
                password: "gateway".into(),
            }),
            registry: Arc::new(SessionRegistry::new()),
            listener: None,
        }
    }

    /// with_service_credentials overrides the credentials the gateway
    /// uses to authenticate itself to country relays
    pub fn with_service_credentials(mut self, creds: UserPass) -> Self {
        self.service_creds = Arc::new(creds);
        self
    }

    /// registry returns a handle to the session registry for
    /// diagnostic inspection
    pub fn registry(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.registry)
    }

    /// bind to the listen address, panics when called twice
    pub async fn bind(&mut self) -> Result<SocketAddr> {
        if self.listener.is_some() {
            panic!("bind can only be called once");
        }

        // Instantiate tokio listener
        let listener = TcpListener::bind(&self.listen_addr).await?;
        let addr = listener.local_addr()?;

        info!("relay gateway listening on {addr}");

        self.listener = Some(listener);
        Ok(addr)
    }

    /// run handles gateway spinup and listens for incoming client
    /// connections, spawning one session task per accept
    pub async fn run(&mut self) -> Result<()> {
        if self.listener.is_none() {
            self.bind().await?;
        }
        let listener = self.listener.take().unwrap();

        // Listen for client connections
        loop {
            // Accept incoming connection
            let (client, peer_addr) = listener.accept().await?;

            // Clone shared handles for this session
            let authority = Arc::clone(&self.authority);
            let selector = Arc::clone(&self.selector);
            let service_creds = Arc::clone(&self.service_creds);
            let registry = Arc::clone(&self.registry);

            // Spawn async session task; the listener never waits on it
            tokio::spawn(async move {
                info!("accepted connection from {peer_addr}");
                handle_session(client, peer_addr, authority, selector, service_creds, registry)
                    .await;
            });
        }
    }
}

/// handle_session drives one session to completion and guarantees its
/// cleanup: the registry entry is removed exactly once on every exit
/// path, and both sockets close when the session's state is dropped
async fn handle_session(
    client: TcpStream,
    peer: SocketAddr,
    authority: Arc<dyn AuthAuthority>,
    selector: Arc<dyn RelaySelector>,
    service_creds: Arc<UserPass>,
    registry: Arc<SessionRegistry>,
) {
    match run_session(client, peer, authority, selector, service_creds, &registry).await {
        Ok(()) => info!("client {peer} disconnected after data exchange"),
        Err(e) => warn!("closing session for client {peer}: {e}"),
    }

    // Idempotent: a no-op for sessions that failed before registering
    registry.unregister(peer);
}

/// run_session walks one session through the ordered state progression:
/// inbound handshake -> authority check -> relay selection -> relay
/// dial + outbound handshake -> forwarding. Each step runs only after
/// its predecessor succeeded; any failure short-circuits out and the
/// sockets opened so far drop on return.
async fn run_session(
    mut client: TcpStream,
    peer: SocketAddr,
    authority: Arc<dyn AuthAuthority>,
    selector: Arc<dyn RelaySelector>,
    service_creds: Arc<UserPass>,
    registry: &SessionRegistry,
) -> Result<(), SessionError> {
    // Accepted -> InboundAuthenticated, bounded by the handshake timeout
    let username = timeout(
        HANDSHAKE_TIMEOUT,
        authenticate_client(&mut client, authority.as_ref()),
    )
    .await
    .map_err(|_| SessionError::HandshakeFailed("inbound handshake timed out".into()))??;

    // Registration happens only now, after the success status went out
    registry.register(peer, username.clone());
    info!("client {peer} authenticated with username: {username}");

    // InboundAuthenticated -> RelaySelected
    let target = selector.select().await.ok_or(SessionError::NoRelayAvailable)?;
    info!("client {peer} mapped to country relay: {}", target.host);

    // RelaySelected -> RelayConnected, bounded so a stalled relay
    // cannot hold the session open forever
    let relay = timeout(RELAY_TIMEOUT, connect_relay(&target, &service_creds))
        .await
        .map_err(|_| SessionError::RelayDialFailed("relay connection timed out".into()))??;
    info!("opened connection to country relay {} for client {peer}", target.addr());

    // RelayConnected -> Forwarding -> Closed. The forwarder never fails
    // the session; an I/O error in here is a normal disconnect.
    Exchange { client, relay }.run().await;

    Ok(())
}

/// authenticate_client runs the inbound protocol role end to end:
/// method negotiation, credential sub-negotiation, authority check, and
/// the closing status byte. Returns the authenticated username.
async fn authenticate_client(
    client: &mut TcpStream,
    authority: &dyn AuthAuthority,
) -> Result<String, SessionError> {
    inbound::negotiate_method(client).await?;
    let creds = inbound::read_credentials(client).await?;

    if !authority.login(&creds.username, &creds.password).await {
        // Failure status goes out before the caller drops the socket
        inbound::reject(client).await;
        return Err(SessionError::AuthRejected(creds.username));
    }

    inbound::complete(client).await?;
    Ok(creds.username)
}

/// connect_relay dials the selected country relay and authenticates the
/// gateway to it. The relay socket is returned only once both steps
/// succeeded; on failure it drops here and closes.
async fn connect_relay(
    target: &RelayTarget,
    service_creds: &UserPass,
) -> Result<TcpStream, SessionError> {
    let mut relay = TcpStream::connect(target.addr())
        .await
        .map_err(|e| SessionError::RelayDialFailed(e.to_string()))?;

    outbound::handshake(&mut relay, service_creds).await?;

    Ok(relay)
}
