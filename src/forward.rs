use tokio::{io::copy_bidirectional, net::TcpStream};
use tracing::{debug, info};

/// Exchange holds the two authenticated sockets of a forwarding session
pub struct Exchange {
    pub client: TcpStream,
    pub relay: TcpStream,
}

/// Exchange implementation block
impl Exchange {
    /// run moves bytes in both directions until either side reaches
    /// end-of-stream or errors, then lets both sockets close on drop.
    /// An I/O error here is the normal way a healthy session ends, so
    /// it is logged and swallowed rather than escalated.
    pub async fn run(mut self) {
        match copy_bidirectional(&mut self.client, &mut self.relay).await {
            Ok((from_client, from_relay)) => {
                info!(
                    "data exchange finished: {} bytes from client, {} bytes from relay",
                    from_client, from_relay
                );
            }
            Err(e) => {
                debug!("data exchange ended on I/O error: {e}");
            }
        }
        // Both sockets drop here, closing each side
    }
}
