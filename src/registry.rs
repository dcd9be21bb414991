use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use tracing::info;

/// SessionEntry holds diagnostic metadata for one registered session.
/// The registry never hands out the session's sockets; entries exist
/// for bookkeeping and future disconnect notification only.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub peer: SocketAddr,
    pub username: String,
}

/// SessionRegistry maps inbound connection identity to session
/// metadata. An entry exists exactly while its session is between
/// successful inbound authentication and teardown. The lock is held
/// only across single map operations, never across I/O.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SocketAddr, SessionEntry>>,
}

/// SessionRegistry implementation block
impl SessionRegistry {
    /// new is a constructor for the SessionRegistry type
    pub fn new() -> Self {
        Self::default()
    }

    // Single map operations cannot leave an entry half-written, so a
    // poisoned lock still guards a consistent map; recover it instead
    // of cascading the panic into unrelated sessions
    fn sessions(&self) -> std::sync::MutexGuard<'_, HashMap<SocketAddr, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// register records a session after its inbound auth succeeded
    pub fn register(&self, peer: SocketAddr, username: impl Into<String>) {
        let entry = SessionEntry {
            peer,
            username: username.into(),
        };
        self.sessions().insert(peer, entry);
    }

    /// unregister removes a session's entry. Idempotent: safe to call
    /// on every exit path, including sessions that never registered.
    /// Returns whether an entry was actually removed.
    pub fn unregister(&self, peer: SocketAddr) -> bool {
        let removed = self.sessions().remove(&peer).is_some();
        if removed {
            info!("client {peer} unregistered");
        }
        removed
    }

    /// contains reports whether a session is currently registered
    pub fn contains(&self, peer: SocketAddr) -> bool {
        self.sessions().contains_key(&peer)
    }

    /// len returns the number of registered sessions
    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    /// is_empty reports whether no session is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(port: u16) -> SocketAddr {
        format!("127.0.0.1:{port}").parse().unwrap()
    }

    #[test]
    fn register_then_unregister() {
        let registry = SessionRegistry::new();
        registry.register(peer(4000), "alice");
        assert!(registry.contains(peer(4000)));
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister(peer(4000)));
        assert!(registry.is_empty());
    }

    #[test]
    fn unregister_is_idempotent() {
        let registry = SessionRegistry::new();
        registry.register(peer(4001), "alice");
        assert!(registry.unregister(peer(4001)));
        assert!(!registry.unregister(peer(4001)));
        // Never-registered peers are safe too
        assert!(!registry.unregister(peer(4002)));
    }

    #[test]
    fn sessions_only_touch_their_own_entry() {
        let registry = SessionRegistry::new();
        registry.register(peer(4003), "alice");
        registry.register(peer(4004), "bob");

        assert!(registry.unregister(peer(4003)));
        assert!(registry.contains(peer(4004)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn concurrent_register_unregister() {
        use std::sync::Arc;
        let registry = Arc::new(SessionRegistry::new());

        let handles: Vec<_> = (0..32u16)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let addr = peer(5000 + i);
                    registry.register(addr, format!("user{i}"));
                    assert!(registry.contains(addr));
                    assert!(registry.unregister(addr));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(registry.is_empty());
    }
}
