use async_trait::async_trait;

// Well-known port country relays listen on
pub const RELAY_PORT: u16 = 60000;

/// RelayTarget identifies one downstream country relay to dial
#[derive(Debug, Clone, PartialEq)]
pub struct RelayTarget {
    pub host: String,
    pub port: u16,
}

/// RelayTarget implementation block
impl RelayTarget {
    /// addr formats the target as a host:port dial string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// RelaySelector chooses a country relay for a session. Selection
/// policy (static, round-robin, health-based, geo-based) lives entirely
/// behind this call; `None` means no relay is currently available and
/// the session must be aborted.
#[async_trait]
pub trait RelaySelector: Send + Sync {
    /// select produces a relay target for one session
    async fn select(&self) -> Option<RelayTarget>;
}

/// StaticSelector is the placeholder policy: every session maps to the
/// same configured relay host
pub struct StaticSelector {
    target: RelayTarget,
}

/// StaticSelector implementation block
impl StaticSelector {
    /// new is a constructor for the StaticSelector type
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            target: RelayTarget {
                host: host.into(),
                port,
            },
        }
    }
}

#[async_trait]
impl RelaySelector for StaticSelector {
    async fn select(&self) -> Option<RelayTarget> {
        Some(self.target.clone())
    }
}
