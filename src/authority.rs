use async_trait::async_trait;
use std::collections::HashMap;

/// UserPass holds a username/password credential pair
#[derive(Clone)]
pub struct UserPass {
    pub username: String,
    pub password: String,
}

/// AuthAuthority validates end-user credentials. The real authority is
/// an external service; the gateway only ever asks accept/reject and
/// retains no state between calls.
#[async_trait]
pub trait AuthAuthority: Send + Sync {
    /// login validates a username/password pair
    async fn login(&self, username: &str, password: &str) -> bool;
}

/// StaticAuthority is an in-memory user table standing in for the
/// external credential service
#[derive(Default)]
pub struct StaticAuthority {
    users: HashMap<String, String>,
}

/// StaticAuthority implementation block
impl StaticAuthority {
    /// new is a constructor for the StaticAuthority type
    pub fn new() -> Self {
        Self::default()
    }

    /// with_user adds a username/password pair to the table
    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.insert(username.into(), password.into());
        self
    }
}

#[async_trait]
impl AuthAuthority for StaticAuthority {
    async fn login(&self, username: &str, password: &str) -> bool {
        self.users.get(username).is_some_and(|p| p == password)
    }
}
