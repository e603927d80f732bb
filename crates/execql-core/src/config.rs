//! Connection configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Everything a driver needs to open an authenticated connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Hosts to try, in order
    pub hosts: Vec<String>,
    /// Port number (0 lets the driver pick its default)
    pub port: u16,
    /// Username
    pub username: Option<String>,
    /// Password
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Namespace the statements run in
    pub keyspace: String,
    /// Timeout for establishing each connection
    pub connect_timeout: Duration,
}

impl ConnectionConfig {
    /// Create a configuration for a comma separated host list, e.g. `"db01, db02"`
    pub fn from_host_list(hosts: &str, port: u16, keyspace: impl Into<String>) -> Self {
        Self {
            hosts: split_hosts(hosts),
            port,
            username: None,
            password: None,
            keyspace: keyspace.into(),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Set credentials. They are kept only when both parts are non-empty.
    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        if !username.is_empty() && !password.is_empty() {
            self.username = Some(username.to_string());
            self.password = Some(password.to_string());
        } else {
            self.username = None;
            self.password = None;
        }
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Whether the configuration carries credentials
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

fn split_hosts(hosts: &str) -> Vec<String> {
    hosts
        .split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect()
}
