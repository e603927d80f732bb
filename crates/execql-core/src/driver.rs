//! Database driver trait definition

use crate::{Connection, ConnectionConfig, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// A backend able to open connections to the remote service
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Unique identifier for this driver (e.g., "postgres")
    fn name(&self) -> &'static str;

    /// Default connection port, used when the configuration leaves it at 0
    fn default_port(&self) -> Option<u16> {
        None
    }

    /// Open a new authenticated connection
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>>;
}
