//! Connection trait

use crate::{Result, StatementResult};
use async_trait::async_trait;

/// A live handle to the remote service.
///
/// Implementations must tolerate concurrent `execute` calls from several
/// tasks at once; the dispatcher shares one handle across every lane.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "postgres", "mock")
    fn driver_name(&self) -> &str;

    /// Execute a single statement and wait for the reply
    async fn execute(&self, sql: &str) -> Result<StatementResult>;

    /// Close the connection
    async fn close(&self) -> Result<()>;

    /// Check if the connection is closed
    fn is_closed(&self) -> bool;
}
