//! Session implementation

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use execql_core::{Connection, ExecqlError, Result, StatementResult};
use futures::future::join_all;

use super::config::SessionConfig;
use super::factory::ConnectionFactory;
use super::stats::SessionStats;

/// A connection handle shared by every lane of a dispatch.
///
/// The session owns `num_conns` connections opened up front. Each statement
/// goes to the next connection in round-robin order and is bounded by the
/// configured statement timeout. Callers may invoke `execute` concurrently.
pub struct Session {
    config: SessionConfig,
    connections: Vec<Arc<dyn Connection>>,
    driver_name: String,
    next: AtomicUsize,
    closed: AtomicBool,
    executed: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
}

impl Session {
    /// Open all connections of the session
    ///
    /// Fails with the first connection error; connections that did open are
    /// closed again before returning. A configuration without connections is
    /// rejected before the factory is called.
    #[tracing::instrument(skip(factory, config), fields(num_conns = config.num_conns()))]
    pub async fn open<F: ConnectionFactory>(factory: F, config: SessionConfig) -> Result<Self> {
        if config.num_conns() == 0 {
            return Err(ExecqlError::Configuration("num_conns must be greater than 0".into()));
        }

        let factory = Arc::new(factory);
        let attempts = (0..config.num_conns()).map(|_| {
            let factory = factory.clone();
            async move { factory.create().await }
        });

        let mut connections = Vec::with_capacity(config.num_conns());
        let mut first_error = None;
        for result in join_all(attempts).await {
            match result {
                Ok(conn) => connections.push(conn),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            tracing::error!(error = %e, opened = connections.len(), "failed to open session");
            for conn in connections {
                let _ = conn.close().await;
            }
            return Err(e);
        }

        tracing::info!(connections = connections.len(), "session opened");
        Ok(Self::from_connections(connections, config))
    }

    /// Build a session over already opened connections
    ///
    /// # Panics
    ///
    /// Panics if `connections` is empty.
    pub fn from_connections(connections: Vec<Arc<dyn Connection>>, config: SessionConfig) -> Self {
        assert!(!connections.is_empty(), "a session needs at least one connection");
        let driver_name = connections[0].driver_name().to_string();

        Self {
            config,
            connections,
            driver_name,
            next: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
            executed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            timed_out: AtomicU64::new(0),
        }
    }

    /// Get the session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get current session statistics
    pub fn stats(&self) -> SessionStats {
        SessionStats::new(
            self.connections.len(),
            self.executed.load(Ordering::SeqCst),
            self.failed.load(Ordering::SeqCst),
            self.timed_out.load(Ordering::SeqCst),
        )
    }

    fn next_connection(&self) -> &Arc<dyn Connection> {
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        &self.connections[index]
    }
}

#[async_trait]
impl Connection for Session {
    fn driver_name(&self) -> &str {
        &self.driver_name
    }

    async fn execute(&self, sql: &str) -> Result<StatementResult> {
        if self.is_closed() {
            return Err(ExecqlError::Connection("Session is closed".into()));
        }

        let conn = self.next_connection();
        let result = match self.config.statement_timeout() {
            Some(timeout) => match tokio::time::timeout(timeout, conn.execute(sql)).await {
                Ok(result) => result,
                Err(_) => {
                    self.timed_out.fetch_add(1, Ordering::SeqCst);
                    tracing::warn!(timeout_ms = timeout.as_millis() as u64, "statement timed out");
                    return Err(ExecqlError::Timeout(format!(
                        "Statement did not complete within {:?}",
                        timeout
                    )));
                }
            },
            None => conn.execute(sql).await,
        };

        match &result {
            Ok(_) => self.executed.fetch_add(1, Ordering::SeqCst),
            Err(_) => self.failed.fetch_add(1, Ordering::SeqCst),
        };
        result
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let mut first_error = None;
        for conn in &self.connections {
            if let Err(e) = conn.close().await {
                tracing::warn!(error = %e, "failed to close connection");
                first_error.get_or_insert(e);
            }
        }

        let stats = self.stats();
        tracing::info!(
            executed = stats.executed(),
            failed = stats.failed(),
            timed_out = stats.timed_out(),
            "session closed"
        );

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
