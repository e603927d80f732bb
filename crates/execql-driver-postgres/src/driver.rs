//! PostgreSQL driver implementation

use async_trait::async_trait;
use execql_core::{Connection, ConnectionConfig, DatabaseDriver, ExecqlError, Result};
use std::sync::Arc;

use crate::PostgresConnection;

const DEFAULT_PORT: u16 = 5432;

/// PostgreSQL database driver
///
/// The keyspace of the connection configuration is the schema statements
/// run in; it becomes the session `search_path`.
pub struct PostgresDriver;

impl PostgresDriver {
    /// Create a new PostgreSQL driver instance
    pub fn new() -> Self {
        tracing::debug!("PostgreSQL driver initialized");
        Self
    }

    /// Build the tokio-postgres configuration for `config`
    pub fn build_config(&self, config: &ConnectionConfig) -> Result<tokio_postgres::Config> {
        if config.hosts.is_empty() {
            return Err(ExecqlError::Configuration("at least one host is required".into()));
        }
        if config.keyspace.trim().is_empty() {
            return Err(ExecqlError::Configuration("keyspace is required".into()));
        }

        let port = match (config.port, self.default_port()) {
            (0, Some(default)) => default,
            (port, _) => port,
        };

        let mut pg = tokio_postgres::Config::new();
        for host in &config.hosts {
            pg.host(host);
        }
        pg.port(port)
            .connect_timeout(config.connect_timeout)
            .application_name("execql")
            .options(&search_path_option(&config.keyspace));

        if let (Some(user), Some(password)) = (&config.username, &config.password) {
            pg.user(user).password(password);
        }

        Ok(pg)
    }
}

/// Startup option pinning `search_path` to exactly `keyspace`.
///
/// The name is sent as a quoted identifier so case and punctuation survive,
/// and whitespace and backslashes are escaped for the server's option parser.
fn search_path_option(keyspace: &str) -> String {
    let quoted = format!("\"{}\"", keyspace.replace('"', "\"\""));
    let mut option = String::from("-c search_path=");
    for c in quoted.chars() {
        if c.is_whitespace() || c == '\\' {
            option.push('\\');
        }
        option.push(c);
    }
    option
}

impl Default for PostgresDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for PostgresDriver {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn default_port(&self) -> Option<u16> {
        Some(DEFAULT_PORT)
    }

    #[tracing::instrument(
        skip(self, config),
        fields(hosts = ?config.hosts, keyspace = %config.keyspace)
    )]
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>> {
        let pg = self.build_config(config)?;

        let conn = PostgresConnection::connect(pg).await.map_err(|e| {
            tracing::error!(error = %e, "failed to connect to PostgreSQL database");
            e
        })?;
        conn.ensure_schema(&config.keyspace).await?;

        tracing::info!("PostgreSQL connection created");
        Ok(Arc::new(conn))
    }
}
