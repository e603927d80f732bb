//! PostgreSQL connection implementation

use async_trait::async_trait;
use execql_core::{Connection, ExecqlError, Result, StatementResult};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};

/// Render a server-side error with its SQLSTATE and the optional detail and hint
fn format_postgres_error(error: &tokio_postgres::Error) -> String {
    match error.as_db_error() {
        Some(db) => describe_db_error(db.code().code(), db.message(), db.detail(), db.hint()),
        None => error.to_string(),
    }
}

fn describe_db_error(
    code: &str,
    message: &str,
    detail: Option<&str>,
    hint: Option<&str>,
) -> String {
    let mut text = match code {
        "42601" => format!("syntax error: {}", message),
        "42P01" => format!("undefined table: {}", message),
        "42P07" => format!("table already exists: {}", message),
        "23505" => format!("duplicate value violates unique constraint: {}", message),
        "23502" => format!("null value violates not-null constraint: {}", message),
        _ => message.to_string(),
    };

    for (label, value) in [("detail", detail), ("hint", hint)] {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            text.push_str(&format!(" ({}: {})", label, value));
        }
    }

    text.push_str(&format!(" [SQLSTATE {}]", code));
    text
}

/// A single PostgreSQL client connection
///
/// The client pipelines concurrent requests, so one connection may be shared
/// by several lanes without a lock.
pub struct PostgresConnection {
    client: Client,
    closed: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PostgresConnection {
    /// Connect using a prepared configuration and drive the connection on
    /// a background task
    pub async fn connect(config: tokio_postgres::Config) -> Result<Self> {
        tracing::info!(hosts = config.get_hosts().len(), "connecting to PostgreSQL database");

        let (client, connection) = config
            .connect(NoTls)
            .await
            .map_err(|e| ExecqlError::Connection(format_postgres_error(&e)))?;

        let task = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "PostgreSQL connection error");
            }
        });

        Ok(Self {
            client,
            closed: AtomicBool::new(false),
            task: Mutex::new(Some(task)),
        })
    }

    /// Fail unless `schema` exists on the server
    pub async fn ensure_schema(&self, schema: &str) -> Result<()> {
        let row = self
            .client
            .query_opt("SELECT 1 FROM pg_namespace WHERE nspname = $1", &[&schema])
            .await
            .map_err(|e| ExecqlError::Connection(format_postgres_error(&e)))?;

        match row {
            Some(_) => Ok(()),
            None => Err(ExecqlError::Configuration(format!(
                "keyspace '{}' does not exist",
                schema
            ))),
        }
    }
}

#[async_trait]
impl Connection for PostgresConnection {
    fn driver_name(&self) -> &str {
        "postgres"
    }

    async fn execute(&self, sql: &str) -> Result<StatementResult> {
        if self.is_closed() {
            return Err(ExecqlError::Connection("connection is closed".into()));
        }

        match self.client.execute(sql, &[]).await {
            Ok(affected_rows) => Ok(StatementResult::new(affected_rows)),
            Err(e) if e.is_closed() => Err(ExecqlError::Connection(format_postgres_error(&e))),
            Err(e) => Err(ExecqlError::Query(format_postgres_error(&e))),
        }
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
        tracing::debug!("PostgreSQL connection closed");
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire) || self.client.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_known_code() {
        let text = describe_db_error("42P01", "relation \"t\" does not exist", None, None);
        assert_eq!(text, "undefined table: relation \"t\" does not exist [SQLSTATE 42P01]");
    }

    #[test]
    fn test_describe_includes_detail_and_hint() {
        let text = describe_db_error(
            "23505",
            "duplicate key",
            Some("Key (id)=(1) already exists."),
            Some("  "),
        );
        assert_eq!(
            text,
            "duplicate value violates unique constraint: duplicate key \
             (detail: Key (id)=(1) already exists.) [SQLSTATE 23505]"
        );
    }

    #[test]
    fn test_describe_unknown_code_keeps_message() {
        let text = describe_db_error("XX000", "internal error", None, Some("retry later"));
        assert_eq!(text, "internal error (hint: retry later) [SQLSTATE XX000]");
    }
}
