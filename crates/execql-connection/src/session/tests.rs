//! Tests for session functionality

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use execql_core::{Connection, ExecqlError, Result, StatementResult};
use parking_lot::Mutex;

use super::config::SessionConfig;
use super::factory::ConnectionFactory;
use super::session::Session;
use super::stats::SessionStats;

/// Mock connection that records which statements reached it
struct MockConnection {
    id: usize,
    closed: AtomicBool,
    delay: Option<Duration>,
    fail_on: Option<&'static str>,
    log: Arc<Mutex<Vec<(usize, String)>>>,
}

impl MockConnection {
    fn new(id: usize, log: Arc<Mutex<Vec<(usize, String)>>>) -> Self {
        Self {
            id,
            closed: AtomicBool::new(false),
            delay: None,
            fail_on: None,
            log,
        }
    }
}

#[async_trait]
impl Connection for MockConnection {
    fn driver_name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, sql: &str) -> Result<StatementResult> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.log.lock().push((self.id, sql.to_string()));
        if self.fail_on.is_some_and(|pattern| sql.contains(pattern)) {
            return Err(ExecqlError::Query(format!("rejected: {}", sql)));
        }
        Ok(StatementResult::new(1))
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Mock factory that counts connections created and can fail on demand
struct MockConnectionFactory {
    counter: AtomicUsize,
    fail_after: Option<usize>,
    log: Arc<Mutex<Vec<(usize, String)>>>,
}

impl MockConnectionFactory {
    fn new() -> Self {
        Self {
            counter: AtomicUsize::new(0),
            fail_after: None,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn failing_after(created: usize) -> Self {
        Self {
            fail_after: Some(created),
            ..Self::new()
        }
    }

    fn count(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionFactory for MockConnectionFactory {
    async fn create(&self) -> Result<Arc<dyn Connection>> {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        if self.fail_after.is_some_and(|limit| id >= limit) {
            return Err(ExecqlError::Connection("host unreachable".into()));
        }
        Ok(Arc::new(MockConnection::new(id, self.log.clone())))
    }
}

fn mock_connections(count: usize) -> (Vec<Arc<dyn Connection>>, Arc<Mutex<Vec<(usize, String)>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let connections = (0..count)
        .map(|id| Arc::new(MockConnection::new(id, log.clone())) as Arc<dyn Connection>)
        .collect();
    (connections, log)
}

// =============================================================================
// SessionConfig tests
// =============================================================================

#[test]
fn test_session_config_creation() {
    let config = SessionConfig::new(4);
    assert_eq!(config.num_conns(), 4);
    assert_eq!(config.statement_timeout(), Some(Duration::from_millis(60_000)));
}

#[test]
fn test_session_config_zero_timeout_disables_deadline() {
    let config = SessionConfig::new(1).with_statement_timeout_ms(0);
    assert!(config.statement_timeout().is_none());
}

#[test]
fn test_session_config_default() {
    let config = SessionConfig::default();
    assert_eq!(config.num_conns(), 10);
}

#[test]
#[should_panic(expected = "num_conns must be greater than 0")]
fn test_session_config_invalid_num_conns() {
    SessionConfig::new(0);
}

#[test]
fn test_session_config_serialization() {
    let config = SessionConfig::new(3).with_statement_timeout_ms(1500);

    let json = serde_json::to_string(&config).expect("serialize");
    let deserialized: SessionConfig = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(deserialized.num_conns(), 3);
    assert_eq!(deserialized.statement_timeout(), Some(Duration::from_millis(1500)));
}

// =============================================================================
// SessionStats tests
// =============================================================================

#[test]
fn test_session_stats_attempted() {
    let stats = SessionStats::new(2, 7, 2, 1);
    assert_eq!(stats.connections(), 2);
    assert_eq!(stats.attempted(), 10);
}

// =============================================================================
// Session tests
// =============================================================================

#[tokio::test]
async fn test_session_opens_all_connections() {
    let factory = Arc::new(MockConnectionFactory::new());
    let session = Session::open(factory.clone(), SessionConfig::new(3))
        .await
        .expect("open session");

    assert_eq!(factory.count(), 3);
    assert_eq!(session.stats().connections(), 3);
    assert_eq!(session.driver_name(), "mock");
}

#[tokio::test]
async fn test_session_open_failure_is_reported() {
    let factory = MockConnectionFactory::failing_after(1);
    let result = Session::open(factory, SessionConfig::new(3)).await;

    let err = result.err().expect("open should fail");
    assert!(err.is_connection_error());
    assert!(err.to_string().contains("host unreachable"));
}

#[tokio::test]
async fn test_session_open_rejects_deserialized_zero_connections() {
    let config: SessionConfig =
        serde_json::from_str(r#"{"num_conns":0,"statement_timeout_ms":0}"#).expect("deserialize");
    let factory = Arc::new(MockConnectionFactory::new());

    let err = Session::open(factory.clone(), config)
        .await
        .err()
        .expect("open should fail");

    assert!(matches!(err, ExecqlError::Configuration(_)));
    assert_eq!(factory.count(), 0);
}

#[tokio::test]
async fn test_session_routes_round_robin() {
    let (connections, log) = mock_connections(3);
    let session = Session::from_connections(connections, SessionConfig::new(3));

    for i in 0..6 {
        session.execute(&format!("INSERT {}", i)).await.expect("execute");
    }

    let ids: Vec<usize> = log.lock().iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![0, 1, 2, 0, 1, 2]);
    assert_eq!(session.stats().executed(), 6);
}

#[tokio::test]
async fn test_session_counts_failures() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut conn = MockConnection::new(0, log);
    conn.fail_on = Some("BAD");
    let session = Session::from_connections(
        vec![Arc::new(conn) as Arc<dyn Connection>],
        SessionConfig::new(1),
    );

    session.execute("GOOD").await.expect("execute");
    let err = session.execute("BAD").await.expect_err("should fail");

    assert!(err.to_string().contains("rejected: BAD"));
    let stats = session.stats();
    assert_eq!(stats.executed(), 1);
    assert_eq!(stats.failed(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_session_enforces_statement_timeout() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut conn = MockConnection::new(0, log);
    conn.delay = Some(Duration::from_secs(5));
    let config = SessionConfig::new(1).with_statement_timeout_ms(100);
    let session = Session::from_connections(vec![Arc::new(conn) as Arc<dyn Connection>], config);

    let err = session.execute("SLOW").await.expect_err("should time out");

    assert!(matches!(err, ExecqlError::Timeout(_)));
    assert_eq!(session.stats().timed_out(), 1);
}

#[tokio::test]
async fn test_session_close_closes_every_connection() {
    let (connections, _log) = mock_connections(2);
    let session = Session::from_connections(connections.clone(), SessionConfig::new(2));

    session.close().await.expect("close");

    assert!(session.is_closed());
    assert!(connections.iter().all(|c| c.is_closed()));
    let err = session.execute("INSERT 1").await.expect_err("closed session");
    assert!(err.is_connection_error());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_session_concurrent_execute() {
    let (connections, log) = mock_connections(2);
    let session = Arc::new(Session::from_connections(connections, SessionConfig::new(2)));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let session = session.clone();
            tokio::spawn(async move { session.execute(&format!("INSERT {}", i)).await })
        })
        .collect();

    for handle in handles {
        handle.await.expect("join").expect("execute");
    }

    assert_eq!(log.lock().len(), 8);
    assert_eq!(session.stats().executed(), 8);
}
