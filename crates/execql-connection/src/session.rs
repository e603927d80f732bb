//! Shared sessions over a fixed set of connections
//!
//! # Example
//!
//! ```ignore
//! use execql_connection::{DriverFactory, Session, SessionConfig};
//!
//! let factory = DriverFactory::new(Arc::new(PostgresDriver::new()), connection_config);
//! let config = SessionConfig::new(10).with_statement_timeout_ms(60_000);
//!
//! let session = Session::open(factory, config).await?;
//! session.execute("INSERT INTO t VALUES (1)").await?;
//! session.close().await?;
//! ```

mod config;
mod factory;
mod session;
mod stats;

#[cfg(test)]
mod tests;

pub use config::SessionConfig;
pub use factory::{ConnectionFactory, DriverFactory};
pub use session::Session;
pub use stats::SessionStats;
