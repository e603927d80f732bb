//! execql Core - Core abstractions shared by every execql crate
//!
//! This crate defines the seams the rest of the workspace is built on:
//!
//! - `Connection` - Trait for a live handle to the remote service
//! - `DatabaseDriver` - Trait for backends that open connections
//! - `ConnectionConfig` - Host list, credentials and target keyspace
//! - `ExecqlError` - The error type every connection-level operation returns

mod config;
mod connection;
mod driver;
mod error;
mod types;

pub use config::*;
pub use connection::*;
pub use driver::*;
pub use error::*;
pub use types::*;
