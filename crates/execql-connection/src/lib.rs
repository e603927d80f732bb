//! execql Connection - Session management
//!
//! This crate turns a driver into a single handle that many lanes can share:
//! a fixed number of connections, round-robin statement routing and a
//! per-statement deadline.

pub mod session;

pub use session::{ConnectionFactory, DriverFactory, Session, SessionConfig, SessionStats};
