use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use execql_connection::SessionConfig;
use execql_core::ConnectionConfig;

use crate::logging::LogFormat;

/// Execute a file of statements against a database over concurrent lanes.
///
/// The file is split on `;` and the statements are spread over `--thread`
/// lanes. The first failing statement stops every lane.
#[derive(Parser, Debug, Clone)]
#[command(name = "execql", version, about, long_about = None)]
pub struct Options {
    /// Comma separated list of hosts
    #[arg(short = 'H', long, env = "EXECQL_HOST", default_value = "localhost")]
    pub host: String,

    /// Port of every host
    #[arg(short = 'P', long, env = "EXECQL_PORT", default_value_t = 5432)]
    pub port: u16,

    #[arg(short = 'u', long, env = "EXECQL_USER", default_value = "")]
    pub user: String,

    #[arg(
        short = 'p',
        long,
        env = "EXECQL_PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    pub password: String,

    /// Statement file to execute
    #[arg(short = 'f', long, env = "EXECQL_FILE")]
    pub file: Option<PathBuf>,

    /// Keyspace (schema) the statements run in
    #[arg(short = 'k', long, env = "EXECQL_KEYSPACE")]
    pub keyspace: Option<String>,

    /// Per-statement timeout in milliseconds, 0 disables it
    #[arg(long, env = "EXECQL_TIMEOUT", default_value_t = 60_000)]
    pub timeout: u64,

    /// Number of connections opened to the cluster
    #[arg(short = 'n', long = "num-conns", env = "EXECQL_NUM_CONNS", default_value_t = 10)]
    pub num_conns: usize,

    /// Number of concurrent lanes
    #[arg(short = 't', long, env = "EXECQL_THREAD", default_value_t = 1)]
    pub thread: usize,

    #[arg(long, env = "EXECQL_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Options {
    /// Every problem with the options, in flag order
    pub fn problems(&self) -> Vec<&'static str> {
        let mut problems = Vec::new();
        if self.file.as_ref().is_none_or(|f| f.as_os_str().is_empty()) {
            problems.push("-f or --file is required");
        }
        if self.keyspace.as_deref().is_none_or(|k| k.trim().is_empty()) {
            problems.push("-k or --keyspace is required");
        }
        if self.thread == 0 {
            problems.push("-t or --thread must be greater than 0");
        }
        if self.num_conns == 0 {
            problems.push("-n or --num-conns must be greater than 0");
        }
        problems
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let problems = self.problems();
        if problems.is_empty() {
            return Ok(());
        }
        anyhow::bail!(problems.join("\n"))
    }

    pub fn connection_config(&self) -> ConnectionConfig {
        let keyspace = self.keyspace.clone().unwrap_or_default();
        ConnectionConfig::from_host_list(&self.host, self.port, keyspace)
            .with_credentials(&self.user, &self.password)
            .with_connect_timeout(Duration::from_secs(10))
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.num_conns).with_statement_timeout_ms(self.timeout)
    }
}
