//! execql - run a statement file over concurrent fail-fast lanes

mod logging;
mod options;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use execql_connection::{DriverFactory, Session};
use execql_core::Connection;
use execql_dispatch::{DispatchSummary, Dispatcher, read_statements};
use execql_driver_postgres::PostgresDriver;

use crate::logging::LoggingConfig;
use crate::options::Options;

#[tokio::main]
async fn main() -> ExitCode {
    let options = Options::parse();

    if let Err(e) = options.validate() {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let log_config = LoggingConfig::from_verbosity(options.verbose, options.log_format);
    if let Err(e) = logging::init(log_config) {
        eprintln!("failed to initialize logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(options).await {
        Ok(summary) => {
            println!(
                "executed {} statements over {} lanes in {:.3}s",
                summary.executed,
                summary.lanes,
                summary.elapsed.as_secs_f64()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "execql failed");
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(options: Options) -> anyhow::Result<DispatchSummary> {
    let Some(file) = options.file.as_deref() else {
        anyhow::bail!("-f or --file is required");
    };
    let statements = read_statements(file)?;

    let factory = DriverFactory::new(Arc::new(PostgresDriver::new()), options.connection_config());
    let session = Session::open(factory, options.session_config())
        .await
        .context("failed to open session")?;
    let session = Arc::new(session);

    let result = Dispatcher::new(options.thread)
        .dispatch(statements, session.clone())
        .await;

    let stats = session.stats();
    tracing::info!(
        executed = stats.executed(),
        failed = stats.failed(),
        timed_out = stats.timed_out(),
        "session finished"
    );
    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "failed to close session");
    }

    Ok(result?)
}
