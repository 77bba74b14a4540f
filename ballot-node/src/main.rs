use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use ballot_node::{build_runtime, cli::Args, logging, NodeConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match NodeConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ballot-node: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _guard = match logging::init(config.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("ballot-node: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("--- STARTING BALLOT NODE ---");
    info!("Hosts file: {}", config.hosts_path.display());

    let runtime = match build_runtime(&config).await {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start node: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Node {} ready. Press Ctrl+C to stop.", runtime.id);

    let driver = runtime.proposal_driver(&config);
    tokio::spawn(async move {
        // The node keeps serving acceptor and learner traffic either way.
        if let Err(e) = driver.run().await {
            error!("❌ No round started: {}", e);
        }
    });

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Cannot listen for Ctrl+C ({}); serving until killed", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down {}", runtime.id);
    runtime.shutdown();

    ExitCode::SUCCESS
}
