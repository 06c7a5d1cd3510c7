//! resource-router
//!
//! Serves the routes declared in a TOML config file.
//!
//! ```text
//!   Client Request
//!   ─────────────▶ http server ──▶ dispatcher ──▶ route table (first match)
//!                                      │                 │
//!                                      │ no match        ▼
//!                                      ▼           state machine ──▶ resource
//!                                     404                │
//!   ◀────────────────────────────────────────────────────┘
//!   Client Response
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use resource_router::config::build_route_table;
use resource_router::lifecycle::{self, signals, Shutdown};

#[derive(Parser)]
#[command(name = "resource-router")]
#[command(about = "Path-pattern router serving declared resources", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate the configuration, print the route table and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.check {
        return check(&cli);
    }

    let started = match lifecycle::start(cli.config.as_deref()).await {
        Ok(started) => started,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_ctrl_c(shutdown.clone()));

    // Keep the watcher alive for the lifetime of the server
    let _watcher = started.watcher;
    let result = started
        .server
        .run(started.listener, started.config_updates, shutdown.subscribe())
        .await;

    match result {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

fn check(cli: &Cli) -> ExitCode {
    let table = lifecycle::startup::load(cli.config.as_deref())
        .and_then(|config| build_route_table(&config.routes));

    match table {
        Ok(table) => {
            for (index, route) in table.routes().iter().enumerate() {
                println!("{:>3}  {:<32} {}", index, route.pattern.to_string(), route.name);
            }
            for route in table.shadowed() {
                println!("warning: `{}` follows a catch-all and can never match", route.name);
            }
            println!("{} route(s) OK", table.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
