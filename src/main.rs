use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tasklist::check;
use tasklist::cli::{self, serve::ServeOverrides, Cli, Commands};
use tasklist::storage::config::{self, Config};
use tasklist::storage::Backend;

/// Log filter used when RUST_LOG is not set
const DEFAULT_LOG_FILTER: &str = "tasklist=info,tower_http=info";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Print the resolved settings and the result of the backend check
fn report_check(config: &Config, result: &check::CheckResult) {
    println!("listen:     {}", config.listen_addr());
    println!("backend:    {}", config.storage.backend);
    if config.storage.backend == Backend::Document {
        let uri = if config.storage.uri.is_some() { "set" } else { "missing" };
        println!("uri:        {}", uri);
        println!("database:   {}", config.storage.database);
        println!("collection: {}", config.storage.collection);
    }
    if let Some(dir) = &config.server.static_dir {
        println!("static:     {}", dir.display());
    }
    println!();

    if result.ok {
        println!("  ✓ configuration OK, backend reachable");
    } else {
        for err in &result.errors {
            eprintln!("  ✗ {}", err);
        }
    }
}

fn main() -> ExitCode {
    // A missing .env is fine; the environment may already be set
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Cli::parse();
    let command = args.command.unwrap_or_else(Commands::default_command);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match command {
        Commands::Serve {
            port,
            host,
            backend,
            static_dir,
        } => {
            let mut config = config;
            ServeOverrides {
                port,
                host,
                backend,
                static_dir,
            }
            .apply(&mut config);

            if let Err(e) = runtime.block_on(cli::serve::execute(config)) {
                tracing::error!(error = %e, "server stopped");
                eprintln!("Server error: {}", e);
                return ExitCode::FAILURE;
            }
        }
        Commands::Check => {
            let result = runtime.block_on(check::check_environment(&config));
            report_check(&config, &result);
            if !result.ok {
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
