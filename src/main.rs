//! complyscan - Audit repository code against its declared dependency manifest
//!
//! This is the main entry point for the CLI application.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use complyscan::cli::{commands, Cli, Commands, LogFormat};
use complyscan::exit_codes;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.log_format);

    // A broken config file must not prevent `init --force` from replacing it
    let config = cli.load_config();
    let result = match (cli.command, config) {
        (Commands::Init(args), _) => commands::init::execute(args).await,
        (_, Err(e)) => Err(e.into()),
        (Commands::Audit(args), Ok(config)) => commands::audit::execute(args, config).await,
        (Commands::Policy(args), Ok(config)) => commands::policy::execute(args, config).await,
        (Commands::History(args), Ok(config)) => commands::history::execute(args, config).await,
    };

    // Handle exit codes for CI integration
    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(exit_codes::for_error(&e));
        }
    }
}

fn setup_logging(verbosity: u8, format: LogFormat) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(env_filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init(),
    }
}
