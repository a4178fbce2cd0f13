//! docs-provision: prepare a CI host for the documentation build and run it

use clap::Parser;
use console::Term;
use tracing_subscriber::EnvFilter;

use docs_provision::cli::Cli;
use docs_provision::domain::ProvisionError;
use docs_provision::domain::error::EXIT_FAILURE;
use docs_provision::output::colors_enabled;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, colors_enabled(cli.no_color, &Term::stderr()));

    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        let code = e
            .downcast_ref::<ProvisionError>()
            .map_or(EXIT_FAILURE, ProvisionError::exit_code);
        std::process::exit(code);
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`, `warn` when quiet).
fn init_tracing(quiet: bool, ansi: bool) {
    let default = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(std::io::stderr)
        .init();
}
