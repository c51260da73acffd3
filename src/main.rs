//! omnistream-setup entry point.

use std::process::ExitCode;

use clap::Parser;
use omnistream_setup::cli::{self, Cli};
use omnistream_setup::shell::is_ci;
use omnistream_setup::ui::create_ui;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("omnistream_setup=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("omnistream_setup=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("omnistream-setup starting with args: {:?}", cli);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let is_interactive = !cli.non_interactive && !is_ci();
    let mut ui = create_ui(is_interactive, cli.output_mode());

    match cli::run(&cli, ui.as_mut()) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
