mod backend;
mod cli;
mod commands;

use bedrock_proxy_ox::{
    BedrockProxyBlocking,
    config::{TOKEN_ENV, TOKEN_PREFIX},
};
use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    backend::{AsyncBackend, Backend},
    cli::{Cli, Command},
};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("bedrock_proxy_ox=debug,proxy_ox_common=debug,bedrock_proxy=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_token_instructions(problem: &str) {
    eprintln!("{problem}");
    eprintln!("   Format: {TOKEN_PREFIX}<base64-encoded-data>");
    eprintln!("   export {TOKEN_ENV}={TOKEN_PREFIX}...");
}

/// A missing `.env` is the normal case; anything else deserves a warning
fn dotenv_problem(result: Result<PathBuf, dotenvy::Error>) -> Option<dotenvy::Error> {
    match result {
        Ok(_) => None,
        Err(e) if e.not_found() => None,
        Err(e) => Some(e),
    }
}

fn run(cli: &Cli, backend: &dyn Backend) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Some(Command::Models) => commands::list_models(backend, &mut stdout),
        Some(Command::Chat(ref args)) => commands::chat(backend, args, &mut stdout),
        Some(Command::Demo) | None => commands::demo(backend, &mut stdout),
    }
}

fn main() -> ExitCode {
    // Loaded before parsing so the flags can fall back to it
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(e) = dotenv_problem(dotenv) {
        warn!(error = %e, "ignoring unreadable .env file");
    }

    let config = match cli.client_config() {
        Ok(config) => config,
        Err(e) if e.is_token_problem() => {
            print_token_instructions(&e.to_string());
            return ExitCode::from(2);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    if !config.token().is_well_formed() {
        tracing::warn!("token does not look like {TOKEN_PREFIX}<base64>; sending it anyway");
    }
    debug!(base_url = config.base_url(), blocking = cli.blocking, "starting");

    let backend: anyhow::Result<Box<dyn Backend>> = if cli.blocking {
        BedrockProxyBlocking::with_config(config)
            .map(|client| Box::new(client) as Box<dyn Backend>)
            .map_err(Into::into)
    } else {
        AsyncBackend::new(config).map(|backend| Box::new(backend) as Box<dyn Backend>)
    };

    let result = backend.and_then(|backend| run(&cli, backend.as_ref()));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = commands::report_error(&err, &mut std::io::stderr());
            ExitCode::FAILURE
        }
    }
}
