//! rcr - a safe command runner

mod cli;
mod commands;
mod output;
mod wiring;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    setup_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run(args).await,
        Commands::Validate(args) => commands::validate(args).await,
        Commands::List(args) => commands::list(args).map(|()| 0),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", format_error(&e));
            std::process::exit(1);
        }
    }
}

fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Format an anyhow error, deduplicating the chain when the top-level
/// Display already contains the source error's text (common with
/// thiserror's `#[from]` + `{source}` formatting).
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();
    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for cause in err.chain().skip(1) {
        buf.push_str(&format!("\ncaused by: {cause}"));
    }
    buf
}
