//! fast-cosine CLI binary.

use std::process;

use clap::Parser;
use fast_cosine::cli::{args::FastCosineArgs, commands::execute_command};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = FastCosineArgs::parse();

    // RUST_LOG wins over the verbosity flags.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fast_cosine={}", args.log_level())));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
