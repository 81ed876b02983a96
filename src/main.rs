// src/main.rs — keyword-optimizer entry point

use clap::Parser;

use keyword_optimizer::cli::{run, Cli};
use keyword_optimizer::infra::logger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Respects RUST_LOG; -v raises the default level
    logger::init_logging(logger::level_for(cli.verbose));

    if let Err(e) = run::run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
