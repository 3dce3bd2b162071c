#![forbid(unsafe_code)]

//! cukeconv: cucumber JSON report converter CLI entry point.

use clap::Parser;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level().as_str()),
    )
    .init();

    if let Err(e) = cli_app::run(&args) {
        eprintln!("cukeconv: {e}");
        std::process::exit(1);
    }
}
