use crate::bootstrap::bootstrap::Bootstrap;
use crate::utils::cli::Cli;
use clap::Parser;
use std::process::ExitCode;

pub mod bootstrap;
pub mod utils;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if Bootstrap::run(cli).await { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
