//! Binary crate for the `cep-weather` services.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Loading configuration and installing logging
//! - Running the gateway or the resolver

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
