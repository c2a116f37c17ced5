use anyhow::Result;
use clap::Parser;
use cashbook::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cashbook::init_tracing(cli.verbose);
    cli.run().await
}
