// Command-line entry point. All dataset and training logic lives in the
// library (src/lib.rs and its modules); this binary only parses arguments
// and reports results.
mod cli;

use anyhow::Result;
use clap::Parser;

use cli::Cli;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    cli.run()
}
