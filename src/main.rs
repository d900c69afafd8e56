use anyhow::Result;
use clap::Parser;

use drumgrid::{logging, run, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet)?;
    run(cli)
}
