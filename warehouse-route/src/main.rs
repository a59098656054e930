use anyhow::Result;
use clap::Parser;

use ql::log::init_logging;

use crate::cli::Cli;

mod cli;

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    println!("{}", cli.run()?);
    Ok(())
}
