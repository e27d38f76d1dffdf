// src/bin/cli.rs
use clap::Parser;
use prop_scrape::cli::{self, Args};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let summary = cli::run(&args)?;
    eprintln!("Report ({} listing) written to {}", summary.listing_source, summary.path.display());
    Ok(())
}
