// src/cli.rs
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{self, consts::DEFAULT_CONFIG_FILE, Config};
use crate::error::Result;
use crate::progress::StderrProgress;
use crate::runner::{self, RunSummary};

/// Build underwriting notes for one property from PropStream, Compass and Redfin.
#[derive(Parser, Debug, Default)]
#[command(name = "prop_scrape", version, about)]
pub struct Args {
    /// Config file (JSON, or TOML by extension)
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Property address; overrides targets.property_address
    #[arg(short, long)]
    pub address: Option<String>,

    /// Treat the property as a condo (no "Details" click on PropStream)
    #[arg(long)]
    pub condo: bool,

    /// Output directory; overrides output.dir
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Replay captured pages from a JSON fixture instead of driving a browser
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// WebDriver endpoint; overrides webdriver.url
    #[arg(long)]
    pub webdriver: Option<String>,

    /// Also print the report to stdout
    #[arg(long)]
    pub stdout: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Append logs to this file as well
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Layer command-line overrides onto a file config.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(address) = &self.address {
            cfg.targets.property_address = address.clone();
        }
        if self.condo {
            cfg.targets.condo = true;
        }
        if let Some(out) = &self.out {
            cfg.output.dir = out.clone();
        }
        if let Some(url) = &self.webdriver {
            cfg.webdriver.url = url.clone();
        }
    }
}

/// Read the config file, apply overrides, validate.
pub fn load_config(args: &Args) -> Result<Config> {
    let mut cfg = config::read(&args.config)?;
    args.apply(&mut cfg);
    cfg.validate()?;
    Ok(cfg)
}

pub fn run(args: &Args) -> Result<RunSummary> {
    crate::log::init(args.verbose, args.log_file.as_deref())?;
    let cfg = load_config(args)?;

    let mut session = runner::open_session(&cfg, args.fixture.as_deref())?;
    let as_of = chrono::Local::now().date_naive();
    let summary = runner::run(&cfg, session.as_mut(), as_of, &mut StderrProgress::default())?;

    if args.stdout {
        print!("{}", summary.report);
    }
    Ok(summary)
}
