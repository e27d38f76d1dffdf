// src/runner.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{info, info_span};

use crate::{
    config::Config,
    engine::{Source, SourceOutcome},
    error::{Error, Result},
    file::write_report,
    merge::merge,
    progress::{Progress, Stage},
    report::compose,
    resolve::resolve_listing,
    session::{FixtureSession, Session, WebDriverSession},
    specs::{Compass, PropStream, Redfin, SourceAdapter},
};

/// Summary of what was produced.
#[derive(Debug)]
pub struct RunSummary {
    pub path: PathBuf,
    pub report: String,
    pub listing_source: Source,
}

/// Live browser through the configured WebDriver, or a captured fixture.
pub fn open_session(cfg: &Config, fixture: Option<&Path>) -> Result<Box<dyn Session>> {
    let session: Box<dyn Session> = match fixture {
        Some(path) => {
            info!(fixture = %path.display(), "replaying captured pages");
            Box::new(FixtureSession::load(path)?)
        }
        None => {
            let poll = Duration::from_millis(cfg.webdriver.poll_interval_ms);
            Box::new(WebDriverSession::start(&cfg.webdriver.url, poll)?)
        }
    };
    Ok(session)
}

/// Top-level runner: registry, listing fallback, merge, compose, write.
///
/// Config is validated before the session is touched. A registry that cannot
/// resolve the address ends the run before anything is written.
pub fn run(
    cfg: &Config,
    session: &mut dyn Session,
    as_of: NaiveDate,
    progress: &mut dyn Progress,
) -> Result<RunSummary> {
    cfg.validate()?;
    let identity = cfg.targets.property_address.as_str();
    let _span = info_span!("run", identity).entered();
    progress.begin(Stage::ALL.len());

    let result = run_stages(cfg, session, identity, as_of, progress);
    progress.finish();
    result
}

fn run_stages(
    cfg: &Config,
    session: &mut dyn Session,
    identity: &str,
    as_of: NaiveDate,
    progress: &mut dyn Progress,
) -> Result<RunSummary> {
    let registry = PropStream::new(cfg.propstream.clone(), cfg.targets.condo, cfg.timeouts);
    progress.log("PropStream: looking up owner and building facts");
    let registry_record = match registry.fetch(session, identity) {
        SourceOutcome::Success(rec) => rec,
        SourceOutcome::Unavailable { reason } => {
            return Err(Error::RegistryUnavailable { identity: s!(identity), reason });
        }
    };
    progress.stage_done(Stage::Registry);

    let primary = Compass::new(cfg.compass.clone(), cfg.timeouts);
    let secondary = Redfin::new(cfg.timeouts);
    progress.log("Listing: Compass, then Redfin");
    let listing_record = resolve_listing(session, &primary, &secondary, identity);
    let listing_source = listing_record.source();
    progress.log(&format!("Listing from {listing_source}"));
    progress.stage_done(Stage::Listing);

    let aggregate = merge(registry_record, listing_record, cfg, as_of);
    progress.stage_done(Stage::Merge);

    let report = compose(&aggregate);
    progress.stage_done(Stage::Compose);

    let path = write_report(&cfg.output.dir, identity, &report)?;
    info!(path = %path.display(), %listing_source, "report written");
    progress.stage_done(Stage::Write);

    Ok(RunSummary { path, report, listing_source })
}
