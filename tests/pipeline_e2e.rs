// tests/pipeline_e2e.rs
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::{json, Value as Json};

use prop_scrape::config::{Config, ConfigError};
use prop_scrape::engine::Source;
use prop_scrape::progress::NullProgress;
use prop_scrape::resolve::NOT_FOUND;
use prop_scrape::runner::{self, RunSummary};
use prop_scrape::session::fixture::{Action, Fixture};
use prop_scrape::session::FixtureSession;
use prop_scrape::Error;

const ADDRESS: &str = "1 Main St, San Jose, CA 95112";
const REDFIN_URL: &str = "https://www.redfin.com/CA/San-Jose/1-Main-St-95112/home/1234";

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/1_main_st.json")
}

fn config(out: &Path) -> Config {
    let mut cfg = Config::default();
    cfg.targets.property_address = ADDRESS.into();
    cfg.output.dir = out.to_path_buf();
    cfg
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
}

fn propstream() -> Json {
    json!({
        "input[name='username']": "",
        "input[placeholder='Enter County, City, Zip Code(s) or APN #']": "",
        "//span[text()='Details']": "Details",
        "//div[text()='Owner 1 Name']/following-sibling::div": "JANE DOE",
        "//div[text()='Owner Status']/following-sibling::div": "Owner occupied",
        "//div[text()='Est. Mortgage Balance']/preceding-sibling::div": "$212,400",
        "//div[text()='Comparables & Nearby Listings']": "Comparables & Nearby Listings",
        "//div[contains(text(),'Year Built')]/following-sibling::div": "1962",
        "//div[contains(text(),'SqFt')]/following-sibling::div": "1,500"
    })
}

fn compass_listing() -> Json {
    json!({
        "input[aria-describedBy='location-lookup-input-description']": "",
        "//th[text()='MLS #']/following-sibling::td": "ML99887766",
        "//div[text()='Price']//preceding-sibling::div": "$1,049,000",
        "//th[text()='Days on Compass']/following-sibling::td": "8",
        "//div[contains(text(), 'Courtesy of')]": "Courtesy of Acme Realty"
    })
}

fn google_hit() -> Json {
    json!({ "a[href*='https://www.redfin.com/']": { "href": REDFIN_URL } })
}

fn redfin_listing() -> Json {
    json!({
        "//div[contains(@class, 'sourceContent')]/span[2]": "ML81234567",
        "//div[contains(@class, 'statsValue')]": "$998,000"
    })
}

fn session(pages: Json) -> FixtureSession {
    let fixture: Fixture = serde_json::from_value(json!({ "pages": pages })).unwrap();
    FixtureSession::new(fixture)
}

fn run(cfg: &Config, s: &mut FixtureSession) -> Result<RunSummary, Error> {
    runner::run(cfg, s, as_of(), &mut NullProgress)
}

#[test]
fn secondary_listing_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let mut s = FixtureSession::load(&fixture_path()).unwrap();

    let summary = run(&cfg, &mut s).unwrap();
    assert_eq!(summary.listing_source, Source::Redfin);
    assert_eq!(summary.path, dir.path().join("1_Main_St_San_Jose_CA_95112.txt"));
    assert_eq!(fs::read_to_string(&summary.path).unwrap(), summary.report);

    let expected_head = "\
1 Main St, San Jose, CA 95112
-MLS #: ML81234567
-Time on Redfin: Could not find Time on Redfin as of 10/15/26
-Listed by: Couldn't find on Redfin
-Agent contact: Couldn't find agent contact on Redfin
-Pool: Redfin doesn't list pool status
Pictures: https://www.redfin.com/CA/San-Jose/1-Main-St-95112/home/1234
Listing Remarks:
\"Couldn't locate on Redfin\"

Ownership:
-Owner: JANE DOE
-Owner status: Absentee
-Distress: Pre-Foreclosure
-Est. Mortgage: $212,400
-Year built: 1962

Quick Check:
-Avg. sale price: $640,000
-70% of avg sale: $448,000

*ORIGINAL 10/15/26*
Asking Price $998,000
";
    assert!(
        summary.report.starts_with(expected_head),
        "report head differs:\n{}",
        summary.report
    );
    assert!(summary.report.contains("-Tier 1 ($30/sf): $45,000 on 1,500sf\n"));
    assert!(!summary.report.contains("Old house"));
}

#[test]
fn primary_listing_wins_when_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(json!({
        "propstream.com": propstream(),
        "compass.com": compass_listing(),
        "google.com": google_hit(),
        "redfin.com": redfin_listing()
    }));

    let summary = run(&config(dir.path()), &mut s).unwrap();
    assert_eq!(summary.listing_source, Source::Compass);
    assert!(summary.report.contains("-MLS #: ML99887766\n"));
    assert!(summary.report.contains("-Days on Compass: 8 as of 10/15/26\n"));
    assert!(summary.report.contains("-Courtesy of Acme Realty\n"));
    assert!(summary.report.contains("Asking Price $1,049,000\n"));
    // Redfin is never consulted
    assert!(!s.actions().iter().any(|a| matches!(a, Action::Goto(url) if url.contains("google.com"))));
    // no average sale price on the registry page
    assert!(!summary.report.contains("Quick Check:"));
}

#[test]
fn placeholder_when_no_listing_anywhere() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(json!({
        "propstream.com": propstream(),
        "compass.com": { "input[aria-describedBy='location-lookup-input-description']": "" }
    }));

    let summary = run(&config(dir.path()), &mut s).unwrap();
    assert_eq!(summary.listing_source, Source::Placeholder);
    assert!(summary.report.contains(&format!("-MLS #: {NOT_FOUND}\n")));
    assert!(summary.report.contains(&format!("Asking Price {NOT_FOUND}\n")));
    assert!(summary.report.contains("-Owner: JANE DOE\n"));
}

#[test]
fn registry_failure_is_fatal_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let mut pages = propstream();
    pages.as_object_mut().unwrap().remove("//div[text()='Owner 1 Name']/following-sibling::div");
    let mut s = session(json!({
        "propstream.com": pages,
        "compass.com": compass_listing()
    }));

    let err = run(&config(&out), &mut s).unwrap_err();
    assert!(matches!(err, Error::RegistryUnavailable { ref identity, .. } if identity == ADDRESS), "{err}");
    assert!(!out.exists());
    // listing sources are never opened
    assert_eq!(s.tabs(), 1);
}

#[test]
fn invalid_config_fails_before_any_navigation() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path());
    cfg.timeouts.login = 0;
    let mut s = session(json!({ "propstream.com": propstream() }));

    let err = run(&cfg, &mut s).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Invalid { ref field, .. }) if field == "timeouts.login"));
    assert!(s.actions().is_empty());
}

#[test]
fn fixture_session_opens_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let mut boxed = runner::open_session(&cfg, Some(&fixture_path())).unwrap();
    let summary = runner::run(&cfg, boxed.as_mut(), as_of(), &mut NullProgress).unwrap();
    assert!(summary.report.contains("-MLS #: ML81234567\n"));
    assert!(summary.path.exists());
}

#[test]
fn missing_fixture_is_a_session_error() {
    let cfg = config(Path::new("unused"));
    let res = runner::open_session(&cfg, Some(Path::new("does/not/exist.json")));
    assert!(matches!(res, Err(Error::Session(_))));
}
