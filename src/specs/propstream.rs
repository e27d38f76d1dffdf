// src/specs/propstream.rs
//! Spec for the PropStream ownership registry.
//!
//! Purpose:
//! - Sign in at `login.propstream.com` and look the address up.
//! - Read owner and mortgage facts from the **details panel**, then building
//!   facts and the comparables average from the **Comparables & Nearby
//!   Listings** tab.
//!
//! Structural gate: the "Owner 1 Name" panel. If it never shows up the
//! registry did not resolve the address and the run cannot continue.
//!
//! Postcondition: the browser is on the comparables tab of the subject
//! property, narrowed to year built ±10 and public records (best effort).

use tracing::{debug, warn};

use crate::config::consts::URL_PROPSTREAM_LOGIN;
use crate::config::options::RegistryLogin;
use crate::config::{TimeoutKind, Timeouts};
use crate::engine::{FieldDescriptor, FieldKind, PartialRecord, Probe, Shape, Source};
use crate::session::{Condition, Locator, Session, SessionError};

use super::registry::*;
use super::{click, click_when_ready, type_into, type_when_ready, SourceAdapter, Stage};

const USERNAME: Locator = Locator::Css("input[name='username']");
const PASSWORD: Locator = Locator::Css("input[name='password']");
const SUBMIT: Locator = Locator::Css("button[type='submit']");
const SEARCH_BOX: Locator = Locator::Css("input[placeholder='Enter County, City, Zip Code(s) or APN #']");
const DETAILS: Locator = Locator::XPath("//span[text()='Details']");
const COMPS_TAB: Locator = Locator::XPath("//div[text()='Comparables & Nearby Listings']");
const YEAR_MIN: Locator = Locator::Css("input[name='yearBuiltMin']");
const YEAR_MAX: Locator = Locator::Css("input[name='yearBuiltMax']");
const PUBLIC_RECORD: Locator = Locator::XPath("//span[text()='Public Record']/preceding-sibling::input");

const OWNER_PANEL: Locator = Locator::XPath("//div[text()='Owner 1 Name']/following-sibling::div");

/// Comparables may differ from the subject by this many years.
const YEAR_WINDOW: i64 = 10;

const DETAIL_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::gate(OWNER_NAME, FieldKind::Text, &[Shape::One(Probe::text(OWNER_PANEL))], TimeoutKind::Search),
    FieldDescriptor::data(
        OWNER_STATUS,
        FieldKind::Text,
        &[Shape::One(Probe::text(Locator::XPath("//div[text()='Owner Status']/following-sibling::div")))],
        "Owner status unknown",
    ),
    FieldDescriptor::data(
        DISTRESS,
        FieldKind::Text,
        &[
            Shape::One(Probe::text(Locator::XPath("//div[text()='Distress']/following-sibling::div"))),
            Shape::One(Probe::text(Locator::XPath("//div[text()='Foreclosure Status']/following-sibling::div"))),
        ],
        "None found",
    ),
    FieldDescriptor::data(
        MORTGAGE_BALANCE,
        FieldKind::Currency,
        &[Shape::One(Probe::text(Locator::XPath("//div[text()='Est. Mortgage Balance']/preceding-sibling::div")))],
        "Couldn't find mortgage on PropStream",
    ),
];

const COMPS_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::data(
        YEAR_BUILT,
        FieldKind::Integer,
        &[Shape::One(Probe::text(Locator::XPath("//div[contains(text(),'Year Built')]/following-sibling::div")))],
        "Unknown",
    )
    .waiting(TimeoutKind::Default),
    FieldDescriptor::data(
        SQUARE_FOOTAGE,
        FieldKind::Integer,
        &[Shape::One(Probe::text(Locator::XPath("//div[contains(text(),'SqFt')]/following-sibling::div")))],
        "Unknown",
    ),
    FieldDescriptor::data(
        AVG_SALE_PRICE,
        FieldKind::Currency,
        &[Shape::One(Probe::text(Locator::XPath("//div[text()='Avg. Sale Price']/following-sibling::div")))],
        "No comparable sales on PropStream",
    ),
];

const STAGES: &[Stage] = &[
    Stage { enter: None, fields: DETAIL_FIELDS },
    Stage { enter: Some(COMPS_TAB), fields: COMPS_FIELDS },
];

pub struct PropStream {
    login: RegistryLogin,
    condo: bool,
    timeouts: Timeouts,
}

impl PropStream {
    pub fn new(login: RegistryLogin, condo: bool, timeouts: Timeouts) -> Self {
        Self { login, condo, timeouts }
    }

    fn sign_in(&self, session: &mut dyn Session) -> Result<(), SessionError> {
        let creds = &self.login.credentials;
        session.wait_for(&USERNAME, Condition::Clickable, self.timeouts.get(TimeoutKind::Default))?;
        if let Some(email) = creds.email.as_deref() {
            type_into(session, &USERNAME, email)?;
        }
        if let Some(password) = creds.password.as_deref() {
            type_into(session, &PASSWORD, password)?;
            click(session, &SUBMIT)?;
        }
        // without a stored password the user finishes the form by hand
        session.wait_for(&SEARCH_BOX, Condition::Present, self.timeouts.get(TimeoutKind::Login))?;
        Ok(())
    }

    fn apply_zoom(&self, session: &mut dyn Session) {
        let Some(zoom) = self.login.zoom else { return };
        let script = format!("document.body.style.zoom = '{zoom}%'");
        if let Err(e) = session.execute(&script, &[]) {
            debug!(source = %Source::PropStream, zoom, error = %e, "zoom not applied");
        }
    }

    /// Narrow comparables to similar-age public records.
    fn filter_comps(&self, session: &mut dyn Session, year_built: Option<i64>) -> Result<(), SessionError> {
        if let Some(year) = year_built {
            type_into(session, &YEAR_MIN, &year.saturating_sub(YEAR_WINDOW).to_string())?;
            type_into(session, &YEAR_MAX, &year.saturating_add(YEAR_WINDOW).to_string())?;
        }
        // the checkbox is hidden behind a styled label; a script click reaches it
        let Some(checkbox) = session.find(&PUBLIC_RECORD)? else {
            return Err(SessionError::NoSuchElement(PUBLIC_RECORD.to_string()));
        };
        session.execute("arguments[0].click()", &[&checkbox])
    }
}

impl SourceAdapter for PropStream {
    fn source(&self) -> Source {
        Source::PropStream
    }

    fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    fn stages(&self) -> &'static [Stage] {
        STAGES
    }

    fn open(&self, session: &mut dyn Session) -> Result<(), SessionError> {
        session.goto(URL_PROPSTREAM_LOGIN)?;
        self.sign_in(session)?;
        self.apply_zoom(session);
        Ok(())
    }

    fn lookup(&self, session: &mut dyn Session, identity: &str) -> Result<(), SessionError> {
        type_when_ready(session, &SEARCH_BOX, identity, self.timeouts.get(TimeoutKind::Default))?;
        if !self.condo {
            click_when_ready(session, &DETAILS, self.timeouts.get(TimeoutKind::Search))?;
        }
        Ok(())
    }

    fn finish(&self, session: &mut dyn Session, record: &PartialRecord) {
        let year = record.get(YEAR_BUILT).and_then(|v| v.as_integer());
        if let Err(e) = self.filter_comps(session, year) {
            warn!(source = %Source::PropStream, stage = "filter", error = %e, "comparables filter not applied");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::Credentials;
    use crate::engine::{SourceOutcome, Value};
    use crate::session::fixture::Action;
    use crate::session::FixtureSession;
    use rust_decimal::Decimal;

    fn adapter(condo: bool) -> PropStream {
        let login = RegistryLogin {
            credentials: Credentials { email: Some(s!("me@example.com")), password: Some(s!("hunter2")) },
            zoom: Some(80),
        };
        PropStream::new(login, condo, Timeouts::default())
    }

    fn session(extra: &str) -> FixtureSession {
        let json = format!(
            r#"{{ "pages": {{ "propstream.com": {{
                "input[name='username']": "",
                "input[name='password']": "",
                "button[type='submit']": "Sign In",
                "input[placeholder='Enter County, City, Zip Code(s) or APN #']": "",
                "//span[text()='Details']": "Details",
                "//div[text()='Comparables & Nearby Listings']": "Comparables & Nearby Listings",
                "input[name='yearBuiltMin']": "",
                "input[name='yearBuiltMax']": "",
                "//span[text()='Public Record']/preceding-sibling::input": ""
                {extra}
            }} }} }}"#
        );
        FixtureSession::new(serde_json::from_str(&json).unwrap())
    }

    const FULL: &str = r#",
        "//div[text()='Owner 1 Name']/following-sibling::div": "JANE DOE",
        "//div[text()='Owner Status']/following-sibling::div": "Absentee",
        "//div[text()='Est. Mortgage Balance']/preceding-sibling::div": "$212,400",
        "//div[contains(text(),'Year Built')]/following-sibling::div": "1962",
        "//div[contains(text(),'SqFt')]/following-sibling::div": "1,500",
        "//div[text()='Avg. Sale Price']/following-sibling::div": "$640,000"
    "#;

    #[test]
    fn reads_every_registry_field() {
        let mut s = session(FULL);
        let SourceOutcome::Success(rec) = adapter(false).fetch(&mut s, "1 Main St") else {
            panic!("registry should resolve");
        };
        assert!(rec.covers(FIELDS));
        assert_eq!(rec.len(), FIELDS.len());
        assert_eq!(rec.get(OWNER_NAME), Some(&Value::Text(s!("JANE DOE"))));
        assert_eq!(rec.get(MORTGAGE_BALANCE), Some(&Value::Currency(Decimal::from(212_400))));
        assert_eq!(rec.get(YEAR_BUILT), Some(&Value::Integer(1962)));
        assert_eq!(rec.get(SQUARE_FOOTAGE), Some(&Value::Integer(1500)));
        assert_eq!(rec.get(DISTRESS), Some(&Value::sentinel("None found")));
    }

    #[test]
    fn comps_are_filtered_by_year() {
        let mut s = session(FULL);
        adapter(false).fetch(&mut s, "1 Main St");
        let typed: Vec<_> = s
            .actions()
            .iter()
            .filter_map(|a| match a {
                Action::Type { selector, text } if selector.contains("yearBuilt") => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(typed, ["1952", "1972"]);
        assert!(s.actions().contains(&Action::Script(s!("arguments[0].click()"))));
        assert!(s.actions().contains(&Action::Script(s!("document.body.style.zoom = '80%'"))));
    }

    #[test]
    fn year_window_saturates_at_the_edges() {
        let mut s = session(&FULL.replace("\"1962\"", "\"9223372036854775807\""));
        let outcome = adapter(false).fetch(&mut s, "1 Main St");
        assert!(matches!(outcome, SourceOutcome::Success(_)));
        assert!(s.actions().contains(&Action::Type {
            selector: s!("input[name='yearBuiltMax']"),
            text: i64::MAX.to_string(),
        }));
        assert!(s.actions().contains(&Action::Type {
            selector: s!("input[name='yearBuiltMin']"),
            text: (i64::MAX - 10).to_string(),
        }));
    }

    #[test]
    fn condo_skips_details_click() {
        let mut s = session(FULL);
        adapter(true).fetch(&mut s, "1 Main St #4");
        assert!(!s.actions().contains(&Action::Click(s!("//span[text()='Details']"))));

        let mut s = session(FULL);
        adapter(false).fetch(&mut s, "1 Main St");
        assert!(s.actions().contains(&Action::Click(s!("//span[text()='Details']"))));
    }

    #[test]
    fn missing_owner_panel_is_unavailable() {
        let mut s = session("");
        let outcome = adapter(false).fetch(&mut s, "nowhere");
        assert_eq!(outcome, SourceOutcome::unavailable("owner_name not found on PropStream"));
    }
}
