// src/specs/compass.rs
//! Spec for Compass, the primary listing source.
//!
//! Opens in its own tab so the PropStream tab stays usable. Sign-in is best
//! effort: a failed or skipped login is logged and the lookup decides whether
//! the listing is reachable.
//!
//! Structural gate: the `MLS #` row of the listing table.
//!
//! Postcondition: the browser's active tab is Compass, on the listing page
//! when the lookup succeeded.

use tracing::{info, warn};

use crate::config::consts::URL_COMPASS;
use crate::config::options::Credentials;
use crate::config::{TimeoutKind, Timeouts};
use crate::engine::{FieldDescriptor, FieldKind, Probe, Shape, Source};
use crate::session::{Condition, Locator, Session, SessionError};

use super::listing::*;
use super::{click, click_when_ready, type_into, type_when_ready, SourceAdapter, Stage};

const LOG_IN: Locator = Locator::Css("button[data-label='Log In']");
const EMAIL_OPTION: Locator = Locator::Css(".uc-authentication button:nth-child(5)");
const EMAIL: Locator = Locator::Css("input[name='email']");
const PASSWORD: Locator = Locator::Css("input[name='password']");
const CONTINUE: Locator = Locator::Css("#continue");
const FORGOT_PASSWORD: Locator = Locator::Css(".uc-authentication-footer button");
const SEARCH_BOX: Locator = Locator::Css("input[aria-describedBy='location-lookup-input-description']");

/// WebDriver key code for Enter.
const ENTER: &str = "\u{E007}";

const LISTED_BY: Locator = Locator::XPath("//div[contains(text(), 'Listed by')]");

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::gate(
        MLS_NUMBER,
        FieldKind::Text,
        &[Shape::One(Probe::text(Locator::XPath("//th[text()='MLS #']/following-sibling::td")))],
        TimeoutKind::Search,
    ),
    FieldDescriptor::data(
        ASK_PRICE,
        FieldKind::Currency,
        &[Shape::One(Probe::text(Locator::XPath("//div[text()='Price']//preceding-sibling::div")))],
        "N/A",
    ),
    FieldDescriptor::data(
        DAYS_ON_MARKET,
        FieldKind::Text,
        &[Shape::One(Probe::text(Locator::XPath("//th[text()='Days on Compass']/following-sibling::td")))],
        "N/A",
    ),
    FieldDescriptor::data(
        LISTING_AGENT,
        FieldKind::Text,
        &[
            Shape::WithTail {
                head: Probe::text(LISTED_BY),
                tail: Probe::text(Locator::XPath("//div[contains(text(), 'Listed by')]/following-sibling::div")),
                sep: "\n-",
            },
            Shape::One(Probe::text(Locator::XPath("//div[contains(text(), 'Courtesy of')]"))),
        ],
        "Listed by: Couldn't find on Compass",
    ),
    FieldDescriptor::data(
        AGENT_CONTACT,
        FieldKind::Text,
        &[
            Shape::One(Probe::text(Locator::Css("a[data-tn='listing-agent-phone']"))),
            Shape::One(Probe::property(Locator::XPath("//a[starts-with(@href, 'mailto:')]"), "href")),
        ],
        "Couldn't find agent contact on Compass",
    ),
    FieldDescriptor::data(
        POOL_STATUS,
        FieldKind::Text,
        &[
            Shape::One(Probe::text(Locator::XPath("//div[contains(text(), 'Pool Type: ')]/span"))),
            Shape::One(Probe::text(Locator::XPath("//span[contains(text(), 'Private Pool')]/following-sibling::div"))),
        ],
        "Didn't find on Compass",
    ),
    FieldDescriptor::data(
        REMARKS,
        FieldKind::Text,
        &[
            // the long description sits in a visually clipped span
            Shape::One(Probe::property(
                Locator::XPath("//div[contains(@class, 'textIntent-body')]/div/span[2]"),
                "textContent",
            )),
            Shape::One(Probe::text(Locator::XPath("//div[contains(@class, 'textIntent-body')]/div/span"))),
        ],
        "Couldn't locate on Compass",
    ),
    FieldDescriptor::data(PHOTOS_URL, FieldKind::Text, &[Shape::CurrentUrl], "Couldn't find photos on Compass"),
];

const STAGES: &[Stage] = &[Stage { enter: None, fields: FIELDS }];

pub struct Compass {
    credentials: Credentials,
    timeouts: Timeouts,
}

impl Compass {
    pub fn new(credentials: Credentials, timeouts: Timeouts) -> Self {
        Self { credentials, timeouts }
    }

    fn sign_in(&self, session: &mut dyn Session) -> Result<(), SessionError> {
        let t = &self.timeouts;
        click_when_ready(session, &LOG_IN, t.get(TimeoutKind::Search))?;
        click_when_ready(session, &EMAIL_OPTION, t.get(TimeoutKind::Default))?;
        if let Some(email) = self.credentials.email.as_deref() {
            type_into(session, &EMAIL, email)?;
            click(session, &CONTINUE)?;
            if let Some(password) = self.credentials.password.as_deref() {
                type_when_ready(session, &PASSWORD, password, t.get(TimeoutKind::Default))?;
                click(session, &CONTINUE)?;
            }
        }
        // the dialog's footer detaches once the user is signed in
        let forgot = session.wait_for(&FORGOT_PASSWORD, Condition::Present, t.get(TimeoutKind::Default))?;
        session.wait_gone(&forgot, t.get(TimeoutKind::Login))
    }
}

impl SourceAdapter for Compass {
    fn source(&self) -> Source {
        Source::Compass
    }

    fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    fn stages(&self) -> &'static [Stage] {
        STAGES
    }

    fn open(&self, session: &mut dyn Session) -> Result<(), SessionError> {
        session.open_tab(URL_COMPASS)?;
        match self.sign_in(session) {
            Ok(()) => info!(source = %Source::Compass, "signed in"),
            Err(e) => warn!(source = %Source::Compass, stage = "sign_in", error = %e, "continuing signed out"),
        }
        Ok(())
    }

    fn lookup(&self, session: &mut dyn Session, identity: &str) -> Result<(), SessionError> {
        let search = session.wait_for(&SEARCH_BOX, Condition::Clickable, self.timeouts.get(TimeoutKind::Search))?;
        session.click(&search)?;
        session.send_keys(&search, &join!(identity, ENTER))
    }
}
