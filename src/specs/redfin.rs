// src/specs/redfin.rs
//! Spec for Redfin, the secondary listing source.
//!
//! Redfin has no usable address box for this flow, so the lookup goes through
//! a Google search for `redfin <address>` and follows the first redfin.com
//! result. No such result means the source is unavailable.
//!
//! Redfin does not publish pool status; that field is declared without any
//! shapes and always carries its fallback.
//!
//! Postcondition: the active tab is on the Redfin listing page (or on the
//! Google results when no link was found).

use reqwest::Url;

use crate::config::consts::URL_GOOGLE;
use crate::config::{TimeoutKind, Timeouts};
use crate::engine::{FieldDescriptor, FieldKind, Probe, Shape, Source};
use crate::session::{Condition, Locator, Session, SessionError};

use super::listing::*;
use super::{SourceAdapter, Stage};

const RESULT_LINK: Locator = Locator::Css("a[href*='https://www.redfin.com/']");

const AGENT_PARTS: &[Probe] = &[
    Probe::text(Locator::XPath("//span[contains(text(), 'Listed by')]/span[1]")),
    Probe::text(Locator::XPath("//span[contains(text(), 'Listed by')]/span[2]")),
    Probe::text(Locator::XPath("//span[contains(text(), 'Listed by')]/span[3]")),
];

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::gate(
        MLS_NUMBER,
        FieldKind::Text,
        &[Shape::One(Probe::text(Locator::XPath("//div[contains(@class, 'sourceContent')]/span[2]")))],
        TimeoutKind::Default,
    ),
    FieldDescriptor::data(
        ASK_PRICE,
        FieldKind::Currency,
        &[Shape::One(Probe::text(Locator::XPath("//div[contains(@class, 'statsValue')]")))],
        "Couldn't find Ask Price on Redfin",
    ),
    FieldDescriptor::data(
        DAYS_ON_MARKET,
        FieldKind::Text,
        &[Shape::One(Probe::text(Locator::XPath(
            "//span[contains(text(), 'Time on Redfin')]/ancestor::span[contains(@class,'header')]/following-sibling::span",
        )))],
        "Could not find Time on Redfin",
    ),
    FieldDescriptor::data(
        LISTING_AGENT,
        FieldKind::Text,
        &[
            Shape::Joined { prefix: "Listed by", parts: AGENT_PARTS, sep: " " },
            Shape::One(Probe::text(Locator::XPath("//span[contains(text(), 'Courtesy of')]"))),
        ],
        "Listed by: Couldn't find on Redfin",
    ),
    FieldDescriptor::data(
        AGENT_CONTACT,
        FieldKind::Text,
        &[Shape::One(Probe::text(Locator::XPath(
            "//div[contains(@class, 'agent-info')]//a[starts-with(@href, 'tel:')]",
        )))],
        "Couldn't find agent contact on Redfin",
    ),
    FieldDescriptor::data(POOL_STATUS, FieldKind::Text, &[], "Redfin doesn't list pool status"),
    FieldDescriptor::data(
        REMARKS,
        FieldKind::Text,
        &[Shape::One(Probe::text(Locator::XPath("//div[contains(@class, 'remarks')]/p/span")))],
        "Couldn't locate on Redfin",
    ),
    FieldDescriptor::data(PHOTOS_URL, FieldKind::Text, &[Shape::CurrentUrl], "Couldn't find photos on Redfin"),
];

const STAGES: &[Stage] = &[Stage { enter: None, fields: FIELDS }];

pub struct Redfin {
    timeouts: Timeouts,
}

impl Redfin {
    pub fn new(timeouts: Timeouts) -> Self {
        Self { timeouts }
    }
}

/// Google results page for `redfin <identity>`.
pub fn search_url(identity: &str) -> Result<Url, SessionError> {
    let base = join!(URL_GOOGLE, "search");
    Url::parse_with_params(&base, &[("q", join!("redfin ", identity))])
        .map_err(|e| SessionError::Protocol { error: s!("invalid search url"), message: e.to_string() })
}

impl SourceAdapter for Redfin {
    fn source(&self) -> Source {
        Source::Redfin
    }

    fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    fn stages(&self) -> &'static [Stage] {
        STAGES
    }

    /// Nothing to sign into; the lookup does the navigation.
    fn open(&self, _session: &mut dyn Session) -> Result<(), SessionError> {
        Ok(())
    }

    fn lookup(&self, session: &mut dyn Session, identity: &str) -> Result<(), SessionError> {
        session.goto(search_url(identity)?.as_str())?;
        let link = session.wait_for(&RESULT_LINK, Condition::Present, self.timeouts.get(TimeoutKind::Default))?;
        session.click(&link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{SourceOutcome, Value};
    use crate::session::FixtureSession;
    use rust_decimal::Decimal;

    const LISTING_URL: &str = "https://www.redfin.com/CA/San-Jose/1-Main-St-95112/home/1234";

    fn session(listing: &str) -> FixtureSession {
        let json = format!(
            r#"{{ "pages": {{
                "google.com": {{ "a[href*='https://www.redfin.com/']": {{ "href": "{LISTING_URL}" }} }},
                "redfin.com": {{ {listing} }}
            }} }}"#
        );
        FixtureSession::new(serde_json::from_str(&json).unwrap())
    }

    #[test]
    fn search_url_is_encoded() {
        let url = search_url("1 Main St, San Jose").unwrap();
        assert_eq!(url.as_str(), "https://www.google.com/search?q=redfin+1+Main+St%2C+San+Jose");
    }

    #[test]
    fn follows_search_result_to_listing() {
        let mut s = session(
            r#""//div[contains(@class, 'sourceContent')]/span[2]": "ML81234567",
               "//div[contains(@class, 'statsValue')]": "$998,000",
               "//span[contains(text(), 'Listed by')]/span[1]": "Ann Lee",
               "//span[contains(text(), 'Listed by')]/span[2]": "DRE #01234567",
               "//span[contains(text(), 'Listed by')]/span[3]": "Acme Realty""#,
        );
        let SourceOutcome::Success(rec) = Redfin::new(Timeouts::default()).fetch(&mut s, "1 Main St") else {
            panic!("listing should be found");
        };
        assert!(rec.covers(super::super::listing::FIELDS));
        assert_eq!(rec.get(ASK_PRICE), Some(&Value::Currency(Decimal::from(998_000))));
        assert_eq!(rec.get(LISTING_AGENT), Some(&Value::Text(s!("Listed by Ann Lee DRE #01234567 Acme Realty"))));
        assert_eq!(rec.get(POOL_STATUS), Some(&Value::sentinel("Redfin doesn't list pool status")));
        assert_eq!(rec.get(PHOTOS_URL), Some(&Value::Text(s!(LISTING_URL))));
    }

    #[test]
    fn listing_without_mls_number_is_unavailable() {
        let mut s = session(r#""//div[contains(@class, 'statsValue')]": "$998,000""#);
        let outcome = Redfin::new(Timeouts::default()).fetch(&mut s, "1 Main St");
        assert_eq!(outcome, SourceOutcome::unavailable("mls_number not found on Redfin"));
        // the result link was followed before the gate was checked
        assert_eq!(s.current_url().unwrap(), LISTING_URL);
    }

    #[test]
    fn no_search_result_is_unavailable() {
        let mut s = FixtureSession::new(Default::default());
        let outcome = Redfin::new(Timeouts::default()).fetch(&mut s, "1 Main St");
        assert!(matches!(outcome, SourceOutcome::Unavailable { .. }));
    }
}
