// src/session/fixture.rs
//! Offline session backed by captured page text.
//!
//! A fixture maps a URL fragment (usually the host, e.g. `compass.com`) to the
//! elements visible while the browser is on a matching URL. Elements are keyed
//! by their selector string. A plain string is shorthand for `{ "text": … }`.
//!
//! ```json
//! {
//!   "pages": {
//!     "google.com": {
//!       "a[href*='https://www.redfin.com/']": { "href": "https://www.redfin.com/CA/home/1" }
//!     },
//!     "redfin.com": {
//!       "//div[contains(@class, 'sourceContent')]/span[2]": "ML81234567"
//!     }
//!   }
//! }
//! ```
//!
//! Clicking an element with an `href` navigates there. Waits never sleep.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::{ElementRef, Locator, Session, SessionError};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub pages: BTreeMap<String, BTreeMap<String, FixtureElement>>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum FixtureElement {
    Text(String),
    Full {
        #[serde(default)]
        text: String,
        #[serde(default)]
        properties: BTreeMap<String, String>,
        #[serde(default)]
        href: Option<String>,
        #[serde(default = "yes")]
        clickable: bool,
    },
}

fn yes() -> bool { true }

impl FixtureElement {
    fn text(&self) -> &str {
        match self {
            FixtureElement::Text(t) => t,
            FixtureElement::Full { text, .. } => text,
        }
    }

    fn property(&self, name: &str) -> Option<String> {
        match self {
            FixtureElement::Text(t) => (name == "textContent").then(|| t.clone()),
            FixtureElement::Full { text, properties, href, .. } => properties
                .get(name)
                .cloned()
                .or_else(|| (name == "href").then(|| href.clone()).flatten())
                .or_else(|| (name == "textContent").then(|| text.clone())),
        }
    }

    fn href(&self) -> Option<&str> {
        match self {
            FixtureElement::Full { href, .. } => href.as_deref(),
            FixtureElement::Text(_) => None,
        }
    }

    fn clickable(&self) -> bool {
        match self {
            FixtureElement::Full { clickable, .. } => *clickable,
            FixtureElement::Text(_) => true,
        }
    }
}

/// Everything the run did to the page, for assertions and dry-run output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Goto(String),
    OpenTab(String),
    Click(String),
    Type { selector: String, text: String },
    Script(String),
}

pub struct FixtureSession {
    fixture: Fixture,
    current_url: String,
    tabs: usize,
    actions: Vec<Action>,
}

impl FixtureSession {
    pub fn new(fixture: Fixture) -> Self {
        Self { fixture, current_url: s!("about:blank"), tabs: 1, actions: Vec::new() }
    }

    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let err = |message: String| SessionError::Fixture { path: path.display().to_string(), message };
        let text = std::fs::read_to_string(path).map_err(|e| err(e.to_string()))?;
        let fixture: Fixture = serde_json::from_str(&text).map_err(|e| err(e.to_string()))?;
        Ok(Self::new(fixture))
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn tabs(&self) -> usize {
        self.tabs
    }

    /// Element visible at the current URL. The most specific (longest)
    /// matching fragment wins; `*` matches everywhere.
    fn lookup(&self, selector: &str) -> Option<&FixtureElement> {
        self.fixture
            .pages
            .iter()
            .filter(|(fragment, _)| fragment.as_str() == "*" || self.current_url.contains(fragment.as_str()))
            .filter_map(|(fragment, elements)| elements.get(selector).map(|el| (fragment.len(), el)))
            .max_by_key(|(len, _)| *len)
            .map(|(_, el)| el)
    }

    fn element(&self, el: &ElementRef) -> Result<&FixtureElement, SessionError> {
        self.lookup(&el.0).ok_or(SessionError::Stale)
    }
}

impl Session for FixtureSession {
    fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        self.current_url = s!(url);
        self.actions.push(Action::Goto(s!(url)));
        Ok(())
    }

    fn current_url(&mut self) -> Result<String, SessionError> {
        Ok(self.current_url.clone())
    }

    fn find(&mut self, locator: &Locator) -> Result<Option<ElementRef>, SessionError> {
        Ok(self.lookup(locator.selector()).map(|_| ElementRef(s!(locator.selector()))))
    }

    fn is_clickable(&mut self, el: &ElementRef) -> Result<bool, SessionError> {
        Ok(self.element(el)?.clickable())
    }

    fn is_stale(&mut self, el: &ElementRef) -> Result<bool, SessionError> {
        Ok(self.lookup(&el.0).is_none())
    }

    fn text(&mut self, el: &ElementRef) -> Result<String, SessionError> {
        Ok(s!(self.element(el)?.text()))
    }

    fn property(&mut self, el: &ElementRef, name: &str) -> Result<Option<String>, SessionError> {
        Ok(self.element(el)?.property(name))
    }

    fn click(&mut self, el: &ElementRef) -> Result<(), SessionError> {
        let href = self.element(el)?.href().map(str::to_string);
        self.actions.push(Action::Click(el.0.clone()));
        if let Some(url) = href {
            self.current_url = url;
        }
        Ok(())
    }

    fn send_keys(&mut self, el: &ElementRef, text: &str) -> Result<(), SessionError> {
        self.element(el)?;
        self.actions.push(Action::Type { selector: el.0.clone(), text: s!(text) });
        Ok(())
    }

    fn open_tab(&mut self, url: &str) -> Result<(), SessionError> {
        self.tabs += 1;
        self.current_url = s!(url);
        self.actions.push(Action::OpenTab(s!(url)));
        Ok(())
    }

    fn execute(&mut self, script: &str, _args: &[&ElementRef]) -> Result<(), SessionError> {
        self.actions.push(Action::Script(s!(script)));
        Ok(())
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(250)
    }

    fn pause(&mut self, _d: Duration) {}
}
