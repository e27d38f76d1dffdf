// src/session/mod.rs
//! # Browsing session
//!
//! The one piece of shared, mutable state in a run: a single browser window
//! (plus tabs) that every source adapter drives in turn.
//!
//! ## Ownership
//! - The runner owns exactly one `Session` and lends it `&mut` to each adapter.
//!   Handing the session from one adapter to the next is a hard serialization
//!   point; nothing runs concurrently.
//! - The only state an adapter may rely on after another adapter returns is the
//!   **current location**, and each adapter documents what that is.
//!
//! ## Waiting
//! Every wait is bounded. [`Session::wait_for`] polls until the element meets
//! its [`Condition`] or the timeout expires with [`SessionError::Timeout`].
//! Callers decide what a timeout *means* (fallback value vs. unavailable source).
//!
//! ## Implementations
//! - [`webdriver::WebDriverSession`]: W3C WebDriver (chromedriver) over HTTP.
//! - [`fixture::FixtureSession`]: offline replay of captured page text.

pub mod fixture;
pub mod webdriver;

use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;

pub use fixture::FixtureSession;
pub use webdriver::WebDriverSession;

/// Where an element lives on a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Locator {
    XPath(&'static str),
    Css(&'static str),
}

impl Locator {
    /// W3C "using" strategy name.
    pub fn strategy(&self) -> &'static str {
        match self {
            Locator::XPath(_) => "xpath",
            Locator::Css(_) => "css selector",
        }
    }

    pub fn selector(&self) -> &'static str {
        match self {
            Locator::XPath(s) | Locator::Css(s) => s,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.strategy(), self.selector())
    }
}

/// Opaque handle to a located element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementRef(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    /// In the DOM.
    Present,
    /// In the DOM, displayed and enabled.
    Clickable,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("timed out after {}s waiting for {what}", after.as_secs())]
    Timeout { what: String, after: Duration },

    #[error("no such element: {0}")]
    NoSuchElement(String),

    #[error("stale element reference")]
    Stale,

    #[error("webdriver transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webdriver {error}: {message}")]
    Protocol { error: String, message: String },

    #[error("fixture {path}: {message}")]
    Fixture { path: String, message: String },
}

/// Navigation, element lookup with bounded waits, and text/click input.
///
/// Implementors supply the primitive operations; the waiting helpers are
/// provided on top of them.
pub trait Session {
    fn goto(&mut self, url: &str) -> Result<(), SessionError>;

    fn current_url(&mut self) -> Result<String, SessionError>;

    /// Immediate lookup. `Ok(None)` when nothing matches.
    fn find(&mut self, locator: &Locator) -> Result<Option<ElementRef>, SessionError>;

    fn is_clickable(&mut self, el: &ElementRef) -> Result<bool, SessionError>;

    /// True once `el` has been detached from the document.
    fn is_stale(&mut self, el: &ElementRef) -> Result<bool, SessionError>;

    /// Rendered (visible) text.
    fn text(&mut self, el: &ElementRef) -> Result<String, SessionError>;

    /// DOM property such as `textContent` or `href`.
    fn property(&mut self, el: &ElementRef, name: &str) -> Result<Option<String>, SessionError>;

    fn click(&mut self, el: &ElementRef) -> Result<(), SessionError>;

    fn send_keys(&mut self, el: &ElementRef, text: &str) -> Result<(), SessionError>;

    /// Open `url` in a new tab and switch to it.
    fn open_tab(&mut self, url: &str) -> Result<(), SessionError>;

    /// Run a script in the page; `args` may reference elements.
    fn execute(&mut self, script: &str, args: &[&ElementRef]) -> Result<(), SessionError>;

    fn poll_interval(&self) -> Duration;

    /// Pause between polls. Replays override this with a no-op.
    fn pause(&mut self, d: Duration) {
        std::thread::sleep(d);
    }

    /// Poll until `locator` matches and satisfies `cond`, or `timeout` passes.
    fn wait_for(
        &mut self,
        locator: &Locator,
        cond: Condition,
        timeout: Duration,
    ) -> Result<ElementRef, SessionError> {
        let interval = self.poll_interval();
        let attempts = poll_attempts(timeout, interval);
        let started = Instant::now();

        for attempt in 0..attempts {
            if let Some(el) = self.find(locator)? {
                let ready = match cond {
                    Condition::Present => true,
                    Condition::Clickable => self.is_clickable(&el)?,
                };
                if ready { return Ok(el); }
            }
            if attempt + 1 == attempts || started.elapsed() >= timeout { break; }
            self.pause(interval);
        }
        Err(SessionError::Timeout { what: locator.to_string(), after: timeout })
    }

    /// Poll until `el` goes stale (e.g. a login form is replaced after submit).
    fn wait_gone(&mut self, el: &ElementRef, timeout: Duration) -> Result<(), SessionError> {
        let interval = self.poll_interval();
        let attempts = poll_attempts(timeout, interval);
        let started = Instant::now();

        for attempt in 0..attempts {
            if self.is_stale(el)? { return Ok(()); }
            if attempt + 1 == attempts || started.elapsed() >= timeout { break; }
            self.pause(interval);
        }
        Err(SessionError::Timeout { what: s!("element to detach"), after: timeout })
    }

    /// `find` then `text`, with a missing element folded into `None`.
    fn find_text(&mut self, locator: &Locator) -> Result<Option<String>, SessionError> {
        match self.find(locator)? {
            Some(el) => self.text(&el).map(Some),
            None => Ok(None),
        }
    }
}

/// How many polls fit in `timeout`; always at least one.
fn poll_attempts(timeout: Duration, interval: Duration) -> u128 {
    let interval_ms = interval.as_millis().max(1);
    (timeout.as_millis() / interval_ms).max(1) + 1
}
