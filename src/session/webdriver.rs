// src/session/webdriver.rs
//! Minimal W3C WebDriver client (chromedriver) over blocking HTTP.
//!
//! Only the handful of endpoints the sources need. Errors come back as
//! `{"value": {"error": "...", "message": "..."}}`; "no such element" is
//! mapped to `Ok(None)` by [`Session::find`].

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{ElementRef, Locator, Session, SessionError};

/// W3C element reference key.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Per-request HTTP timeout. Page waits are bounded separately.
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

const CHROME_ARGS: &[&str] = &[
    "--start-maximized",
    "--disable-notifications",
    "--disable-site-isolation-trials",
];

pub struct WebDriverSession {
    http: Client,
    base: String,
    session_id: String,
    poll_interval: Duration,
}

impl WebDriverSession {
    /// Start a new Chrome session on the driver at `base_url`.
    ///
    /// The browser is left open when the run ends so the user can keep
    /// working in the logged-in tabs.
    pub fn start(base_url: &str, poll_interval: Duration) -> Result<Self, SessionError> {
        let http = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        let base = base_url.trim_end_matches('/').to_string();

        let caps = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": CHROME_ARGS, "detach": true }
                }
            }
        });
        let resp = http.post(format!("{base}/session")).json(&caps).send()?;
        let value = unwrap_value(resp.json::<Value>()?)?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| protocol("new session", "response has no sessionId"))?
            .to_string();

        info!(%base, %session_id, "webdriver session started");
        Ok(Self { http, base, session_id, poll_interval })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/session/{}{}", self.base, self.session_id, path)
    }

    fn get(&self, path: &str) -> Result<Value, SessionError> {
        let resp = self.http.get(self.url(path)).send()?;
        unwrap_value(resp.json::<Value>()?)
    }

    fn post(&self, path: &str, body: Value) -> Result<Value, SessionError> {
        let resp = self.http.post(self.url(path)).json(&body).send()?;
        unwrap_value(resp.json::<Value>()?)
    }

    fn switch_to_newest_window(&mut self) -> Result<(), SessionError> {
        let handles = self.get("/window/handles")?;
        let newest = handles
            .as_array()
            .and_then(|a| a.last())
            .and_then(Value::as_str)
            .ok_or_else(|| protocol("window handles", "no windows open"))?
            .to_string();
        self.post("/window", json!({ "handle": newest }))?;
        Ok(())
    }
}

impl Session for WebDriverSession {
    fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        debug!(url, "navigate");
        self.post("/url", json!({ "url": url }))?;
        Ok(())
    }

    fn current_url(&mut self) -> Result<String, SessionError> {
        Ok(self.get("/url")?.as_str().unwrap_or_default().to_string())
    }

    fn find(&mut self, locator: &Locator) -> Result<Option<ElementRef>, SessionError> {
        let body = json!({ "using": locator.strategy(), "value": locator.selector() });
        match self.post("/element", body) {
            Ok(v) => element_ref(&v).map(Some),
            Err(SessionError::NoSuchElement(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn is_clickable(&mut self, el: &ElementRef) -> Result<bool, SessionError> {
        let displayed = self.get(&format!("/element/{}/displayed", el.0))?;
        let enabled = self.get(&format!("/element/{}/enabled", el.0))?;
        Ok(displayed.as_bool().unwrap_or(false) && enabled.as_bool().unwrap_or(false))
    }

    fn is_stale(&mut self, el: &ElementRef) -> Result<bool, SessionError> {
        match self.get(&format!("/element/{}/enabled", el.0)) {
            Ok(_) => Ok(false),
            Err(SessionError::Stale) | Err(SessionError::NoSuchElement(_)) => Ok(true),
            Err(e) => Err(e),
        }
    }

    fn text(&mut self, el: &ElementRef) -> Result<String, SessionError> {
        Ok(self.get(&format!("/element/{}/text", el.0))?.as_str().unwrap_or_default().to_string())
    }

    fn property(&mut self, el: &ElementRef, name: &str) -> Result<Option<String>, SessionError> {
        let v = self.get(&format!("/element/{}/property/{name}", el.0))?;
        Ok(match v {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }

    fn click(&mut self, el: &ElementRef) -> Result<(), SessionError> {
        self.post(&format!("/element/{}/click", el.0), json!({}))?;
        Ok(())
    }

    fn send_keys(&mut self, el: &ElementRef, text: &str) -> Result<(), SessionError> {
        self.post(&format!("/element/{}/value", el.0), json!({ "text": text }))?;
        Ok(())
    }

    fn open_tab(&mut self, url: &str) -> Result<(), SessionError> {
        self.post("/window/new", json!({ "type": "tab" }))?;
        self.switch_to_newest_window()?;
        self.goto(url)
    }

    fn execute(&mut self, script: &str, args: &[&ElementRef]) -> Result<(), SessionError> {
        let args: Vec<Value> = args.iter().map(|el| json!({ ELEMENT_KEY: el.0 })).collect();
        self.post("/execute/sync", json!({ "script": script, "args": args }))?;
        Ok(())
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

/// Pull `value` out of a WebDriver response, turning error payloads into
/// `SessionError`s.
fn unwrap_value(mut body: Value) -> Result<Value, SessionError> {
    let value = body.get_mut("value").map(Value::take).unwrap_or(Value::Null);
    let Some(error) = value.get("error").and_then(Value::as_str) else {
        return Ok(value);
    };
    let message = value.get("message").and_then(Value::as_str).unwrap_or_default().to_string();
    Err(match error {
        "no such element" => SessionError::NoSuchElement(message),
        "stale element reference" => SessionError::Stale,
        other => SessionError::Protocol { error: other.to_string(), message },
    })
}

fn element_ref(v: &Value) -> Result<ElementRef, SessionError> {
    v.get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(|id| ElementRef(id.to_string()))
        .ok_or_else(|| protocol("find element", "response has no element reference"))
}

fn protocol(error: &str, message: &str) -> SessionError {
    SessionError::Protocol { error: s!(error), message: s!(message) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_unwrapped() {
        let v = unwrap_value(json!({ "value": "https://www.compass.com/" })).unwrap();
        assert_eq!(v, json!("https://www.compass.com/"));
        assert_eq!(unwrap_value(json!({ "value": null })).unwrap(), Value::Null);
    }

    #[test]
    fn error_payloads_are_classified() {
        let missing = unwrap_value(json!({
            "value": { "error": "no such element", "message": "Unable to locate element" }
        }));
        assert!(matches!(missing, Err(SessionError::NoSuchElement(m)) if m == "Unable to locate element"));

        let stale = unwrap_value(json!({ "value": { "error": "stale element reference", "message": "" } }));
        assert!(matches!(stale, Err(SessionError::Stale)));

        let other = unwrap_value(json!({ "value": { "error": "invalid session id", "message": "gone" } }));
        assert!(matches!(other, Err(SessionError::Protocol { error, .. }) if error == "invalid session id"));
    }

    #[test]
    fn element_reference_is_read() {
        let el = element_ref(&json!({ ELEMENT_KEY: "abc-123" })).unwrap();
        assert_eq!(el, ElementRef(s!("abc-123")));
        assert!(element_ref(&json!({})).is_err());
    }
}
