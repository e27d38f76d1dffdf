// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::consts::*;
use super::ConfigError;

/// Everything one run needs, as read from `config.json`.
///
/// Only `targets.property_address` is required; every other section falls
/// back to the defaults in `consts`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub targets: Targets,
    pub propstream: RegistryLogin,
    pub compass: Credentials,
    pub timeouts: Timeouts,
    pub renovation: Renovation,
    pub quick_check: QuickCheck,
    pub analysis: Analysis,
    pub webdriver: WebDriver,
    pub output: Output,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Targets {
    pub property_address: String,
    /// Condos open straight onto the detail panel; no "Details" click.
    pub condo: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryLogin {
    #[serde(flatten)]
    pub credentials: Credentials,
    /// Page zoom in percent. Cosmetic only.
    pub zoom: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub default: u64,
    pub login: u64,
    pub search: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            default: DEFAULT_TIMEOUT_SECS,
            login: DEFAULT_LOGIN_TIMEOUT_SECS,
            search: DEFAULT_SEARCH_TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeoutKind {
    Default,
    Login,
    Search,
}

impl Timeouts {
    pub fn get(&self, kind: TimeoutKind) -> Duration {
        let secs = match kind {
            TimeoutKind::Default => self.default,
            TimeoutKind::Login => self.login,
            TimeoutKind::Search => self.search,
        };
        Duration::from_secs(secs)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Tier {
    pub label: String,
    /// Dollars per square foot.
    pub rate: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AgeTier {
    pub label: String,
    pub threshold_year: i64,
    pub rate: Decimal,
}

impl Default for AgeTier {
    fn default() -> Self {
        Self {
            label: s!(DEFAULT_AGE_TIER_LABEL),
            threshold_year: DEFAULT_AGE_THRESHOLD_YEAR,
            rate: Decimal::from(DEFAULT_AGE_TIER_RATE),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Renovation {
    pub tiers: Vec<Tier>,
    pub age_tier: AgeTier,
}

impl Default for Renovation {
    fn default() -> Self {
        Self {
            tiers: DEFAULT_TIER_RATES
                .iter()
                .map(|(label, rate)| Tier { label: s!(*label), rate: Decimal::from(*rate) })
                .collect(),
            age_tier: AgeTier::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Multiplier {
    pub label: String,
    pub multiplier: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuickCheck {
    pub multipliers: Vec<Multiplier>,
}

impl Default for QuickCheck {
    fn default() -> Self {
        Self {
            multipliers: DEFAULT_QUICK_CHECK
                .iter()
                .map(|(label, pct)| Multiplier { label: s!(*label), multiplier: Decimal::new(*pct, 2) })
                .collect(),
        }
    }
}

/// Pre-filled figures for the analysis worksheet.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Analysis {
    pub fee: Decimal,
    pub buyer_credit: Decimal,
    /// Fraction, e.g. `0.80`.
    pub wholesale_discount: Decimal,
}

impl Default for Analysis {
    fn default() -> Self {
        Self {
            fee: Decimal::from(DEFAULT_FEE),
            buyer_credit: Decimal::from(DEFAULT_BUYER_CREDIT),
            wholesale_discount: Decimal::new(DEFAULT_WHOLESALE_DISCOUNT_PCT, 2),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebDriver {
    pub url: String,
    pub poll_interval_ms: u64,
}

impl Default for WebDriver {
    fn default() -> Self {
        Self { url: s!(DEFAULT_WEBDRIVER_URL), poll_interval_ms: DEFAULT_POLL_INTERVAL_MS }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Output {
    pub dir: PathBuf,
}

impl Default for Output {
    fn default() -> Self {
        Self { dir: PathBuf::from(DEFAULT_OUT_DIR) }
    }
}

impl Config {
    /// Reject anything that would only blow up halfway through a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.property_address.trim().is_empty() {
            return Err(invalid("targets.property_address", "must not be empty"));
        }

        for (field, secs) in [
            ("timeouts.default", self.timeouts.default),
            ("timeouts.login", self.timeouts.login),
            ("timeouts.search", self.timeouts.search),
        ] {
            if secs == 0 {
                return Err(invalid(field, "must be at least 1 second"));
            }
        }

        if self.renovation.tiers.is_empty() {
            return Err(invalid("renovation.tiers", "at least one tier is required"));
        }
        for (i, tier) in self.renovation.tiers.iter().enumerate() {
            if tier.label.trim().is_empty() {
                return Err(invalid(&format!("renovation.tiers[{i}].label"), "must not be empty"));
            }
            if tier.rate.is_sign_negative() {
                return Err(invalid(&format!("renovation.tiers[{i}].rate"), "must not be negative"));
            }
        }
        if self.renovation.age_tier.rate.is_sign_negative() {
            return Err(invalid("renovation.age_tier.rate", "must not be negative"));
        }

        for (i, m) in self.quick_check.multipliers.iter().enumerate() {
            if m.multiplier <= Decimal::ZERO {
                return Err(invalid(&format!("quick_check.multipliers[{i}].multiplier"), "must be positive"));
            }
        }

        let d = self.analysis.wholesale_discount;
        if d <= Decimal::ZERO || d > Decimal::ONE {
            return Err(invalid("analysis.wholesale_discount", "must be in (0, 1]"));
        }

        if self.webdriver.poll_interval_ms == 0 {
            return Err(invalid("webdriver.poll_interval_ms", "must be positive"));
        }
        if let Some(zoom) = self.propstream.zoom {
            if !(10..=500).contains(&zoom) {
                return Err(invalid("propstream.zoom", "must be between 10 and 500"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: s!(field), reason: s!(reason) }
}
