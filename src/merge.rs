// src/merge.rs
//! Combine the registry record and the listing record into one
//! [`AggregateRecord`] and derive the underwriting figures.
//!
//! Pure and total. Each derivation either has real inputs or is skipped:
//! - renovation tiers need a real square footage; without one each tier
//!   carries no cost and the report says so on that row,
//! - the age tier row exists when year built is unknown or at/below the
//!   configured threshold,
//! - quick-check figures exist only when the average sale price is real.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::Config;
use crate::engine::{PartialRecord, Source, Value};
use crate::specs::{listing, registry};

/// Stand-in for a name a record did not carry. Records are complete by
/// construction, so this only shows up if an adapter table is out of sync.
const NOT_RECORDED: &str = "Not recorded";

/// Facts from the ownership registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ownership {
    pub owner_name: Value,
    pub owner_status: Value,
    pub distress: Value,
    pub mortgage_balance: Value,
    pub year_built: Value,
    pub square_footage: Value,
    pub avg_sale_price: Value,
}

/// Facts from whichever listing source resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listing {
    pub source: Source,
    pub mls_number: Value,
    pub ask_price: Value,
    pub days_on_market: Value,
    pub listing_agent: Value,
    pub agent_contact: Value,
    pub pool_status: Value,
    pub remarks: Value,
    pub photos_url: Value,
}

/// One renovation row: `rate` per square foot over the subject's area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierCost {
    pub label: String,
    pub rate: Decimal,
    /// `None` when square footage is unknown.
    pub cost: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuickCheck {
    pub label: String,
    pub amount: Decimal,
}

/// Figures pre-filled on the analysis worksheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisFigures {
    pub fee: Decimal,
    pub buyer_credit: Decimal,
    pub wholesale_discount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateRecord {
    pub identity: String,
    pub as_of: NaiveDate,
    pub ownership: Ownership,
    pub listing: Listing,
    pub tiers: Vec<TierCost>,
    /// Present iff year built is unknown or at/below the age threshold.
    pub age_tier: Option<TierCost>,
    /// Present iff the average sale price is a real amount.
    pub quick_check: Option<Vec<QuickCheck>>,
    pub analysis: AnalysisFigures,
}

impl AggregateRecord {
    pub fn area(&self) -> Option<i64> {
        self.ownership.square_footage.as_integer()
    }
}

pub fn merge(registry_record: PartialRecord, listing_record: PartialRecord, cfg: &Config, as_of: NaiveDate) -> AggregateRecord {
    let ownership = ownership_from(registry_record);
    let listing = listing_from(listing_record);

    let area = ownership.square_footage.as_integer();
    let tiers = cfg
        .renovation
        .tiers
        .iter()
        .map(|t| tier_cost(&t.label, t.rate, area))
        .collect();

    let age = &cfg.renovation.age_tier;
    let age_tier = needs_age_tier(ownership.year_built.as_integer(), age.threshold_year)
        .then(|| tier_cost(&age.label, age.rate, area));

    let quick_check = ownership.avg_sale_price.as_currency().map(|avg| {
        cfg.quick_check
            .multipliers
            .iter()
            .filter_map(|m| match avg.checked_mul(m.multiplier) {
                Some(amount) => Some(QuickCheck { label: m.label.clone(), amount }),
                None => {
                    debug!(label = %m.label, %avg, "quick check overflowed; skipped");
                    None
                }
            })
            .collect()
    });
    if quick_check.is_none() {
        debug!("average sale price unavailable; quick check skipped");
    }

    AggregateRecord {
        identity: cfg.targets.property_address.clone(),
        as_of,
        ownership,
        listing,
        tiers,
        age_tier,
        quick_check,
        analysis: AnalysisFigures {
            fee: cfg.analysis.fee,
            buyer_credit: cfg.analysis.buyer_credit,
            wholesale_discount: cfg.analysis.wholesale_discount,
        },
    }
}

/// Unknown year counts as old.
pub fn needs_age_tier(year_built: Option<i64>, threshold_year: i64) -> bool {
    year_built.is_none_or(|y| y <= threshold_year)
}

fn tier_cost(label: &str, rate: Decimal, area: Option<i64>) -> TierCost {
    let cost = area.and_then(|a| {
        let cost = Decimal::from(a).checked_mul(rate);
        if cost.is_none() {
            debug!(tier = label, area = a, %rate, "tier cost overflowed; left blank");
        }
        cost
    });
    TierCost { label: s!(label), rate, cost }
}

struct Fields(std::collections::BTreeMap<&'static str, Value>);

impl Fields {
    fn take(&mut self, name: &str) -> Value {
        self.0.remove(name).unwrap_or_else(|| {
            debug!(field = name, "record did not carry field");
            Value::sentinel(NOT_RECORDED)
        })
    }
}

fn ownership_from(rec: PartialRecord) -> Ownership {
    let mut f = Fields(rec.into_values());
    Ownership {
        owner_name: f.take(registry::OWNER_NAME),
        owner_status: f.take(registry::OWNER_STATUS),
        distress: f.take(registry::DISTRESS),
        mortgage_balance: f.take(registry::MORTGAGE_BALANCE),
        year_built: f.take(registry::YEAR_BUILT),
        square_footage: f.take(registry::SQUARE_FOOTAGE),
        avg_sale_price: f.take(registry::AVG_SALE_PRICE),
    }
}

fn listing_from(rec: PartialRecord) -> Listing {
    let source = rec.source();
    let mut f = Fields(rec.into_values());
    Listing {
        source,
        mls_number: f.take(listing::MLS_NUMBER),
        ask_price: f.take(listing::ASK_PRICE),
        days_on_market: f.take(listing::DAYS_ON_MARKET),
        listing_agent: f.take(listing::LISTING_AGENT),
        agent_contact: f.take(listing::AGENT_CONTACT),
        pool_status: f.take(listing::POOL_STATUS),
        remarks: f.take(listing::REMARKS),
        photos_url: f.take(listing::PHOTOS_URL),
    }
}
