// src/report.rs
//! Render an [`AggregateRecord`] as the underwriting notes text.
//!
//! Section order is fixed: header and listing facts, ownership facts,
//! quick check (only when computed), analysis worksheet, comp worksheet,
//! ARV adjustments, renovation tiers, and the closing reno line. Worksheet
//! lines with nothing pre-filled end in a blank for the analyst to complete.

use crate::core::money::{format_area, format_currency, format_percent};
use crate::engine::{Source, Value};
use crate::merge::{AggregateRecord, TierCost};

/// `as of` date format on the days-on-market line.
pub const DATE_FORMAT: &str = "%m/%d/%y";

/// Tier rows when the registry had no square footage.
pub const UNKNOWN_AREA: &str = "N/A (square footage unknown)";

/// Days-on-market label as each site words it.
fn dom_label(source: Source) -> &'static str {
    match source {
        Source::Compass => "Days on Compass",
        Source::Redfin => "Time on Redfin",
        Source::PropStream | Source::Placeholder => "DOM",
    }
}

pub fn compose(rec: &AggregateRecord) -> String {
    let date = rec.as_of.format(DATE_FORMAT).to_string();
    let l = &rec.listing;
    let o = &rec.ownership;

    let mut lines: Vec<String> = Vec::with_capacity(64);
    let mut push = |line: String| lines.push(line);

    // header + listing
    push(rec.identity.clone());
    push(format!("-MLS #: {}", l.mls_number));
    push(format!("-{}: {} as of {date}", dom_label(l.source), l.days_on_market));
    push(agent_line(l.source, &l.listing_agent));
    push(format!("-Agent contact: {}", l.agent_contact));
    push(format!("-Pool: {}", l.pool_status));
    push(format!("Pictures: {}", l.photos_url));
    push(s!("Listing Remarks:"));
    push(format!("\"{}\"", l.remarks));
    push(s!());

    // ownership
    push(s!("Ownership:"));
    push(format!("-Owner: {}", o.owner_name));
    push(format!("-Owner status: {}", o.owner_status));
    push(format!("-Distress: {}", o.distress));
    push(format!("-Est. Mortgage: {}", o.mortgage_balance));
    push(format!("-Year built: {}", o.year_built));
    push(s!());

    if let Some(checks) = &rec.quick_check {
        push(s!("Quick Check:"));
        push(format!("-Avg. sale price: {}", o.avg_sale_price));
        for qc in checks {
            push(format!("-{}: {}", qc.label, format_currency(qc.amount)));
        }
        push(s!());
    }

    let a = &rec.analysis;
    push(format!("*ORIGINAL {date}*"));
    push(format!("Asking Price {}", l.ask_price));
    push(s!("ARV"));
    push(s!("Repairs"));
    push(format!("Your Fee {}", format_currency(a.fee)));
    push(format!("Credit to your buyer {}", format_currency(a.buyer_credit)));
    push(format!("Wholesale Discount {}", format_percent(a.wholesale_discount)));
    push(s!("MAO Wholesale"));
    push(s!("% of ARV"));
    push(s!("Amount under asking"));
    push(s!());

    push(s!("Comp:"));
    push(s!("-#### Street"));
    push(s!("-Sold on mm/dd/yy for $___k"));
    push(s!("-Pool:"));
    push(format!("{} link", comp_link_site(l.source)));
    push(s!());

    push(s!("ARV Adjustments:"));
    push(s!("-Comp Sold For:"));
    push(s!("-Comp has extra bed: -$10k"));
    push(s!("-Comp has extra bath: -$10k"));
    push(s!("Final ARV:"));
    push(s!());

    let area = rec.area();
    push(s!("Reno:"));
    for tier in rec.tiers.iter().chain(rec.age_tier.as_ref()) {
        push(tier_line(tier, area));
    }
    push(s!("Final Reno:"));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Site wording already carries "Listed by" or "Courtesy of"; the
/// placeholder sentinel does not.
fn agent_line(source: Source, agent: &Value) -> String {
    match (source, agent) {
        (Source::Placeholder, Value::Unavailable(text)) => format!("-Listed by: {text}"),
        _ => format!("-{agent}"),
    }
}

/// Comps are pulled from the listing site that answered; Compass otherwise.
fn comp_link_site(source: Source) -> &'static str {
    match source {
        Source::Redfin => "Redfin",
        _ => "Compass",
    }
}

fn tier_line(tier: &TierCost, area: Option<i64>) -> String {
    let head = format!("-{} ({}/sf)", tier.label, format_currency(tier.rate));
    match (tier.cost, area) {
        (Some(cost), Some(area)) => format!("{head}: {} on {}sf", format_currency(cost), format_area(area)),
        _ => format!("{head}: {UNKNOWN_AREA}"),
    }
}
