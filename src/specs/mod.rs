// src/specs/mod.rs
//! # Source “specs” module
//!
//! One module per site. Each spec encodes *where the ground truth lives on the
//! page* (as static [`FieldDescriptor`] tables) and *how to get the browser
//! there* (sign-in and lookup steps).
//!
//! ## What lives here
//! - **Locators and field tables** for PropStream, Compass and Redfin.
//! - **Lookup steps**: typing the address into a search box, following a
//!   search-engine redirect, clicking a details button.
//! - **Shape precedence** (e.g. Compass "Listed by" line before the
//!   "courtesy of" line).
//!
//! ## What does **not** live here
//! - **Fallback policy between sites**: that is `resolve`.
//! - **Arithmetic and report layout**: `merge` and `report`.
//!
//! ## Typical call chain
//! ```text
//! runner → PropStream::fetch            (fatal if Unavailable)
//!        → resolve::resolve_listing → Compass::fetch
//!                                   ↘ Redfin::fetch
//!                                   ↘ placeholder
//! ```
//!
//! ## Conventions & invariants
//! - A `fetch` never fails. Lookup failures and missing gates come back as
//!   [`SourceOutcome::Unavailable`]; everything else is absorbed per field.
//! - A `Success` record carries **every** declared field of that source.
//! - Each spec documents where it leaves the browser (its postcondition).
//!   The next adapter may rely on that and nothing else.

pub mod compass;
pub mod propstream;
pub mod redfin;

pub use compass::Compass;
pub use propstream::PropStream;
pub use redfin::Redfin;

use tracing::{info, warn};

use crate::config::{TimeoutKind, Timeouts};
use crate::engine::{extract_fields, FieldDescriptor, PartialRecord, Source, SourceOutcome};
use crate::session::{Condition, Locator, Session, SessionError};

/// Field names shared by both listing sites.
pub mod listing {
    pub const MLS_NUMBER: &str = "mls_number";
    pub const ASK_PRICE: &str = "ask_price";
    pub const DAYS_ON_MARKET: &str = "days_on_market";
    pub const LISTING_AGENT: &str = "listing_agent";
    pub const AGENT_CONTACT: &str = "agent_contact";
    pub const POOL_STATUS: &str = "pool_status";
    pub const REMARKS: &str = "remarks";
    pub const PHOTOS_URL: &str = "photos_url";

    pub const FIELDS: &[&str] = &[
        MLS_NUMBER,
        ASK_PRICE,
        DAYS_ON_MARKET,
        LISTING_AGENT,
        AGENT_CONTACT,
        POOL_STATUS,
        REMARKS,
        PHOTOS_URL,
    ];
}

/// Field names declared by the ownership registry.
pub mod registry {
    pub const OWNER_NAME: &str = "owner_name";
    pub const OWNER_STATUS: &str = "owner_status";
    pub const DISTRESS: &str = "distress";
    pub const MORTGAGE_BALANCE: &str = "mortgage_balance";
    pub const YEAR_BUILT: &str = "year_built";
    pub const SQUARE_FOOTAGE: &str = "square_footage";
    pub const AVG_SALE_PRICE: &str = "avg_sale_price";

    pub const FIELDS: &[&str] = &[
        OWNER_NAME,
        OWNER_STATUS,
        DISTRESS,
        MORTGAGE_BALANCE,
        YEAR_BUILT,
        SQUARE_FOOTAGE,
        AVG_SALE_PRICE,
    ];
}

/// A group of fields read from one view of the page. `enter`, when set, is
/// clicked first to bring that view up (e.g. a tab).
#[derive(Clone, Copy, Debug)]
pub struct Stage {
    pub enter: Option<Locator>,
    pub fields: &'static [FieldDescriptor],
}

/// A site that can be asked for one property.
///
/// Implementors provide the site-specific steps; [`SourceAdapter::fetch`]
/// runs them in order and turns failures into outcomes.
pub trait SourceAdapter {
    fn source(&self) -> Source;

    fn timeouts(&self) -> &Timeouts;

    /// Field groups in read order.
    fn stages(&self) -> &'static [Stage];

    /// Open the site and sign in. An error makes the source unavailable.
    fn open(&self, session: &mut dyn Session) -> Result<(), SessionError>;

    /// Bring the property's page up. An error makes the source unavailable.
    fn lookup(&self, session: &mut dyn Session, identity: &str) -> Result<(), SessionError>;

    /// Best-effort work after a successful read. Must not affect the record.
    fn finish(&self, _session: &mut dyn Session, _record: &PartialRecord) {}

    /// Every field name this source declares, in read order.
    fn field_names(&self) -> Vec<&'static str> {
        self.stages().iter().flat_map(|s| s.fields.iter().map(|f| f.name)).collect()
    }

    fn fetch(&self, session: &mut dyn Session, identity: &str) -> SourceOutcome {
        let source = self.source();

        if let Err(e) = self.open(session) {
            warn!(%source, stage = "sign_in", error = %e, "could not open source");
            return SourceOutcome::unavailable(format!("{source} sign-in failed: {e}"));
        }
        if let Err(e) = self.lookup(session, identity) {
            warn!(%source, stage = "lookup", error = %e, identity, "property not found");
            return SourceOutcome::unavailable(format!("{source} lookup failed: {e}"));
        }

        let mut values = Vec::new();
        for stage in self.stages() {
            if let Some(tab) = &stage.enter {
                if let Err(e) = click_when_ready(session, tab, self.timeouts().get(TimeoutKind::Default)) {
                    // fields of this stage fall back on their own
                    warn!(%source, stage = "enter", locator = %tab, error = %e, "could not open view");
                }
            }
            match extract_fields(session, source, stage.fields, self.timeouts()) {
                Ok(v) => values.extend(v),
                Err(reason) => return SourceOutcome::unavailable(reason),
            }
        }

        let record = PartialRecord::new(source, values);
        let real = record.names().filter(|n| record.get(n).is_some_and(|v| v.is_available())).count();
        info!(%source, fields = record.len(), real, "source read");
        self.finish(session, &record);
        SourceOutcome::Success(record)
    }
}

/// Wait for `locator` to be clickable, then click it.
pub(crate) fn click_when_ready(
    session: &mut dyn Session,
    locator: &Locator,
    timeout: std::time::Duration,
) -> Result<(), SessionError> {
    let el = session.wait_for(locator, Condition::Clickable, timeout)?;
    session.click(&el)
}

/// Wait for `locator` to be clickable, then type `text` into it.
pub(crate) fn type_when_ready(
    session: &mut dyn Session,
    locator: &Locator,
    text: &str,
    timeout: std::time::Duration,
) -> Result<(), SessionError> {
    let el = session.wait_for(locator, Condition::Clickable, timeout)?;
    session.send_keys(&el, text)
}

/// Type into an element that should already be on the page.
pub(crate) fn type_into(session: &mut dyn Session, locator: &Locator, text: &str) -> Result<(), SessionError> {
    match session.find(locator)? {
        Some(el) => session.send_keys(&el, text),
        None => Err(SessionError::NoSuchElement(locator.to_string())),
    }
}

/// Click an element that should already be on the page.
pub(crate) fn click(session: &mut dyn Session, locator: &Locator) -> Result<(), SessionError> {
    match session.find(locator)? {
        Some(el) => session.click(&el),
        None => Err(SessionError::NoSuchElement(locator.to_string())),
    }
}
