// src/resolve.rs
//! Listing-source fallback: primary, then secondary, then placeholder.
//!
//! The walk is an explicit state machine so the policy can be tested without
//! any particular site behind it. A source that was found but had unreadable
//! fields is still a `Success`; only `Unavailable` advances the machine.

use tracing::{info, warn};

use crate::engine::{PartialRecord, SourceOutcome};
use crate::session::Session;
use crate::specs::{listing, SourceAdapter};

/// Written into every listing field when neither site had the property.
pub const NOT_FOUND: &str = "Couldn't find on Compass or Redfin";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    TryPrimary,
    TrySecondary,
    UsePlaceholder,
}

impl State {
    /// Where to go after the adapter for `self` came back unavailable.
    fn next(self) -> State {
        match self {
            State::TryPrimary => State::TrySecondary,
            State::TrySecondary | State::UsePlaceholder => State::UsePlaceholder,
        }
    }
}

/// Resolve the listing record for `identity`.
///
/// Always returns a record covering every listing field. The session is left
/// wherever the last adapter tried left it.
pub fn resolve_listing(
    session: &mut dyn Session,
    primary: &dyn SourceAdapter,
    secondary: &dyn SourceAdapter,
    identity: &str,
) -> PartialRecord {
    let mut state = State::TryPrimary;
    loop {
        let adapter = match state {
            State::TryPrimary => primary,
            State::TrySecondary => secondary,
            State::UsePlaceholder => {
                warn!(identity, "no listing found; using placeholder");
                return PartialRecord::placeholder(listing::FIELDS, NOT_FOUND);
            }
        };

        match adapter.fetch(session, identity) {
            SourceOutcome::Success(record) => {
                info!(source = %record.source(), ?state, "listing resolved");
                return record;
            }
            SourceOutcome::Unavailable { reason } => {
                warn!(source = %adapter.source(), ?state, %reason, "listing source unavailable");
                state = state.next();
            }
        }
    }
}
