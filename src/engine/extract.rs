// src/engine/extract.rs
//! # Field extractor
//!
//! Reads one [`FieldDescriptor`] off the current page in two steps:
//!
//! 1. [`locate`]: try each [`Shape`] in order, return the first non-empty text.
//!    Session errors and timeouts are logged and treated as "not here".
//! 2. [`coerce`]: pure, total conversion to the descriptor's [`FieldKind`].
//!
//! [`extract`] glues them together and substitutes the descriptor's fallback,
//! so a single unreadable field can never stop the rest of a source from being
//! read. Gates are the exception: [`extract_fields`] stops at the first gate
//! that cannot be read and reports the whole source as unavailable.

use tracing::{debug, warn};

use crate::config::Timeouts;
use crate::core::money::{parse_currency, parse_integer};
use crate::core::sanitize::normalize_lines;
use crate::session::{Condition, Session, SessionError};

use super::types::*;

/// First non-empty text any of the field's shapes produces.
pub fn locate(
    session: &mut dyn Session,
    source: Source,
    field: &FieldDescriptor,
    timeouts: &Timeouts,
) -> Option<String> {
    if let (Some(kind), Some(anchor)) = (field.wait, field.shapes.first().and_then(Shape::anchor)) {
        if let Err(e) = session.wait_for(anchor, Condition::Present, timeouts.get(kind)) {
            debug!(%source, field = field.name, stage = "wait", error = %e, "anchor never appeared");
        }
    }

    for (i, shape) in field.shapes.iter().enumerate() {
        match read_shape(session, shape) {
            Ok(Some(raw)) => return Some(raw),
            Ok(None) => {
                debug!(%source, field = field.name, shape = i, stage = "locate", "shape not present");
            }
            Err(e) => {
                debug!(%source, field = field.name, shape = i, stage = "locate", error = %e, "shape unreadable");
            }
        }
    }
    None
}

/// Convert located text to a typed value. `None` on any parse failure.
pub fn coerce(raw: &str, kind: FieldKind) -> Option<Value> {
    let raw = raw.trim();
    if raw.is_empty() { return None; }
    match kind {
        FieldKind::Text => Some(Value::Text(s!(raw))),
        FieldKind::Integer => parse_integer(raw).map(Value::Integer),
        FieldKind::Currency => parse_currency(raw).map(Value::Currency),
    }
}

/// Read one field, falling back to its sentinel. Never fails.
pub fn extract(
    session: &mut dyn Session,
    source: Source,
    field: &FieldDescriptor,
    timeouts: &Timeouts,
) -> Value {
    try_extract(session, source, field, timeouts).unwrap_or_else(|| field.fallback_value())
}

/// Read every field in declaration order.
///
/// Returns `Err(reason)` as soon as a gate cannot be read; data fields
/// never cause an error.
pub fn extract_fields(
    session: &mut dyn Session,
    source: Source,
    fields: &[FieldDescriptor],
    timeouts: &Timeouts,
) -> Result<Vec<(&'static str, Value)>, String> {
    let mut out = Vec::with_capacity(fields.len());
    for field in fields {
        let value = match (field.role, try_extract(session, source, field, timeouts)) {
            (_, Some(v)) => v,
            (FieldRole::Gate, None) => {
                warn!(%source, field = field.name, stage = "gate", "structural gate missing");
                return Err(format!("{} not found on {source}", field.name));
            }
            (FieldRole::Data, None) => field.fallback_value(),
        };
        out.push((field.name, value));
    }
    Ok(out)
}

fn try_extract(
    session: &mut dyn Session,
    source: Source,
    field: &FieldDescriptor,
    timeouts: &Timeouts,
) -> Option<Value> {
    let Some(raw) = locate(session, source, field, timeouts) else {
        if field.role == FieldRole::Data {
            warn!(%source, field = field.name, stage = "locate", fallback = field.fallback, "field unreadable");
        }
        return None;
    };
    let value = coerce(&raw, field.kind);
    if value.is_none() {
        warn!(%source, field = field.name, stage = "coerce", raw = %raw, kind = ?field.kind, "field unreadable");
    }
    value
}

fn read_shape(session: &mut dyn Session, shape: &Shape) -> Result<Option<String>, SessionError> {
    match shape {
        Shape::One(probe) => read_probe(session, probe),
        Shape::Joined { prefix, parts, sep } => {
            let mut pieces = Vec::with_capacity(parts.len());
            for probe in parts.iter() {
                match read_probe(session, probe)? {
                    Some(p) => pieces.push(p),
                    None => return Ok(None),
                }
            }
            let body = pieces.join(*sep);
            Ok(Some(if prefix.is_empty() { body } else { format!("{prefix} {body}") }))
        }
        Shape::WithTail { head, tail, sep } => {
            let Some(head) = read_probe(session, head)? else { return Ok(None) };
            // tail is optional; a broken tail still leaves a usable head
            let tail = read_probe(session, tail).unwrap_or(None);
            Ok(Some(match tail {
                Some(t) => join!(&head, sep, &t),
                None => head,
            }))
        }
        Shape::CurrentUrl => {
            // a fresh tab sits on about:blank or data:, which is no listing
            let url = session.current_url()?;
            Ok(non_empty(&url).filter(|u| u.starts_with("http://") || u.starts_with("https://")))
        }
    }
}

fn read_probe(session: &mut dyn Session, probe: &Probe) -> Result<Option<String>, SessionError> {
    let Some(el) = session.find(&probe.locator)? else { return Ok(None) };
    let raw = match probe.read {
        Read::Text => Some(session.text(&el)?),
        Read::Property(name) => session.property(&el, name)?,
    };
    Ok(raw.as_deref().and_then(non_empty))
}

fn non_empty(s: &str) -> Option<String> {
    let cleaned = normalize_lines(s);
    if cleaned.is_empty() { None } else { Some(cleaned) }
}
