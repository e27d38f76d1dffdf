// src/engine/types.rs
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;

use crate::config::TimeoutKind;
use crate::core::money::format_currency;
use crate::session::Locator;

/// Which site a record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    PropStream,
    Compass,
    Redfin,
    /// Neither listing site had the property.
    Placeholder,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Source::PropStream => "PropStream",
            Source::Compass => "Compass",
            Source::Redfin => "Redfin",
            Source::Placeholder => "placeholder",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Whole number; thousands separators are stripped first.
    Integer,
    /// Fixed-point dollars.
    Currency,
}

/// Data fields degrade to their fallback. Gates decide whether the source
/// found the property at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRole {
    Data,
    Gate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Read {
    /// Rendered text.
    Text,
    /// DOM property, e.g. `textContent` for visually hidden spans.
    Property(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Probe {
    pub locator: Locator,
    pub read: Read,
}

impl Probe {
    pub const fn text(locator: Locator) -> Self {
        Self { locator, read: Read::Text }
    }

    pub const fn property(locator: Locator, name: &'static str) -> Self {
        Self { locator, read: Read::Property(name) }
    }
}

/// One way a field can be presented on a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    One(Probe),
    /// Every part must be present; joined as `prefix part sep part …`.
    Joined { prefix: &'static str, parts: &'static [Probe], sep: &'static str },
    /// Head required; tail appended after `sep` when present.
    WithTail { head: Probe, tail: Probe, sep: &'static str },
    /// The page's own URL (photo galleries).
    CurrentUrl,
}

impl Shape {
    /// The locator worth waiting on before reading this shape.
    pub fn anchor(&self) -> Option<&Locator> {
        match self {
            Shape::One(p) | Shape::WithTail { head: p, .. } => Some(&p.locator),
            Shape::Joined { parts, .. } => parts.first().map(|p| &p.locator),
            Shape::CurrentUrl => None,
        }
    }
}

/// Static definition of one field on one source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    pub role: FieldRole,
    /// Presentation shapes, tried in order. Empty means the source never
    /// carries this field and it always takes the fallback.
    pub shapes: &'static [Shape],
    /// Bounded wait applied to the first shape before reading.
    pub wait: Option<TimeoutKind>,
    /// Sentinel used when locating or coercing fails.
    pub fallback: &'static str,
}

impl FieldDescriptor {
    pub const fn data(name: &'static str, kind: FieldKind, shapes: &'static [Shape], fallback: &'static str) -> Self {
        Self { name, kind, role: FieldRole::Data, shapes, wait: None, fallback }
    }

    pub const fn gate(name: &'static str, kind: FieldKind, shapes: &'static [Shape], wait: TimeoutKind) -> Self {
        Self { name, kind, role: FieldRole::Gate, shapes, wait: Some(wait), fallback: "" }
    }

    pub const fn waiting(mut self, wait: TimeoutKind) -> Self {
        self.wait = Some(wait);
        self
    }

    pub fn fallback_value(&self) -> Value {
        Value::Unavailable(Cow::Borrowed(self.fallback))
    }

    pub fn is_gate(&self) -> bool {
        self.role == FieldRole::Gate
    }
}

/// A field's extracted value, typed by its descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Currency(Decimal),
    /// Sentinel text standing in for data that could not be read.
    Unavailable(Cow<'static, str>),
}

impl Value {
    pub const fn sentinel(text: &'static str) -> Self {
        Value::Unavailable(Cow::Borrowed(text))
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Value::Unavailable(_))
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_currency(&self) -> Option<Decimal> {
        match self {
            Value::Currency(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Currency(d) => f.write_str(&format_currency(*d)),
            Value::Unavailable(s) => f.write_str(s),
        }
    }
}

/// Every declared field of one source, real or sentinel. Never has gaps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialRecord {
    source: Source,
    values: BTreeMap<&'static str, Value>,
}

impl PartialRecord {
    /// Build from one value per declared field, in declaration order.
    pub fn new(source: Source, values: impl IntoIterator<Item = (&'static str, Value)>) -> Self {
        Self { source, values: values.into_iter().collect() }
    }

    /// Every name in `names` set to the same sentinel.
    pub fn placeholder(names: &[&'static str], sentinel: &'static str) -> Self {
        Self::new(Source::Placeholder, names.iter().map(|n| (*n, Value::sentinel(sentinel))))
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when every name in `names` has an entry.
    pub fn covers(&self, names: &[&str]) -> bool {
        names.iter().all(|n| self.values.contains_key(n))
    }

    pub fn into_values(self) -> BTreeMap<&'static str, Value> {
        self.values
    }
}

/// Result of asking one source for the subject property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceOutcome {
    Success(PartialRecord),
    /// The source never located the property (lookup or gate failed).
    Unavailable { reason: String },
}

impl SourceOutcome {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        SourceOutcome::Unavailable { reason: reason.into() }
    }
}
