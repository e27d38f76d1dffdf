// src/lib.rs
//! Property underwriting notes from three unreliable web sources.
//!
//! Pipeline: `specs::propstream` (ownership registry) → `resolve` (Compass,
//! then Redfin, then placeholder) → `merge` → `report` → `file`.
//! `runner` drives it over one exclusively-owned [`session::Session`].

#[macro_use]
pub mod macros;

pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod file;
pub mod log;
pub mod merge;
pub mod progress;
pub mod report;
pub mod resolve;
pub mod runner;
pub mod session;
pub mod specs;

pub use error::{Error, Result};
