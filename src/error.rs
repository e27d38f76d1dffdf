// src/error.rs
//! Fatal error categories.
//!
//! Only two things end a run: bad configuration (before any source is
//! contacted) and an ownership registry that cannot resolve the property.
//! Field-level and listing-source failures are values, not errors; see
//! `engine::Value::Unavailable` and `engine::SourceOutcome::Unavailable`.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// PropStream could not locate the property. There is no fallback
    /// registry, so nothing downstream can be trusted.
    #[error("ownership registry could not resolve '{identity}': {reason}")]
    RegistryUnavailable { identity: String, reason: String },

    /// The browsing session itself could not be established.
    #[error("browser session: {0}")]
    Session(#[from] SessionError),

    #[error("writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
