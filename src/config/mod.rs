// src/config/mod.rs
pub mod consts;
pub mod options;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use options::{Config, TimeoutKind, Timeouts};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration: {field} {reason}")]
    Invalid { field: String, reason: String },
}

/// Read and validate a config file. `.toml` is parsed as TOML, anything
/// else as JSON.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let cfg = read(path)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Read without validating, for callers that layer overrides on top.
pub fn read(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    parse(&text, path)
}

fn parse(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    let parsed = if is_toml {
        toml::from_str::<Config>(text).map_err(|e| e.to_string())
    } else {
        serde_json::from_str::<Config>(text).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| ConfigError::Parse { path: path.to_path_buf(), message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn json_fills_defaults() {
        let cfg = parse(
            r#"{ "targets": { "property_address": "123 Main St, Fresno, CA" } }"#,
            Path::new("config.json"),
        )
        .unwrap();
        cfg.validate().unwrap();
        assert_eq!(cfg.timeouts.default, 10);
        assert_eq!(cfg.renovation.tiers.len(), 6);
        assert_eq!(cfg.renovation.tiers[0].rate, Decimal::from(30));
        assert_eq!(cfg.analysis.fee, Decimal::from(15_000));
        assert!(!cfg.targets.condo);
    }

    #[test]
    fn original_layout_parses() {
        let cfg = parse(
            r#"{
                "targets": { "property_address": "1 A St", "condo": true },
                "propstream": { "email": "a@b.c", "password": "pw", "zoom": 80 },
                "compass": { "email": "c@d.e", "password": null },
                "timeouts": { "default": 5, "login": 90, "search": 30 }
            }"#,
            Path::new("config.json"),
        )
        .unwrap();
        assert!(cfg.targets.condo);
        assert_eq!(cfg.propstream.credentials.email.as_deref(), Some("a@b.c"));
        assert_eq!(cfg.propstream.zoom, Some(80));
        assert_eq!(cfg.compass.password, None);
        assert_eq!(cfg.timeouts.get(TimeoutKind::Login).as_secs(), 90);
    }

    #[test]
    fn toml_by_extension() {
        let cfg = parse(
            r#"
                [targets]
                property_address = "9 Elm Ave"

                [renovation]
                tiers = [{ label = "Light", rate = 25 }]

                [renovation.age_tier]
                label = "Pre-war"
                threshold_year = 1940
                rate = 150
            "#,
            Path::new("underwrite.toml"),
        )
        .unwrap();
        assert_eq!(cfg.renovation.tiers.len(), 1);
        assert_eq!(cfg.renovation.age_tier.threshold_year, 1940);
    }

    #[test]
    fn missing_address_is_invalid() {
        let cfg = Config::default();
        match cfg.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "targets.property_address"),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let mut cfg = Config::default();
        cfg.targets.property_address = s!("1 A St");
        cfg.timeouts.search = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn shipped_example_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.example.json");
        let cfg = load(&path).unwrap();
        assert_eq!(cfg.renovation, Config::default().renovation);
        assert_eq!(cfg.quick_check, Config::default().quick_check);
        assert_eq!(cfg.analysis, Config::default().analysis);
        assert_eq!(cfg.propstream.zoom, Some(80));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = parse("{ targets: ", Path::new("config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
