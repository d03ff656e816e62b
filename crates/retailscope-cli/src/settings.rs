use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use retailscope_report::ReportParams;

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = "retailscope.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("toml decode error in {path}: {source}")]
    TomlDecode {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("settings file not found: {0}")]
    NotFound(PathBuf),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Defaults read from `retailscope.toml`. Command-line flags win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub data_dir: Option<PathBuf>,
    pub run_dir: Option<PathBuf>,
    pub database_url: Option<String>,
    pub pg_schema: Option<String>,
    pub parallel: Option<bool>,
    pub params: ParamOverrides,
}

/// Optional replacements for the [`ReportParams`] constants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParamOverrides {
    pub claims_year: Option<i32>,
    pub claim_window_days: Option<i64>,
    pub launch_lookback_years: Option<u32>,
    pub high_volume_country: Option<String>,
    pub high_volume_lookback_years: Option<u32>,
    pub high_volume_threshold: Option<i64>,
    pub category_lookback_years: Option<u32>,
}

impl ParamOverrides {
    pub fn apply(&self, params: &mut ReportParams) {
        if let Some(value) = self.claims_year {
            params.claims_year = value;
        }
        if let Some(value) = self.claim_window_days {
            params.claim_window_days = value;
        }
        if let Some(value) = self.launch_lookback_years {
            params.launch_lookback_years = value;
        }
        if let Some(value) = &self.high_volume_country {
            params.high_volume_country = value.clone();
        }
        if let Some(value) = self.high_volume_lookback_years {
            params.high_volume_lookback_years = value;
        }
        if let Some(value) = self.high_volume_threshold {
            params.high_volume_threshold = value;
        }
        if let Some(value) = self.category_lookback_years {
            params.category_lookback_years = value;
        }
    }
}

/// Load settings from `explicit` (which must exist) or from
/// [`DEFAULT_SETTINGS_FILE`] when present; otherwise return defaults.
pub fn load_settings(explicit: Option<&Path>) -> SettingsResult<Settings> {
    let path = match explicit {
        Some(path) if !path.exists() => return Err(SettingsError::NotFound(path.to_path_buf())),
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(DEFAULT_SETTINGS_FILE);
            if !path.exists() {
                return Ok(Settings::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| SettingsError::Io {
        path: path.clone(),
        source,
    })?;
    parse_settings(&content).map_err(|source| SettingsError::TomlDecode { path, source })
}

pub fn parse_settings(content: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str(content)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(parse_settings("").expect("parse"), Settings::default());
    }

    #[test]
    fn params_section_overrides_constants() {
        let settings = parse_settings(
            r#"
data_dir = "exports/2024"
database_url = "postgres://reader@db/shop"

[params]
claims_year = 2021
high_volume_country = "Canada"
high_volume_threshold = 1200
"#,
        )
        .expect("parse");

        assert_eq!(settings.data_dir, Some(PathBuf::from("exports/2024")));
        let mut params = ReportParams::new(NaiveDate::from_ymd_opt(2024, 6, 15).expect("date"));
        settings.params.apply(&mut params);
        assert_eq!(params.claims_year, 2021);
        assert_eq!(params.high_volume_country, "Canada");
        assert_eq!(params.high_volume_threshold, 1200);
        assert_eq!(params.claim_window_days, 180);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_settings("data_directory = \"x\"").is_err());
        assert!(parse_settings("[params]\nthreshold = 3").is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("retailscope_{}.toml", uuid::Uuid::new_v4()));
        assert!(matches!(
            load_settings(Some(&path)),
            Err(SettingsError::NotFound(_))
        ));
    }
}
