//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cohort/cohort.toml`
//! 3. Local config: `<dir>/.cohort.toml`
//! 4. Environment variables: `COHORT_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{default_indicators, Indicator, DEFAULT_PLACEHOLDER};

/// Default outcome field used when a path names no real attribute.
pub const DEFAULT_OUTCOME_ATTRIBUTE: &str = "stroke";

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub placeholder: Option<String>,
    pub outcome_attribute: Option<String>,
    pub delimiter: Option<char>,
    pub missing_values: Option<Vec<String>>,
    pub indicators: Option<Vec<Indicator>>,
}

/// Unified configuration for cohort.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Dataset used when no file is given on the command line
    pub data_file: Option<PathBuf>,
    /// Attribute path token meaning "reuse a real attribute"
    pub placeholder: String,
    /// Field grouped by when the path holds no real attribute
    pub outcome_attribute: String,
    /// Dataset cell delimiter
    pub delimiter: char,
    /// Cell contents read as missing values
    pub missing_values: Vec<String>,
    /// Graph indicators
    pub indicators: Vec<Indicator>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: None,
            placeholder: DEFAULT_PLACEHOLDER.into(),
            outcome_attribute: DEFAULT_OUTCOME_ATTRIBUTE.into(),
            delimiter: ',',
            missing_values: vec!["".into(), "N/A".into()],
            indicators: default_indicators(),
        }
    }
}

/// Get the XDG config directory for cohort.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cohort").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("cohort.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".cohort.toml")
}

/// Expand `~`, `$VAR` and `${VAR}`; leave the input untouched if expansion fails.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["", "N/A"], &["NA"])   // → ["", "N/A", "NA"]
    /// merge_array(&["", "N/A"], &["!"])    // → ["N/A"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(pattern.clone());
            }
        }

        // Convert to sorted Vec for deterministic output
        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(data_file) = &self.data_file {
            let expanded = expand_env_vars(data_file.to_string_lossy().as_ref());
            self.data_file = Some(PathBuf::from(expanded));
        }
    }

    /// Merge overlay config onto self (base) with union semantics for arrays.
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - `missing_values`: union merge with negation support
    /// - `indicators`: overlay replaces (tables cannot be negated)
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_file: overlay.data_file.clone().or_else(|| self.data_file.clone()),
            placeholder: overlay
                .placeholder
                .clone()
                .unwrap_or_else(|| self.placeholder.clone()),
            outcome_attribute: overlay
                .outcome_attribute
                .clone()
                .unwrap_or_else(|| self.outcome_attribute.clone()),
            delimiter: overlay.delimiter.unwrap_or(self.delimiter),
            missing_values: overlay
                .missing_values
                .as_ref()
                .map(|o| Self::merge_array(&self.missing_values, o))
                .unwrap_or_else(|| self.missing_values.clone()),
            indicators: overlay
                .indicators
                .clone()
                .unwrap_or_else(|| self.indicators.clone()),
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    ///
    /// Unlike `merge_with()` which uses union semantics, this method replaces
    /// arrays entirely if the global config specifies them.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            missing_values: global
                .missing_values
                .clone()
                .unwrap_or_else(|| self.missing_values.clone()),
            ..self.merge_with(&RawSettings {
                missing_values: None,
                ..global.clone()
            })
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.cohort.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/cohort/cohort.toml` (arrays REPLACE defaults)
    /// 3. Local config: `<local_dir>/.cohort.toml` (arrays UNION with global)
    /// 4. Environment variables: `COHORT_*` prefix (REPLACES - explicit override)
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Load global config (REPLACES defaults)
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        // 3. Load and merge local config (UNION with global)
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Apply environment variables (replaces - explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply COHORT_* environment variables as explicit overrides.
    ///
    /// Env vars replace values (not merge) - they are explicit user overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let builder = Config::builder().add_source(
            Environment::with_prefix("COHORT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("missing_values"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("placeholder") {
            settings.placeholder = val;
        }
        if let Ok(val) = config.get_string("outcome_attribute") {
            settings.outcome_attribute = val;
        }
        if let Ok(val) = config.get_string("delimiter") {
            let mut chars = val.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => settings.delimiter = c,
                _ => {
                    return Err(ApplicationError::Config {
                        message: format!("COHORT_DELIMITER must be one character, got '{}'", val),
                    })
                }
            }
        }
        if let Ok(val) = config.get::<Vec<String>>("missing_values") {
            settings.missing_values = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# cohort configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/cohort/cohort.toml  (defines your baseline)
#   Local:  <dir>/.cohort.toml            (dataset-specific additions)
#   Env:    COHORT_* environment variables (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS missing_values with global.
#   Use "!token" in local config to REMOVE an inherited token:
#     missing_values = ["NA", "!"]  # adds NA, stops treating empty cells as missing

# Dataset used when no file is given
# data_file = "~/data/healthcare-dataset-stroke-data.csv"

# Attribute path token meaning "reuse the previous real attribute"
# placeholder = "_placeholder"

# Field grouped by when the attribute path names no real attribute
# outcome_attribute = "stroke"

# Cell delimiter
# delimiter = ","

# Cell contents read as missing values
# missing_values = ["", "N/A"]

# Graph indicators (replaces the built-in list when given)
# [[indicators]]
# name = "stroke"
# field = "stroke"
# equals = "1"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load(None).expect("load defaults");
        assert!(!settings.placeholder.is_empty());
        assert!(!settings.outcome_attribute.is_empty());
    }

    #[test]
    fn given_default_settings_when_created_then_matches_stroke_dataset() {
        let settings = Settings::default();
        assert_eq!(settings.placeholder, "_placeholder");
        assert_eq!(settings.outcome_attribute, "stroke");
        assert_eq!(settings.indicators.len(), 7);
        assert!(settings.missing_values.contains(&"N/A".to_string()));
    }

    #[test]
    fn given_tilde_in_data_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_file: Some(PathBuf::from("~/data/stroke.csv")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let data_file = settings.data_file.unwrap();
        let data_str = data_file.to_string_lossy();
        assert!(
            data_str.starts_with(&home),
            "data_file should start with home dir: {}",
            data_str
        );
        assert!(!data_str.contains('~'));
    }

    #[test]
    fn test_merge_array_union() {
        let result = Settings::merge_array(&strings(&["", "N/A"]), &strings(&["NA"]));
        assert_eq!(result, strings(&["", "N/A", "NA"]));
    }

    #[test]
    fn test_merge_array_negation() {
        let result = Settings::merge_array(&strings(&["", "N/A"]), &strings(&["!", "NA"]));
        assert_eq!(result, strings(&["N/A", "NA"]));
    }

    #[test]
    fn test_merge_array_negation_nonexistent() {
        let result = Settings::merge_array(&strings(&["N/A"]), &strings(&["!missing"]));
        assert_eq!(result, strings(&["N/A"]));
    }

    #[test]
    fn test_merge_array_duplicates() {
        let result = Settings::merge_array(&strings(&["N/A"]), &strings(&["N/A", "N/A"]));
        assert_eq!(result, strings(&["N/A"]));
    }

    #[test]
    fn test_merge_with_keeps_base_when_not_specified() {
        let base = Settings::default();
        let merged = base.merge_with(&RawSettings::default());
        assert_eq!(merged, base);
    }

    #[test]
    fn test_merge_with_overrides_scalars_and_replaces_indicators() {
        let base = Settings::default();
        let overlay = RawSettings {
            outcome_attribute: Some("heart_disease".into()),
            delimiter: Some(';'),
            indicators: Some(vec![Indicator::new("smoker", "smoking_status", "smokes")]),
            ..RawSettings::default()
        };
        let merged = base.merge_with(&overlay);
        assert_eq!(merged.outcome_attribute, "heart_disease");
        assert_eq!(merged.delimiter, ';');
        assert_eq!(merged.indicators.len(), 1);
        assert_eq!(merged.placeholder, base.placeholder);
    }

    #[test]
    fn test_apply_global_replaces_arrays() {
        let base = Settings::default();
        let global = RawSettings {
            missing_values: Some(strings(&["NA"])),
            placeholder: Some("-".into()),
            ..RawSettings::default()
        };
        let applied = base.apply_global(&global);
        assert_eq!(applied.missing_values, strings(&["NA"]));
        assert_eq!(applied.placeholder, "-");
    }

    #[test]
    fn given_settings_when_rendering_toml_then_round_trips() {
        let settings = Settings::default();
        let rendered = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.placeholder.is_none());
    }
}
