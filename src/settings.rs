//! Program settings, read from `settings.toml` in the user's config directory.
//!
//! Every field is optional in the file. Command-line options take precedence over the settings
//! where both exist (e.g. `--overwrite`).
use crate::get_flexfordel_config_dir;
use crate::input::read_toml;
use crate::log::DEFAULT_LOG_LEVEL;
use anyhow::{Context, Result};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

/// If this environment variable is set, the settings file is ignored
const USE_DEFAULT_SETTINGS_ENV_VAR: &str = "FLEXFORDEL_USE_DEFAULT_SETTINGS";

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    get_flexfordel_config_dir().join(SETTINGS_FILE_NAME)
}

/// Program settings
#[derive(Debug, Clone, DocumentedFields, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Log level: one of off, error, warn, info, debug or trace
    pub log_level: String,
    /// Replace a non-empty output folder instead of failing
    pub overwrite: bool,
    /// Folder under which each data directory's results are saved, unless --output-dir is given
    pub results_root: PathBuf,
    /// Write the per-hour intensities (hourly_intensity.csv) alongside the daily results
    pub hourly_output: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            overwrite: false,
            results_root: PathBuf::from("flexfordel_results"),
            hourly_output: true,
        }
    }
}

impl Settings {
    /// Load the settings file, if there is one.
    ///
    /// Defaults are used if `FLEXFORDEL_USE_DEFAULT_SETTINGS` is set.
    pub fn load() -> Result<Settings> {
        if env::var_os(USE_DEFAULT_SETTINGS_ENV_VAR).is_some() {
            return Ok(Settings::default());
        }

        Self::load_from_path(&get_settings_file_path())
    }

    fn load_from_path(file_path: &Path) -> Result<Settings> {
        if file_path.is_file() {
            read_toml(file_path)
        } else {
            Ok(Settings::default())
        }
    }

    /// A settings file listing every option at its default value, commented out
    pub fn default_file_contents() -> Result<String> {
        let defaults = toml::Table::try_from(Settings::default())?;

        let mut out = format!(
            "# flexfordel v{} settings\n#\n# Uncomment an option to change it.\n",
            env!("CARGO_PKG_VERSION")
        );
        for (field, value) in &defaults {
            let docs = Settings::get_field_docs(field)
                .ok()
                .with_context(|| format!("No documentation for setting {field}"))?;
            out += &format!("\n# {docs}\n# {field} = {value}\n");
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(
            Settings::load_from_path(&dir.path().join(SETTINGS_FILE_NAME)).unwrap(),
            Settings::default()
        );
    }

    #[rstest]
    #[case("log_level = \"debug\"", Settings { log_level: "debug".into(), ..Settings::default() })]
    #[case("hourly_output = false", Settings { hourly_output: false, ..Settings::default() })]
    #[case(
        "overwrite = true\nresults_root = \"runs\"",
        Settings { overwrite: true, results_root: "runs".into(), ..Settings::default() }
    )]
    fn partial_file_keeps_other_defaults(#[case] contents: &str, #[case] expected: Settings) {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&file_path, contents).unwrap();

        assert_eq!(Settings::load_from_path(&file_path).unwrap(), expected);
    }

    #[test]
    fn unknown_setting_is_an_error() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&file_path, "graph_results_root = \"graphs\"").unwrap();

        assert!(Settings::load_from_path(&file_path).is_err());
    }

    #[test]
    fn default_file_round_trips() {
        let contents = Settings::default_file_contents().unwrap();
        assert!(contents.contains("# hourly_output = true"));
        assert!(contents.contains("# log_level = \"info\""));

        // Uncommenting the option lines gives back the defaults
        let uncommented = contents
            .lines()
            .filter_map(|line| line.strip_prefix("# "))
            .filter(|line| line.contains(" = "))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(
            toml::from_str::<Settings>(&uncommented).unwrap(),
            Settings::default()
        );
    }
}
