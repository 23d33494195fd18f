//! Estimate the CO2 emissions a consumer avoids by shifting electricity consumption.
//!
//! Hourly production shares, grid emission factors and gross consumption for a Danish price area
//! are joined into a differential CO2-intensity series, which is then projected onto a
//! flexibility product to give the daily mass of CO2 saved.
use std::env;
use std::path::PathBuf;

pub mod assessment;
pub mod cli;
pub mod error;
pub mod example;
pub mod input;
pub mod log;
pub mod output;
pub mod period;
pub mod price_area;
pub mod production;
pub mod projection;
pub mod proportion;
pub mod reduction;
pub mod settings;
pub mod units;

#[cfg(test)]
mod fixture;

/// URL for the project's issue tracker
pub const ISSUES_URL: &str = "https://github.com/energinet-flex/flexfordel/issues";

/// Environment variable which overrides the location of the config directory
const CONFIG_DIR_ENV_VAR: &str = "FLEXFORDEL_CONFIG_DIR";

/// Get the path to the program's config directory.
///
/// This is `$FLEXFORDEL_CONFIG_DIR` if set, otherwise a `flexfordel` subfolder of the platform's
/// config directory.
///
/// # Panics
///
/// If no config directory can be determined for the platform.
pub fn get_flexfordel_config_dir() -> PathBuf {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV_VAR) {
        return PathBuf::from(dir);
    }

    let mut path = dirs::config_dir().expect("Could not determine config directory");
    path.push("flexfordel");

    path
}
