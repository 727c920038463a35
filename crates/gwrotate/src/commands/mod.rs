//! Command handlers: config loading -> core pipeline -> output formatting.

pub mod check;
pub mod config_cmd;
pub mod run;

use std::path::PathBuf;

use gwrotate_config::{Config, RotationOverrides};

use crate::cli::{GlobalOpts, RotationArgs};
use crate::error::CliError;

/// Effective config file path: `--config` or the platform default.
pub(crate) fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(gwrotate_config::config_path)
}

pub(crate) fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = config_file(global);
    gwrotate_config::load_config(Some(path.as_path())).map_err(|e| match e {
        gwrotate_config::ConfigError::Figment(e) => CliError::Config {
            message: e.to_string(),
            path: path.display().to_string(),
        },
        other => other.into(),
    })
}

pub(crate) fn overrides(args: &RotationArgs) -> RotationOverrides {
    RotationOverrides {
        subnet: args.subnet.clone(),
        low: args.low,
        high: args.high,
    }
}
