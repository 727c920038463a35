//! `check`: validate the layered configuration, offline.

use tracing::warn;

use crate::cli::{GlobalOpts, RotationArgs};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &RotationArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = super::load(global)?;
    let raw = gwrotate_config::to_raw_rotation(&cfg, &super::overrides(args));

    let rotation = raw.validate().map_err(|errors| {
        for (i, err) in errors.iter().enumerate() {
            warn!(index = i + 1, "configuration error: {err}");
        }
        CliError::invalid_config(&errors)
    })?;

    let (low, high) = rotation.bounds();
    let notify = rotation
        .notify()
        .map_or_else(|| "disabled".to_owned(), |t| format!("{} -> {}", t.from, t.to));
    let summary = format!(
        "Configuration valid\n  subnet:   {}\n  gateway:  {}-{}\n  attempts: {}\n  delay:    {:?}\n  notify:   {notify}",
        rotation.subnet().cidr(),
        rotation.subnet().host(low),
        rotation.subnet().host(high),
        rotation.max_attempts(),
        rotation.reconnect_delay(),
    );
    output::print_output(&summary, global.quiet);
    Ok(())
}
