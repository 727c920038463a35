//! `run` and `plan`: drive the rotation against the configured router.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use gwrotate_core::notify::report_validation_failure;
use gwrotate_core::{RandomOctets, RotationConfig, Rotator, RunLock};
use gwrotate_core::routeros::{self, RouterOsClient};

use crate::cli::{GlobalOpts, RotationArgs, RunArgs};
use crate::error::CliError;
use crate::output;

/// Validate, connect, and hand back the client with the frozen config.
///
/// Rotation settings are validated before credentials are resolved, so a
/// missing password never hides them. Validation failures are reported
/// through the router's mailer when a client can be built.
async fn prepare(
    args: &RotationArgs,
    global: &GlobalOpts,
) -> Result<(RouterOsClient, RotationConfig), CliError> {
    let cfg = super::load(global)?;
    let raw = gwrotate_config::to_raw_rotation(&cfg, &super::overrides(args));

    match raw.validate() {
        Ok(rotation) => {
            let router = gwrotate_config::to_router_config(&cfg)?;
            let client = routeros::connect(&router)?;
            Ok((client, rotation))
        }
        Err(errors) => {
            match connect_for_report(&cfg) {
                Ok(client) => {
                    report_validation_failure(&client, raw.notify_targets().as_ref(), &errors)
                        .await;
                }
                Err(e) => warn!(error = %e, "cannot report configuration errors by mail"),
            }
            Err(CliError::invalid_config(&errors))
        }
    }
}

fn connect_for_report(cfg: &gwrotate_config::Config) -> Result<RouterOsClient, CliError> {
    let router = gwrotate_config::to_router_config(cfg)?;
    Ok(routeros::connect(&router)?)
}

pub async fn handle(args: &RunArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if args.dry_run {
        return plan(&args.rotation, global).await;
    }

    let (client, rotation) = prepare(&args.rotation, global).await?;
    let run_id = Uuid::new_v4();

    let lock_path = global
        .lock_file
        .clone()
        .unwrap_or_else(gwrotate_config::default_lock_path);
    let lock = RunLock::acquire(lock_path, run_id)?;
    info!(%run_id, lock = %lock.path().display(), "rotation starting");

    let rotator = Rotator::new(&client, &client, &rotation, run_id);
    let mut source = RandomOctets::new(StdRng::from_entropy());
    let report = rotator.run(&mut source).await?;
    drop(lock);

    let rendered = output::render_report(global.output, &report)?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

pub async fn plan(args: &RotationArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (client, rotation) = prepare(args, global).await?;
    let run_id = Uuid::new_v4();
    debug!(%run_id, "planning rotation");

    let rotator = Rotator::new(&client, &client, &rotation, run_id);
    let mut source = RandomOctets::new(StdRng::from_entropy());
    let plan = rotator.plan(&mut source).await?;

    let rendered = output::render_plan(global.output, &plan)?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
