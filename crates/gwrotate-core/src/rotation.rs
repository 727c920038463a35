// ── Rotation pipeline ──
//
// topology → gateway → Wi-Fi disable → address/DHCP → firewall → Wi-Fi restore
//
// Everything up to and including gateway selection is read-only. Once the
// disable phase starts, the restore phase always runs, even when a later
// step fails, so radios are never left down.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::RotationConfig;
use crate::device::DeviceApi;
use crate::error::CoreError;
use crate::firewall::{self, FirewallOutcome};
use crate::gateway::{self, GatewayState, OctetSource};
use crate::notify::{self, Notifier};
use crate::topology::{self, NetworkTopology};
use crate::wifi::{self, ClientPermissionSnapshot, RestoreReport};

/// Resolved topology and chosen gateway, before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RotationPlan {
    pub run_id: Uuid,
    pub topology: NetworkTopology,
    pub gateway: GatewayState,
}

/// Result of a completed rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RotationReport {
    pub run_id: Uuid,
    pub plan: RotationPlan,
    pub firewall: FirewallOutcome,
    pub restore: RestoreReport,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Drives one rotation against a device.
pub struct Rotator<'a, D, N> {
    device: &'a D,
    notifier: &'a N,
    config: &'a RotationConfig,
    run_id: Uuid,
}

impl<'a, D: DeviceApi, N: Notifier> Rotator<'a, D, N> {
    pub fn new(device: &'a D, notifier: &'a N, config: &'a RotationConfig, run_id: Uuid) -> Self {
        Self {
            device,
            notifier,
            config,
            run_id,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Resolve the topology and draw the new gateway. Touches nothing.
    ///
    /// A failure is logged and reported before it is returned.
    pub async fn plan<S: OctetSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<RotationPlan, CoreError> {
        match self.try_plan(source).await {
            Ok(plan) => Ok(plan),
            Err(e) => {
                warn!(run_id = %self.run_id, error = %e, "rotation aborted before any change");
                let body = format!(
                    "Gateway rotation for {} was aborted before any change was made.\n\n{e}\n",
                    self.config.subnet()
                );
                self.report("rotation aborted", &body).await;
                Err(e)
            }
        }
    }

    async fn try_plan<S: OctetSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<RotationPlan, CoreError> {
        let topology = topology::resolve(self.device, self.config).await?;

        let current = topology.dhcp.gateway.clone().ok_or_else(|| {
            CoreError::Internal("resolved DHCP network has no gateway".into())
        })?;
        let new = gateway::select_gateway(
            source,
            &self.config.subnet(),
            self.config.bounds(),
            &current,
            self.config.max_attempts(),
        )?;

        Ok(RotationPlan {
            run_id: self.run_id,
            gateway: GatewayState {
                current,
                current_dns: topology.dhcp.dns_server.clone(),
                new,
            },
            topology,
        })
    }

    /// Plan and execute a full rotation.
    pub async fn run<S: OctetSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<RotationReport, CoreError> {
        let started_at = Utc::now();
        let plan = self.plan(source).await?;
        info!(
            run_id = %self.run_id,
            current = %plan.gateway.current,
            new = %plan.gateway.new,
            "starting rotation"
        );

        let mut snapshot = ClientPermissionSnapshot::default();
        let mutation = self.mutate(&plan, &mut snapshot).await;

        let restore =
            wifi::restore_radios(self.device, &snapshot, self.config.reconnect_delay()).await;

        let firewall = match mutation {
            Ok(firewall) => firewall,
            Err(e) => {
                error!(run_id = %self.run_id, error = %e, "rotation failed, radios restored");
                let mut body = format!(
                    "Gateway rotation from {} to {} failed after changes began.\n\n{e}\n",
                    plan.gateway.current, plan.gateway.new
                );
                append_problems(&mut body, &restore);
                self.report("rotation failed", &body).await;
                return Err(e);
            }
        };

        if !restore.is_clean() {
            warn!(
                run_id = %self.run_id,
                problems = restore.problems().len(),
                "rotation completed with restore problems"
            );
            let mut body = format!(
                "Gateway rotated from {} to {}, but client access was not fully restored.\n",
                plan.gateway.current, plan.gateway.new
            );
            append_problems(&mut body, &restore);
            self.report("restore incomplete", &body).await;
        }

        let finished_at = Utc::now();
        info!(
            run_id = %self.run_id,
            new = %plan.gateway.new,
            restored = restore.restored(),
            "rotation complete"
        );

        Ok(RotationReport {
            run_id: self.run_id,
            plan,
            firewall,
            restore,
            started_at,
            finished_at,
        })
    }

    async fn mutate(
        &self,
        plan: &RotationPlan,
        snapshot: &mut ClientPermissionSnapshot,
    ) -> Result<FirewallOutcome, CoreError> {
        let topology = &plan.topology;
        let gateway = &plan.gateway;

        wifi::disable_radios(self.device, &topology.radios, snapshot).await?;

        let address = format!("{}/{}", gateway.new, topology.address.prefix_len());
        self.device.set_address(&topology.address.id, &address).await?;
        info!(interface = topology.interface(), address = %address, "gateway address moved");

        let dns = gateway
            .current_dns
            .as_deref()
            .filter(|dns| *dns == gateway.current)
            .map(|_| gateway.new.as_str());
        self.device
            .set_dhcp_network(&topology.dhcp.id, &gateway.new, dns)
            .await?;
        info!(gateway = %gateway.new, dns_updated = dns.is_some(), "DHCP network updated");

        firewall::ensure_block_rules(
            self.device,
            self.config.rule_comment(),
            &topology.anchor_id,
            &gateway.current,
        )
        .await
    }

    async fn report(&self, subject: &str, body: &str) {
        let body = format!("{body}\nRun: {}\n", self.run_id);
        notify::notify_best_effort(self.notifier, self.config.notify(), subject, body).await;
    }
}

fn append_problems(body: &mut String, restore: &RestoreReport) {
    let problems = restore.problems();
    if problems.is_empty() {
        return;
    }
    body.push_str("\nRestore problems:\n");
    for problem in problems {
        body.push_str("  - ");
        body.push_str(&problem);
        body.push('\n');
    }
}
