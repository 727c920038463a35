//! Output formatting: table or JSON.
//!
//! Plans and reports render as a two-column key/value table via `tabled`;
//! JSON serializes the core types directly.

use std::io::{self, Write};

use tabled::{Table, Tabled, settings::Style};

use gwrotate_core::{RestoreReport, RotationPlan, RotationReport, RuleChange};

use crate::cli::OutputFormat;
use crate::error::CliError;

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn row(field: &'static str, value: impl Into<String>) -> Row {
    Row {
        field,
        value: value.into(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

pub fn render_plan(format: OutputFormat, plan: &RotationPlan) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(render_table(&plan_rows(plan))),
        OutputFormat::Json => render_json(plan),
    }
}

pub fn render_report(format: OutputFormat, report: &RotationReport) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let mut rows = plan_rows(&report.plan);
            rows.push(row("TCP rule", describe_change(&report.firewall.tcp)));
            rows.push(row("UDP rule", describe_change(&report.firewall.udp)));
            if !report.firewall.removed_duplicates.is_empty() {
                rows.push(row(
                    "Removed rules",
                    report.firewall.removed_duplicates.join(", "),
                ));
            }
            if !report.firewall.removed_inactive.is_empty() {
                rows.push(row(
                    "Replaced rules",
                    report.firewall.removed_inactive.join(", "),
                ));
            }
            rows.push(row("Restore", describe_restore(&report.restore)));
            rows.push(row("Started", report.started_at.to_rfc3339()));
            rows.push(row("Finished", report.finished_at.to_rfc3339()));

            let mut out = render_table(&rows);
            for problem in report.restore.problems() {
                out.push_str("\n  ! ");
                out.push_str(&problem);
            }
            Ok(out)
        }
        OutputFormat::Json => render_json(report),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Helpers ──────────────────────────────────────────────────────────

fn plan_rows(plan: &RotationPlan) -> Vec<Row> {
    let topology = &plan.topology;
    let gateway = &plan.gateway;
    vec![
        row("Run", plan.run_id.to_string()),
        row("Interface", topology.interface()),
        row("Bridge", topology.bridge.as_str()),
        row("Radios", topology.radios.join(", ")),
        row("DHCP network", topology.dhcp.address.as_str()),
        row("Current gateway", gateway.current.as_str()),
        row(
            "DNS server",
            gateway.current_dns.as_deref().unwrap_or("-"),
        ),
        row("New gateway", gateway.new.as_str()),
    ]
}

fn describe_change(change: &RuleChange) -> String {
    match change {
        RuleChange::Created { id } => format!("created {id}"),
        RuleChange::Repointed { id, previous } => format!(
            "repointed {id} (was {})",
            previous.as_deref().unwrap_or("unset")
        ),
        RuleChange::Unchanged { id } => format!("unchanged {id}"),
    }
}

fn describe_restore(restore: &RestoreReport) -> String {
    format!(
        "{} restored, {} missing, {} failed",
        restore.restored(),
        restore.missing(),
        restore.failed()
    )
}

fn render_table(rows: &[Row]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(data)?)
}
