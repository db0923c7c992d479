//! Output formatting helpers for CLI commands

use crate::channel::{ConnectionState, InboundMessage};
use crate::chat::{ChatMessage, Sender};
use crate::client::{Deployment, Pod, Service};
use crate::dashboard::{LoadOutcome, StartupReport};
use crate::snapshot::{ClusterHealth, ViewSnapshot};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;
use serde_json::json;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// Colored connection state label
pub fn connection_label(state: ConnectionState) -> String {
    match state {
        ConnectionState::Connected => "connected".green().to_string(),
        ConnectionState::Connecting => "connecting".cyan().to_string(),
        ConnectionState::Disconnected => "disconnected".yellow().to_string(),
        ConnectionState::Error => "error".red().to_string(),
        ConnectionState::Failed => "failed".red().bold().to_string(),
    }
}

/// Colored cluster status tag
pub fn health_label(status: &str) -> String {
    match status {
        "healthy" => "Healthy".green().to_string(),
        "warning" => "Warning".yellow().to_string(),
        "critical" | "error" => capitalize(status).red().to_string(),
        "" => "Unknown".dimmed().to_string(),
        other => capitalize(other),
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_amount(amount: f64, currency: &str) -> String {
    if currency.is_empty() {
        format!("{:.2}", amount)
    } else {
        format!("{} {:.2}", currency, amount)
    }
}

fn outcome_note(name: &str, outcome: &LoadOutcome) -> Option<String> {
    match outcome {
        LoadOutcome::Loaded => None,
        LoadOutcome::Fallback(e) => Some(format!("{} unavailable: {}", name, e)),
    }
}

fn cluster_table(health: &ClusterHealth) -> Table {
    let mut table = new_table(vec!["Cluster", "Score", "Nodes ready", "Pods running", "Pending", "Failed"]);
    table.add_row(vec![
        Cell::new(health_label(&health.status)),
        Cell::new(format!("{:.0}", health.score)),
        Cell::new(format!("{}/{}", health.nodes.ready, health.nodes.total)),
        Cell::new(format!("{}/{}", health.pods.running, health.pods.total)),
        Cell::new(health.pods.pending),
        Cell::new(health.pods.failed),
    ]);
    table
}

/// Format the startup report and snapshot as text
pub fn format_status(report: &StartupReport, snapshot: &ViewSnapshot) -> String {
    let mut lines = Vec::new();

    match &report.health {
        Ok(health) => lines.push(format!(
            "API: {} (version {})",
            health_label(&health.status),
            health.version.as_deref().unwrap_or("unknown")
        )),
        Err(e) => lines.push(format!("API: {} ({})", "Unreachable".red(), e)),
    }
    lines.push(String::new());

    if let Some(ref health) = snapshot.cluster_health {
        lines.push(cluster_table(health).to_string());
    }

    if let Some(ref overview) = snapshot.cost_summary {
        let data = &overview.cost_data;
        let mut table = new_table(vec!["Monthly cost", "Potential savings", "Resources", "Source"]);
        table.add_row(vec![
            Cell::new(format_amount(data.total_monthly_cost, &overview.currency)),
            Cell::new(format_amount(data.total_potential_savings, &overview.currency)),
            Cell::new(data.resource_count),
            Cell::new(&data.data_source),
        ]);
        lines.push(table.to_string());

        if !data.cost_by_service.is_empty() {
            let mut breakdown = new_table(vec!["Service", "Cost"]);
            let mut services: Vec<_> = data.cost_by_service.iter().collect();
            services.sort_by(|a, b| b.1.total_cmp(a.1));
            for (service, cost) in services {
                breakdown.add_row(vec![
                    Cell::new(service),
                    Cell::new(format_amount(*cost, &overview.currency)),
                ]);
            }
            lines.push(breakdown.to_string());
        }

        if !overview.actionable_recommendations.is_empty() {
            lines.push("Recommendations:".bold().to_string());
            for rec in &overview.actionable_recommendations {
                lines.push(format!(
                    "  - [{}] {} (saves {}, risk {})",
                    rec.priority,
                    rec.action,
                    format_amount(rec.estimated_savings_inr, "INR"),
                    rec.risk_level
                ));
            }
        }
    }

    if let Some(last_updated) = snapshot.last_updated {
        lines.push(format!("Last updated: {}", last_updated.to_rfc3339()));
    }

    for note in [
        outcome_note("Cost data", &report.cost),
        outcome_note("Cluster status", &report.cluster),
    ]
    .into_iter()
    .flatten()
    {
        lines.push(format!("{} {}", "warning:".yellow(), note));
    }

    lines.join("\n")
}

/// Format the startup report and snapshot as JSON
pub fn format_status_json(report: &StartupReport, snapshot: &ViewSnapshot) -> String {
    let errors: Vec<String> = [
        outcome_note("cost", &report.cost),
        outcome_note("cluster", &report.cluster),
        report.health.as_ref().err().map(|e| format!("health: {}", e)),
    ]
    .into_iter()
    .flatten()
    .collect();

    to_pretty_json(&json!({
        "health": report.health.as_ref().ok(),
        "snapshot": snapshot,
        "errors": errors,
    }))
}

/// Format deployments as a table
pub fn format_deployments_table(deployments: &[Deployment]) -> String {
    let mut table = new_table(vec!["Name", "Namespace", "Ready", "Available", "Created"]);
    for d in deployments {
        let desired = d.replicas.unwrap_or(0);
        let ready = format!("{}/{}", d.ready_replicas, desired);
        let ready = if d.ready_replicas >= desired {
            ready.green().to_string()
        } else {
            ready.yellow().to_string()
        };
        table.add_row(vec![
            Cell::new(&d.name),
            Cell::new(&d.namespace),
            Cell::new(ready),
            Cell::new(d.available_replicas),
            Cell::new(d.created.as_deref().unwrap_or("-")),
        ]);
    }
    table.to_string()
}

/// Format pods as a table
pub fn format_pods_table(pods: &[Pod]) -> String {
    let mut table = new_table(vec!["Name", "Namespace", "Phase", "Ready", "Restarts", "Node"]);
    for p in pods {
        let phase = p.phase.as_deref().unwrap_or("Unknown");
        let phase = match phase {
            "Running" | "Succeeded" => phase.green().to_string(),
            "Pending" => phase.yellow().to_string(),
            _ => phase.red().to_string(),
        };
        table.add_row(vec![
            Cell::new(&p.name),
            Cell::new(&p.namespace),
            Cell::new(phase),
            Cell::new(&p.ready),
            Cell::new(p.restarts),
            Cell::new(p.node.as_deref().unwrap_or("-")),
        ]);
    }
    table.to_string()
}

/// Format services as a table
pub fn format_services_table(services: &[Service]) -> String {
    let mut table = new_table(vec!["Name", "Namespace", "Type", "Cluster IP", "Ports"]);
    for s in services {
        let ports: Vec<String> = s
            .ports
            .iter()
            .map(|port| {
                let target = match &port.target_port {
                    serde_json::Value::String(name) => name.clone(),
                    other => other.to_string(),
                };
                format!(
                    "{}:{}/{}",
                    port.port,
                    target,
                    port.protocol.as_deref().unwrap_or("TCP")
                )
            })
            .collect();
        table.add_row(vec![
            Cell::new(&s.name),
            Cell::new(&s.namespace),
            Cell::new(s.service_type.as_deref().unwrap_or("-")),
            Cell::new(s.cluster_ip.as_deref().unwrap_or("-")),
            Cell::new(ports.join(", ")),
        ]);
    }
    table.to_string()
}

/// Format a resource list as JSON under `key`
pub fn format_resources_json<T: Serialize>(key: &str, items: &[T]) -> String {
    let mut map = serde_json::Map::new();
    map.insert(key.to_string(), json!(items));
    to_pretty_json(&serde_json::Value::Object(map))
}

pub fn format_chat_message(message: &ChatMessage) -> String {
    let speaker = match message.sender {
        Sender::User => "you".cyan().bold(),
        Sender::Assistant => "assistant".magenta().bold(),
    };
    let mut text = format!("{}: {}", speaker, message.text);
    if let Some(ref actions) = message.actions {
        for action in actions {
            text.push_str(&format!("\n  action: {}", action));
        }
    }
    text
}

/// One-line summary of a push message and the merged snapshot
pub fn format_update_line(message: &InboundMessage, snapshot: &ViewSnapshot) -> String {
    let mut parts = vec![format!("[{}]", message.kind())];
    match message {
        InboundMessage::Error(remote) => parts.push(remote.message.red().to_string()),
        InboundMessage::Other { .. } => parts.push("passed through".dimmed().to_string()),
        _ => {
            if let Some(ref health) = snapshot.cluster_health {
                parts.push(format!(
                    "cluster={} score={:.0}",
                    health_label(&health.status),
                    health.score
                ));
            }
            if let Some(data) = snapshot.cost_data() {
                parts.push(format!(
                    "monthly={:.2} savings={:.2} resources={}",
                    data.total_monthly_cost, data.total_potential_savings, data.resource_count
                ));
            }
        }
    }
    parts.join(" ")
}

fn to_pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{HealthReport, RequestError};
    use crate::snapshot::{ClusterStatus, FinOpsOverview};

    fn report(cost: LoadOutcome) -> StartupReport {
        StartupReport {
            health: Ok(HealthReport {
                status: "healthy".to_string(),
                version: Some("2.0.0".to_string()),
                ..HealthReport::default()
            }),
            cost,
            cluster: LoadOutcome::Loaded,
        }
    }

    fn snapshot() -> ViewSnapshot {
        let mut snapshot = ViewSnapshot::new();
        let mut overview = FinOpsOverview::default();
        overview.currency = "INR".to_string();
        overview.cost_data.total_monthly_cost = 1234.5;
        overview.cost_data.data_source = "azure_api_real".to_string();
        overview
            .cost_data
            .cost_by_service
            .insert("Storage".to_string(), 200.0);
        snapshot.replace_cost(overview);
        snapshot.replace_cluster(ClusterStatus::default());
        snapshot
    }

    #[test]
    fn test_format_status_text() {
        let output = format_status(&report(LoadOutcome::Loaded), &snapshot());
        assert!(output.contains("Healthy"));
        assert!(output.contains("INR 1234.50"));
        assert!(output.contains("Storage"));
        assert!(!output.contains("warning:"));
    }

    #[test]
    fn test_format_status_lists_fallbacks() {
        let failed = LoadOutcome::Fallback(RequestError::Timeout {
            endpoint: "/finops/overview".to_string(),
            timeout_ms: 10_000,
        });
        let output = format_status(&report(failed), &snapshot());
        assert!(output.contains("Cost data unavailable"));
    }

    #[test]
    fn test_format_status_json_valid() {
        let output = format_status_json(&report(LoadOutcome::Loaded), &snapshot());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["health"]["status"], "healthy");
        assert_eq!(
            parsed["snapshot"]["cost_summary"]["cost_data"]["total_monthly_cost"],
            1234.5
        );
        assert!(parsed["errors"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_format_pods_table() {
        let pods = vec![Pod {
            name: "api-7d9f".to_string(),
            namespace: "default".to_string(),
            phase: Some("Running".to_string()),
            ready: "1/1".to_string(),
            ..Pod::default()
        }];
        let output = format_pods_table(&pods);
        assert!(output.contains("api-7d9f"));
        assert!(output.contains("Restarts"));
    }

    #[test]
    fn test_format_resources_json() {
        let output = format_resources_json("deployments", &[Deployment::default()]);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["deployments"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_format_update_line_for_error_frame() {
        let message = InboundMessage::parse(r#"{"type": "error", "message": "boom"}"#).unwrap();
        let line = format_update_line(&message, &ViewSnapshot::new());
        assert!(line.starts_with("[error]"));
        assert!(line.contains("boom"));
    }

    #[test]
    fn test_health_label_unknown_status() {
        assert_eq!(health_label("disconnected"), "Disconnected");
    }
}
