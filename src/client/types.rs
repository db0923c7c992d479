//! Request and response bodies for the API endpoints

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response body of `GET /health`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: Option<String>,
    pub version: Option<String>,
    /// Per-integration status, e.g. `kubernetes -> connected`
    pub services: BTreeMap<String, String>,
    pub features: BTreeMap<String, bool>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// A deployment row from `GET /deployments`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deployment {
    pub name: String,
    pub namespace: String,
    pub replicas: Option<u32>,
    pub ready_replicas: u32,
    pub available_replicas: u32,
    pub created: Option<String>,
}

/// A pod row from `GET /pods`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pod {
    pub name: String,
    pub namespace: String,
    pub phase: Option<String>,
    pub node: Option<String>,
    /// Ready containers as `ready/total`
    pub ready: String,
    pub restarts: u32,
    pub created: Option<String>,
}

/// Port mapping of a service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicePort {
    pub port: u16,
    /// Number or named port
    pub target_port: serde_json::Value,
    pub protocol: Option<String>,
}

/// A service row from `GET /services`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    pub name: String,
    pub namespace: String,
    #[serde(rename = "type")]
    pub service_type: Option<String>,
    pub cluster_ip: Option<String>,
    pub ports: Vec<ServicePort>,
    pub created: Option<String>,
}

/// Body of `POST /deployments/scale`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleRequest {
    pub name: String,
    pub namespace: String,
    pub replicas: u32,
}

/// Response body of `POST /deployments/scale`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleResponse {
    pub message: String,
    pub success: bool,
}

/// Cost totals sent along with a chat query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostTotals {
    pub monthly_cost: f64,
    pub potential_savings: f64,
    pub resource_count: u64,
    pub data_source: String,
}

/// Reduced dashboard context attached to a chat query.
///
/// Only derived totals and UI state travel with the query, never the full
/// snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatContext {
    pub cost_totals: CostTotals,
    pub connection_state: String,
    pub active_section: String,
}

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    pub context: ChatContext,
}

/// Response body of `POST /chat`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatResponse {
    pub response: String,
    pub model: String,
    pub timestamp: Option<String>,
    pub cached: bool,
    /// Structured follow-up actions, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<serde_json::Value>>,
}

/// Body of `POST /manifests/apply`; the manifest text is never parsed here
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRequest {
    pub manifest: String,
    pub namespace: String,
    pub dry_run: bool,
}

/// Response body of `POST /manifests/apply`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestResponse {
    pub success: bool,
    pub message: String,
    pub resources_created: Vec<serde_json::Value>,
    pub warnings: Vec<String>,
}
