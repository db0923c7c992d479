//! Wire and view types for cluster health and cost data

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Node readiness counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeCounts {
    pub total: u32,
    pub ready: u32,
}

/// Pod phase counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodCounts {
    pub total: u32,
    pub running: u32,
    pub pending: u32,
    pub failed: u32,
}

/// Cluster health as reported atomically by the source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterHealth {
    /// Status tag: healthy, warning, critical, disconnected, error
    pub status: String,
    /// Health score in the range 0..=100
    pub score: f64,
    pub nodes: NodeCounts,
    pub pods: PodCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response body of `GET /cluster/status`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterStatus {
    pub cluster_health: ClusterHealth,
    pub last_updated: Option<String>,
}

impl ClusterStatus {
    /// Zero-valued cluster status shown when the cluster load fails.
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            cluster_health: ClusterHealth {
                status: "error".to_string(),
                score: 0.0,
                nodes: NodeCounts::default(),
                pods: PodCounts::default(),
                message: None,
                error: Some(reason.into()),
            },
            last_updated: None,
        }
    }
}

/// Aggregated cost figures for the subscription
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostData {
    pub total_monthly_cost: f64,
    pub total_potential_savings: f64,
    pub resource_count: u64,
    pub cost_by_type: BTreeMap<String, f64>,
    pub cost_by_service: BTreeMap<String, f64>,
    pub data_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CostData {
    /// Merge an incremental cost update, keeping every field the update omits.
    pub fn merge(&mut self, update: &CostSummaryUpdate) {
        if let Some(cost) = update.monthly_cost {
            self.total_monthly_cost = cost;
        }
        if let Some(savings) = update.potential_savings {
            self.total_potential_savings = savings;
        }
        if let Some(count) = update.resource_count {
            self.resource_count = count;
        }
        if let Some(ref source) = update.data_source {
            self.data_source = source.clone();
        }
    }
}

/// A recommended cost optimization action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    pub action: String,
    pub command: String,
    pub estimated_savings_inr: f64,
    pub risk_level: String,
    pub priority: String,
    pub description: String,
}

/// Response body of `GET /finops/overview`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinOpsOverview {
    pub cost_data: CostData,
    pub ai_analysis: Option<String>,
    pub actionable_recommendations: Vec<Recommendation>,
    pub total_potential_savings: f64,
    pub currency: String,
    pub last_updated: Option<String>,
    pub data_source: Option<String>,
    pub ai_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FinOpsOverview {
    /// Zero-valued overview shown when the cost load fails.
    pub fn fallback(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            cost_data: CostData {
                data_source: "error".to_string(),
                error: Some(reason.clone()),
                ..CostData::default()
            },
            ai_analysis: None,
            actionable_recommendations: Vec::new(),
            total_potential_savings: 0.0,
            currency: "INR".to_string(),
            last_updated: None,
            data_source: Some("error".to_string()),
            ai_status: Some("error".to_string()),
            error: Some(reason),
        }
    }
}

impl FinOpsOverview {
    /// Merge a push update into `cost_data` and keep the overview-level
    /// savings and data source in step with it.
    pub fn merge_update(&mut self, update: &CostSummaryUpdate) {
        self.cost_data.merge(update);
        if let Some(savings) = update.potential_savings {
            self.total_potential_savings = savings;
        }
        if let Some(ref source) = update.data_source {
            self.data_source = Some(source.clone());
        }
    }
}

/// Changed cost aggregates carried by a push update.
///
/// Push updates never carry the breakdown maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostSummaryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_savings: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
}

impl CostSummaryUpdate {
    /// True when the update carries no field at all
    pub fn is_empty(&self) -> bool {
        self.monthly_cost.is_none()
            && self.potential_savings.is_none()
            && self.resource_count.is_none()
            && self.data_source.is_none()
    }
}

/// Payload of `fast_initial_status` and `background_update` frames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncrementalUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_health: Option<ClusterHealth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_summary: Option<CostSummaryUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Payload of `cost_breakdown` frames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostBreakdownUpdate {
    pub cost_by_service: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_health_accepts_empty_object() {
        let health: ClusterHealth = serde_json::from_str("{}").unwrap();
        assert_eq!(health, ClusterHealth::default());
    }

    #[test]
    fn test_cluster_status_parses_source_shape() {
        let json = serde_json::json!({
            "cluster_health": {
                "status": "healthy",
                "score": 96.5,
                "nodes": {"total": 3, "ready": 3},
                "pods": {"total": 40, "running": 38, "pending": 1, "failed": 1}
            },
            "last_updated": "2024-05-01T10:00:00.123456"
        });

        let status: ClusterStatus = serde_json::from_value(json).unwrap();
        assert_eq!(status.cluster_health.status, "healthy");
        assert_eq!(status.cluster_health.nodes.ready, 3);
        assert_eq!(status.cluster_health.pods.failed, 1);
        assert!(status.cluster_health.error.is_none());
    }

    #[test]
    fn test_finops_overview_ignores_unknown_fields() {
        let json = serde_json::json!({
            "cost_data": {
                "total_monthly_cost": 1200.5,
                "resource_count": 12,
                "cost_by_type": {"virtualMachines": 800.0},
                "avg_resource_cost": 100.0,
                "data_source": "database_cache"
            },
            "currency": "INR",
            "total_potential_savings": 180.0
        });

        let overview: FinOpsOverview = serde_json::from_value(json).unwrap();
        assert_eq!(overview.cost_data.total_monthly_cost, 1200.5);
        assert_eq!(overview.cost_data.cost_by_type["virtualMachines"], 800.0);
        assert!(overview.actionable_recommendations.is_empty());
    }

    #[test]
    fn test_fallbacks_are_zero_valued() {
        let cost = FinOpsOverview::fallback("timeout");
        assert_eq!(cost.cost_data.total_monthly_cost, 0.0);
        assert_eq!(cost.cost_data.resource_count, 0);
        assert_eq!(cost.cost_data.data_source, "error");
        assert_eq!(cost.currency, "INR");

        let cluster = ClusterStatus::fallback("refused");
        assert_eq!(cluster.cluster_health.status, "error");
        assert_eq!(cluster.cluster_health.score, 0.0);
        assert_eq!(cluster.cluster_health.error.as_deref(), Some("refused"));
    }

    #[test]
    fn test_cost_merge_keeps_omitted_fields() {
        let mut data = CostData {
            total_monthly_cost: 100.0,
            total_potential_savings: 15.0,
            resource_count: 4,
            data_source: "azure_api_real".to_string(),
            ..CostData::default()
        };

        data.merge(&CostSummaryUpdate {
            monthly_cost: Some(120.0),
            ..CostSummaryUpdate::default()
        });

        assert_eq!(data.total_monthly_cost, 120.0);
        assert_eq!(data.total_potential_savings, 15.0);
        assert_eq!(data.resource_count, 4);
        assert_eq!(data.data_source, "azure_api_real");
    }

    #[test]
    fn test_cost_summary_update_null_is_absent() {
        let update: CostSummaryUpdate =
            serde_json::from_str(r#"{"monthly_cost": null, "resource_count": 7}"#).unwrap();
        assert!(update.monthly_cost.is_none());
        assert_eq!(update.resource_count, Some(7));
        assert!(!update.is_empty());
        assert!(CostSummaryUpdate::default().is_empty());
    }
}
