//! View snapshot of cluster health and cost data.
//!
//! The snapshot is replaced wholesale by full loads from the request client and
//! merged field-by-field by incremental push updates from the live channel.

mod types;

pub use types::*;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, RwLock};

/// Snapshot shared between the live channel subscriber and the dashboard
pub type SharedSnapshot = Arc<RwLock<ViewSnapshot>>;

/// Aggregate view model rendered by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub cluster_health: Option<ClusterHealth>,
    pub cost_summary: Option<FinOpsOverview>,
    /// Never decreases
    pub last_updated: Option<DateTime<Utc>>,
}

impl ViewSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cost aggregates, if any cost data has been received
    pub fn cost_data(&self) -> Option<&CostData> {
        self.cost_summary.as_ref().map(|overview| &overview.cost_data)
    }

    /// Replace cluster health with an authoritative full load.
    pub fn replace_cluster(&mut self, status: ClusterStatus) {
        self.cluster_health = Some(status.cluster_health);
        self.touch(status.last_updated.as_deref());
    }

    /// Replace cost data with an authoritative full load.
    pub fn replace_cost(&mut self, overview: FinOpsOverview) {
        let timestamp = overview.last_updated.clone();
        self.cost_summary = Some(overview);
        self.touch(timestamp.as_deref());
    }

    /// Merge a partial push update.
    ///
    /// Cluster health is replaced as a unit; cost aggregates are merged per
    /// field. Returns true if any field changed.
    pub fn apply_update(&mut self, update: &IncrementalUpdate) -> bool {
        let mut updated = false;

        if let Some(ref health) = update.cluster_health {
            self.cluster_health = Some(health.clone());
            updated = true;
        }

        if let Some(ref cost) = update.cost_summary {
            if !cost.is_empty() {
                self.cost_summary
                    .get_or_insert_with(FinOpsOverview::default)
                    .merge_update(cost);
                updated = true;
            }
        }

        if updated {
            self.touch(update.timestamp.as_deref());
        }
        updated
    }

    /// Replace the per-service breakdown maps from a `cost_breakdown` frame.
    pub fn apply_breakdown(&mut self, update: &CostBreakdownUpdate) -> bool {
        if update.cost_by_service.is_empty() {
            return false;
        }

        let cost_data = &mut self
            .cost_summary
            .get_or_insert_with(FinOpsOverview::default)
            .cost_data;
        cost_data.cost_by_service = update.cost_by_service.clone();
        cost_data.cost_by_type = update.cost_by_service.clone();

        self.touch(update.timestamp.as_deref());
        true
    }

    fn touch(&mut self, timestamp: Option<&str>) {
        let incoming = timestamp.and_then(parse_timestamp).unwrap_or_else(Utc::now);
        self.last_updated = Some(match self.last_updated {
            Some(current) if current > incoming => current,
            _ => incoming,
        });
    }
}

/// Parse an RFC 3339 or naive ISO-8601 timestamp (naive values are UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
