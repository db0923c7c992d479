//! Dashboard application context.
//!
//! [`Dashboard`] owns the request client, the live channel, the shared view
//! snapshot and the chat transcript. Startup probes the API, loads the cost
//! and cluster snapshots side by side, then opens the live channel whose
//! push updates are merged into the same snapshot.

mod section;

pub use section::Section;

use crate::channel::{ConnectionState, InboundMessage, LiveChannel};
use crate::chat::{ChatError, ChatMessage, ChatSession};
use crate::client::{
    ChatContext, CostTotals, HealthReport, RequestClient, RequestError, ScaleRequest,
    ScaleResponse,
};
use crate::config::FinkubeConfig;
use crate::logging::error_kind;
use crate::snapshot::{ClusterStatus, FinOpsOverview, SharedSnapshot, ViewSnapshot};
use std::sync::{Arc, RwLock};

/// Result of one snapshot load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// The load failed and the fallback value was installed instead
    Fallback(RequestError),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded)
    }
}

/// What happened during [`Dashboard::start`].
#[derive(Debug, Clone)]
pub struct StartupReport {
    pub health: Result<HealthReport, RequestError>,
    pub cost: LoadOutcome,
    pub cluster: LoadOutcome,
}

impl StartupReport {
    /// True when the API answered healthy and both snapshots loaded
    pub fn is_complete(&self) -> bool {
        matches!(self.health, Ok(ref report) if report.is_healthy())
            && self.cost.is_loaded()
            && self.cluster.is_loaded()
    }
}

pub struct Dashboard {
    config: FinkubeConfig,
    client: RequestClient,
    channel: LiveChannel,
    snapshot: SharedSnapshot,
    chat: tokio::sync::Mutex<ChatSession>,
    section: RwLock<Section>,
}

impl Dashboard {
    /// Build a dashboard talking to the configured API and WebSocket.
    pub fn new(config: FinkubeConfig) -> Result<Self, RequestError> {
        let client = RequestClient::new(&config.api)?;
        let channel = LiveChannel::new(config.channel.clone());
        Ok(Self::with_parts(config, client, channel))
    }

    /// Build a dashboard from existing parts (for testing).
    ///
    /// The channel's message stream is wired into the snapshot here.
    pub fn with_parts(config: FinkubeConfig, client: RequestClient, channel: LiveChannel) -> Self {
        let snapshot: SharedSnapshot = Arc::new(RwLock::new(ViewSnapshot::new()));

        let merge_target = Arc::clone(&snapshot);
        channel.on_message(move |message| merge_message(&merge_target, message));

        let chat = ChatSession::new().with_content_logging(config.logging.enable_content_logging);

        Self {
            config,
            client,
            channel,
            snapshot,
            chat: tokio::sync::Mutex::new(chat),
            section: RwLock::new(Section::default()),
        }
    }

    /// Probe the API, load both snapshots, then open the live channel.
    ///
    /// Never fails: every load error is replaced by a fallback and reported.
    pub async fn start(&self) -> StartupReport {
        let report = self.load().await;
        self.channel.connect();
        report
    }

    /// Health probe followed by both snapshot loads, without the channel.
    pub async fn load(&self) -> StartupReport {
        let health = self.client.health().await;
        match &health {
            Ok(report) => tracing::info!(
                status = %report.status,
                version = report.version.as_deref().unwrap_or("unknown"),
                "API health probe succeeded"
            ),
            Err(e) => tracing::warn!(
                error_kind = error_kind(e),
                error = %e,
                "API health probe failed, continuing with fallbacks"
            ),
        }

        let (cost, cluster) = self.load_snapshots().await;

        StartupReport {
            health,
            cost,
            cluster,
        }
    }

    /// Close the live channel.
    pub async fn stop(&self) {
        self.channel.disconnect().await;
    }

    /// Load the cost and cluster snapshots concurrently.
    ///
    /// Both calls run to completion regardless of the other's outcome, and
    /// each result replaces its snapshot field wholesale.
    pub async fn load_snapshots(&self) -> (LoadOutcome, LoadOutcome) {
        let (cost, cluster) =
            tokio::join!(self.client.finops_overview(), self.client.cluster_status());

        let mut view = self.snapshot.write().unwrap_or_else(|e| e.into_inner());

        let cost = match cost {
            Ok(overview) => {
                view.replace_cost(overview);
                LoadOutcome::Loaded
            }
            Err(e) => {
                tracing::warn!(error_kind = error_kind(&e), error = %e, "Cost load failed, using fallback");
                view.replace_cost(FinOpsOverview::fallback(e.to_string()));
                LoadOutcome::Fallback(e)
            }
        };

        let cluster = match cluster {
            Ok(status) => {
                view.replace_cluster(status);
                LoadOutcome::Loaded
            }
            Err(e) => {
                tracing::warn!(error_kind = error_kind(&e), error = %e, "Cluster load failed, using fallback");
                view.replace_cluster(ClusterStatus::fallback(e.to_string()));
                LoadOutcome::Fallback(e)
            }
        };

        (cost, cluster)
    }

    /// Copy of the current view snapshot
    pub fn snapshot(&self) -> ViewSnapshot {
        self.snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn shared_snapshot(&self) -> SharedSnapshot {
        Arc::clone(&self.snapshot)
    }

    /// Submit a chat query with the reduced dashboard context.
    pub async fn submit_chat(&self, query: &str) -> Result<ChatMessage, ChatError> {
        let context = self.chat_context();
        self.chat
            .lock()
            .await
            .submit(&self.client, query, context)
            .await
    }

    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.chat.lock().await.transcript().to_vec()
    }

    /// Scale a deployment; `None` uses the configured default namespace.
    pub async fn scale_deployment(
        &self,
        name: &str,
        namespace: Option<&str>,
        replicas: u32,
    ) -> Result<ScaleResponse, RequestError> {
        let request = ScaleRequest {
            name: name.to_string(),
            namespace: namespace
                .unwrap_or(&self.config.api.default_namespace)
                .to_string(),
            replicas,
        };
        tracing::info!(
            deployment = %request.name,
            namespace = %request.namespace,
            replicas,
            "Scaling deployment"
        );
        self.client.scale_deployment(&request).await
    }

    pub fn set_section(&self, section: Section) {
        *self.section.write().unwrap_or_else(|e| e.into_inner()) = section;
    }

    pub fn section(&self) -> Section {
        *self.section.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.channel.state()
    }

    pub fn channel(&self) -> &LiveChannel {
        &self.channel
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    pub fn config(&self) -> &FinkubeConfig {
        &self.config
    }

    fn chat_context(&self) -> ChatContext {
        let view = self.snapshot.read().unwrap_or_else(|e| e.into_inner());
        let cost_totals = view
            .cost_data()
            .map(|data| CostTotals {
                monthly_cost: data.total_monthly_cost,
                potential_savings: data.total_potential_savings,
                resource_count: data.resource_count,
                data_source: data.data_source.clone(),
            })
            .unwrap_or_default();

        ChatContext {
            cost_totals,
            connection_state: self.connection_state().to_string(),
            active_section: self.section().to_string(),
        }
    }
}

/// Apply an inbound push message to the snapshot.
fn merge_message(snapshot: &SharedSnapshot, message: &InboundMessage) {
    let mut view = snapshot.write().unwrap_or_else(|e| e.into_inner());
    let changed = match message {
        InboundMessage::FastInitialStatus(update) | InboundMessage::BackgroundUpdate(update) => {
            view.apply_update(update)
        }
        InboundMessage::CostBreakdown(update) => view.apply_breakdown(update),
        InboundMessage::Error(_) | InboundMessage::Other { .. } => false,
    };

    if changed {
        tracing::debug!(kind = message.kind(), "Snapshot merged");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{ClusterHealth, CostSummaryUpdate, IncrementalUpdate};

    fn shared() -> SharedSnapshot {
        Arc::new(RwLock::new(ViewSnapshot::new()))
    }

    #[test]
    fn test_merge_background_update() {
        let snapshot = shared();
        let message = InboundMessage::parse(
            r#"{"type": "background_update",
                "cluster_health": {"status": "healthy", "score": 88.0},
                "cost_summary": {"monthly_cost": 320.0},
                "timestamp": "2024-05-01T10:00:00"}"#,
        )
        .unwrap();

        merge_message(&snapshot, &message);

        let view = snapshot.read().unwrap();
        assert_eq!(view.cluster_health.as_ref().unwrap().score, 88.0);
        assert_eq!(view.cost_data().unwrap().total_monthly_cost, 320.0);
        assert!(view.last_updated.is_some());
    }

    #[test]
    fn test_merge_ignores_error_and_unknown_frames() {
        let snapshot = shared();
        for frame in [
            r#"{"type": "error", "message": "boom"}"#,
            r#"{"type": "ping", "timestamp": "2024-05-01T10:00:00"}"#,
        ] {
            merge_message(&snapshot, &InboundMessage::parse(frame).unwrap());
        }

        assert_eq!(*snapshot.read().unwrap(), ViewSnapshot::new());
    }

    #[test]
    fn test_merge_keeps_cluster_when_update_omits_it() {
        let snapshot = shared();
        merge_message(
            &snapshot,
            &InboundMessage::FastInitialStatus(IncrementalUpdate {
                cluster_health: Some(ClusterHealth {
                    status: "warning".to_string(),
                    score: 60.0,
                    ..ClusterHealth::default()
                }),
                ..IncrementalUpdate::default()
            }),
        );
        merge_message(
            &snapshot,
            &InboundMessage::BackgroundUpdate(IncrementalUpdate {
                cost_summary: Some(CostSummaryUpdate {
                    potential_savings: Some(12.0),
                    ..CostSummaryUpdate::default()
                }),
                ..IncrementalUpdate::default()
            }),
        );

        let view = snapshot.read().unwrap();
        assert_eq!(view.cluster_health.as_ref().unwrap().status, "warning");
        assert_eq!(view.cost_data().unwrap().total_potential_savings, 12.0);
    }

    #[test]
    fn test_startup_report_completeness() {
        let report = StartupReport {
            health: Ok(HealthReport {
                status: "healthy".to_string(),
                ..HealthReport::default()
            }),
            cost: LoadOutcome::Loaded,
            cluster: LoadOutcome::Loaded,
        };
        assert!(report.is_complete());

        let degraded = StartupReport {
            cluster: LoadOutcome::Fallback(RequestError::HttpStatus {
                endpoint: "/cluster/status".to_string(),
                code: 500,
            }),
            ..report
        };
        assert!(!degraded.is_complete());
    }
}
