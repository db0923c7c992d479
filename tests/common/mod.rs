//! Shared test utilities for finkube integration tests.
//!
//! Provides a scripted channel transport, canned API payloads and wiremock
//! setup helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use finkube::channel::{ChannelConfig, ChannelError, Connector, Socket, SocketEvent};
use finkube::client::ClientConfig;
use finkube::config::FinkubeConfig;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Scripted transport
// =============================================================================

enum Step {
    Refuse,
    Accept(mpsc::UnboundedReceiver<SocketEvent>),
}

/// Connector replaying scripted outcomes; refuses once the script is empty.
#[derive(Default)]
pub struct ScriptedConnector {
    steps: Mutex<VecDeque<Step>>,
    connects: AtomicUsize,
    pub sent: Arc<Mutex<Vec<String>>>,
    pub closes: Arc<Mutex<Vec<u16>>>,
}

impl ScriptedConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn refuse(&self) {
        self.steps.lock().unwrap().push_back(Step::Refuse);
    }

    /// Queue an accepted socket and return the sender feeding it.
    pub fn accept(&self) -> mpsc::UnboundedSender<SocketEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.steps.lock().unwrap().push_back(Step::Accept(rx));
        tx
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn connect(&self, _url: &str) -> Result<Box<dyn Socket>, ChannelError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match self.steps.lock().unwrap().pop_front() {
            Some(Step::Accept(events)) => Ok(Box::new(ScriptedSocket {
                events,
                sent: Arc::clone(&self.sent),
                closes: Arc::clone(&self.closes),
            })),
            Some(Step::Refuse) | None => Err(ChannelError::Connect("connection refused".to_string())),
        }
    }
}

struct ScriptedSocket {
    events: mpsc::UnboundedReceiver<SocketEvent>,
    sent: Arc<Mutex<Vec<String>>>,
    closes: Arc<Mutex<Vec<u16>>>,
}

#[async_trait]
impl Socket for ScriptedSocket {
    async fn recv(&mut self) -> Option<SocketEvent> {
        self.events.recv().await
    }

    async fn send_text(&mut self, text: String) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(text);
        Ok(())
    }

    async fn close(&mut self, code: u16, _reason: &str) -> Result<(), ChannelError> {
        self.closes.lock().unwrap().push(code);
        Ok(())
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Channel settings with short delays for real-time tests
pub fn fast_channel_config(url: &str) -> ChannelConfig {
    ChannelConfig {
        url: url.to_string(),
        heartbeat_interval_seconds: 30,
        reconnect_base_delay_ms: 50,
        max_reconnect_attempts: 3,
        max_backoff_multiplier: 5,
    }
}

/// Configuration pointing the request client at a wiremock server
pub fn config_for(server: &MockServer) -> FinkubeConfig {
    FinkubeConfig {
        api: ClientConfig {
            base_url: format!("{}/api", server.uri()),
            request_timeout_seconds: 5,
            default_namespace: "default".to_string(),
        },
        channel: fast_channel_config("ws://127.0.0.1:9/ws"),
        ..FinkubeConfig::default()
    }
}

// =============================================================================
// Canned API payloads
// =============================================================================

pub fn health_json() -> serde_json::Value {
    serde_json::json!({
        "status": "healthy",
        "timestamp": "2024-05-01T10:00:00",
        "services": {"kubernetes": "connected", "azure_finops": "connected"},
        "version": "2.0.0",
        "features": {"real_time_updates": true}
    })
}

pub fn cluster_json() -> serde_json::Value {
    serde_json::json!({
        "cluster_health": {
            "status": "healthy",
            "score": 95.0,
            "nodes": {"total": 3, "ready": 3},
            "pods": {"total": 24, "running": 23, "pending": 1, "failed": 0}
        },
        "last_updated": "2024-05-01T10:00:00"
    })
}

pub fn finops_json() -> serde_json::Value {
    serde_json::json!({
        "cost_data": {
            "total_monthly_cost": 1500.0,
            "total_potential_savings": 225.0,
            "resource_count": 12,
            "cost_by_type": {"Storage": 400.0, "Virtual Machines": 1100.0},
            "cost_by_service": {"Storage": 400.0, "Virtual Machines": 1100.0},
            "data_source": "azure_api_real"
        },
        "ai_analysis": "Costs are within budget.",
        "actionable_recommendations": [{
            "action": "Rightsize VM",
            "command": "az vm resize --size Standard_B2s",
            "estimated_savings_inr": 150.0,
            "risk_level": "low",
            "priority": "high",
            "description": "VM is underutilized"
        }],
        "total_potential_savings": 225.0,
        "currency": "INR",
        "last_updated": "2024-05-01T10:00:00",
        "data_source": "azure_api_real",
        "ai_status": "active"
    })
}

/// Mount healthy responses for `/health`, `/cluster/status` and `/finops/overview`.
pub async fn mount_startup_endpoints(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(health_json()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cluster/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster_json()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/finops/overview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(finops_json()))
        .mount(server)
        .await;
}

// =============================================================================
// Waiting
// =============================================================================

/// Poll `condition` until it holds or `timeout` elapses.
pub async fn wait_for<F: Fn() -> bool>(condition: F, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}
