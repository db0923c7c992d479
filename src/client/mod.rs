//! Request client for one-shot API calls.
//!
//! Every call is bounded by a fixed deadline and resolves to either the decoded
//! JSON body or a classified [`RequestError`]. The client never retries; callers
//! decide whether to retry or substitute a fallback value.

mod config;
mod error;
mod types;

pub use config::*;
pub use error::*;
pub use types::*;

pub use reqwest::Method;

use crate::logging::{error_kind, generate_request_id};
use crate::snapshot::{ClusterStatus, FinOpsOverview};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Stateless client for the HTTP API endpoints.
#[derive(Debug, Clone)]
pub struct RequestClient {
    /// Base URL without trailing slash
    base_url: String,
    /// HTTP client with connection pooling
    client: reqwest::Client,
    /// Deadline for each call
    timeout: Duration,
}

impl RequestClient {
    /// Create a request client with its own HTTP client.
    pub fn new(config: &ClientConfig) -> Result<Self, RequestError> {
        let timeout = Duration::from_secs(config.request_timeout_seconds);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RequestError::Transport {
                endpoint: config.base_url.clone(),
                message: e.to_string(),
            })?;
        Ok(Self::with_client(config, client))
    }

    /// Create a request client with a custom HTTP client (for testing).
    pub fn with_client(config: &ClientConfig, client: reqwest::Client) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            timeout: Duration::from_secs(config.request_timeout_seconds),
        }
    }

    /// Override the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issue one bounded call and return the decoded JSON body.
    pub async fn call(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Value, RequestError> {
        self.send(method, endpoint, &[], body).await
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthReport, RequestError> {
        self.get_json("/health", &[]).await
    }

    /// `GET /cluster/status`
    pub async fn cluster_status(&self) -> Result<ClusterStatus, RequestError> {
        self.get_json("/cluster/status", &[]).await
    }

    /// `GET /deployments?namespace=`; `"all"` lists every namespace.
    pub async fn deployments(&self, namespace: &str) -> Result<Vec<Deployment>, RequestError> {
        self.get_json("/deployments", &[("namespace", namespace)])
            .await
    }

    /// `GET /pods?namespace=`
    pub async fn pods(&self, namespace: &str) -> Result<Vec<Pod>, RequestError> {
        self.get_json("/pods", &[("namespace", namespace)]).await
    }

    /// `GET /services?namespace=`
    pub async fn services(&self, namespace: &str) -> Result<Vec<Service>, RequestError> {
        self.get_json("/services", &[("namespace", namespace)]).await
    }

    /// `POST /deployments/scale`
    pub async fn scale_deployment(
        &self,
        request: &ScaleRequest,
    ) -> Result<ScaleResponse, RequestError> {
        self.post_json("/deployments/scale", request).await
    }

    /// `GET /finops/overview`
    pub async fn finops_overview(&self) -> Result<FinOpsOverview, RequestError> {
        self.get_json("/finops/overview", &[]).await
    }

    /// `POST /chat`
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, RequestError> {
        self.post_json("/chat", request).await
    }

    /// `POST /manifests/apply`
    pub async fn apply_manifest(
        &self,
        request: &ManifestRequest,
    ) -> Result<ManifestResponse, RequestError> {
        self.post_json("/manifests/apply", request).await
    }

    /// `GET /azure/status`
    pub async fn azure_status(&self) -> Result<Value, RequestError> {
        self.send(Method::GET, "/azure/status", &[], None::<&Value>)
            .await
    }

    /// `GET /azure/force-refresh`
    pub async fn force_refresh(&self) -> Result<Value, RequestError> {
        self.send(Method::GET, "/azure/force-refresh", &[], None::<&Value>)
            .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RequestError> {
        let value = self
            .send(Method::GET, endpoint, query, None::<&Value>)
            .await?;
        decode(endpoint, value)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, RequestError> {
        let value = self.send(Method::POST, endpoint, &[], Some(body)).await?;
        decode(endpoint, value)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<Value, RequestError> {
        let request_id = generate_request_id();
        let url = join_base_path(&self.base_url, endpoint);
        let timeout_ms = self.timeout.as_millis() as u64;
        let start = Instant::now();

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            endpoint = endpoint,
            "Request started"
        );

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json")
            .timeout(self.timeout);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| RequestError::from_reqwest(endpoint, timeout_ms, e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(RequestError::HttpStatus {
                    endpoint: endpoint.to_string(),
                    code: status.as_u16(),
                });
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| RequestError::from_reqwest(endpoint, timeout_ms, e))?;
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_slice::<Value>(&bytes).map_err(|e| RequestError::InvalidBody {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
        };

        // Outer deadline also covers DNS and body streaming
        let result = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(RequestError::Timeout {
                endpoint: endpoint.to_string(),
                timeout_ms,
            }),
        };

        let latency_ms = start.elapsed().as_millis() as u64;
        metrics::histogram!("finkube_request_duration_seconds",
            "endpoint" => endpoint.to_string()
        )
        .record(latency_ms as f64 / 1000.0);

        match &result {
            Ok(_) => {
                tracing::debug!(
                    request_id = %request_id,
                    endpoint = endpoint,
                    latency_ms,
                    "Request completed"
                );
            }
            Err(e) => {
                metrics::counter!("finkube_request_errors_total",
                    "endpoint" => endpoint.to_string(),
                    "kind" => error_kind(e)
                )
                .increment(1);
                tracing::warn!(
                    request_id = %request_id,
                    method = %method,
                    endpoint = endpoint,
                    latency_ms,
                    error_kind = error_kind(e),
                    error = %e,
                    "Request failed"
                );
            }
        }

        result
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T, RequestError> {
    serde_json::from_value(value).map_err(|e| RequestError::InvalidBody {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

fn join_base_path(base: &str, path: &str) -> String {
    let normalized_base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{normalized_base}{path}")
    } else {
        format!("{normalized_base}/{path}")
    }
}
