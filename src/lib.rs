//! finkube - live-data client for a Kubernetes and Azure cost dashboard
//!
//! The crate keeps a local view of cluster health and cost data in sync with
//! a remote FinKubeOps backend. A [`client::RequestClient`] performs bounded
//! one-shot calls, a [`channel::LiveChannel`] keeps a reconnecting push
//! connection open, and [`dashboard::Dashboard`] merges both into one
//! [`snapshot::ViewSnapshot`].

pub mod channel;
pub mod chat;
pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod snapshot;
