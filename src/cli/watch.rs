//! Watch command implementation

use crate::channel::ConnectionState;
use crate::cli::output::{connection_label, format_status, format_update_line};
use crate::cli::{shutdown_signal, WatchArgs};
use crate::config::FinkubeConfig;
use crate::dashboard::Dashboard;
use std::sync::Arc;
use tokio::sync::Notify;

/// Handle `finkube watch`: start the dashboard and print updates.
///
/// Runs until Ctrl-C, or until the channel gives up reconnecting.
pub async fn handle_watch(
    args: &WatchArgs,
    config: FinkubeConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let dashboard = Dashboard::new(config)?;
    let failed = Arc::new(Notify::new());

    let on_failed = Arc::clone(&failed);
    dashboard.channel().on_state_change(move |state| {
        println!("channel: {}", connection_label(state));
        if state == ConnectionState::Failed {
            on_failed.notify_one();
        }
    });

    let snapshot = dashboard.shared_snapshot();
    let verbose = args.verbose;
    dashboard.channel().on_message(move |message| {
        let view = snapshot.read().unwrap_or_else(|e| e.into_inner());
        println!("{}", format_update_line(message, &view));
        if verbose && message.as_update().is_some() {
            println!("{}", serde_json::to_string_pretty(&*view).unwrap_or_default());
        }
    });

    dashboard.channel().on_error(|error| {
        eprintln!("channel error: {}", error);
    });

    let report = dashboard.start().await;
    println!("{}", format_status(&report, &dashboard.snapshot()));

    let result: Result<(), Box<dyn std::error::Error>> = tokio::select! {
        _ = shutdown_signal() => Ok(()),
        _ = failed.notified() => Err("live channel failed after exhausting reconnect attempts".into()),
    };

    dashboard.stop().await;
    result
}
