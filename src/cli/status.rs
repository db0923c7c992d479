//! Status command implementation

use crate::cli::output::{format_status, format_status_json};
use crate::cli::StatusArgs;
use crate::config::FinkubeConfig;
use crate::dashboard::Dashboard;

/// Handle `finkube status`: probe the API and load both snapshots once.
///
/// Load failures are shown as warnings next to the fallback values; the
/// command itself only fails when the client cannot be built.
pub async fn handle_status(
    args: &StatusArgs,
    config: FinkubeConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let dashboard = Dashboard::new(config)?;
    let report = dashboard.load().await;
    let snapshot = dashboard.snapshot();

    if args.json {
        Ok(format_status_json(&report, &snapshot))
    } else {
        Ok(format_status(&report, &snapshot))
    }
}
