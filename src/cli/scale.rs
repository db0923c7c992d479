//! Scale command implementation

use crate::cli::ScaleArgs;
use crate::config::FinkubeConfig;
use crate::dashboard::Dashboard;
use colored::Colorize;

/// Handle `finkube scale <name> <replicas>`
pub async fn handle_scale(
    args: &ScaleArgs,
    config: FinkubeConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let dashboard = Dashboard::new(config)?;
    let response = dashboard
        .scale_deployment(&args.name, args.namespace.as_deref(), args.replicas)
        .await?;

    if !response.success {
        return Err(format!("Scaling {} failed: {}", args.name, response.message).into());
    }

    Ok(format!("{} {}", "✓".green(), response.message))
}
