//! Chat command implementation

use crate::cli::output::format_chat_message;
use crate::cli::ChatArgs;
use crate::config::FinkubeConfig;
use crate::dashboard::Dashboard;

/// Handle `finkube chat <query>`
///
/// Loads the snapshots first so the query carries current cost totals.
pub async fn handle_chat(
    args: &ChatArgs,
    config: FinkubeConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let dashboard = Dashboard::new(config)?;
    dashboard.set_section(args.section);
    dashboard.load_snapshots().await;

    let reply = dashboard.submit_chat(&args.query.join(" ")).await?;
    Ok(format_chat_message(&reply))
}
