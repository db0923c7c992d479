//! Resources command implementation

use crate::cli::output::{
    format_deployments_table, format_pods_table, format_resources_json, format_services_table,
};
use crate::cli::{ResourceKind, ResourcesArgs};
use crate::client::RequestClient;
use crate::config::FinkubeConfig;

/// Handle `finkube resources <kind>`
pub async fn handle_resources(
    args: &ResourcesArgs,
    config: FinkubeConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let client = RequestClient::new(&config.api)?;
    let namespace = args
        .namespace
        .as_deref()
        .unwrap_or(&config.api.default_namespace);

    let output = match args.kind {
        ResourceKind::Deployments => {
            let items = client.deployments(namespace).await?;
            if args.json {
                format_resources_json("deployments", &items)
            } else {
                format_deployments_table(&items)
            }
        }
        ResourceKind::Pods => {
            let items = client.pods(namespace).await?;
            if args.json {
                format_resources_json("pods", &items)
            } else {
                format_pods_table(&items)
            }
        }
        ResourceKind::Services => {
            let items = client.services(namespace).await?;
            if args.json {
                format_resources_json("services", &items)
            } else {
                format_services_table(&items)
            }
        }
    };

    Ok(output)
}
