//! CLI module for finkube
//!
//! Thin terminal front-end over the dashboard context.
//!
//! # Commands
//!
//! - `status` - One-shot health probe and snapshot load
//! - `watch` - Follow live updates until interrupted
//! - `chat` - Ask the assistant about the current cost data
//! - `scale` - Scale a deployment
//! - `resources` - List deployments, pods or services
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Snapshot of cluster health and costs
//! finkube status --api-url http://finops.internal:8000/api
//!
//! # Follow live updates
//! finkube watch -l debug
//!
//! # Generate shell completions
//! finkube completions bash > ~/.bash_completion.d/finkube
//! ```

pub mod chat;
pub mod completions;
pub mod config;
pub mod output;
pub mod resources;
pub mod scale;
pub mod status;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::FinkubeConfig;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// finkube - Kubernetes and Azure cost dashboard client
#[derive(Parser, Debug)]
#[command(
    name = "finkube",
    version,
    about = "Live Kubernetes health and Azure cost dashboard client"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "finkube.toml")]
    pub config: PathBuf,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Override the live channel WebSocket URL
    #[arg(long, global = true)]
    pub ws_url: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show cluster health and cost summary
    Status(StatusArgs),
    /// Follow live updates until Ctrl-C
    Watch(WatchArgs),
    /// Ask the assistant a question
    Chat(ChatArgs),
    /// Scale a deployment
    Scale(ScaleArgs),
    /// List cluster resources
    Resources(ResourcesArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Print the full snapshot after every merged update
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Question for the assistant
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Dashboard section sent as context (overview, cluster, costs, chat)
    #[arg(short, long, default_value = "chat")]
    pub section: crate::dashboard::Section,
}

#[derive(Args, Debug)]
pub struct ScaleArgs {
    /// Deployment name
    pub name: String,

    /// Desired replica count
    pub replicas: u32,

    /// Namespace (defaults to api.default_namespace)
    #[arg(short, long)]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Deployments,
    Pods,
    Services,
}

#[derive(Args, Debug)]
pub struct ResourcesArgs {
    /// Resource kind to list
    #[arg(value_enum)]
    pub kind: ResourceKind,

    /// Namespace, or "all" (defaults to api.default_namespace)
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "finkube.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration with env and CLI overrides applied, then validate it.
pub fn load_config_with_overrides(
    args: &GlobalArgs,
) -> Result<FinkubeConfig, Box<dyn std::error::Error>> {
    // A missing default file is fine, a missing explicit one is not
    let mut config = if args.config.exists() {
        FinkubeConfig::load(Some(&args.config))?
    } else if args.config == PathBuf::from("finkube.toml") {
        tracing::debug!("Config file not found, using defaults");
        FinkubeConfig::default()
    } else {
        return Err(crate::config::ConfigError::NotFound(args.config.clone()).into());
    };

    config = config.with_env_overrides();

    if let Some(ref url) = args.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(ref url) = args.ws_url {
        config.channel.url = url.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Wait for SIGINT or SIGTERM
pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn global(config: &str) -> GlobalArgs {
        GlobalArgs {
            config: PathBuf::from(config),
            api_url: None,
            ws_url: None,
            log_level: None,
        }
    }

    #[test]
    fn test_cli_parse_status_defaults() {
        let cli = Cli::try_parse_from(["finkube", "status"]).unwrap();
        assert_eq!(cli.global.config, PathBuf::from("finkube.toml"));
        match cli.command {
            Commands::Status(args) => assert!(!args.json),
            _ => panic!("Expected Status command"),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "finkube",
            "status",
            "--json",
            "--api-url",
            "http://10.0.0.5:8000/api",
            "-l",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.global.api_url.as_deref(), Some("http://10.0.0.5:8000/api"));
        assert_eq!(cli.global.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_parse_chat_joins_words() {
        let cli = Cli::try_parse_from(["finkube", "chat", "why", "so", "expensive?"]).unwrap();
        match cli.command {
            Commands::Chat(args) => {
                assert_eq!(args.query.join(" "), "why so expensive?");
                assert_eq!(args.section, crate::dashboard::Section::Chat);
            }
            _ => panic!("Expected Chat command"),
        }
    }

    #[test]
    fn test_cli_parse_scale() {
        let cli = Cli::try_parse_from(["finkube", "scale", "api", "3", "-n", "prod"]).unwrap();
        match cli.command {
            Commands::Scale(args) => {
                assert_eq!(args.name, "api");
                assert_eq!(args.replicas, 3);
                assert_eq!(args.namespace.as_deref(), Some("prod"));
            }
            _ => panic!("Expected Scale command"),
        }
    }

    #[test]
    fn test_cli_parse_resources_kind() {
        let cli = Cli::try_parse_from(["finkube", "resources", "pods", "-n", "all"]).unwrap();
        match cli.command {
            Commands::Resources(args) => {
                assert_eq!(args.kind, ResourceKind::Pods);
                assert_eq!(args.namespace.as_deref(), Some("all"));
            }
            _ => panic!("Expected Resources command"),
        }
        assert!(Cli::try_parse_from(["finkube", "resources", "nodes"]).is_err());
    }

    #[test]
    fn test_load_config_defaults_without_file() {
        let config = load_config_with_overrides(&global("finkube.toml")).unwrap();
        assert_eq!(config.channel.max_reconnect_attempts, 10);
    }

    #[test]
    fn test_load_config_explicit_missing_file_fails() {
        assert!(load_config_with_overrides(&global("/nonexistent/custom.toml")).is_err());
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            temp.path(),
            "[api]\nbase_url = \"http://file:8000/api\"\n[logging]\nlevel = \"warn\"",
        )
        .unwrap();

        let mut args = global(temp.path().to_str().unwrap());
        args.api_url = Some("http://flag:9000/api".to_string());
        args.log_level = Some("debug".to_string());

        let config = load_config_with_overrides(&args).unwrap();
        assert_eq!(config.api.base_url, "http://flag:9000/api");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut args = global("finkube.toml");
        args.ws_url = Some("http://not-a-socket".to_string());
        assert!(load_config_with_overrides(&args).is_err());
    }
}
