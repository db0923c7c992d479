use clap::Parser;
use finkube::cli::{
    chat, handle_completions, handle_config_init, load_config_with_overrides, resources, scale,
    status, watch, Cli, Commands, ConfigCommands,
};
use finkube::logging::init_tracing;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
        command => run(command, &cli.global).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(
    command: Commands,
    global: &finkube::cli::GlobalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(global)?;
    init_tracing(&config.logging)?;

    match command {
        Commands::Status(args) => println!("{}", status::handle_status(&args, config).await?),
        Commands::Watch(args) => watch::handle_watch(&args, config).await?,
        Commands::Chat(args) => println!("{}", chat::handle_chat(&args, config).await?),
        Commands::Scale(args) => println!("{}", scale::handle_scale(&args, config).await?),
        Commands::Resources(args) => {
            println!("{}", resources::handle_resources(&args, config).await?)
        }
        Commands::Config(_) | Commands::Completions(_) => {}
    }

    Ok(())
}
