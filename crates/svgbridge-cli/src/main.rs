use std::sync::Arc;

use clap::{Parser, Subcommand};

use svgbridge_core::config::Config;
use svgbridge_core::{CanvasDocument, SharedCanvas};

#[derive(Parser)]
#[command(
    name = "svgbridge",
    about = "Shared SVG canvas bridge — one document, edited by a browser and an AI agent at once",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bridge server
    Serve {
        /// Port to listen on (default: 8765)
        #[arg(long)]
        port: Option<u16>,
    },

    /// List the tools exposed to the agent
    Tools,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config first so it can set the default log filter
    let config_path = cli
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)?;

    let filter = if cli.verbose {
        "debug".to_string()
    } else {
        config
            .logging
            .as_ref()
            .and_then(|l| l.level.clone())
            .unwrap_or_else(|| "info".to_string())
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or_else(|| config.http_port());
            let (width, height) = config.canvas_size();

            let canvas = SharedCanvas::new(CanvasDocument::new(width, height));
            let mut tools = svgbridge_tools::ToolRegistry::new();
            svgbridge_tools::register_builtin_tools(&mut tools);

            let state = Arc::new(svgbridge_gateway::GatewayState::new(
                canvas,
                Arc::new(tools),
            ));

            tracing::info!("Starting svgbridge on port {port} (canvas {width}x{height})");
            svgbridge_gateway::start_gateway(state, &config.bind_addr(), port).await?;
        }
        Commands::Tools => {
            let mut tools = svgbridge_tools::ToolRegistry::new();
            svgbridge_tools::register_builtin_tools(&mut tools);
            for def in tools.to_llm_tools() {
                println!(
                    "{:<22} {}",
                    def["name"].as_str().unwrap_or(""),
                    def["description"].as_str().unwrap_or("")
                );
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let json = serde_json::to_string_pretty(&config)?;
                println!("{json}");
            }
        },
    }

    Ok(())
}
