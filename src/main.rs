//! Gentle binary entry point

use color_eyre::Result;
use gentle::{
    api::{self, AppState},
    cli::{Cli, Commands},
    config::{catalog, Config, ModelChoice},
    coordinator::{validate_message, Coordinator},
    router,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Install error handler
    color_eyre::install()?;

    let cli = Cli::parse_args();

    let default_filter = if cli.verbose {
        "gentle=debug,tower_http=debug"
    } else {
        "gentle=info,tower_http=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    }) {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let coordinator = Coordinator::from_settings(&config.providers)?;
            tracing::info!(?coordinator, "gentle starting");
            api::serve(AppState::new(config, coordinator)).await?;
        }
        Commands::Route { message, model } => {
            let message = validate_message(&message)?;
            let decision = router::explain(message, ModelChoice::from_preference(model.as_deref()));
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        Commands::Ask { message, model } => {
            let message = validate_message(&message)?;
            let coordinator = Coordinator::from_settings(&config.providers)?;
            let result = coordinator
                .process_request(message, ModelChoice::from_preference(model.as_deref()))
                .await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Models => {
            for entry in catalog() {
                println!("{:<12} {:<12} {}", entry.id, entry.name, entry.description);
            }
        }
        Commands::Version => {
            println!("gentle version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
