use disperse::{api::Server, config::Config, state::World};
use tracing::info;

const DEFAULT_CONFIG: &str = "config/default.toml";

/// Entry point for the distribution service.
///
/// Loads the configuration (first CLI argument, or `config/default.toml`),
/// builds the genesis world and serves JSON-RPC until the process is stopped.
#[tokio::main] // Runs the async main function on the Tokio runtime.
async fn main() -> anyhow::Result<()> {
    // Initialize logging using tracing_subscriber.
    // Log lines go to stdout with the default formatter.
    tracing_subscriber::fmt::init();

    // The config path may be passed as the first argument.
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = Config::load(&path)?;
    info!("Distribution service starting with config: {:?}", config);

    // Build native balances and token ledgers from the genesis sections.
    // A malformed balance string aborts startup here.
    let world = World::from_config(&config)?;
    info!(
        "Genesis loaded: {} native accounts, {} tokens",
        config.genesis.len(),
        world.tokens.len()
    );

    // Create the API server around the world and start serving.
    // The `?` operator propagates any error from binding the listener.
    let server = Server::new(config, world);
    server.start().await?;

    Ok(())
}
