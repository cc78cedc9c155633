use clap::Parser;
use log::{error, info};
use server::combo::RemoveAwardPolicy;
use server::config::GameConfig;
use server::engine::Engine;
use server::hub::ClientHub;
use server::network::NetworkServer;
use shared::{
    Color, DEFAULT_COOLDOWN_MILLIS, DEFAULT_MIN_COMBO, DEFAULT_SCORE_BROADCAST_INTERVAL_MILLIS,
    DEFAULT_TICK_INTERVAL_MILLIS,
};
use std::sync::Arc;

// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Server IP address to bind to
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    host: String,
    /// Server port to listen on
    #[clap(short, long, default_value = "8080")]
    port: u16,
    /// Shortest run of one color that gets neutralized
    #[clap(long, default_value_t = DEFAULT_MIN_COMBO)]
    min_combo: usize,
    /// Milliseconds a player must wait between two actions
    #[clap(long, default_value_t = DEFAULT_COOLDOWN_MILLIS)]
    cooldown_ms: u64,
    /// Milliseconds between two action-processing ticks
    #[clap(long, default_value_t = DEFAULT_TICK_INTERVAL_MILLIS)]
    tick_ms: u64,
    /// Milliseconds between two leaderboard broadcasts
    #[clap(long, default_value_t = DEFAULT_SCORE_BROADCAST_INTERVAL_MILLIS)]
    scores_ms: u64,
    /// Colors players may place
    #[clap(long, value_delimiter = ',', default_value = "red,blue")]
    colors: Vec<Color>,
    /// Who scores when a removal joins two runs
    #[clap(long, value_enum, default_value_t = RemoveAwardPolicy::ActingPlayer)]
    remove_award: RemoveAwardPolicy,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            min_combo: self.min_combo,
            cooldown_millis: self.cooldown_ms,
            tick_interval_millis: self.tick_ms,
            score_broadcast_interval_millis: self.scores_ms,
            colors: self.colors.clone(),
            remove_award_policy: self.remove_award,
        }
    }
}

/// Main-method of the application.
/// Parses command-line arguments, starts the engine timers and the WebSocket listener.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let config = args.game_config();
    info!("Starting with {:?}", config);

    // The hub is the only route to the clients; the engine gets it explicitly
    let hub = Arc::new(ClientHub::new());
    let engine = Arc::new(Engine::new(config, hub)?);
    let timers = engine.start();

    let address = format!("{}:{}", args.host, args.port);
    let server = NetworkServer::bind(&address).await?;

    // Handle shutdown gracefully
    tokio::select! {
        result = server.run(Arc::clone(&engine)) => {
            if let Err(e) = result {
                error!("Network server stopped: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    timers.shutdown().await;
    Ok(())
}
