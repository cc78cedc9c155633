use clap::Parser;
use client::network::BotClient;
use log::info;
use shared::Color;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "ws://127.0.0.1:8080")]
    server: String,

    /// Nickname to register after connecting
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Milliseconds between two actions
    #[arg(short = 'i', long, default_value = "5000")]
    interval_ms: u64,

    /// Number of actions to send before leaving
    #[arg(short = 'a', long, default_value = "20")]
    actions: usize,

    /// Colors the bot places
    #[arg(long, value_delimiter = ',', default_value = "red,blue")]
    colors: Vec<Color>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting bot client...");
    info!("Connecting to: {}", args.server);

    let bot = BotClient::connect(&args.server).await?;
    let mut bot = bot.with_colors(args.colors);
    bot.run(
        args.name,
        Duration::from_millis(args.interval_ms),
        args.actions,
    )
    .await?;
    bot.close().await?;

    Ok(())
}
