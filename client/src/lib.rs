//! # Line Match Bot Client Library
//!
//! A headless client for the line-matching game server. It connects over
//! WebSocket, keeps a local copy of the line and the leaderboard, and can play
//! random moves. It is used to put load on a running server and, in the
//! integration tests, to check that every client ends up with the same line
//! as the server.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! Client-side mirror of the game:
//! - Full line from `level_load`
//! - Incremental `level_update` batches applied in order
//! - Leaderboard, cooldown and nickname signals
//! - Random action selection
//!
//! ### Network Module (`network`)
//! WebSocket connection to the server:
//! - JSON message encoding and decoding
//! - Paced random play with concurrent update handling
//! - Waiting for a condition on the mirrored state
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::BotClient;
//! use std::time::Duration;
//!
//! # async fn demo() -> client::network::ClientResult<()> {
//! let mut bot = BotClient::connect("ws://127.0.0.1:8080").await?;
//! bot.run(Some("bot".to_string()), Duration::from_secs(5), 10).await?;
//! println!("Line now has {} tokens", bot.game_state.line.len());
//! bot.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod game;
pub mod network;
