//! # Line Match Game Server Library
//!
//! This library provides the authoritative server for the multiplayer
//! line-matching game. Players append colored tokens to one shared line or
//! remove tokens from it; runs of the same color that reach the combo length
//! are neutralized and earn a point. The server owns the only real copy of the
//! line and tells every client exactly what changed.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative State
//! The line and the roster of players live in the engine. Clients never touch
//! them directly: they send requests, and the engine decides what happens.
//!
//! ### Serialized Mutation
//! Requests from many connections are rate limited and queued as they arrive.
//! Only the fixed-rate tick applies them, one after another, so two actions are
//! never applied at the same time.
//!
//! ### State Broadcasting
//! A new client receives the whole line once (`level_load`). After that it only
//! gets diffs (`level_update`), at most one batch per tick. A slower timer
//! broadcasts the leaderboard (`players`).
//!
//! ## Module Organization
//!
//! ### Line Module (`line`)
//! Ordered token storage with append, remove, update and lookup by id.
//!
//! ### Roster Module (`roster`)
//! Connected players, nicknames, scores and action timestamps.
//!
//! ### Rate Limiter Module (`rate_limiter`)
//! Cooldown and neutral-target checks run before an action is queued.
//!
//! ### Combo Module (`combo`)
//! Run detection after an add (tail run) or a remove (seam run).
//!
//! ### Processor Module (`processor`)
//! Applies one tick worth of queued actions and collects change events.
//!
//! ### Engine Module (`engine`)
//! Owns the game state, the pending queue and the two periodic tasks.
//!
//! ### Hub and Network Modules (`hub`, `network`)
//! Per-connection outbound channels and the WebSocket transport.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::GameConfig;
//! use server::engine::Engine;
//! use server::hub::ClientHub;
//! use server::network::NetworkServer;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hub = Arc::new(ClientHub::new());
//!     let engine = Arc::new(Engine::new(GameConfig::default(), hub)?);
//!
//!     // Tick every 100ms, leaderboard every second
//!     let timers = engine.start();
//!
//!     let server = NetworkServer::bind("127.0.0.1:8080").await?;
//!     server.run(Arc::clone(&engine)).await?;
//!
//!     timers.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod combo;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod hub;
pub mod line;
pub mod network;
pub mod processor;
pub mod rate_limiter;
pub mod roster;
