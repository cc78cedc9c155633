//! Authoritative engine and its two timers
//!
//! The engine owns the game state for the life of the process. Connection
//! tasks call into it concurrently: they rate-limit and enqueue actions, but
//! only the tick applies them to the line. The tick swaps the pending queue
//! out in one step, processes it, and broadcasts the resulting batch while
//! still holding the state lock. `connect` sends the full line under the same
//! lock, so a new client always sees the snapshot before any diff that
//! follows it.

use crate::config::GameConfig;
use crate::error::{ActionError, ConfigError};
use crate::game::GameState;
use crate::hub::{ClientHub, ClientSender};
use crate::processor::{ActionPayload, ActionProcessor, PendingAction};
use crate::rate_limiter::RateLimiter;
use log::{debug, info, warn};
use shared::{
    get_timestamp, ClientMessage, Color, PlayerId, PlayerSummary, ServerMessage, Token,
};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

pub struct Engine {
    config: GameConfig,
    state: RwLock<GameState>,
    pending: Mutex<Vec<PendingAction>>,
    hub: Arc<ClientHub>,
    limiter: RateLimiter,
    processor: ActionProcessor,
}

impl Engine {
    pub fn new(config: GameConfig, hub: Arc<ClientHub>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            limiter: RateLimiter::new(config.cooldown_millis),
            processor: ActionProcessor::from_config(&config),
            config,
            state: RwLock::new(GameState::new()),
            pending: Mutex::new(Vec::new()),
            hub,
        })
    }

    pub fn hub(&self) -> &Arc<ClientHub> {
        &self.hub
    }

    /// Registers a new connection and sends it the current line
    pub async fn connect(&self, player_id: PlayerId, sender: ClientSender) {
        let mut state = self.state.write().await;
        state.roster.add(player_id);

        let line = state.line_snapshot();
        if sender.send(ServerMessage::Connected { player_id }).is_err()
            || sender.send(ServerMessage::LevelLoad { line }).is_err()
        {
            warn!("Player {} closed before the level was sent", player_id);
        }
        self.hub.register(player_id, sender).await;
        info!(
            "Player {} connected ({} online)",
            player_id,
            state.roster.len()
        );
    }

    /// Drops a player immediately; their queued actions still run
    pub async fn disconnect(&self, player_id: PlayerId) {
        let removed = self.state.write().await.roster.remove(player_id);
        self.hub.unregister(player_id).await;
        if removed {
            info!("Player {} disconnected", player_id);
        }
    }

    pub async fn handle_message(
        &self,
        player_id: PlayerId,
        message: ClientMessage,
    ) -> Result<(), ActionError> {
        self.handle_message_at(player_id, message, get_timestamp()).await
    }

    /// Handles one inbound message as if it arrived at `now` (wall-clock millis)
    pub async fn handle_message_at(
        &self,
        player_id: PlayerId,
        message: ClientMessage,
        now: u64,
    ) -> Result<(), ActionError> {
        match message {
            ClientMessage::PlayerAction {
                action,
                color,
                token,
            } => {
                let pending =
                    PendingAction::from_request(player_id, action, color, token, &self.config)?;
                let declared = match pending.payload {
                    ActionPayload::Add(color) => Some(color),
                    ActionPayload::Remove(_) => color,
                };
                self.submit(pending, declared, now).await
            }
            ClientMessage::UpdateNickName { name } => {
                let renamed = {
                    let mut state = self.state.write().await;
                    if state.roster.find_by_id(player_id).is_none() {
                        return Err(ActionError::UnknownPlayer(player_id));
                    }
                    state.roster.rename(player_id, &name)
                };
                if !renamed {
                    debug!("Rename of player {} to '{}' refused", player_id, name);
                    return Err(ActionError::InvalidAction(format!(
                        "cannot rename player {}",
                        player_id
                    )));
                }
                self.hub
                    .send_to(player_id, ServerMessage::NicknameUpdated)
                    .await;
                Ok(())
            }
        }
    }

    /// Runs the rate limiter and queues the action for the next tick
    async fn submit(
        &self,
        action: PendingAction,
        declared: Option<Color>,
        now: u64,
    ) -> Result<(), ActionError> {
        let player_id = action.player_id;
        let mut state = self.state.write().await;

        if let Err(error) = self.limiter.check(&mut state.roster, player_id, declared, now) {
            drop(state);
            if let Some(last_action) = error.reported_timestamp() {
                self.hub
                    .send_to(player_id, ServerMessage::ActionIgnored(last_action))
                    .await;
            }
            return Err(error);
        }

        self.pending.lock().await.push(action);
        Ok(())
    }

    /// Processes every queued action and broadcasts the resulting batch
    ///
    /// Returns the number of change events produced.
    pub async fn tick(&self) -> usize {
        let mut state = self.state.write().await;
        state.tick += 1;

        let actions = std::mem::take(&mut *self.pending.lock().await);
        if actions.is_empty() {
            return 0;
        }

        let action_count = actions.len();
        let events = self.processor.process(&mut state, actions);
        let event_count = events.len();
        if event_count > 0 {
            let delivered = self.hub.broadcast(ServerMessage::LevelUpdate(events)).await;
            debug!(
                "Tick {}: {} actions, {} events, sent to {} clients",
                state.tick, action_count, event_count, delivered
            );
        }
        event_count
    }

    /// Broadcasts the leaderboard sorted by descending score
    pub async fn broadcast_players(&self) -> usize {
        let players = self.players_snapshot().await;
        self.hub.broadcast(ServerMessage::Players(players)).await
    }

    pub async fn line_snapshot(&self) -> Vec<Token> {
        self.state.read().await.line_snapshot()
    }

    pub async fn players_snapshot(&self) -> Vec<PlayerSummary> {
        self.state.read().await.leaderboard()
    }

    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Spawns the tick and leaderboard tasks
    pub fn start(self: &Arc<Self>) -> EngineHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let tick_task = tokio::spawn(run_tick_loop(Arc::clone(self), shutdown_rx.clone()));
        let score_task = tokio::spawn(run_score_loop(Arc::clone(self), shutdown_rx));

        info!(
            "Engine started: tick every {}ms, scores every {}ms",
            self.config.tick_interval_millis, self.config.score_broadcast_interval_millis
        );

        EngineHandle {
            shutdown_tx,
            tick_task,
            score_task,
        }
    }
}

/// Owns the engine's periodic tasks; both stop together
pub struct EngineHandle {
    shutdown_tx: watch::Sender<bool>,
    tick_task: JoinHandle<()>,
    score_task: JoinHandle<()>,
}

impl EngineHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.tick_task.await {
            warn!("Tick task ended abnormally: {}", e);
        }
        if let Err(e) = self.score_task.await {
            warn!("Score task ended abnormally: {}", e);
        }
        info!("Engine stopped");
    }
}

async fn run_tick_loop(engine: Arc<Engine>, mut shutdown: watch::Receiver<bool>) {
    let mut interval_timer = interval(engine.config.tick_interval());
    interval_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Skip the first tick since it fires immediately
    interval_timer.tick().await;

    loop {
        tokio::select! {
            _ = interval_timer.tick() => {
                engine.tick().await;
            }
            _ = shutdown.changed() => break,
        }
    }
}

async fn run_score_loop(engine: Arc<Engine>, mut shutdown: watch::Receiver<bool>) {
    let mut interval_timer = interval(engine.config.score_broadcast_interval());
    interval_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval_timer.tick() => {
                engine.broadcast_players().await;
            }
            _ = shutdown.changed() => break,
        }
    }
}
