use crate::game::ClientGameState;
use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{ClientMessage, Color, ServerMessage};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{interval, timeout, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type ClientResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Headless client that plays random moves against a server
pub struct BotClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pub game_state: ClientGameState,
    colors: Vec<Color>,
}

impl BotClient {
    pub async fn connect(url: &str) -> ClientResult<Self> {
        info!("Connecting to {}...", url);
        let (stream, _) = connect_async(url).await?;

        Ok(BotClient {
            stream,
            game_state: ClientGameState::new(),
            colors: vec![Color::Red, Color::Blue],
        })
    }

    pub fn with_colors(mut self, colors: Vec<Color>) -> Self {
        self.colors = colors;
        self
    }

    pub async fn send(&mut self, message: &ClientMessage) -> ClientResult<()> {
        self.stream.send(Message::Text(message.to_json()?)).await?;
        Ok(())
    }

    /// Reads one frame and applies it; returns false once the server is gone
    async fn receive(&mut self) -> ClientResult<bool> {
        match self.stream.next().await {
            Some(Ok(Message::Text(text))) => {
                match serde_json::from_str::<ServerMessage>(&text) {
                    Ok(message) => self.game_state.apply_server_message(message),
                    Err(e) => warn!("Unreadable server message: {}", e),
                }
                Ok(true)
            }
            Some(Ok(Message::Close(_))) | None => Ok(false),
            Some(Ok(_)) => Ok(true),
            Some(Err(e)) => Err(e.into()),
        }
    }

    /// Processes incoming messages until `done` holds or `limit` runs out
    pub async fn wait_for<F>(&mut self, limit: Duration, mut done: F) -> ClientResult<bool>
    where
        F: FnMut(&ClientGameState) -> bool,
    {
        let deadline = Instant::now() + limit;
        while !done(&self.game_state) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match timeout(remaining, self.receive()).await {
                Ok(result) => {
                    if !result? {
                        return Ok(false);
                    }
                }
                Err(_) => return Ok(false),
            }
        }
        Ok(true)
    }

    /// Sends `actions` random actions, one every `pace`, while applying updates
    pub async fn run(
        &mut self,
        name: Option<String>,
        pace: Duration,
        actions: usize,
    ) -> ClientResult<()> {
        self.wait_for(Duration::from_secs(5), |state| state.loaded)
            .await?;

        if let Some(name) = name {
            self.send(&ClientMessage::UpdateNickName { name }).await?;
        }

        let mut action_interval = interval(pace);
        let mut sent = 0;
        let mut rng = StdRng::from_entropy();

        while sent < actions {
            tokio::select! {
                result = self.stream.next() => {
                    match result {
                        Some(Ok(Message::Text(text))) => {
                            if let Ok(message) = serde_json::from_str::<ServerMessage>(&text) {
                                self.game_state.apply_server_message(message);
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            warn!("Server closed the connection");
                            return Ok(());
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(e.into()),
                    }
                },

                _ = action_interval.tick() => {
                    if let Some(action) = self.game_state.random_action(&mut rng, &self.colors) {
                        debug!("Sending {:?}", action);
                        self.send(&action).await?;
                        sent += 1;
                    }
                },
            }
        }

        info!(
            "Done after {} actions, line has {} tokens, score {:?}",
            sent,
            self.game_state.line.len(),
            self.game_state.own_score()
        );
        Ok(())
    }

    pub async fn close(mut self) -> ClientResult<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}
