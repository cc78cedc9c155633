//! WebSocket transport
//!
//! One task per connection. The reader half parses JSON text frames into
//! `ClientMessage`s and hands them to the engine; the writer half drains the
//! connection's hub channel and serializes `ServerMessage`s back to text
//! frames. Malformed frames are logged and skipped, they never close the
//! connection.

use crate::engine::Engine;
use crate::error::NetworkError;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::{ClientMessage, PlayerId, ServerMessage};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

pub struct NetworkServer {
    listener: TcpListener,
}

impl NetworkServer {
    pub async fn bind(addr: &str) -> Result<Self, NetworkError> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, NetworkError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until the listener fails
    pub async fn run(self, engine: Arc<Engine>) -> Result<(), NetworkError> {
        loop {
            let (stream, addr) = self.listener.accept().await?;
            let engine = Arc::clone(&engine);
            let player_id = engine.hub().next_player_id();

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, addr, player_id, engine).await {
                    warn!("Connection {} (player {}) failed: {}", addr, player_id, e);
                }
            });
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    player_id: PlayerId,
    engine: Arc<Engine>,
) -> Result<(), NetworkError> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    debug!("WebSocket handshake with {} done", addr);

    let (mut sink, mut source) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    engine.connect(player_id, tx).await;

    let writer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let json = match message.to_json() {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize message for player {}: {}", player_id, e);
                    continue;
                }
            };
            if let Err(e) = sink.send(Message::Text(json)).await {
                debug!("Write to player {} failed: {}", player_id, e);
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(frame) = source.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(message) => {
                    if let Err(e) = engine.handle_message(player_id, message).await {
                        debug!("Message from player {} not applied: {}", player_id, e);
                    }
                }
                Err(e) => warn!("Malformed message from player {}: {}", player_id, e),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                engine.disconnect(player_id).await;
                let _ = writer.await;
                return Err(e.into());
            }
        }
    }

    engine.disconnect(player_id).await;
    let _ = writer.await;
    Ok(())
}
