use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use shared::{
    ChangeAction, ChangeEvent, ClientMessage, Color, PlayerId, PlayerSummary, ServerMessage,
    Token,
};

/// Client-side mirror of the server's line and leaderboard
///
/// Built from one `level_load` and kept current by applying every
/// `level_update` batch in order. The server never sends anything else that
/// touches the line.
#[derive(Debug, Clone, Default)]
pub struct ClientGameState {
    pub player_id: Option<PlayerId>,
    pub line: Vec<Token>,
    pub players: Vec<PlayerSummary>,
    /// Timestamp from the last `action_ignored`, if any
    pub last_ignored: Option<u64>,
    pub nickname_confirmed: bool,
    pub loaded: bool,
    pub updates_applied: usize,
}

impl ClientGameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_server_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Connected { player_id } => {
                debug!("Assigned player id {}", player_id);
                self.player_id = Some(player_id);
            }
            ServerMessage::LevelLoad { line } => {
                self.line = line;
                self.loaded = true;
            }
            ServerMessage::LevelUpdate(events) => {
                if !self.loaded {
                    warn!("Update received before level load");
                }
                for event in events {
                    self.apply_event(event);
                }
                self.updates_applied += 1;
            }
            ServerMessage::ActionIgnored(last_action) => {
                debug!("Action ignored, last accepted at {}", last_action);
                self.last_ignored = Some(last_action);
            }
            ServerMessage::Players(players) => {
                self.players = players;
            }
            ServerMessage::NicknameUpdated => {
                self.nickname_confirmed = true;
            }
        }
    }

    fn apply_event(&mut self, event: ChangeEvent) {
        let token = event.token;
        match event.action {
            ChangeAction::AddToken => self.line.push(token),
            ChangeAction::RemoveToken => self.line.retain(|t| t.id != token.id),
            ChangeAction::UpdateToken => {
                if let Some(existing) = self.line.iter_mut().find(|t| t.id == token.id) {
                    *existing = token;
                } else {
                    warn!("Update for unknown token {}", token.id);
                }
            }
        }
    }

    pub fn own_score(&self) -> Option<u32> {
        let id = self.player_id?;
        self.players.iter().find(|p| p.id == id).map(|p| p.score)
    }

    /// Picks a random action: mostly adds, sometimes a removal of a live token
    pub fn random_action<R: Rng>(&self, rng: &mut R, colors: &[Color]) -> Option<ClientMessage> {
        if !self.line.is_empty() && rng.gen_bool(0.3) {
            let token = self.line.choose(rng)?;
            return Some(ClientMessage::remove(token.id));
        }
        colors.choose(rng).map(|color| ClientMessage::add(*color))
    }
}
