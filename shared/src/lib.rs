use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Session identifier handed out by the server for each connection.
pub type PlayerId = u32;
/// Process-wide token identifier, never reused.
pub type TokenId = u64;

pub const DEFAULT_MIN_COMBO: usize = 4;
pub const DEFAULT_COOLDOWN_MILLIS: u64 = 5000;
pub const DEFAULT_TICK_INTERVAL_MILLIS: u64 = 100;
pub const DEFAULT_SCORE_BROADCAST_INTERVAL_MILLIS: u64 = 1000;
pub const MAX_NAME_LEN: usize = 32;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Neutral,
}

impl Color {
    /// Colors a player may place. Neutral only ever comes out of a combo.
    pub fn is_placeable(self) -> bool {
        !matches!(self, Color::Neutral)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Color::Red),
            "blue" => Ok(Color::Blue),
            "neutral" | "grey" | "gray" => Ok(Color::Neutral),
            other => Err(format!("unknown color '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: TokenId,
    pub color: Color,
    pub owner: PlayerId,
}

impl Token {
    pub fn new(id: TokenId, color: Color, owner: PlayerId) -> Self {
        Self { id, color, owner }
    }
}

/// Leaderboard row sent in the `players` broadcast.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Add,
    Remove,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    AddToken,
    RemoveToken,
    UpdateToken,
}

/// One entry of a `level_update` batch.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub action: ChangeAction,
    pub token: Token,
}

impl ChangeEvent {
    pub fn added(token: Token) -> Self {
        Self {
            action: ChangeAction::AddToken,
            token,
        }
    }

    pub fn removed(token: Token) -> Self {
        Self {
            action: ChangeAction::RemoveToken,
            token,
        }
    }

    pub fn updated(token: Token) -> Self {
        Self {
            action: ChangeAction::UpdateToken,
            token,
        }
    }
}

// Messages from client to server
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "event", content = "data")]
pub enum ClientMessage {
    PlayerAction {
        action: ActionKind,
        #[serde(rename = "type", default)]
        color: Option<Color>,
        #[serde(default)]
        token: Option<TokenId>,
    },
    UpdateNickName {
        name: String,
    },
}

// Messages from server to client
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    Connected { player_id: PlayerId },
    LevelLoad { line: Vec<Token> },
    LevelUpdate(Vec<ChangeEvent>),
    ActionIgnored(u64),
    Players(Vec<PlayerSummary>),
    NicknameUpdated,
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl ClientMessage {
    pub fn add(color: Color) -> Self {
        ClientMessage::PlayerAction {
            action: ActionKind::Add,
            color: Some(color),
            token: None,
        }
    }

    pub fn remove(token: TokenId) -> Self {
        ClientMessage::PlayerAction {
            action: ActionKind::Remove,
            color: None,
            token: Some(token),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// Get current timestamp in milliseconds
pub fn get_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_color_parsing() {
        assert_eq!("red".parse::<Color>(), Ok(Color::Red));
        assert_eq!(" Blue ".parse::<Color>(), Ok(Color::Blue));
        assert_eq!("grey".parse::<Color>(), Ok(Color::Neutral));
        assert!("green".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_placeable() {
        assert!(Color::Red.is_placeable());
        assert!(Color::Blue.is_placeable());
        assert!(!Color::Neutral.is_placeable());
    }

    #[test]
    fn test_player_action_add_wire_format() {
        let raw = json!({
            "event": "PlayerAction",
            "data": { "action": "add", "type": "red" }
        });
        let message: ClientMessage = serde_json::from_value(raw).unwrap();
        assert_eq!(message, ClientMessage::add(Color::Red));
    }

    #[test]
    fn test_player_action_remove_wire_format() {
        let raw = json!({
            "event": "PlayerAction",
            "data": { "action": "remove", "token": 17 }
        });
        let message: ClientMessage = serde_json::from_value(raw).unwrap();
        assert_eq!(message, ClientMessage::remove(17));
    }

    #[test]
    fn test_update_nickname_wire_format() {
        let raw = r#"{"event":"UpdateNickName","data":{"name":"ada"}}"#;
        let message: ClientMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(
            message,
            ClientMessage::UpdateNickName {
                name: "ada".to_string()
            }
        );
    }

    #[test]
    fn test_level_update_wire_format() {
        let message = ServerMessage::LevelUpdate(vec![
            ChangeEvent::added(Token::new(1, Color::Blue, 7)),
            ChangeEvent::updated(Token::new(1, Color::Neutral, 7)),
        ]);
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({
                "event": "level_update",
                "data": [
                    { "action": "add_token", "token": { "id": 1, "color": "blue", "owner": 7 } },
                    {
                        "action": "update_token",
                        "token": { "id": 1, "color": "neutral", "owner": 7 }
                    }
                ]
            })
        );
    }

    #[test]
    fn test_action_ignored_wire_format() {
        let value = serde_json::to_value(ServerMessage::ActionIgnored(1234)).unwrap();
        assert_eq!(value, json!({ "event": "action_ignored", "data": 1234 }));
    }

    #[test]
    fn test_nickname_updated_has_no_payload() {
        let value = serde_json::to_value(ServerMessage::NicknameUpdated).unwrap();
        assert_eq!(value, json!({ "event": "nickname_updated" }));
    }

    #[test]
    fn test_unknown_event_rejected() {
        let raw = r#"{"event":"Teleport","data":{}}"#;
        assert!(serde_json::from_str::<ClientMessage>(raw).is_err());
    }

    #[test]
    fn test_timestamp_is_monotonic_enough() {
        let first = get_timestamp();
        std::thread::sleep(Duration::from_millis(2));
        assert!(get_timestamp() > first);
    }
}
