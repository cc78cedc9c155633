//! Connected players and their scores
//!
//! This module handles the server-side bookkeeping of players, including:
//! - Player lifecycle (connect, disconnect)
//! - Nicknames and generated default names
//! - Scores and the timestamp of each player's last accepted action
//! - Leaderboard snapshots sorted by score
//!
//! Players are kept in connection order so that leaderboard ties are stable.

use log::info;
use rand::Rng;
use shared::{PlayerId, PlayerSummary, MAX_NAME_LEN};

/// Represents a connected player and their session state
///
/// Nothing here survives a disconnect: a player who reconnects gets a new id,
/// a new default name and a score of zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Session identifier assigned by the network layer
    pub id: PlayerId,
    /// Display name shown on the leaderboard
    pub name: String,
    /// Number of combos credited to this player
    pub score: u32,
    /// Wall-clock millis of the last accepted action, 0 if none yet
    pub last_action_timestamp: u64,
}

impl Player {
    /// Creates a player with a random default name
    pub fn new(id: PlayerId) -> Self {
        let suffix: u32 = rand::thread_rng().gen_range(0..=1000);
        Self::with_name(id, format!("Player N°{}", suffix))
    }

    pub fn with_name(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            score: 0,
            last_action_timestamp: 0,
        }
    }

    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            id: self.id,
            name: self.name.clone(),
            score: self.score,
        }
    }
}

/// Manages all connected players
///
/// The Roster is owned by the engine's game state; every mutation of a
/// player (rename, cooldown stamp, score) goes through one of its methods.
#[derive(Debug, Default)]
pub struct Roster {
    /// Players in connection order
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
        }
    }

    /// Adds a new player with a generated name
    ///
    /// If the id is already present the existing player is returned untouched.
    pub fn add(&mut self, id: PlayerId) -> &Player {
        self.insert(Player::new(id))
    }

    /// Adds an already built player, keeping an existing entry with the same id
    pub fn insert(&mut self, player: Player) -> &Player {
        let index = match self.position(player.id) {
            Some(index) => index,
            None => {
                info!("Player {} joined as '{}'", player.id, player.name);
                self.players.push(player);
                self.players.len() - 1
            }
        };
        &self.players[index]
    }

    /// Removes a player from the roster
    ///
    /// Returns true if the player was found and removed, false if they were
    /// already gone.
    pub fn remove(&mut self, id: PlayerId) -> bool {
        match self.position(id) {
            Some(index) => {
                let player = self.players.remove(index);
                info!(
                    "Player {} ('{}') left with score {}",
                    player.id, player.name, player.score
                );
                true
            }
            None => false,
        }
    }

    pub fn find_by_id(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    pub(crate) fn find_by_id_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.id == id)
    }

    /// Renames a player
    ///
    /// The name is trimmed and cut to `MAX_NAME_LEN` characters. Returns false
    /// if the player is unknown or the name is blank.
    pub fn rename(&mut self, id: PlayerId, name: &str) -> bool {
        let name: String = name.trim().chars().take(MAX_NAME_LEN).collect();
        if name.is_empty() {
            return false;
        }

        match self.find_by_id_mut(id) {
            Some(player) => {
                info!("Player {} renamed '{}' -> '{}'", id, player.name, name);
                player.name = name;
                true
            }
            None => false,
        }
    }

    /// Credits one point to a player
    ///
    /// Returns false without touching anything if the player has left.
    pub fn award_point(&mut self, id: PlayerId) -> bool {
        match self.find_by_id_mut(id) {
            Some(player) => {
                player.score += 1;
                true
            }
            None => false,
        }
    }

    /// Leaderboard ordered by descending score
    ///
    /// The sort is stable: players with equal scores keep connection order.
    pub fn snapshot_sorted_by_score_descending(&self) -> Vec<PlayerSummary> {
        let mut summaries: Vec<PlayerSummary> = self.players.iter().map(Player::summary).collect();
        summaries.sort_by(|a, b| b.score.cmp(&a.score));
        summaries
    }

    /// Returns the number of connected players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns true if nobody is connected
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    fn position(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|player| player.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Player::new(1);

        assert_eq!(player.id, 1);
        assert_eq!(player.score, 0);
        assert_eq!(player.last_action_timestamp, 0);
        assert!(player.name.starts_with("Player N°"));
    }

    #[test]
    fn test_add_player() {
        let mut roster = Roster::new();
        assert!(roster.is_empty());

        let player = roster.add(7);
        assert_eq!(player.id, 7);
        assert_eq!(roster.len(), 1);
        assert!(!roster.is_empty());
    }

    #[test]
    fn test_add_existing_player_keeps_state() {
        let mut roster = Roster::new();
        roster.insert(Player::with_name(1, "ada".to_string()));
        roster.award_point(1);

        let player = roster.add(1);
        assert_eq!(player.name, "ada");
        assert_eq!(player.score, 1);
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_remove_player() {
        let mut roster = Roster::new();
        roster.add(1);

        assert!(roster.remove(1));
        assert!(roster.is_empty());
        assert!(roster.find_by_id(1).is_none());
    }

    #[test]
    fn test_remove_nonexistent_player() {
        let mut roster = Roster::new();
        assert!(!roster.remove(999));
    }

    #[test]
    fn test_rename() {
        let mut roster = Roster::new();
        roster.add(1);

        assert!(roster.rename(1, "  grace  "));
        assert_eq!(roster.find_by_id(1).unwrap().name, "grace");
    }

    #[test]
    fn test_rename_rejects_blank_and_unknown() {
        let mut roster = Roster::new();
        roster.insert(Player::with_name(1, "ada".to_string()));

        assert!(!roster.rename(1, "   "));
        assert!(!roster.rename(2, "grace"));
        assert_eq!(roster.find_by_id(1).unwrap().name, "ada");
    }

    #[test]
    fn test_rename_truncates_long_names() {
        let mut roster = Roster::new();
        roster.add(1);

        let long_name = "x".repeat(MAX_NAME_LEN * 2);
        assert!(roster.rename(1, &long_name));
        assert_eq!(
            roster.find_by_id(1).unwrap().name.chars().count(),
            MAX_NAME_LEN
        );
    }

    #[test]
    fn test_award_point_missing_player_is_noop() {
        let mut roster = Roster::new();
        roster.add(1);

        assert!(!roster.award_point(2));
        assert!(roster.award_point(1));
        assert_eq!(roster.find_by_id(1).unwrap().score, 1);
    }

    #[test]
    fn test_snapshot_sorted_descending_with_stable_ties() {
        let mut roster = Roster::new();
        for id in 1..=4 {
            roster.insert(Player::with_name(id, format!("p{}", id)));
        }
        roster.award_point(3);
        roster.award_point(3);
        roster.award_point(2);
        roster.award_point(4);

        let snapshot = roster.snapshot_sorted_by_score_descending();
        let ids: Vec<PlayerId> = snapshot.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2, 4, 1]);

        for pair in snapshot.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
