//! Per-tick action processing
//!
//! Applies a drained batch of pending actions to the game state in queue
//! order and collects the resulting change events. Each action is applied on
//! its own: a stale token id or a departed awardee only affects that action.

use crate::combo::{Combo, ComboDetector};
use crate::config::GameConfig;
use crate::error::ActionError;
use crate::game::GameState;
use log::debug;
use shared::{ActionKind, ChangeEvent, Color, PlayerId, TokenId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPayload {
    Add(Color),
    Remove(TokenId),
}

/// An accepted action waiting for the next tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub player_id: PlayerId,
    pub payload: ActionPayload,
}

impl PendingAction {
    pub fn add(player_id: PlayerId, color: Color) -> Self {
        Self {
            player_id,
            payload: ActionPayload::Add(color),
        }
    }

    pub fn remove(player_id: PlayerId, token_id: TokenId) -> Self {
        Self {
            player_id,
            payload: ActionPayload::Remove(token_id),
        }
    }

    /// Builds an action from the fields of an inbound `PlayerAction`
    ///
    /// A neutral add is let through here so the rate limiter can refuse it
    /// as a neutral target.
    pub fn from_request(
        player_id: PlayerId,
        action: ActionKind,
        color: Option<Color>,
        token: Option<TokenId>,
        config: &GameConfig,
    ) -> Result<Self, ActionError> {
        match action {
            ActionKind::Add => match color {
                Some(color) if color == Color::Neutral || config.allows_color(color) => {
                    Ok(Self::add(player_id, color))
                }
                Some(color) => Err(ActionError::InvalidAction(format!(
                    "color {} is not placeable",
                    color
                ))),
                None => Err(ActionError::InvalidAction("add without a color".into())),
            },
            ActionKind::Remove => token
                .map(|token_id| Self::remove(player_id, token_id))
                .ok_or_else(|| ActionError::InvalidAction("remove without a token".into())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ActionProcessor {
    detector: ComboDetector,
}

impl ActionProcessor {
    pub fn new(detector: ComboDetector) -> Self {
        Self { detector }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(ComboDetector::new(
            config.min_combo,
            config.remove_award_policy,
        ))
    }

    /// Applies `actions` in order and returns every change they caused
    pub fn process(&self, state: &mut GameState, actions: Vec<PendingAction>) -> Vec<ChangeEvent> {
        let mut events = Vec::new();
        for action in actions {
            self.apply(state, action, &mut events);
        }
        events
    }

    fn apply(&self, state: &mut GameState, action: PendingAction, events: &mut Vec<ChangeEvent>) {
        match action.payload {
            ActionPayload::Add(color) => {
                let token = state.line.append(color, action.player_id);
                debug!("Player {} added token {} ({})", action.player_id, token.id, color);
                events.push(ChangeEvent::added(token));

                if let Some(combo) = self.detector.after_add(&state.line) {
                    self.neutralize(state, combo, events);
                }
            }
            ActionPayload::Remove(token_id) => {
                let Some(removed) = state.line.remove_by_id(token_id) else {
                    debug!(
                        "Player {} removed stale token {}, ignoring",
                        action.player_id, token_id
                    );
                    return;
                };
                debug!(
                    "Player {} removed token {} at index {}",
                    action.player_id, token_id, removed.index
                );
                events.push(ChangeEvent::removed(removed.token));

                let (index, acting) = (removed.index, action.player_id);
                if let Some(combo) = self.detector.after_remove(&state.line, index, acting) {
                    self.neutralize(state, combo, events);
                }
            }
        }
    }

    /// Turns the matched run neutral and credits a single point
    fn neutralize(&self, state: &mut GameState, combo: Combo, events: &mut Vec<ChangeEvent>) {
        let ids: Vec<TokenId> = state.line.tokens()[combo.range.clone()]
            .iter()
            .map(|token| token.id)
            .collect();

        for id in ids {
            if let Some(token) = state.line.update_by_id(id, Color::Neutral, combo.awardee) {
                events.push(ChangeEvent::updated(token));
            }
        }

        let (size, awardee) = (combo.len(), combo.awardee);
        if state.roster.award_point(awardee) {
            debug!("Combo of {} for player {}", size, awardee);
        } else {
            debug!("Combo of {} for departed player {}, no score", size, awardee);
        }
    }
}
