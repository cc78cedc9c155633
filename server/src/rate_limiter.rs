//! Per-player action gate
//!
//! Runs before an action is queued. Accepting an action stamps the player's
//! `last_action_timestamp` immediately, so several actions sent within one
//! tick cannot all get through.

use crate::error::ActionError;
use crate::roster::Roster;
use log::debug;
use shared::{Color, PlayerId};

#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    cooldown_millis: u64,
}

impl RateLimiter {
    pub fn new(cooldown_millis: u64) -> Self {
        Self { cooldown_millis }
    }

    /// Decides whether `player_id` may act at `now`
    ///
    /// `declared_color` is the color the client says the action is about; a
    /// neutral target is refused even when the cooldown has elapsed.
    pub fn check(
        &self,
        roster: &mut Roster,
        player_id: PlayerId,
        declared_color: Option<Color>,
        now: u64,
    ) -> Result<(), ActionError> {
        let player = roster
            .find_by_id_mut(player_id)
            .ok_or(ActionError::UnknownPlayer(player_id))?;
        let last_action = player.last_action_timestamp;

        if declared_color == Some(Color::Neutral) {
            debug!("Player {} targeted a neutral token", player_id);
            return Err(ActionError::NeutralTarget { last_action });
        }

        if now.saturating_sub(last_action) < self.cooldown_millis {
            debug!(
                "Player {} still cooling down ({}ms since last action)",
                player_id,
                now.saturating_sub(last_action)
            );
            return Err(ActionError::Cooldown { last_action });
        }

        player.last_action_timestamp = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Player;

    const NOW: u64 = 1_700_000_000_000;

    fn roster_with(id: PlayerId) -> Roster {
        let mut roster = Roster::new();
        roster.insert(Player::with_name(id, "p".to_string()));
        roster
    }

    #[test]
    fn test_first_action_accepted_and_stamped() {
        let limiter = RateLimiter::new(5000);
        let mut roster = roster_with(1);

        assert_eq!(limiter.check(&mut roster, 1, Some(Color::Red), NOW), Ok(()));
        assert_eq!(roster.find_by_id(1).unwrap().last_action_timestamp, NOW);
    }

    #[test]
    fn test_second_action_within_cooldown_reports_first_timestamp() {
        let limiter = RateLimiter::new(5000);
        let mut roster = roster_with(1);

        limiter.check(&mut roster, 1, Some(Color::Red), NOW).unwrap();
        let result = limiter.check(&mut roster, 1, Some(Color::Blue), NOW + 4999);

        assert_eq!(result, Err(ActionError::Cooldown { last_action: NOW }));
        assert_eq!(roster.find_by_id(1).unwrap().last_action_timestamp, NOW);
    }

    #[test]
    fn test_action_after_cooldown_accepted() {
        let limiter = RateLimiter::new(5000);
        let mut roster = roster_with(1);

        limiter.check(&mut roster, 1, None, NOW).unwrap();
        assert_eq!(limiter.check(&mut roster, 1, None, NOW + 5000), Ok(()));
        assert_eq!(
            roster.find_by_id(1).unwrap().last_action_timestamp,
            NOW + 5000
        );
    }

    #[test]
    fn test_neutral_target_rejected_without_cooldown() {
        let limiter = RateLimiter::new(0);
        let mut roster = roster_with(1);

        let result = limiter.check(&mut roster, 1, Some(Color::Neutral), NOW);
        assert_eq!(result, Err(ActionError::NeutralTarget { last_action: 0 }));
        assert_eq!(roster.find_by_id(1).unwrap().last_action_timestamp, 0);
    }

    #[test]
    fn test_unknown_player() {
        let limiter = RateLimiter::new(5000);
        let mut roster = Roster::new();

        assert_eq!(
            limiter.check(&mut roster, 3, Some(Color::Red), NOW),
            Err(ActionError::UnknownPlayer(3))
        );
    }

    #[test]
    fn test_clock_going_backwards_counts_as_cooldown() {
        let limiter = RateLimiter::new(5000);
        let mut roster = roster_with(1);

        limiter.check(&mut roster, 1, None, NOW).unwrap();
        assert!(limiter.check(&mut roster, 1, None, NOW - 10).is_err());
    }
}
