use crate::combo::RemoveAwardPolicy;
use crate::error::ConfigError;
use shared::{
    Color, DEFAULT_COOLDOWN_MILLIS, DEFAULT_MIN_COMBO, DEFAULT_SCORE_BROADCAST_INTERVAL_MILLIS,
    DEFAULT_TICK_INTERVAL_MILLIS,
};
use std::time::Duration;

/// Tunables of the game engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Shortest run that gets neutralized
    pub min_combo: usize,
    /// Minimum delay between two accepted actions of one player
    pub cooldown_millis: u64,
    pub tick_interval_millis: u64,
    pub score_broadcast_interval_millis: u64,
    /// Colors players are allowed to place
    pub colors: Vec<Color>,
    pub remove_award_policy: RemoveAwardPolicy,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_combo < 2 {
            return Err(ConfigError::MinComboTooSmall(self.min_combo));
        }
        if self.tick_interval_millis == 0 {
            return Err(ConfigError::ZeroInterval("tick"));
        }
        if self.score_broadcast_interval_millis == 0 {
            return Err(ConfigError::ZeroInterval("score broadcast"));
        }
        if self.colors.is_empty() {
            return Err(ConfigError::NoColors);
        }
        if self.colors.iter().any(|color| !color.is_placeable()) {
            return Err(ConfigError::NeutralColor);
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_millis)
    }

    pub fn score_broadcast_interval(&self) -> Duration {
        Duration::from_millis(self.score_broadcast_interval_millis)
    }

    pub fn allows_color(&self, color: Color) -> bool {
        self.colors.contains(&color)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_combo: DEFAULT_MIN_COMBO,
            cooldown_millis: DEFAULT_COOLDOWN_MILLIS,
            tick_interval_millis: DEFAULT_TICK_INTERVAL_MILLIS,
            score_broadcast_interval_millis: DEFAULT_SCORE_BROADCAST_INTERVAL_MILLIS,
            colors: vec![Color::Red, Color::Blue],
            remove_award_policy: RemoveAwardPolicy::ActingPlayer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.min_combo, 4);
        assert_eq!(config.cooldown_millis, 5000);
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.score_broadcast_interval(), Duration::from_secs(1));
        assert!(config.allows_color(Color::Red));
        assert!(config.allows_color(Color::Blue));
        assert!(!config.allows_color(Color::Neutral));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validation_errors() {
        let config = GameConfig {
            min_combo: 1,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::MinComboTooSmall(1)));

        let config = GameConfig {
            tick_interval_millis: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval("tick")));

        let config = GameConfig {
            colors: vec![],
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoColors));

        let config = GameConfig {
            colors: vec![Color::Red, Color::Neutral],
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NeutralColor));
    }
}
