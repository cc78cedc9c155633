use crate::line::LineStore;
use crate::roster::Roster;
use shared::{PlayerSummary, Token};

/// Everything the engine mutates during a tick
#[derive(Debug, Default)]
pub struct GameState {
    pub line: LineStore,
    pub roster: Roster,
    pub tick: u64,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            line: LineStore::new(),
            roster: Roster::new(),
            tick: 0,
        }
    }

    pub fn line_snapshot(&self) -> Vec<Token> {
        self.line.tokens().to_vec()
    }

    pub fn leaderboard(&self) -> Vec<PlayerSummary> {
        self.roster.snapshot_sorted_by_score_descending()
    }
}
