//! Run detection over the line
//!
//! Both scans look at the line *after* the triggering mutation. An add only
//! ever extends the run at the tail; a remove can only join two runs at the
//! seam it opened, so neither scan needs to walk the whole line.
//!
//! Neutral is matched like any other color. A removal that closes the gap
//! between two neutral runs fires again.

use crate::line::LineStore;
use clap::ValueEnum;
use shared::{PlayerId, Token};
use std::ops::Range;

/// Who is credited when a removal joins two runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RemoveAwardPolicy {
    /// The player whose removal closed the gap
    #[default]
    #[value(name = "acting")]
    ActingPlayer,
    /// The owner of the first token of the matched run
    #[value(name = "owner")]
    RunOwner,
}

/// A matched run: half-open index range into the line and the player credited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combo {
    pub range: Range<usize>,
    pub awardee: PlayerId,
}

impl Combo {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ComboDetector {
    min_combo: usize,
    remove_award: RemoveAwardPolicy,
}

impl ComboDetector {
    pub fn new(min_combo: usize, remove_award: RemoveAwardPolicy) -> Self {
        Self {
            min_combo,
            remove_award,
        }
    }

    /// Scan after a token was appended
    ///
    /// Measures the run ending at the tail. The point goes to the owner of the
    /// tail token, the player who just placed it.
    pub fn after_add(&self, line: &LineStore) -> Option<Combo> {
        let tokens = line.tokens();
        if tokens.len() <= 1 {
            return None;
        }

        let last = &tokens[tokens.len() - 1];
        let run = tokens
            .iter()
            .rev()
            .take_while(|token| token.color == last.color)
            .count();

        if run < self.min_combo {
            return None;
        }

        Some(Combo {
            range: tokens.len() - run..tokens.len(),
            awardee: last.owner,
        })
    }

    /// Scan after the token at `index` was removed
    ///
    /// `index` now holds the removed token's successor. Only fires when the
    /// tokens on both sides of the seam share a color.
    pub fn after_remove(
        &self,
        line: &LineStore,
        index: usize,
        acting_player: PlayerId,
    ) -> Option<Combo> {
        let tokens = line.tokens();
        if tokens.len() <= 1 || index == 0 || index >= tokens.len() {
            return None;
        }

        let color = tokens[index].color;
        if tokens[index - 1].color != color {
            return None;
        }

        let mut min = index - 1;
        while min > 0 && tokens[min - 1].color == color {
            min -= 1;
        }

        let mut max = index;
        while max + 1 < tokens.len() && tokens[max + 1].color == color {
            max += 1;
        }

        if max - min + 1 < self.min_combo {
            return None;
        }

        Some(Combo {
            range: min..max + 1,
            awardee: self.remove_awardee(&tokens[min], acting_player),
        })
    }

    fn remove_awardee(&self, first: &Token, acting_player: PlayerId) -> PlayerId {
        match self.remove_award {
            RemoveAwardPolicy::ActingPlayer => acting_player,
            RemoveAwardPolicy::RunOwner => first.owner,
        }
    }
}
