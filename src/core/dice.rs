//! Two-die roller with last-roll memory.
//!
//! The last rolled pair stays queryable until the next roll: company rent is
//! computed from the sum of the roll that landed the player, and the doubles
//! rule inspects whether both dice matched.
//!
//! A forced-roll path accepts a caller-supplied pair (clamped into [1,6]) for
//! manual play and tests. It bypasses the RNG but updates the last-roll state
//! exactly like a random roll.

use serde::{Deserialize, Serialize};

use super::rng::GameRng;

/// One rolled pair of dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePair {
    pub first: u8,
    pub second: u8,
}

impl DicePair {
    /// Create a pair, clamping each die into [1,6].
    #[must_use]
    pub fn new(first: u8, second: u8) -> Self {
        Self {
            first: first.clamp(1, 6),
            second: second.clamp(1, 6),
        }
    }

    /// Sum of both dice.
    #[must_use]
    pub fn sum(self) -> u8 {
        self.first + self.second
    }

    /// Both dice show the same value.
    #[must_use]
    pub fn is_double(self) -> bool {
        self.first == self.second
    }
}

impl std::fmt::Display for DicePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} and {}", self.first, self.second)
    }
}

/// Two-die roller. Remembers the last rolled pair.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Dice {
    last: Option<DicePair>,
}

impl Dice {
    /// Create a roller with no roll history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Roll two independent dice.
    pub fn roll(&mut self, rng: &mut GameRng) -> DicePair {
        let pair = DicePair {
            first: rng.die_face(),
            second: rng.die_face(),
        };
        self.last = Some(pair);
        pair
    }

    /// Force a specific pair, clamped into [1,6] per die.
    ///
    /// Updates the last-roll state identically to [`Dice::roll`].
    pub fn force(&mut self, first: u8, second: u8) -> DicePair {
        let pair = DicePair::new(first, second);
        self.last = Some(pair);
        pair
    }

    /// The most recent pair, if any roll happened yet.
    #[must_use]
    pub fn last(&self) -> Option<DicePair> {
        self.last
    }

    /// Sum of the most recent pair.
    #[must_use]
    pub fn last_sum(&self) -> Option<u8> {
        self.last.map(DicePair::sum)
    }

    /// Restore the last-roll memory (used when loading a snapshot).
    pub fn set_last(&mut self, pair: Option<DicePair>) {
        self.last = pair;
    }
}
