//! Player identification and per-player game state.
//!
//! ## PlayerId
//!
//! Stable, type-safe player identifier. Identifiers are assigned once at game
//! start and never reused: eliminated players are removed from the rotation,
//! but property ownership recorded under their id stays unambiguous until it
//! is cleared.
//!
//! ## Player
//!
//! One seat at the table: balance, token position, owned property indexes,
//! the prison sub-state and held release cards.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Stable player identifier.
///
/// Ids are 0-based in seating order at game start. Because players are
/// removed on elimination, an id is not an index into the live player list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Maximum number of turns a player can sit in prison before forced release.
pub const MAX_PRISON_TURNS: u8 = 3;

/// One player: money, position, holdings and prison sub-state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: String,

    /// Signed balance; may go negative, which surfaces bankruptcy.
    pub balance: i64,

    /// Current board position (space index).
    pub position: usize,

    /// Board indexes of owned properties, in acquisition order.
    pub owned: SmallVec<[usize; 8]>,

    // Prison sub-state.
    pub in_prison: bool,
    pub turns_in_prison: u8,
    pub consecutive_doubles: u8,

    /// Held get-out-of-prison cards. All copies are identical, so the FIFO
    /// hand reduces to a count.
    pub release_cards: u8,
}

impl Player {
    /// Create a player at the start position with the given balance.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, color: impl Into<String>, balance: i64) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            balance,
            position: 0,
            owned: SmallVec::new(),
            in_prison: false,
            turns_in_prison: 0,
            consecutive_doubles: 0,
            release_cards: 0,
        }
    }

    /// The player's balance has gone negative.
    #[must_use]
    pub fn is_bankrupt(&self) -> bool {
        self.balance < 0
    }

    /// Record acquisition of the property at `index`.
    pub fn acquire(&mut self, index: usize) {
        if !self.owned.contains(&index) {
            self.owned.push(index);
        }
    }

    /// Forget the property at `index`. Returns true if it was held.
    pub fn release_property(&mut self, index: usize) -> bool {
        if let Some(pos) = self.owned.iter().position(|&i| i == index) {
            self.owned.remove(pos);
            true
        } else {
            false
        }
    }

    /// Whether the player owns the property at `index`.
    #[must_use]
    pub fn owns(&self, index: usize) -> bool {
        self.owned.contains(&index)
    }

    /// Put the player in prison at the given space index.
    ///
    /// Resets the prison turn counter and the doubles chain.
    pub fn enter_prison(&mut self, prison_position: usize) {
        self.in_prison = true;
        self.turns_in_prison = 0;
        self.consecutive_doubles = 0;
        self.position = prison_position;
    }

    /// Release the player from prison, resetting both counters.
    pub fn leave_prison(&mut self) {
        self.in_prison = false;
        self.turns_in_prison = 0;
        self.consecutive_doubles = 0;
    }

    /// Hand the player one get-out-of-prison card.
    pub fn grant_release_card(&mut self) {
        self.release_cards += 1;
    }

    /// Consume one held release card. Returns false if none is held.
    pub fn consume_release_card(&mut self) -> bool {
        if self.release_cards == 0 {
            return false;
        }
        self.release_cards -= 1;
        true
    }
}
