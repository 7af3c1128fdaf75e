//! Luck cards and the cyclic draw deck.
//!
//! The deck is a fixed multiset of cards shuffled exactly once at game start.
//! Drawing returns the card under a cursor and advances the cursor modulo the
//! deck size: cards are never removed, and once the cursor wraps the same
//! shuffled order repeats. An explicit [`LuckDeck::reset`] reshuffles.
//!
//! Card effects are applied by the turn engine; the deck itself only deals.

use serde::{Deserialize, Serialize};

use crate::core::rng::GameRng;

/// What a drawn card does to the drawer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEffect {
    /// Credit the drawer.
    Receive(i64),
    /// Debit the drawer.
    Pay(i64),
    /// Debit every other active player, crediting the drawer once each.
    ReceiveFromEachOpponent(i64),
    /// Handed to the drawer as a held card, not consumed on draw.
    GetOutOfPrison,
    /// Immediately jails the drawer.
    GoToPrison,
}

/// Flavour classification shown with the story text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    Lucky,
    Misfortune,
}

/// One luck card: an effect plus its story text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckCard {
    pub effect: CardEffect,
    pub story: String,
    pub kind: CardKind,
}

impl LuckCard {
    /// Create a card.
    #[must_use]
    pub fn new(effect: CardEffect, story: impl Into<String>, kind: CardKind) -> Self {
        Self {
            effect,
            story: story.into(),
            kind,
        }
    }
}

/// The shuffled cyclic deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckDeck {
    cards: Vec<LuckCard>,
    cursor: usize,
}

impl LuckDeck {
    /// Shuffle the card pool once and start the cursor at the top.
    ///
    /// Panics on an empty pool - a deck with nothing to deal is a game
    /// definition error.
    #[must_use]
    pub fn new(mut cards: Vec<LuckCard>, rng: &mut GameRng) -> Self {
        assert!(!cards.is_empty(), "Luck deck must contain at least one card");
        rng.shuffle(&mut cards);
        Self { cards, cursor: 0 }
    }

    /// Number of cards in the deck.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// The deck is never empty after construction; kept for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Deal the card under the cursor and advance it, wrapping at the end.
    pub fn draw(&mut self) -> LuckCard {
        let card = self.cards[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.cards.len();
        card
    }

    /// Reshuffle the deck and rewind the cursor.
    pub fn reset(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
        self.cursor = 0;
    }
}
