//! # rust-tycoon
//!
//! A turn-based property-trading board game engine (a regional Monopoly
//! variant): players move tokens around a cyclic board, buy, build on and
//! sell property, draw luck cards, and can be jailed under the dice rules.
//!
//! ## Design Principles
//!
//! 1. **Explicit context**: every operation works on one [`GameState`]
//!    holding board, bank, players, dice and deck. No globals.
//!
//! 2. **Closed variants over hierarchies**: space kinds and card effects are
//!    tagged enums dispatched with exhaustive matches, not subclasses.
//!
//! 3. **Thin boundary**: the [`TurnEngine`] facade takes and returns plain
//!    values only, and reports rule denials as `bool`/`Option` rather than
//!    panicking.
//!
//! ## Modules
//!
//! - `core`: RNG, dice, players, bank, game state
//! - `board`: cyclic board, space variants, property economy
//! - `cards`: luck cards and the cyclic draw deck
//! - `engine`: the turn/prison state machine and query surface
//! - `games`: the canonical classic board, deck and game builder
//! - `save`: the sectioned key=value snapshot format
//!
//! ## Example
//!
//! ```
//! use rust_tycoon::games::classic::ClassicGameBuilder;
//!
//! let mut engine = ClassicGameBuilder::new()
//!     .player("Alice", "Red")
//!     .player("Bob", "Blue")
//!     .seed(42)
//!     .build();
//!
//! let (d1, d2) = engine.roll_dice().expect("first roll of the turn");
//! assert!((1..=6).contains(&d1) && (1..=6).contains(&d2));
//! ```

pub mod board;
pub mod cards;
pub mod core;
pub mod engine;
pub mod games;
pub mod save;

// Re-export commonly used types
pub use crate::core::{Bank, Dice, DicePair, GameRng, GameState, Player, PlayerId};

pub use crate::board::{Board, Company, Place, Space};

pub use crate::cards::{CardEffect, CardKind, LuckCard, LuckDeck};

pub use crate::engine::{Notifier, PropertyInfo, StateObserver, TurnEngine};

pub use crate::games::classic::{start_new_game, ClassicGameBuilder};

pub use crate::save::{FormatError, SaveError};
