//! Core building blocks: RNG, dice, players, bank and the game state.

pub mod bank;
pub mod dice;
pub mod player;
pub mod rng;
pub mod state;

pub use bank::Bank;
pub use dice::{Dice, DicePair};
pub use player::{Player, PlayerId, MAX_PRISON_TURNS};
pub use rng::GameRng;
pub use state::GameState;
