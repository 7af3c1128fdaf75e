//! Concrete game definitions built on the engine.

pub mod classic;

pub use classic::{
    classic_board, classic_cards, start_new_game, ClassicGameBuilder, START_SALARY,
    STARTING_BALANCE, STARTING_TREASURY,
};
