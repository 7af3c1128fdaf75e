//! The complete game state.
//!
//! `GameState` is the explicit game-context object threaded through every
//! engine operation: board, bank, player rotation, dice, luck deck, the
//! per-turn flags and the cumulative game log. Nothing in the engine reaches
//! for shared globals - whoever holds the state holds the game.
//!
//! The state offers bookkeeping (money movement, rotation, logging); the turn
//! engine layers the actual rules on top.

use crate::board::Board;
use crate::cards::LuckDeck;
use crate::core::bank::Bank;
use crate::core::dice::Dice;
use crate::core::player::{Player, PlayerId};
use crate::core::rng::GameRng;

/// Everything one running game consists of.
#[derive(Clone, Debug)]
pub struct GameState {
    pub board: Board,
    pub bank: Bank,
    /// Live rotation, in turn order. Eliminated players are removed.
    pub players: Vec<Player>,
    /// Index into `players` of the player whose turn it is.
    pub current: usize,
    pub dice: Dice,
    pub deck: LuckDeck,
    pub rng: GameRng,

    // Per-turn flags, reset on turn advance.
    pub dice_rolled_this_turn: bool,
    pub built_this_turn: bool,
    /// Board index of the property bought this turn, if any. Such a property
    /// cannot be built on or sold until the next turn.
    pub property_just_bought: Option<usize>,
    /// A double granted one more roll that has not been taken yet.
    pub extra_roll_pending: bool,

    // Lifecycle.
    pub over: bool,
    /// Winner names once the game ends (joint winners on a score finish).
    pub winners: Vec<String>,

    /// Cumulative, persisted game log.
    pub log: Vec<String>,
}

impl GameState {
    /// Assemble a fresh game from its parts.
    ///
    /// Panics on fewer than 2 players - the rotation would be meaningless.
    #[must_use]
    pub fn new(
        board: Board,
        bank: Bank,
        players: Vec<Player>,
        deck: LuckDeck,
        rng: GameRng,
    ) -> Self {
        assert!(players.len() >= 2, "A game needs at least 2 players");

        Self {
            board,
            bank,
            players,
            current: 0,
            dice: Dice::new(),
            deck,
            rng,
            dice_rolled_this_turn: false,
            built_this_turn: false,
            property_just_bought: None,
            extra_roll_pending: false,
            over: false,
            winners: Vec::new(),
            log: Vec::new(),
        }
    }

    /// Number of players still in the rotation.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    /// The player whose turn it is, mutably.
    pub fn current_player_mut(&mut self) -> &mut Player {
        &mut self.players[self.current]
    }

    /// Find a live player by id.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Find a live player by id, mutably.
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Find a live player by name.
    #[must_use]
    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Ids of everyone except `id`, in rotation order.
    #[must_use]
    pub fn opponents_of(&self, id: PlayerId) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.id != id)
            .map(|p| p.id)
            .collect()
    }

    // === Money movement ===

    /// Move `amount` from a player to the bank treasury.
    pub fn pay_to_bank(&mut self, id: PlayerId, amount: i64) {
        if let Some(player) = self.player_mut(id) {
            player.balance -= amount;
            self.bank.credit(amount);
        }
    }

    /// Move `amount` from the bank treasury to a player.
    pub fn pay_from_bank(&mut self, id: PlayerId, amount: i64) {
        if let Some(player) = self.player_mut(id) {
            player.balance += amount;
            self.bank.debit(amount);
        }
    }

    /// Move `amount` between two players.
    pub fn transfer(&mut self, from: PlayerId, to: PlayerId, amount: i64) {
        if self.player(from).is_none() || self.player(to).is_none() {
            return;
        }
        if let Some(payer) = self.player_mut(from) {
            payer.balance -= amount;
        }
        if let Some(payee) = self.player_mut(to) {
            payee.balance += amount;
        }
    }

    // === Turn rotation ===

    /// Clear all per-turn flags.
    pub fn reset_turn_flags(&mut self) {
        self.dice_rolled_this_turn = false;
        self.built_this_turn = false;
        self.property_just_bought = None;
        self.extra_roll_pending = false;
    }

    /// Hand the turn to the next player in rotation.
    pub fn advance_to_next_player(&mut self) {
        self.current = (self.current + 1) % self.players.len();
        self.reset_turn_flags();
    }

    // === Log ===

    /// Append one message to the persisted game log.
    pub fn push_log(&mut self, message: impl Into<String>) {
        self.log.push(message.into());
    }
}
