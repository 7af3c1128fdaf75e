//! The turn engine: the facade a presentation layer drives.
//!
//! All rules live here: rolling and movement, landing resolution, the doubles
//! and prison machinery, the one-building-action-per-turn and just-bought
//! guards, bankruptcy surfacing, elimination and win detection.
//!
//! ## Boundary
//!
//! Every public method either mutates the game and answers with a
//! success/denial value, or queries the game and answers with plain values
//! (strings, integers, tuples) - never domain objects. Denials are `false`
//! or `None`, not panics, so a caller can branch on them directly.
//!
//! ## Dispatch
//!
//! Landing behavior dispatches over the closed [`Space`](crate::board::Space)
//! variant in [`TurnEngine::resolve_landing`]; a new space kind is a new
//! variant plus a handler arm.

pub mod observer;

use log::debug;

use crate::board::{sale_proceeds, Space};
use crate::cards::{CardEffect, CardKind, LuckCard};
use crate::core::dice::DicePair;
use crate::core::player::MAX_PRISON_TURNS;
use crate::core::state::GameState;
use crate::save::{self, FormatError, SaveError};

pub use observer::{Notifier, StateObserver};

/// Plain-value description of the space the current player stands on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyInfo {
    pub name: String,
    pub cost: i64,
    /// Rent a visitor would pay right now (company rent uses the last roll).
    pub rent: i64,
    pub houses: u8,
    pub hotel: bool,
    pub owner: Option<String>,
    pub can_buy: bool,
    pub can_build_house: bool,
    pub can_build_hotel: bool,
    pub can_sell: bool,
}

/// The rule engine and its subscriber list.
pub struct TurnEngine {
    state: GameState,
    notifier: Notifier,
}

impl TurnEngine {
    /// Wrap an assembled game state.
    #[must_use]
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            notifier: Notifier::new(),
        }
    }

    /// Read-only access to the full game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Register a re-render subscriber.
    pub fn subscribe(&mut self, observer: Box<dyn StateObserver>) {
        self.notifier.subscribe(observer);
    }

    // === Rolling ===

    /// Roll both dice for the current player and resolve the move.
    ///
    /// Denied (`None`) once the game is over or the turn's roll is spent and
    /// no extra roll is pending.
    pub fn roll_dice(&mut self) -> Option<(u8, u8)> {
        if !self.roll_allowed() {
            return None;
        }
        let pair = self.state.dice.roll(&mut self.state.rng);
        self.perform_roll(pair);
        Some((pair.first, pair.second))
    }

    /// Force a move of `total_steps` (clamped into [2,12]), split into a die
    /// pair. Even totals split into equal halves, which deliberately allows
    /// forcing doubles.
    pub fn roll_dice_manual(&mut self, total_steps: u8) -> Option<(u8, u8)> {
        if !self.roll_allowed() {
            return None;
        }
        let total = total_steps.clamp(2, 12);
        let first = total / 2;
        let second = total - first;
        let pair = self.state.dice.force(first, second);
        self.perform_roll(pair);
        Some((pair.first, pair.second))
    }

    fn roll_allowed(&self) -> bool {
        !self.state.over
            && (!self.state.dice_rolled_this_turn || self.state.extra_roll_pending)
    }

    fn perform_roll(&mut self, pair: DicePair) {
        self.state.extra_roll_pending = false;
        self.state.dice_rolled_this_turn = true;

        let name = self.state.current_player().name.clone();
        debug!("{name} rolled {pair}");
        self.state.push_log(format!("{name} rolled {pair}."));

        if self.state.current_player().in_prison {
            self.prison_roll(pair);
        } else {
            self.free_roll(pair);
        }
        self.notifier.broadcast();
    }

    /// A roll taken outside prison: move, resolve, then apply the doubles
    /// rule. The move happens even on a third double - only afterwards is
    /// the player transferred.
    fn free_roll(&mut self, pair: DicePair) {
        self.move_and_resolve(pair);

        let player = self.state.current_player();
        if player.in_prison {
            // Jailed during resolution; the doubles chain was already reset.
            return;
        }
        if pair.is_double() {
            let player = self.state.current_player_mut();
            player.consecutive_doubles += 1;
            if player.consecutive_doubles >= 3 {
                let name = player.name.clone();
                self.send_to_prison(&name, "rolled a third consecutive double");
            } else {
                let name = player.name.clone();
                self.state.extra_roll_pending = true;
                self.state
                    .push_log(format!("{name} rolled a double and may roll again."));
            }
        } else {
            self.state.current_player_mut().consecutive_doubles = 0;
        }
    }

    /// A roll taken in prison. Release priority: held card, then doubles,
    /// then the forced release after the third failed turn. A released
    /// player moves by the same roll; no release path feeds the doubles
    /// privilege.
    fn prison_roll(&mut self, pair: DicePair) {
        let name = self.state.current_player().name.clone();

        if self.state.current_player().release_cards > 0 {
            self.state.current_player_mut().consume_release_card();
            self.state.current_player_mut().leave_prison();
            self.state
                .push_log(format!("{name} used a release card and left prison."));
            self.move_and_resolve(pair);
            return;
        }

        if pair.is_double() {
            self.state.current_player_mut().leave_prison();
            self.state
                .push_log(format!("{name} rolled a double and left prison."));
            self.move_and_resolve(pair);
            return;
        }

        let player = self.state.current_player_mut();
        player.turns_in_prison += 1;
        if player.turns_in_prison >= MAX_PRISON_TURNS {
            player.leave_prison();
            self.state
                .push_log(format!("{name} served the full sentence and left prison."));
            self.move_and_resolve(pair);
        } else {
            let turns = player.turns_in_prison;
            self.state
                .push_log(format!("{name} stays in prison (turn {turns})."));
        }
    }

    /// Move the current player by the roll sum, paying the passing salary,
    /// then resolve the landed space.
    fn move_and_resolve(&mut self, pair: DicePair) {
        let steps = usize::from(pair.sum());
        let from = self.state.current_player().position;
        let to = self.state.board.advance(from, steps);

        if self.state.board.passes_start(from, steps) {
            self.pay_salary("passed");
        }

        self.state.current_player_mut().position = to;
        let name = self.state.current_player().name.clone();
        let space_name = self.state.board.space(to).name().to_string();
        self.state
            .push_log(format!("{name} moved to {space_name}."));

        self.resolve_landing(to, pair);
    }

    fn pay_salary(&mut self, how: &str) {
        let start = self.state.board.start_index();
        let salary = match self.state.board.space(start) {
            Space::Start { salary, .. } => *salary,
            _ => unreachable!("start index always points at the Start space"),
        };
        let id = self.state.current_player().id;
        let name = self.state.current_player().name.clone();
        self.state.pay_from_bank(id, salary);
        self.state
            .push_log(format!("{name} {how} Start and collected {salary}."));
    }

    /// Landing dispatch over the space variant.
    fn resolve_landing(&mut self, index: usize, pair: DicePair) {
        let space = self.state.board.space(index).clone();
        let id = self.state.current_player().id;
        let name = self.state.current_player().name.clone();

        match space {
            Space::Start { .. } => self.pay_salary("landed on"),
            Space::Place(_) | Space::Company(_) => {
                if let Some(owner_id) = space.owner() {
                    if owner_id != id {
                        let rent = space.rent(Some(pair.sum())).unwrap_or(0);
                        if rent > 0 {
                            let owner_name = self
                                .state
                                .player(owner_id)
                                .map(|p| p.name.clone())
                                .unwrap_or_default();
                            self.state.transfer(id, owner_id, rent);
                            self.state.push_log(format!(
                                "{name} paid {rent} rent to {owner_name} for {}.",
                                space.name()
                            ));
                        }
                    }
                }
            }
            Space::Tax { amount, .. } => {
                self.state.pay_to_bank(id, amount);
                self.state
                    .push_log(format!("{name} paid {amount} tax."));
            }
            Space::Profit { amount, .. } => {
                self.state.pay_from_bank(id, amount);
                self.state
                    .push_log(format!("{name} collected a profit of {amount}."));
            }
            Space::Luck { .. } => {
                let card = self.state.deck.draw();
                self.apply_card(&card);
            }
            Space::Prison { .. } => {
                self.state
                    .push_log(format!("{name} is just visiting the prison."));
            }
            Space::GoToPrison { .. } => {
                self.send_to_prison(&name, "must go to prison");
            }
            Space::FreeParking { .. } => {}
        }
    }

    fn apply_card(&mut self, card: &LuckCard) {
        let id = self.state.current_player().id;
        let name = self.state.current_player().name.clone();
        let tag = match card.kind {
            CardKind::Lucky => "Luck",
            CardKind::Misfortune => "Misfortune",
        };
        self.state
            .push_log(format!("{tag} for {name}: {}", card.story));

        match card.effect {
            CardEffect::Receive(amount) => self.state.pay_from_bank(id, amount),
            CardEffect::Pay(amount) => self.state.pay_to_bank(id, amount),
            CardEffect::ReceiveFromEachOpponent(amount) => {
                for opponent in self.state.opponents_of(id) {
                    self.state.transfer(opponent, id, amount);
                }
            }
            CardEffect::GetOutOfPrison => {
                self.state.current_player_mut().grant_release_card();
            }
            CardEffect::GoToPrison => self.send_to_prison(&name, "drew a prison card"),
        }
    }

    fn send_to_prison(&mut self, name: &str, why: &str) {
        let prison = self.state.board.prison_index();
        self.state.current_player_mut().enter_prison(prison);
        self.state.extra_roll_pending = false;
        self.state.push_log(format!("{name} {why} and was jailed."));
        debug!("{name} jailed: {why}");
    }

    // === Property actions ===

    /// Buy the property the current player stands on. Denied when the space
    /// is not an unowned property, before the turn's roll, or without funds.
    pub fn buy_current_property(&mut self) -> bool {
        if self.state.over || !self.state.dice_rolled_this_turn {
            return false;
        }
        let index = self.state.current_player().position;
        let space = self.state.board.space(index);
        if !space.is_property() || space.owner().is_some() {
            return false;
        }
        let cost = space.cost().unwrap_or(0);
        let player = self.state.current_player();
        if player.balance < cost {
            return false;
        }

        let id = player.id;
        let name = player.name.clone();
        let space_name = space.name().to_string();

        self.state.pay_to_bank(id, cost);
        self.state.bank.take(index);
        self.state.board.space_mut(index).set_owner(id);
        self.state.current_player_mut().acquire(index);
        self.state.property_just_bought = Some(index);
        self.state
            .push_log(format!("{name} bought {space_name} for {cost}."));
        self.notifier.broadcast();
        true
    }

    /// Build one house on the place the current player stands on.
    ///
    /// One building action per turn; a property bought this turn cannot be
    /// built on.
    pub fn build_house(&mut self) -> bool {
        self.build_current(false)
    }

    /// Upgrade four houses into the hotel on the current place.
    pub fn build_hotel(&mut self) -> bool {
        self.build_current(true)
    }

    fn build_current(&mut self, hotel: bool) -> bool {
        if self.state.over || self.state.built_this_turn {
            return false;
        }
        let index = self.state.current_player().position;
        if self.state.property_just_bought == Some(index) {
            return false;
        }
        let id = self.state.current_player().id;
        let balance = self.state.current_player().balance;

        let Some(place) = self.state.board.space(index).as_place() else {
            return false;
        };
        if place.owner != Some(id) {
            return false;
        }
        let (allowed, price) = if hotel {
            (place.can_build_hotel(), place.hotel_price)
        } else {
            (place.can_build_house(), place.house_price)
        };
        if !allowed || balance < price {
            return false;
        }

        let name = self.state.current_player().name.clone();
        let space_name = place.name.clone();

        let place = self
            .state
            .board
            .space_mut(index)
            .as_place_mut()
            .expect("index checked as place above");
        let built = if hotel {
            place.build_hotel()
        } else {
            place.build_house()
        };
        if !built {
            return false;
        }
        self.state.pay_to_bank(id, price);
        self.state.built_this_turn = true;
        let what = if hotel { "a hotel" } else { "a house" };
        self.state
            .push_log(format!("{name} built {what} on {space_name} for {price}."));
        self.notifier.broadcast();
        true
    }

    /// Sell the property the current player stands on back to the bank.
    pub fn sell_current_property(&mut self) -> bool {
        let index = self.state.current_player().position;
        self.sell_property_at(index).is_some()
    }

    /// Sell an owned property by its display name.
    ///
    /// Returns a human-readable outcome message either way.
    pub fn sell_property_by_name(&mut self, name: &str) -> String {
        let Some(index) = self.state.board.index_of(name) else {
            return format!("There is no space named {name}.");
        };
        match self.sell_property_at(index) {
            Some(proceeds) => format!("Sold {name} for {proceeds}."),
            None => format!("{name} cannot be sold right now."),
        }
    }

    /// Shared sale path: 90% of total value, buildings demolished, property
    /// returned to the bank pool. Denied on a property bought this turn.
    fn sell_property_at(&mut self, index: usize) -> Option<i64> {
        if self.state.over || self.state.property_just_bought == Some(index) {
            return None;
        }
        let id = self.state.current_player().id;
        let space = self.state.board.space(index);
        if space.owner() != Some(id) {
            return None;
        }

        let value = space.total_value()?;
        let proceeds = sale_proceeds(value);
        let name = self.state.current_player().name.clone();
        let space_name = space.name().to_string();

        self.state.board.space_mut(index).reset_to_bank();
        self.state.bank.restore(index);
        self.state.current_player_mut().release_property(index);
        self.state.pay_from_bank(id, proceeds);
        self.state
            .push_log(format!("{name} sold {space_name} to the bank for {proceeds}."));
        self.notifier.broadcast();
        Some(proceeds)
    }

    // === Turn lifecycle ===

    /// End the current player's turn. Denied before the turn's roll. A
    /// pending extra roll is forfeited.
    pub fn end_turn(&mut self) -> bool {
        if self.state.over || !self.state.dice_rolled_this_turn {
            return false;
        }
        self.state.current_player_mut().consecutive_doubles = 0;
        self.state.advance_to_next_player();
        let name = self.state.current_player().name.clone();
        self.state.push_log(format!("It is {name}'s turn."));
        self.notifier.broadcast();
        true
    }

    /// Eliminate the current player: liquidate every owned property back to
    /// the bank pool (no proceeds), remove the player from the rotation and
    /// keep the turn index valid. Ends the game when one player remains.
    pub fn eliminate_current_player(&mut self) -> bool {
        if self.state.over {
            return false;
        }
        let name = self.state.current_player().name.clone();
        let owned: Vec<usize> = self.state.current_player().owned.to_vec();
        for index in owned {
            self.state.board.space_mut(index).reset_to_bank();
            self.state.bank.restore(index);
        }

        self.state.players.remove(self.state.current);
        if self.state.current >= self.state.players.len() {
            self.state.current = 0;
        }
        self.state.reset_turn_flags();
        self.state.push_log(format!("{name} left the game."));
        debug!("{name} eliminated, {} players remain", self.state.players.len());

        if self.state.players.len() == 1 {
            let winner = self.state.players[0].name.clone();
            self.state.over = true;
            self.state.winners = vec![winner.clone()];
            self.state.push_log(format!("{winner} wins the game."));
        } else {
            let next = self.state.current_player().name.clone();
            self.state.push_log(format!("It is {next}'s turn."));
        }
        self.notifier.broadcast();
        true
    }

    /// Finish the game by time limit: the richest player(s) win jointly.
    pub fn finish_game_by_score(&mut self) -> bool {
        if self.state.over {
            return false;
        }
        let best = self
            .state
            .players
            .iter()
            .map(|p| p.balance)
            .max()
            .expect("a running game has players");
        let winners: Vec<String> = self
            .state
            .players
            .iter()
            .filter(|p| p.balance == best)
            .map(|p| p.name.clone())
            .collect();

        self.state.over = true;
        self.state.winners = winners.clone();
        self.state
            .push_log(format!("Game over on time: {} won.", winners.join(", ")));
        self.notifier.broadcast();
        true
    }

    // === Persistence ===

    /// Encode the game into the sectioned save text.
    ///
    /// # Errors
    ///
    /// Refused once dice have been rolled this turn - saves happen only at a
    /// turn boundary.
    pub fn save(&self) -> Result<String, SaveError> {
        if self.state.dice_rolled_this_turn {
            return Err(SaveError::MidTurn);
        }
        Ok(save::encode(&self.state))
    }

    /// Decode a saved game produced by [`TurnEngine::save`].
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] naming the offending section or field; no
    /// partial state is applied.
    pub fn restore(text: &str) -> Result<Self, FormatError> {
        save::decode(text).map(Self::new)
    }

    // === Query surface ===

    /// Name of the player whose turn it is.
    #[must_use]
    pub fn current_player_name(&self) -> String {
        self.state.current_player().name.clone()
    }

    /// Color of the player whose turn it is.
    #[must_use]
    pub fn current_player_color(&self) -> String {
        self.state.current_player().color.clone()
    }

    /// Balance of the player whose turn it is.
    #[must_use]
    pub fn current_player_balance(&self) -> i64 {
        self.state.current_player().balance
    }

    /// Board position of the player whose turn it is.
    #[must_use]
    pub fn current_player_position(&self) -> usize {
        self.state.current_player().position
    }

    /// Whether the current player sits in prison.
    #[must_use]
    pub fn current_player_in_prison(&self) -> bool {
        self.state.current_player().in_prison
    }

    /// Whether the current player's balance has gone negative.
    #[must_use]
    pub fn current_player_bankrupt(&self) -> bool {
        self.state.current_player().is_bankrupt()
    }

    /// Every player's (name, position).
    #[must_use]
    pub fn player_positions(&self) -> Vec<(String, usize)> {
        self.state
            .players
            .iter()
            .map(|p| (p.name.clone(), p.position))
            .collect()
    }

    /// Every player's (name, balance).
    #[must_use]
    pub fn player_balances(&self) -> Vec<(String, i64)> {
        self.state
            .players
            .iter()
            .map(|p| (p.name.clone(), p.balance))
            .collect()
    }

    /// Every property's (name, owner name).
    #[must_use]
    pub fn property_owners(&self) -> Vec<(String, Option<String>)> {
        self.state
            .board
            .spaces()
            .filter(|(_, s)| s.is_property())
            .map(|(_, s)| {
                let owner = s
                    .owner()
                    .and_then(|id| self.state.player(id))
                    .map(|p| p.name.clone());
                (s.name().to_string(), owner)
            })
            .collect()
    }

    /// The current player's sellable properties with their sale proceeds.
    /// A property bought this turn is excluded.
    #[must_use]
    pub fn sellable_properties(&self) -> Vec<(String, i64)> {
        let player = self.state.current_player();
        player
            .owned
            .iter()
            .filter(|&&index| self.state.property_just_bought != Some(index))
            .map(|&index| {
                let space = self.state.board.space(index);
                (
                    space.name().to_string(),
                    sale_proceeds(space.total_value().unwrap_or(0)),
                )
            })
            .collect()
    }

    /// Plain-value description of the space the current player stands on,
    /// or `None` when it is not a property.
    #[must_use]
    pub fn current_property_info(&self) -> Option<PropertyInfo> {
        let player = self.state.current_player();
        let index = player.position;
        let space = self.state.board.space(index);
        if !space.is_property() {
            return None;
        }

        let owner_id = space.owner();
        let owner = owner_id
            .and_then(|id| self.state.player(id))
            .map(|p| p.name.clone());
        let (houses, hotel) = space
            .as_place()
            .map_or((0, false), |p| (p.houses, p.hotel));
        let mine = owner_id == Some(player.id);
        let just_bought = self.state.property_just_bought == Some(index);
        let place = space.as_place();

        Some(PropertyInfo {
            name: space.name().to_string(),
            cost: space.cost().unwrap_or(0),
            rent: space.rent(self.state.dice.last_sum()).unwrap_or(0),
            houses,
            hotel,
            owner,
            can_buy: owner_id.is_none()
                && self.state.dice_rolled_this_turn
                && player.balance >= space.cost().unwrap_or(0),
            can_build_house: mine
                && !just_bought
                && !self.state.built_this_turn
                && place.is_some_and(|p| p.can_build_house() && player.balance >= p.house_price),
            can_build_hotel: mine
                && !just_bought
                && !self.state.built_this_turn
                && place.is_some_and(|p| p.can_build_hotel() && player.balance >= p.hotel_price),
            can_sell: mine && !just_bought,
        })
    }

    /// The most recent dice pair.
    #[must_use]
    pub fn last_roll(&self) -> Option<(u8, u8)> {
        self.state.dice.last().map(|pair| (pair.first, pair.second))
    }

    /// Whether the game has ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.over
    }

    /// Winner names; empty while the game runs, more than one on a joint
    /// score finish.
    #[must_use]
    pub fn winner_names(&self) -> Vec<String> {
        self.state.winners.clone()
    }

    /// The cumulative game log.
    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.state.log
    }
}

impl std::fmt::Debug for TurnEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnEngine")
            .field("players", &self.state.player_count())
            .field("current", &self.state.current)
            .field("over", &self.state.over)
            .finish()
    }
}
