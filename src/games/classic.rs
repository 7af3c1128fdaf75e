//! The classic game: canonical board, luck deck and game builder.
//!
//! The board is the fixed 40-space layout every saved game is decoded
//! against: four corners (Start, Prison, Free Parking, Go To Prison), 22
//! buildable places in eight street groups, four railways, two utilities,
//! and the tax/profit/luck spaces between them.

use crate::board::{Board, Company, Place, Space};
use crate::cards::{CardEffect, CardKind, LuckCard, LuckDeck};
use crate::core::bank::Bank;
use crate::core::player::{Player, PlayerId};
use crate::core::rng::GameRng;
use crate::core::state::GameState;
use crate::engine::TurnEngine;

/// Salary collected when landing on or passing Start.
pub const START_SALARY: i64 = 200;

/// Balance each player begins with.
pub const STARTING_BALANCE: i64 = 1500;

/// Money in the bank treasury at game start.
pub const STARTING_TREASURY: i64 = 20_000;

fn place(
    name: &str,
    cost: i64,
    house_price: i64,
    hotel_price: i64,
    hotel_rent: i64,
    house_rents: [i64; 4],
) -> Space {
    Space::Place(Place::new(
        name,
        cost,
        cost / 10,
        house_price,
        hotel_price,
        hotel_rent,
        house_rents,
    ))
}

fn railway(name: &str) -> Space {
    Space::Company(Company::new(name, 200, 5))
}

fn utility(name: &str) -> Space {
    Space::Company(Company::new(name, 150, 4))
}

/// Build the canonical 40-space board.
#[must_use]
pub fn classic_board() -> Board {
    Board::new(vec![
        // Side one
        Space::Start { name: "Start".into(), salary: START_SALARY },
        place("Tanners Row", 60, 50, 150, 250, [10, 30, 90, 160]),
        Space::Luck { name: "Luck I".into() },
        place("Potters Yard", 60, 50, 150, 450, [20, 60, 180, 320]),
        Space::Tax { name: "Income Tax".into(), amount: 200 },
        railway("North Railway"),
        place("Salt Wharf", 100, 50, 150, 550, [30, 90, 270, 400]),
        Space::Profit { name: "Tax Refund".into(), amount: 150 },
        place("Fisher Gate", 100, 50, 150, 550, [30, 90, 270, 400]),
        place("Harbor Row", 120, 50, 150, 600, [40, 100, 300, 450]),
        Space::Prison { name: "Prison".into() },
        // Side two
        place("Mill Street", 140, 100, 300, 750, [50, 150, 450, 625]),
        utility("City Power Plant"),
        place("Weavers Lane", 140, 100, 300, 750, [50, 150, 450, 625]),
        place("Cloth Hall Square", 160, 100, 300, 800, [60, 180, 500, 700]),
        railway("East Railway"),
        place("Old Market Lane", 180, 100, 300, 850, [70, 200, 550, 750]),
        Space::Luck { name: "Luck II".into() },
        place("Butchers Row", 180, 100, 300, 850, [70, 200, 550, 750]),
        place("Grand Bazaar", 200, 100, 300, 900, [80, 220, 600, 800]),
        Space::FreeParking { name: "Free Parking".into() },
        // Side three
        place("Garrison Street", 220, 150, 450, 950, [90, 250, 700, 875]),
        Space::Luck { name: "Luck III".into() },
        place("Cathedral Close", 220, 150, 450, 950, [90, 250, 700, 875]),
        place("University Walk", 240, 150, 450, 1000, [100, 300, 750, 925]),
        railway("South Railway"),
        place("Opera Avenue", 260, 150, 450, 1050, [110, 330, 800, 975]),
        place("Museum Quarter", 260, 150, 450, 1050, [110, 330, 800, 975]),
        utility("City Waterworks"),
        place("Botanic Terrace", 280, 150, 450, 1100, [120, 360, 850, 1025]),
        Space::GoToPrison { name: "Go To Prison".into() },
        // Side four
        place("Embassy Row", 300, 200, 600, 1275, [130, 390, 900, 1100]),
        place("Parliament Hill", 300, 200, 600, 1275, [130, 390, 900, 1100]),
        Space::Profit { name: "Dividend".into(), amount: 100 },
        place("Royal Gardens", 320, 200, 600, 1400, [150, 450, 1000, 1200]),
        railway("West Railway"),
        Space::Luck { name: "Luck IV".into() },
        place("Castle Promenade", 350, 200, 600, 1500, [175, 500, 1100, 1300]),
        Space::Tax { name: "Luxury Tax".into(), amount: 100 },
        place("Golden Square", 400, 200, 600, 2000, [200, 600, 1400, 1700]),
    ])
}

/// The fixed 16-card luck pool, before the one-time shuffle.
#[must_use]
pub fn classic_cards() -> Vec<LuckCard> {
    use CardEffect::{GetOutOfPrison, GoToPrison, Pay, Receive, ReceiveFromEachOpponent};
    use CardKind::{Lucky, Misfortune};

    vec![
        LuckCard::new(Receive(150), "The city pays out your municipal bond.", Lucky),
        LuckCard::new(Receive(100), "The bank pays you a dividend.", Lucky),
        LuckCard::new(Receive(50), "You sell surplus apples at the market.", Lucky),
        LuckCard::new(Receive(200), "The tax office refunds an overpayment.", Lucky),
        LuckCard::new(Receive(25), "You win the tavern card game.", Lucky),
        LuckCard::new(Pay(100), "Storm damage: pay for roof repairs.", Misfortune),
        LuckCard::new(Pay(50), "Pay the doctor's fee.", Misfortune),
        LuckCard::new(Pay(150), "Pay the school fees.", Misfortune),
        LuckCard::new(Pay(75), "Fined for racing your carriage.", Misfortune),
        LuckCard::new(Pay(40), "Your horse throws a shoe; pay the farrier.", Misfortune),
        LuckCard::new(
            ReceiveFromEachOpponent(50),
            "It is your birthday; every player chips in.",
            Lucky,
        ),
        LuckCard::new(
            ReceiveFromEachOpponent(25),
            "You host the harvest feast; each guest pays a share.",
            Lucky,
        ),
        LuckCard::new(GetOutOfPrison, "The governor signs your pardon. Keep this card.", Lucky),
        LuckCard::new(
            GetOutOfPrison,
            "A friend at the courthouse owes you a favour. Keep this card.",
            Lucky,
        ),
        LuckCard::new(GoToPrison, "Caught smuggling salt. Go directly to prison.", Misfortune),
        LuckCard::new(
            GoToPrison,
            "The magistrate finds your papers forged. Go to prison.",
            Misfortune,
        ),
    ]
}

/// Builder for a classic game.
pub struct ClassicGameBuilder {
    players: Vec<(String, String)>,
    seed: Option<u64>,
    starting_balance: i64,
}

impl Default for ClassicGameBuilder {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            seed: None,
            starting_balance: STARTING_BALANCE,
        }
    }
}

impl ClassicGameBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one player seat.
    #[must_use]
    pub fn player(mut self, name: impl Into<String>, color: impl Into<String>) -> Self {
        self.players.push((name.into(), color.into()));
        self
    }

    /// Fix the RNG seed (dice and deck shuffle become reproducible).
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override the starting balance.
    #[must_use]
    pub fn starting_balance(mut self, balance: i64) -> Self {
        self.starting_balance = balance;
        self
    }

    /// Build the engine with a fresh board, bank and shuffled deck.
    ///
    /// Panics on fewer than 2 or more than 6 seats, or on duplicate player
    /// names - the save format cross-references players by name.
    #[must_use]
    pub fn build(self) -> TurnEngine {
        assert!(
            (2..=6).contains(&self.players.len()),
            "Player count must be 2-6"
        );
        for (i, (name, _)) in self.players.iter().enumerate() {
            assert!(
                !self.players[..i].iter().any(|(other, _)| other == name),
                "Duplicate player name: {name}"
            );
        }

        let board = classic_board();
        let bank = Bank::new(STARTING_TREASURY, board.property_indexes());
        let mut rng = self
            .seed
            .map_or_else(GameRng::from_entropy, GameRng::new);
        let deck = LuckDeck::new(classic_cards(), &mut rng);

        let players = self
            .players
            .into_iter()
            .enumerate()
            .map(|(i, (name, color))| {
                Player::new(PlayerId::new(i as u8), name, color, self.starting_balance)
            })
            .collect();

        let mut state = GameState::new(board, bank, players, deck, rng);
        let first = state.current_player().name.clone();
        state.push_log(format!(
            "A new game began with {} players. It is {first}'s turn.",
            state.player_count()
        ));
        TurnEngine::new(state)
    }
}

/// Start a classic game from parallel name and color lists.
///
/// Panics if the lists differ in length; seat count rules are the builder's.
#[must_use]
pub fn start_new_game(names: &[&str], colors: &[&str]) -> TurnEngine {
    assert_eq!(
        names.len(),
        colors.len(),
        "One color per player name required"
    );
    let mut builder = ClassicGameBuilder::new();
    for (name, color) in names.iter().zip(colors) {
        builder = builder.player(*name, *color);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_shape() {
        let board = classic_board();

        assert_eq!(board.len(), 40);
        assert_eq!(board.start_index(), 0);
        assert_eq!(board.prison_index(), 10);
        assert_eq!(board.property_indexes().len(), 28);

        let places = board
            .spaces()
            .filter(|(_, s)| matches!(s, Space::Place(_)))
            .count();
        let companies = board
            .spaces()
            .filter(|(_, s)| matches!(s, Space::Company(_)))
            .count();
        assert_eq!(places, 22);
        assert_eq!(companies, 6);

        assert!(matches!(board.space(30), Space::GoToPrison { .. }));
        assert!(matches!(board.space(20), Space::FreeParking { .. }));
    }

    #[test]
    fn test_card_pool_composition() {
        let cards = classic_cards();
        assert_eq!(cards.len(), 16);

        let release = cards
            .iter()
            .filter(|c| c.effect == CardEffect::GetOutOfPrison)
            .count();
        let jail = cards
            .iter()
            .filter(|c| c.effect == CardEffect::GoToPrison)
            .count();
        assert_eq!(release, 2);
        assert_eq!(jail, 2);
    }

    #[test]
    fn test_builder_creates_seats() {
        let engine = ClassicGameBuilder::new()
            .player("Alice", "Red")
            .player("Bob", "Blue")
            .seed(42)
            .build();

        assert_eq!(engine.state().player_count(), 2);
        assert_eq!(engine.current_player_name(), "Alice");
        assert_eq!(engine.current_player_balance(), STARTING_BALANCE);
        assert_eq!(engine.state().bank.unowned_count(), 28);
    }

    #[test]
    fn test_start_new_game_zips_lists() {
        let engine = start_new_game(&["Alice", "Bob", "Cara"], &["Red", "Blue", "Green"]);
        assert_eq!(engine.state().player_count(), 3);
        assert_eq!(engine.current_player_color(), "Red");
    }

    #[test]
    #[should_panic(expected = "Player count must be 2-6")]
    fn test_single_seat_panics() {
        let _ = ClassicGameBuilder::new().player("Solo", "Red").build();
    }

    #[test]
    #[should_panic(expected = "Duplicate player name")]
    fn test_duplicate_name_panics() {
        let _ = ClassicGameBuilder::new()
            .player("Alice", "Red")
            .player("Alice", "Blue")
            .build();
    }
}
