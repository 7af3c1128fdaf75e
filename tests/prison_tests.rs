//! Prison paths: entry via space, card and dice; release via card, double
//! and the forced third-turn release; luck card effects.

use rust_tycoon::board::{Board, Company, Place, Space};
use rust_tycoon::cards::{CardEffect, CardKind, LuckCard, LuckDeck};
use rust_tycoon::core::{Bank, GameRng, GameState, Player, PlayerId};
use rust_tycoon::engine::TurnEngine;

fn small_board() -> Board {
    Board::new(vec![
        Space::Start { name: "Start".into(), salary: 200 },
        Space::FreeParking { name: "Rest Stop".into() },
        Space::Place(Place::new("Alpha", 100, 10, 50, 150, 400, [20, 60, 180, 320])),
        Space::Place(Place::new("Beta", 200, 20, 100, 300, 900, [80, 220, 600, 800])),
        Space::Prison { name: "Prison".into() },
        Space::Company(Company::new("Cable Works", 150, 4)),
        Space::Tax { name: "Toll Gate".into(), amount: 100 },
        Space::Profit { name: "City Grant".into(), amount: 50 },
        Space::Luck { name: "Luck".into() },
        Space::GoToPrison { name: "Go To Prison".into() },
    ])
}

/// Engine over the small board with a single-card deck, so every luck draw
/// deals a known card.
fn engine_with_deck(cards: Vec<LuckCard>, player_count: usize) -> TurnEngine {
    let board = small_board();
    let bank = Bank::new(10_000, board.property_indexes());
    let names = ["Alice", "Bob", "Cara"];
    let colors = ["Red", "Blue", "Green"];
    let players = (0..player_count)
        .map(|i| Player::new(PlayerId::new(i as u8), names[i], colors[i], 1500))
        .collect();
    let mut rng = GameRng::new(13);
    let deck = LuckDeck::new(cards, &mut rng);
    TurnEngine::new(GameState::new(board, bank, players, deck, rng))
}

fn quiet_engine() -> TurnEngine {
    engine_with_deck(
        vec![LuckCard::new(CardEffect::Receive(0), "Nothing happens today.", CardKind::Lucky)],
        2,
    )
}

/// The same engine with Alice already jailed, holding `cards` release cards.
fn jailed_engine(release_cards: u8) -> TurnEngine {
    let engine = quiet_engine();
    let mut state = engine.state().clone();
    let prison = state.board.prison_index();
    state.players[0].enter_prison(prison);
    state.players[0].release_cards = release_cards;
    TurnEngine::new(state)
}

#[test]
fn test_go_to_prison_space_jails_immediately() {
    let mut engine = quiet_engine();

    engine.roll_dice_manual(9).unwrap();
    assert!(engine.current_player_in_prison());
    assert_eq!(engine.current_player_position(), 4);
    // Jailed players get no further roll this turn.
    assert!(engine.roll_dice_manual(3).is_none());
    assert!(engine.end_turn());
}

#[test]
fn test_prison_visit_is_harmless() {
    let mut engine = quiet_engine();

    engine.roll_dice_manual(4).unwrap();
    assert_eq!(engine.current_player_position(), 4);
    assert!(!engine.current_player_in_prison());
    assert_eq!(engine.current_player_balance(), 1500);
}

#[test]
fn test_doubles_release_and_move_without_extra_roll() {
    let mut engine = jailed_engine(0);

    // (4,4): released and moved 8 from the prison, crossing Start.
    engine.roll_dice_manual(8).unwrap();
    assert!(!engine.current_player_in_prison());
    assert_eq!(engine.current_player_position(), 2);
    assert_eq!(engine.current_player_balance(), 1700);
    assert_eq!(engine.state().players[0].turns_in_prison, 0);

    // Leaving prison on a double grants no extra roll.
    assert!(engine.roll_dice_manual(3).is_none());
}

#[test]
fn test_three_failed_rolls_force_release() {
    let mut engine = jailed_engine(0);

    // Turn 1: no double, no movement.
    engine.roll_dice_manual(3).unwrap();
    assert!(engine.current_player_in_prison());
    assert_eq!(engine.current_player_position(), 4);
    assert_eq!(engine.state().players[0].turns_in_prison, 1);
    engine.end_turn();
    engine.roll_dice_manual(3).unwrap();
    engine.end_turn();

    // Turn 2: still stuck.
    engine.roll_dice_manual(3).unwrap();
    assert!(engine.current_player_in_prison());
    assert_eq!(engine.state().players[0].turns_in_prison, 2);
    engine.end_turn();
    engine.roll_dice_manual(3).unwrap();
    engine.end_turn();

    // Turn 3: released regardless of the roll, moving by it.
    engine.roll_dice_manual(3).unwrap();
    assert!(!engine.current_player_in_prison());
    assert_eq!(engine.current_player_position(), 7);
    assert_eq!(engine.current_player_balance(), 1550); // City Grant
    assert_eq!(engine.state().players[0].turns_in_prison, 0);
}

#[test]
fn test_release_card_is_used_automatically() {
    let mut engine = jailed_engine(2);

    // A plain roll: the held card frees her before the dice matter.
    engine.roll_dice_manual(3).unwrap();
    assert!(!engine.current_player_in_prison());
    assert_eq!(engine.state().players[0].release_cards, 1);
    assert_eq!(engine.current_player_position(), 7);
}

#[test]
fn test_release_card_has_priority_over_doubles() {
    let mut engine = jailed_engine(1);

    engine.roll_dice_manual(8).unwrap();
    assert!(!engine.current_player_in_prison());
    // The card was consumed even though the double alone would have freed her.
    assert_eq!(engine.state().players[0].release_cards, 0);
}

#[test]
fn test_go_to_prison_card_jails_with_no_extra_roll() {
    let mut engine = engine_with_deck(
        vec![LuckCard::new(
            CardEffect::GoToPrison,
            "Caught smuggling salt. Go directly to prison.",
            CardKind::Misfortune,
        )],
        2,
    );

    // (4,4) onto the Luck space: the card jails, and although the roll was a
    // double, no extra roll survives a jailing.
    engine.roll_dice_manual(8).unwrap();
    assert!(engine.current_player_in_prison());
    assert_eq!(engine.current_player_position(), 4);
    assert!(engine.roll_dice_manual(3).is_none());
}

#[test]
fn test_get_out_of_prison_card_is_held_not_consumed() {
    let mut engine = engine_with_deck(
        vec![LuckCard::new(
            CardEffect::GetOutOfPrison,
            "The governor signs your pardon. Keep this card.",
            CardKind::Lucky,
        )],
        2,
    );

    engine.roll_dice_manual(8).unwrap();
    assert_eq!(engine.state().players[0].release_cards, 1);
    assert!(!engine.current_player_in_prison());
}

#[test]
fn test_receive_from_each_opponent_card() {
    let mut engine = engine_with_deck(
        vec![LuckCard::new(
            CardEffect::ReceiveFromEachOpponent(50),
            "It is your birthday; every player chips in.",
            CardKind::Lucky,
        )],
        3,
    );

    engine.roll_dice_manual(8).unwrap();
    assert_eq!(
        engine.player_balances(),
        vec![
            ("Alice".to_string(), 1600),
            ("Bob".to_string(), 1450),
            ("Cara".to_string(), 1450),
        ]
    );
}

#[test]
fn test_pay_card_debits_drawer() {
    let mut engine = engine_with_deck(
        vec![LuckCard::new(CardEffect::Pay(75), "Fined for racing your carriage.", CardKind::Misfortune)],
        2,
    );

    engine.roll_dice_manual(8).unwrap();
    assert_eq!(engine.current_player_balance(), 1425);
}

#[test]
fn test_receive_card_credits_drawer() {
    let mut engine = engine_with_deck(
        vec![LuckCard::new(CardEffect::Receive(150), "The city pays out your bond.", CardKind::Lucky)],
        2,
    );

    engine.roll_dice_manual(8).unwrap();
    assert_eq!(engine.current_player_balance(), 1650);
}
