//! Bankruptcy surfacing, elimination, win detection and the score finish.

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

fn engine_with_players(player_count: usize) -> TurnEngine {
    let board = small_board();
    let bank = Bank::new(10_000, board.property_indexes());
    let names = ["Alice", "Bob", "Cara"];
    let colors = ["Red", "Blue", "Green"];
    let players = (0..player_count)
        .map(|i| Player::new(PlayerId::new(i as u8), names[i], colors[i], 1500))
        .collect();
    let mut rng = GameRng::new(21);
    let deck = LuckDeck::new(
        vec![LuckCard::new(CardEffect::Receive(0), "Nothing happens today.", CardKind::Lucky)],
        &mut rng,
    );
    TurnEngine::new(GameState::new(board, bank, players, deck, rng))
}

#[test]
fn test_bankruptcy_is_surfaced_not_enforced() {
    let mut engine = engine_with_players(2);
    {
        // Alice owns a fully built Beta; Bob has almost nothing left and it
        // is his turn.
        let mut state = engine.state().clone();
        state.board.space_mut(3).set_owner(PlayerId::new(0));
        state.board.space_mut(3).as_place_mut().unwrap().houses = 4;
        state.bank.take(3);
        state.players[0].acquire(3);
        state.players[1].balance = 100;
        state.current = 1;
        engine = TurnEngine::new(state);
    }

    // Bob lands on Beta and owes 800 rent he cannot pay.
    engine.roll_dice_manual(3).unwrap();
    assert_eq!(engine.current_player_balance(), -700);
    assert!(engine.current_player_bankrupt());

    // The engine waits for an explicit decision: Bob is still in the game.
    assert_eq!(engine.state().player_count(), 2);
    assert!(!engine.is_over());
}

#[test]
fn test_elimination_liquidates_and_declares_winner() {
    let mut engine = engine_with_players(2);
    {
        // Bob owns Alpha with two houses; it is his turn and he is broke.
        let mut state = engine.state().clone();
        state.board.space_mut(2).set_owner(PlayerId::new(1));
        state.board.space_mut(2).as_place_mut().unwrap().houses = 2;
        state.bank.take(2);
        state.players[1].acquire(2);
        state.players[1].balance = -300;
        state.current = 1;
        engine = TurnEngine::new(state);
    }

    assert!(engine.eliminate_current_player());

    // Alpha went back to the pool with its buildings demolished, unpaid.
    let alpha = engine.state().board.space(2);
    assert_eq!(alpha.owner(), None);
    assert_eq!(alpha.as_place().unwrap().houses, 0);
    assert!(engine.state().bank.is_unowned(2));

    // One player left: the game is over and she is the winner.
    assert!(engine.is_over());
    assert_eq!(engine.winner_names(), vec!["Alice".to_string()]);
    assert_eq!(engine.state().player_count(), 1);
}

#[test]
fn test_elimination_keeps_rotation_valid() {
    let mut engine = engine_with_players(3);
    {
        let mut state = engine.state().clone();
        state.current = 1; // Bob's turn
        engine = TurnEngine::new(state);
    }

    assert!(engine.eliminate_current_player());

    assert!(!engine.is_over());
    assert_eq!(engine.state().player_count(), 2);
    assert_eq!(engine.current_player_name(), "Cara");
    assert!(engine.roll_dice_manual(3).is_some());
}

#[test]
fn test_eliminating_the_last_seat_wraps_the_index() {
    let mut engine = engine_with_players(3);
    {
        let mut state = engine.state().clone();
        state.current = 2; // Cara's turn
        engine = TurnEngine::new(state);
    }

    assert!(engine.eliminate_current_player());
    assert_eq!(engine.current_player_name(), "Alice");
}

#[test]
fn test_finish_by_score_supports_joint_winners() {
    let mut engine = engine_with_players(3);
    {
        let mut state = engine.state().clone();
        state.players[0].balance = 2000;
        state.players[1].balance = 2000;
        state.players[2].balance = 500;
        engine = TurnEngine::new(state);
    }

    assert!(engine.winner_names().is_empty());
    assert!(engine.finish_game_by_score());

    assert!(engine.is_over());
    assert_eq!(
        engine.winner_names(),
        vec!["Alice".to_string(), "Bob".to_string()]
    );
    // Finishing twice is a denial, not a double finish.
    assert!(!engine.finish_game_by_score());
}

#[test]
fn test_finished_game_denies_every_action() {
    let mut engine = engine_with_players(2);
    assert!(engine.finish_game_by_score());

    assert!(engine.roll_dice().is_none());
    assert!(engine.roll_dice_manual(3).is_none());
    assert!(!engine.buy_current_property());
    assert!(!engine.build_house());
    assert!(!engine.build_hotel());
    assert!(!engine.sell_current_property());
    assert!(!engine.end_turn());
    assert!(!engine.eliminate_current_player());
}
