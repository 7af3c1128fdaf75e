//! Save format: round trips at turn boundaries and format error reporting.

use rust_tycoon::core::PlayerId;
use rust_tycoon::engine::TurnEngine;
use rust_tycoon::games::classic::ClassicGameBuilder;
use rust_tycoon::save::{self, FormatError, SaveError};

/// A short scripted game: Alice buys North Railway, Bob pays company rent
/// on it, and the turn is back with Alice (nothing rolled yet).
fn scripted_engine() -> TurnEngine {
    let mut engine = ClassicGameBuilder::new()
        .player("Alice", "Red")
        .player("Bob", "Blue")
        .seed(11)
        .build();

    engine.roll_dice_manual(5).unwrap();
    assert!(engine.buy_current_property());
    assert!(engine.end_turn());

    engine.roll_dice_manual(5).unwrap(); // rent: 5 * 4 * 5 = 100
    assert!(engine.end_turn());

    engine
}

#[test]
fn test_round_trip_reproduces_the_game() {
    let engine = scripted_engine();
    let saved = engine.save().unwrap();

    let restored = TurnEngine::restore(&saved).unwrap();

    assert_eq!(restored.player_balances(), engine.player_balances());
    assert_eq!(restored.player_positions(), engine.player_positions());
    assert_eq!(restored.property_owners(), engine.property_owners());
    assert_eq!(restored.current_player_name(), engine.current_player_name());
    assert_eq!(restored.current_player_color(), "Red");
    assert_eq!(restored.last_roll(), Some((2, 3)));
    assert_eq!(restored.log(), engine.log());
    assert!(!restored.is_over());

    // Balances from the script itself.
    assert_eq!(
        restored.player_balances(),
        vec![("Alice".to_string(), 1400), ("Bob".to_string(), 1400)]
    );
}

#[test]
fn test_reencoding_a_restored_game_is_identical() {
    let saved = scripted_engine().save().unwrap();
    let restored = TurnEngine::restore(&saved).unwrap();
    assert_eq!(restored.save().unwrap(), saved);
}

#[test]
fn test_restored_game_keeps_playing() {
    let saved = scripted_engine().save().unwrap();
    let mut restored = TurnEngine::restore(&saved).unwrap();

    assert!(restored.roll_dice_manual(3).is_some());
    assert!(restored.end_turn());
}

#[test]
fn test_save_refused_mid_turn() {
    let mut engine = scripted_engine();

    engine.roll_dice_manual(3).unwrap();
    assert_eq!(engine.save(), Err(SaveError::MidTurn));

    // The next turn boundary allows saving again.
    assert!(engine.end_turn());
    assert!(engine.save().is_ok());
}

#[test]
fn test_building_state_round_trips() {
    let engine = scripted_engine();
    let mut state = engine.state().clone();

    // Grand Bazaar (19): Alice, three houses. Old Market Lane (16): Bob,
    // a hotel.
    state.board.space_mut(19).set_owner(PlayerId::new(0));
    state.board.space_mut(19).as_place_mut().unwrap().houses = 3;
    state.bank.take(19);
    state.players[0].acquire(19);

    state.board.space_mut(16).set_owner(PlayerId::new(1));
    state.board.space_mut(16).as_place_mut().unwrap().hotel = true;
    state.bank.take(16);
    state.players[1].acquire(16);

    let decoded = save::decode(&save::encode(&state)).unwrap();

    let bazaar = decoded.board.space(19).as_place().unwrap();
    assert_eq!(bazaar.owner, Some(PlayerId::new(0)));
    assert_eq!(bazaar.houses, 3);
    assert!(!bazaar.hotel);

    let market = decoded.board.space(16).as_place().unwrap();
    assert_eq!(market.owner, Some(PlayerId::new(1)));
    assert_eq!(market.houses, 0);
    assert!(market.hotel);

    assert_eq!(decoded.bank.unowned_count(), 25);
    assert_eq!(decoded.players[0].owned.as_slice(), &[5, 19]);
    assert_eq!(decoded.players[1].owned.as_slice(), &[16]);
}

#[test]
fn test_log_lines_are_escaped() {
    let engine = scripted_engine();
    let mut state = engine.state().clone();
    state.push_log("scores: a=b\nsecond\\line");

    let text = save::encode(&state);
    assert!(text.contains("scores: a\\=b\\nsecond\\\\line"));

    let decoded = save::decode(&text).unwrap();
    assert_eq!(decoded.log.last().unwrap(), "scores: a=b\nsecond\\line");
}

// === Format errors ===

#[test]
fn test_unknown_section_fails_the_load() {
    let saved = scripted_engine().save().unwrap();
    let tampered = saved.replace("[LOG]", "[JUNK]");
    assert_eq!(
        TurnEngine::restore(&tampered).unwrap_err(),
        FormatError::UnknownSection("JUNK".to_string())
    );
}

#[test]
fn test_missing_section_fails_the_load() {
    let saved = scripted_engine().save().unwrap();
    let tampered = saved.replace("\n[PLAYERS]\n", "\n");
    assert_eq!(
        TurnEngine::restore(&tampered).unwrap_err(),
        FormatError::MissingSection("PLAYERS")
    );
}

#[test]
fn test_unparsable_field_fails_the_load() {
    let saved = scripted_engine().save().unwrap();
    let tampered = saved.replace("dice_rolled_this_turn=false", "dice_rolled_this_turn=maybe");
    assert!(matches!(
        TurnEngine::restore(&tampered).unwrap_err(),
        FormatError::InvalidValue { section: "GAME_STATE", .. }
    ));
}

#[test]
fn test_missing_player_field_fails_the_load() {
    let saved = scripted_engine().save().unwrap();
    let tampered = saved.replace("\n1.balance=1400", "");
    assert_eq!(
        TurnEngine::restore(&tampered).unwrap_err(),
        FormatError::MissingField {
            section: "PLAYERS",
            record: 1,
            field: "balance",
        }
    );
}

#[test]
fn test_property_name_mismatch_fails_the_load() {
    let saved = scripted_engine().save().unwrap();
    let tampered = saved.replace("0.name=Tanners Row", "0.name=Imaginary Lane");
    assert_eq!(
        TurnEngine::restore(&tampered).unwrap_err(),
        FormatError::BoardMismatch {
            name: "Imaginary Lane".to_string(),
            index: 1,
        }
    );
}

#[test]
fn test_property_index_mismatch_fails_the_load() {
    let saved = scripted_engine().save().unwrap();
    let tampered = saved.replace("\n0.index=1\n", "\n0.index=3\n");
    assert_eq!(
        TurnEngine::restore(&tampered).unwrap_err(),
        FormatError::BoardMismatch {
            name: "Tanners Row".to_string(),
            index: 3,
        }
    );
}

#[test]
fn test_unknown_owner_fails_the_load() {
    let saved = scripted_engine().save().unwrap();
    let tampered = saved.replace("owner=Alice", "owner=Zed");
    assert_eq!(
        TurnEngine::restore(&tampered).unwrap_err(),
        FormatError::UnknownOwner {
            property: "North Railway".to_string(),
            owner: "Zed".to_string(),
        }
    );
}

#[test]
fn test_owned_list_disagreement_fails_the_load() {
    let saved = scripted_engine().save().unwrap();
    let tampered = saved.replace("0.owned=North Railway", "0.owned=");
    assert_eq!(
        TurnEngine::restore(&tampered).unwrap_err(),
        FormatError::OwnershipMismatch("Alice".to_string())
    );
}

#[test]
fn test_half_empty_dice_pair_fails_the_load() {
    let saved = scripted_engine().save().unwrap();
    let tampered = saved.replace("dice_first=2", "dice_first=");
    assert!(matches!(
        TurnEngine::restore(&tampered).unwrap_err(),
        FormatError::InvalidValue { section: "GAME_STATE", .. }
    ));
}

#[test]
fn test_single_player_save_is_rejected() {
    let text = "\
[GAME_STATE]
current_player=0

[PLAYERS]
0.name=Solo
0.color=Red
0.balance=1500
0.position=0
0.in_prison=false
0.turns_in_prison=0
0.consecutive_doubles=0
0.release_cards=0
0.owned=

[PROPERTIES]

[LOG]
";
    assert_eq!(
        TurnEngine::restore(text).unwrap_err(),
        FormatError::TooFewPlayers
    );
}
