//! The sectioned key=value save format.
//!
//! A snapshot is UTF-8 text with four ordered sections:
//!
//! ```text
//! [GAME_STATE]   scalar turn flags, current player index, last dice pair
//! [PLAYERS]      indexed records: 0.name=..., 0.balance=..., ...
//! [PROPERTIES]   indexed records: name, board index, owner, houses, hotel
//! [LOG]          indexed history lines, with \, newline and = escaped
//! ```
//!
//! Decoding reconstructs a fresh board from the canonical classic definition
//! and re-applies ownership and building state by name + board-index
//! cross-reference. Any malformed input fails the whole load with a
//! [`FormatError`] naming the offending section or field - no partial state
//! is ever applied.
//!
//! The deck order, RNG state and bank treasury are not part of a snapshot:
//! a restored game starts a freshly shuffled deck and the canonical
//! treasury.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::board::Space;
use crate::cards::LuckDeck;
use crate::core::bank::Bank;
use crate::core::dice::DicePair;
use crate::core::player::{Player, PlayerId};
use crate::core::rng::GameRng;
use crate::core::state::GameState;
use crate::games::classic::{classic_board, classic_cards, STARTING_TREASURY};

const SECTION_GAME_STATE: &str = "GAME_STATE";
const SECTION_PLAYERS: &str = "PLAYERS";
const SECTION_PROPERTIES: &str = "PROPERTIES";
const SECTION_LOG: &str = "LOG";

const KNOWN_SECTIONS: [&str; 4] = [
    SECTION_GAME_STATE,
    SECTION_PLAYERS,
    SECTION_PROPERTIES,
    SECTION_LOG,
];

/// Why a save request was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SaveError {
    /// Dice were already rolled this turn; snapshots are taken only at a
    /// turn boundary.
    #[error("cannot save after dice have been rolled this turn")]
    MidTurn,
}

/// Why a save file could not be loaded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("missing section [{0}]")]
    MissingSection(&'static str),
    #[error("unknown section [{0}]")]
    UnknownSection(String),
    #[error("line {0} is outside any section")]
    DataOutsideSection(usize),
    #[error("line {0} is not a key=value pair")]
    MalformedLine(usize),
    #[error("section [{section}], record {record}: missing field {field}")]
    MissingField {
        section: &'static str,
        record: usize,
        field: &'static str,
    },
    #[error("section [{section}], field {field}: cannot parse {value:?}")]
    InvalidValue {
        section: &'static str,
        field: String,
        value: String,
    },
    #[error("property {name:?} does not match the board at index {index}")]
    BoardMismatch { name: String, index: usize },
    #[error("no record for board property {name:?}")]
    MissingProperty { name: String },
    #[error("property {property:?} is owned by unknown player {owner:?}")]
    UnknownOwner { property: String, owner: String },
    #[error("duplicate player name {0:?}")]
    DuplicatePlayer(String),
    #[error("player {0:?} owned-property list disagrees with the property records")]
    OwnershipMismatch(String),
    #[error("a saved game needs at least two players")]
    TooFewPlayers,
}

// === Encoding ===

/// Encode a game into the sectioned text format.
#[must_use]
pub fn encode(state: &GameState) -> String {
    let mut out = String::new();

    out.push_str(&format!("[{SECTION_GAME_STATE}]\n"));
    out.push_str(&format!("current_player={}\n", state.current));
    out.push_str(&format!(
        "dice_rolled_this_turn={}\n",
        state.dice_rolled_this_turn
    ));
    out.push_str(&format!("has_built_this_turn={}\n", state.built_this_turn));
    out.push_str(&format!(
        "property_just_bought={}\n",
        state
            .property_just_bought
            .map(|i| i.to_string())
            .unwrap_or_default()
    ));
    let (first, second) = state
        .dice
        .last()
        .map_or((String::new(), String::new()), |pair| {
            (pair.first.to_string(), pair.second.to_string())
        });
    out.push_str(&format!("dice_first={first}\n"));
    out.push_str(&format!("dice_second={second}\n"));

    out.push_str(&format!("\n[{SECTION_PLAYERS}]\n"));
    for (i, player) in state.players.iter().enumerate() {
        let owned: Vec<&str> = player
            .owned
            .iter()
            .map(|&index| state.board.space(index).name())
            .collect();
        out.push_str(&format!("{i}.name={}\n", player.name));
        out.push_str(&format!("{i}.color={}\n", player.color));
        out.push_str(&format!("{i}.balance={}\n", player.balance));
        out.push_str(&format!("{i}.position={}\n", player.position));
        out.push_str(&format!("{i}.in_prison={}\n", player.in_prison));
        out.push_str(&format!("{i}.turns_in_prison={}\n", player.turns_in_prison));
        out.push_str(&format!(
            "{i}.consecutive_doubles={}\n",
            player.consecutive_doubles
        ));
        out.push_str(&format!("{i}.release_cards={}\n", player.release_cards));
        out.push_str(&format!("{i}.owned={}\n", owned.join(";")));
    }

    out.push_str(&format!("\n[{SECTION_PROPERTIES}]\n"));
    for (record, index) in state.board.property_indexes().into_iter().enumerate() {
        let space = state.board.space(index);
        let owner = space
            .owner()
            .and_then(|id| state.player(id))
            .map(|p| p.name.as_str())
            .unwrap_or_default();
        let (houses, hotel) = space
            .as_place()
            .map_or((0, 0), |p| (p.houses, u8::from(p.hotel)));
        out.push_str(&format!("{record}.name={}\n", space.name()));
        out.push_str(&format!("{record}.index={index}\n"));
        out.push_str(&format!("{record}.owner={owner}\n"));
        out.push_str(&format!("{record}.houses={houses}\n"));
        out.push_str(&format!("{record}.hotel={hotel}\n"));
    }

    out.push_str(&format!("\n[{SECTION_LOG}]\n"));
    for (i, message) in state.log.iter().enumerate() {
        out.push_str(&format!("{i}={}\n", escape_log(message)));
    }

    out
}

fn escape_log(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    for c in message.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '=' => out.push_str("\\="),
            _ => out.push(c),
        }
    }
    out
}

fn unescape_log(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

// === Decoding ===

/// Decode a snapshot produced by [`encode`].
///
/// # Errors
///
/// Returns the first [`FormatError`] encountered; the caller must treat the
/// whole load as failed.
pub fn decode(text: &str) -> Result<GameState, FormatError> {
    let sections = parse_sections(text)?;

    let game_entries = find_section(&sections, SECTION_GAME_STATE)?;
    let player_entries = find_section(&sections, SECTION_PLAYERS)?;
    let property_entries = find_section(&sections, SECTION_PROPERTIES)?;
    let log_entries = find_section(&sections, SECTION_LOG)?;

    let mut board = classic_board();
    let players = decode_players(player_entries, &board)?;
    if players.len() < 2 {
        return Err(FormatError::TooFewPlayers);
    }
    apply_properties(property_entries, &mut board, &players)?;
    cross_check_ownership(&players, &board)?;

    let unowned: Vec<usize> = board
        .property_indexes()
        .into_iter()
        .filter(|&i| board.space(i).owner().is_none())
        .collect();
    let bank = Bank::new(STARTING_TREASURY, unowned);

    let mut rng = GameRng::from_entropy();
    let deck = LuckDeck::new(classic_cards(), &mut rng);
    let mut state = GameState::new(board, bank, players, deck, rng);

    decode_game_scalars(game_entries, &mut state)?;
    state.log = decode_log(log_entries)?;

    Ok(state)
}

type Section = (String, Vec<(String, String)>);

fn parse_sections(text: &str) -> Result<Vec<Section>, FormatError> {
    let mut sections: Vec<Section> = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            if !KNOWN_SECTIONS.contains(&name) {
                return Err(FormatError::UnknownSection(name.to_string()));
            }
            sections.push((name.to_string(), Vec::new()));
            continue;
        }
        let Some(section) = sections.last_mut() else {
            return Err(FormatError::DataOutsideSection(i + 1));
        };
        let Some((key, value)) = line.split_once('=') else {
            return Err(FormatError::MalformedLine(i + 1));
        };
        section.1.push((key.to_string(), value.to_string()));
    }

    Ok(sections)
}

fn find_section<'a>(
    sections: &'a [Section],
    name: &'static str,
) -> Result<&'a [(String, String)], FormatError> {
    sections
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, entries)| entries.as_slice())
        .ok_or(FormatError::MissingSection(name))
}

fn lookup<'a>(entries: &'a [(String, String)], key: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn parse_value<T: std::str::FromStr>(
    section: &'static str,
    field: &str,
    value: &str,
) -> Result<T, FormatError> {
    value.parse().map_err(|_| FormatError::InvalidValue {
        section,
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(section: &'static str, field: &str, value: &str) -> Result<bool, FormatError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(FormatError::InvalidValue {
            section,
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Split `N.field` keys into per-record field maps.
fn group_records(
    section: &'static str,
    entries: &[(String, String)],
) -> Result<Vec<FxHashMap<String, String>>, FormatError> {
    let mut records: Vec<FxHashMap<String, String>> = Vec::new();

    for (key, value) in entries {
        let invalid = || FormatError::InvalidValue {
            section,
            field: key.clone(),
            value: value.clone(),
        };
        let (index, field) = key.split_once('.').ok_or_else(|| invalid())?;
        let index: usize = index.parse().map_err(|_| invalid())?;
        if index >= records.len() {
            records.resize_with(index + 1, FxHashMap::default);
        }
        records[index].insert(field.to_string(), value.clone());
    }

    Ok(records)
}

fn require<'a>(
    section: &'static str,
    record: usize,
    fields: &'a FxHashMap<String, String>,
    field: &'static str,
) -> Result<&'a str, FormatError> {
    fields
        .get(field)
        .map(String::as_str)
        .ok_or(FormatError::MissingField {
            section,
            record,
            field,
        })
}

fn decode_players(
    entries: &[(String, String)],
    board: &crate::board::Board,
) -> Result<Vec<Player>, FormatError> {
    const S: &str = SECTION_PLAYERS;
    let records = group_records(S, entries)?;
    let mut players = Vec::with_capacity(records.len());

    for (i, fields) in records.iter().enumerate() {
        let name = require(S, i, fields, "name")?;
        if players.iter().any(|p: &Player| p.name == name) {
            return Err(FormatError::DuplicatePlayer(name.to_string()));
        }
        let color = require(S, i, fields, "color")?;
        let balance = parse_value(S, "balance", require(S, i, fields, "balance")?)?;
        let position: usize = parse_value(S, "position", require(S, i, fields, "position")?)?;
        let in_prison = parse_bool(S, "in_prison", require(S, i, fields, "in_prison")?)?;
        let turns_in_prison: u8 =
            parse_value(S, "turns_in_prison", require(S, i, fields, "turns_in_prison")?)?;
        let consecutive_doubles: u8 = parse_value(
            S,
            "consecutive_doubles",
            require(S, i, fields, "consecutive_doubles")?,
        )?;
        let release_cards: u8 =
            parse_value(S, "release_cards", require(S, i, fields, "release_cards")?)?;
        let owned_raw = require(S, i, fields, "owned")?;

        if position >= board.len() {
            return Err(FormatError::InvalidValue {
                section: S,
                field: "position".to_string(),
                value: position.to_string(),
            });
        }
        if turns_in_prison > 3 {
            return Err(FormatError::InvalidValue {
                section: S,
                field: "turns_in_prison".to_string(),
                value: turns_in_prison.to_string(),
            });
        }
        if consecutive_doubles > 2 {
            return Err(FormatError::InvalidValue {
                section: S,
                field: "consecutive_doubles".to_string(),
                value: consecutive_doubles.to_string(),
            });
        }

        let mut player = Player::new(PlayerId::new(i as u8), name, color, balance);
        player.position = position;
        player.in_prison = in_prison;
        player.turns_in_prison = turns_in_prison;
        player.consecutive_doubles = consecutive_doubles;
        player.release_cards = release_cards;

        for owned_name in owned_raw.split(';').filter(|n| !n.is_empty()) {
            let index = board.index_of(owned_name).ok_or_else(|| {
                FormatError::InvalidValue {
                    section: S,
                    field: "owned".to_string(),
                    value: owned_name.to_string(),
                }
            })?;
            if !board.space(index).is_property() {
                return Err(FormatError::InvalidValue {
                    section: S,
                    field: "owned".to_string(),
                    value: owned_name.to_string(),
                });
            }
            player.acquire(index);
        }

        players.push(player);
    }

    Ok(players)
}

fn apply_properties(
    entries: &[(String, String)],
    board: &mut crate::board::Board,
    players: &[Player],
) -> Result<(), FormatError> {
    const S: &str = SECTION_PROPERTIES;
    let records = group_records(S, entries)?;
    let mut seen: Vec<usize> = Vec::new();

    for (i, fields) in records.iter().enumerate() {
        let name = require(S, i, fields, "name")?;
        let index: usize = parse_value(S, "index", require(S, i, fields, "index")?)?;
        let owner = require(S, i, fields, "owner")?;
        let houses: u8 = parse_value(S, "houses", require(S, i, fields, "houses")?)?;
        let hotel: u8 = parse_value(S, "hotel", require(S, i, fields, "hotel")?)?;

        if index >= board.len()
            || board.space(index).name() != name
            || !board.space(index).is_property()
        {
            return Err(FormatError::BoardMismatch {
                name: name.to_string(),
                index,
            });
        }
        if seen.contains(&index) {
            return Err(FormatError::BoardMismatch {
                name: name.to_string(),
                index,
            });
        }
        seen.push(index);

        if hotel > 1 || houses > 4 || (houses > 0 && hotel > 0) {
            return Err(FormatError::InvalidValue {
                section: S,
                field: "houses".to_string(),
                value: format!("{houses}/{hotel}"),
            });
        }

        let owner_id = if owner.is_empty() {
            None
        } else {
            let player = players.iter().find(|p| p.name == owner).ok_or_else(|| {
                FormatError::UnknownOwner {
                    property: name.to_string(),
                    owner: owner.to_string(),
                }
            })?;
            Some(player.id)
        };

        let space = board.space_mut(index);
        match space {
            Space::Place(place) => {
                place.owner = owner_id;
                place.houses = houses;
                place.hotel = hotel == 1;
            }
            Space::Company(company) => {
                if houses > 0 || hotel > 0 {
                    return Err(FormatError::InvalidValue {
                        section: S,
                        field: "houses".to_string(),
                        value: format!("{houses}/{hotel}"),
                    });
                }
                company.owner = owner_id;
            }
            _ => unreachable!("is_property checked above"),
        }
    }

    for index in board.property_indexes() {
        if !seen.contains(&index) {
            return Err(FormatError::MissingProperty {
                name: board.space(index).name().to_string(),
            });
        }
    }

    Ok(())
}

/// Every player's owned list must agree with the authoritative property
/// records, in both directions.
fn cross_check_ownership(players: &[Player], board: &crate::board::Board) -> Result<(), FormatError> {
    for player in players {
        let mut from_board: Vec<usize> = board
            .property_indexes()
            .into_iter()
            .filter(|&i| board.space(i).owner() == Some(player.id))
            .collect();
        let mut from_record: Vec<usize> = player.owned.to_vec();
        from_board.sort_unstable();
        from_record.sort_unstable();
        if from_board != from_record {
            return Err(FormatError::OwnershipMismatch(player.name.clone()));
        }
    }
    Ok(())
}

fn decode_game_scalars(
    entries: &[(String, String)],
    state: &mut GameState,
) -> Result<(), FormatError> {
    const S: &str = SECTION_GAME_STATE;
    let field = |name: &'static str| -> Result<&str, FormatError> {
        lookup(entries, name).ok_or(FormatError::MissingField {
            section: S,
            record: 0,
            field: name,
        })
    };

    let current: usize = parse_value(S, "current_player", field("current_player")?)?;
    if current >= state.player_count() {
        return Err(FormatError::InvalidValue {
            section: S,
            field: "current_player".to_string(),
            value: current.to_string(),
        });
    }
    state.current = current;

    state.dice_rolled_this_turn =
        parse_bool(S, "dice_rolled_this_turn", field("dice_rolled_this_turn")?)?;
    state.built_this_turn = parse_bool(S, "has_built_this_turn", field("has_built_this_turn")?)?;

    let just_bought = field("property_just_bought")?;
    state.property_just_bought = if just_bought.is_empty() {
        None
    } else {
        let index: usize = parse_value(S, "property_just_bought", just_bought)?;
        if index >= state.board.len() || !state.board.space(index).is_property() {
            return Err(FormatError::InvalidValue {
                section: S,
                field: "property_just_bought".to_string(),
                value: just_bought.to_string(),
            });
        }
        Some(index)
    };

    let first = field("dice_first")?;
    let second = field("dice_second")?;
    let pair = match (first.is_empty(), second.is_empty()) {
        (true, true) => None,
        (false, false) => Some(DicePair::new(
            parse_value(S, "dice_first", first)?,
            parse_value(S, "dice_second", second)?,
        )),
        _ => {
            return Err(FormatError::InvalidValue {
                section: S,
                field: "dice_second".to_string(),
                value: second.to_string(),
            })
        }
    };
    state.dice.set_last(pair);

    Ok(())
}

fn decode_log(entries: &[(String, String)]) -> Result<Vec<String>, FormatError> {
    const S: &str = SECTION_LOG;
    let mut indexed = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let index: usize = parse_value(S, key, key)?;
        indexed.push((index, unescape_log(value)));
    }
    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, message)| message).collect())
}
