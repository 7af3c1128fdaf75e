//! The closed set of board space kinds.
//!
//! A space is a tagged variant, not a class hierarchy: landing behavior is
//! dispatched with an exhaustive `match` in the turn engine, so adding a space
//! kind means adding a variant here and a handler arm there.
//!
//! Only the two property variants carry mutable state (ownership, buildings);
//! every other variant is immutable once the board is built.

use serde::{Deserialize, Serialize};

use super::property::{Company, Place};
use crate::core::player::PlayerId;

/// One board space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Space {
    /// Pays `salary` when landed on or passed over.
    Start { name: String, salary: i64 },
    /// Buildable street property.
    Place(Place),
    /// Dice-rent company property.
    Company(Company),
    /// Fixed debit on landing.
    Tax { name: String, amount: i64 },
    /// Fixed credit on landing.
    Profit { name: String, amount: i64 },
    /// Triggers a luck card draw.
    Luck { name: String },
    /// The prison. No effect on a mere visit.
    Prison { name: String },
    /// Unconditional transfer to prison.
    GoToPrison { name: String },
    /// Nothing happens here.
    FreeParking { name: String },
}

impl Space {
    /// Display name of the space.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Space::Start { name, .. }
            | Space::Tax { name, .. }
            | Space::Profit { name, .. }
            | Space::Luck { name }
            | Space::Prison { name }
            | Space::GoToPrison { name }
            | Space::FreeParking { name } => name,
            Space::Place(place) => &place.name,
            Space::Company(company) => &company.name,
        }
    }

    /// Whether this space can be owned.
    #[must_use]
    pub fn is_property(&self) -> bool {
        matches!(self, Space::Place(_) | Space::Company(_))
    }

    /// Purchase cost, for property spaces.
    #[must_use]
    pub fn cost(&self) -> Option<i64> {
        match self {
            Space::Place(place) => Some(place.cost),
            Space::Company(company) => Some(company.cost),
            _ => None,
        }
    }

    /// Current owner, if this is a property and somebody owns it.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            Space::Place(place) => place.owner,
            Space::Company(company) => company.owner,
            _ => None,
        }
    }

    /// Mark the owner of a property space. Returns false for non-properties.
    pub fn set_owner(&mut self, owner: PlayerId) -> bool {
        match self {
            Space::Place(place) => {
                place.owner = Some(owner);
                true
            }
            Space::Company(company) => {
                company.owner = Some(owner);
                true
            }
            _ => false,
        }
    }

    /// Current rent for a visit landed by `dice_sum` (companies only use it).
    #[must_use]
    pub fn rent(&self, dice_sum: Option<u8>) -> Option<i64> {
        match self {
            Space::Place(place) => Some(place.rent()),
            Space::Company(company) => Some(company.rent(dice_sum)),
            _ => None,
        }
    }

    /// Total value of a property space (cost plus buildings).
    #[must_use]
    pub fn total_value(&self) -> Option<i64> {
        match self {
            Space::Place(place) => Some(place.total_value()),
            Space::Company(company) => Some(company.total_value()),
            _ => None,
        }
    }

    /// Clear ownership and buildings. Returns false for non-properties.
    pub fn reset_to_bank(&mut self) -> bool {
        match self {
            Space::Place(place) => {
                place.reset_to_bank();
                true
            }
            Space::Company(company) => {
                company.reset_to_bank();
                true
            }
            _ => false,
        }
    }

    /// Downcast to a place.
    #[must_use]
    pub fn as_place(&self) -> Option<&Place> {
        match self {
            Space::Place(place) => Some(place),
            _ => None,
        }
    }

    /// Downcast to a mutable place.
    pub fn as_place_mut(&mut self) -> Option<&mut Place> {
        match self {
            Space::Place(place) => Some(place),
            _ => None,
        }
    }

    /// Downcast to a company.
    #[must_use]
    pub fn as_company(&self) -> Option<&Company> {
        match self {
            Space::Company(company) => Some(company),
            _ => None,
        }
    }

    /// Downcast to a mutable company.
    pub fn as_company_mut(&mut self) -> Option<&mut Company> {
        match self {
            Space::Company(company) => Some(company),
            _ => None,
        }
    }
}
