//! Property economy: places and companies.
//!
//! ## Place
//!
//! A street-style property. Rent depends entirely on construction: the
//! configured rent table for 1-4 houses, the hotel rent once a hotel stands,
//! and **zero** while unbuilt - an unbuilt place charges no rent in this
//! variant. Houses and a hotel are mutually exclusive: building the hotel
//! consumes all four houses.
//!
//! ## Company
//!
//! A utility-style property. Rent is dice-driven: base rent times the
//! configured multiplier times the sum of the roll that landed the visitor.
//!
//! Both types carry their own ownership marker. The engine keeps the marker,
//! the owning player's index list and the bank's unowned pool in sync.
//!
//! Methods that change building state refuse out-of-order calls by returning
//! false rather than panicking, even though the engine guards them first.

use serde::{Deserialize, Serialize};

use crate::core::player::PlayerId;

/// Default company rent multiplier used by the construction helper.
pub const DEFAULT_COMPANY_MULTIPLIER: i64 = 4;

/// Fraction kept when selling to the bank: floor(value * 9 / 10).
const SALE_NUMERATOR: i64 = 9;
const SALE_DENOMINATOR: i64 = 10;

/// A buildable street property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub cost: i64,
    /// Configured base rent. Carried as data and surfaced in queries, but an
    /// unbuilt place charges 0 in this variant.
    pub base_rent: i64,
    pub house_price: i64,
    pub hotel_price: i64,
    /// Rent charged once the hotel stands.
    pub hotel_rent: i64,
    /// Rent with 1..=4 houses; `house_rents[h - 1]` is the rent with h houses.
    pub house_rents: [i64; 4],

    pub owner: Option<PlayerId>,
    /// 0..=4, always 0 while the hotel stands.
    pub houses: u8,
    pub hotel: bool,
}

impl Place {
    /// Create an unowned, unbuilt place.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        cost: i64,
        base_rent: i64,
        house_price: i64,
        hotel_price: i64,
        hotel_rent: i64,
        house_rents: [i64; 4],
    ) -> Self {
        Self {
            name: name.into(),
            cost,
            base_rent,
            house_price,
            hotel_price,
            hotel_rent,
            house_rents,
            owner: None,
            houses: 0,
            hotel: false,
        }
    }

    /// Current rent: the house table with houses, the hotel rent with a
    /// hotel, and 0 while unbuilt.
    #[must_use]
    pub fn rent(&self) -> i64 {
        if self.houses > 0 {
            self.house_rents[usize::from(self.houses) - 1]
        } else if self.hotel {
            self.hotel_rent
        } else {
            0
        }
    }

    /// Whether one more house can be built.
    #[must_use]
    pub fn can_build_house(&self) -> bool {
        self.owner.is_some() && self.houses < 4 && !self.hotel
    }

    /// Add one house. Fails closed when at the limit or a hotel stands.
    pub fn build_house(&mut self) -> bool {
        if !self.can_build_house() {
            return false;
        }
        self.houses += 1;
        true
    }

    /// Whether the hotel can be built (exactly four houses, no hotel yet).
    #[must_use]
    pub fn can_build_hotel(&self) -> bool {
        self.owner.is_some() && self.houses == 4 && !self.hotel
    }

    /// Upgrade four houses into the hotel.
    pub fn build_hotel(&mut self) -> bool {
        if !self.can_build_hotel() {
            return false;
        }
        self.houses = 0;
        self.hotel = true;
        true
    }

    /// Total replacement value: cost plus everything built on it.
    #[must_use]
    pub fn total_value(&self) -> i64 {
        let hotel_value = if self.hotel { self.hotel_price } else { 0 };
        self.cost + i64::from(self.houses) * self.house_price + hotel_value
    }

    /// Clear ownership and demolish buildings (sale or liquidation).
    pub fn reset_to_bank(&mut self) {
        self.owner = None;
        self.houses = 0;
        self.hotel = false;
    }
}

/// A dice-rent company property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub cost: i64,
    pub base_rent: i64,
    pub multiplier: i64,

    pub owner: Option<PlayerId>,
}

impl Company {
    /// Create an unowned company with the default 4x multiplier.
    #[must_use]
    pub fn new(name: impl Into<String>, cost: i64, base_rent: i64) -> Self {
        Self::with_multiplier(name, cost, base_rent, DEFAULT_COMPANY_MULTIPLIER)
    }

    /// Create an unowned company with an explicit multiplier.
    #[must_use]
    pub fn with_multiplier(
        name: impl Into<String>,
        cost: i64,
        base_rent: i64,
        multiplier: i64,
    ) -> Self {
        Self {
            name: name.into(),
            cost,
            base_rent,
            multiplier,
            owner: None,
        }
    }

    /// Rent for a visit landed by a roll summing to `dice_sum`.
    ///
    /// Without a roll context (queries before the first roll) the fixed base
    /// rent is reported instead.
    #[must_use]
    pub fn rent(&self, dice_sum: Option<u8>) -> i64 {
        match dice_sum {
            Some(sum) => self.base_rent * self.multiplier * i64::from(sum),
            None => self.base_rent,
        }
    }

    /// Total value: a company is never built on, so just its cost.
    #[must_use]
    pub fn total_value(&self) -> i64 {
        self.cost
    }

    /// Clear ownership (sale or liquidation).
    pub fn reset_to_bank(&mut self) {
        self.owner = None;
    }
}

/// Sale proceeds for a property worth `total_value`: floor(value * 0.9).
#[must_use]
pub fn sale_proceeds(total_value: i64) -> i64 {
    total_value * SALE_NUMERATOR / SALE_DENOMINATOR
}
