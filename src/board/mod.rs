//! The board: a fixed, cyclic sequence of spaces.
//!
//! Topology is immutable after construction - only the ownership and building
//! state inside property spaces ever changes. Position arithmetic wraps
//! modulo the board length, and the start/prison positions are resolved once
//! at construction.

pub mod property;
pub mod space;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub use property::{sale_proceeds, Company, Place, DEFAULT_COMPANY_MULTIPLIER};
pub use space::Space;

/// An ordered, cyclic sequence of spaces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    spaces: Vec<Space>,
    start: usize,
    prison: usize,
    name_index: FxHashMap<String, usize>,
}

impl Board {
    /// Build a board from its spaces.
    ///
    /// Panics if the sequence does not contain exactly one Start and exactly
    /// one Prison, or if two spaces share a display name - both are
    /// construction errors in the board definition, not runtime conditions.
    #[must_use]
    pub fn new(spaces: Vec<Space>) -> Self {
        assert!(!spaces.is_empty(), "Board must have at least one space");

        let starts: Vec<usize> = spaces
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, Space::Start { .. }))
            .map(|(i, _)| i)
            .collect();
        assert!(starts.len() == 1, "Board must have exactly one Start space");

        let prisons: Vec<usize> = spaces
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, Space::Prison { .. }))
            .map(|(i, _)| i)
            .collect();
        assert!(prisons.len() == 1, "Board must have exactly one Prison space");

        let mut name_index = FxHashMap::default();
        for (i, space) in spaces.iter().enumerate() {
            let prev = name_index.insert(space.name().to_string(), i);
            assert!(prev.is_none(), "Duplicate space name: {}", space.name());
        }

        Self {
            spaces,
            start: starts[0],
            prison: prisons[0],
            name_index,
        }
    }

    /// Number of spaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    /// A board always has spaces; kept for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    /// The space at `index`.
    #[must_use]
    pub fn space(&self, index: usize) -> &Space {
        &self.spaces[index]
    }

    /// The space at `index`, mutably.
    pub fn space_mut(&mut self, index: usize) -> &mut Space {
        &mut self.spaces[index]
    }

    /// Iterate all spaces with their indexes.
    pub fn spaces(&self) -> impl Iterator<Item = (usize, &Space)> {
        self.spaces.iter().enumerate()
    }

    /// Indexes of all property spaces, in board order.
    #[must_use]
    pub fn property_indexes(&self) -> Vec<usize> {
        self.spaces()
            .filter(|(_, s)| s.is_property())
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of the Start space.
    #[must_use]
    pub fn start_index(&self) -> usize {
        self.start
    }

    /// Index of the Prison space.
    #[must_use]
    pub fn prison_index(&self) -> usize {
        self.prison
    }

    /// Look a space up by display name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    /// The position one hop after `index`.
    #[must_use]
    pub fn next(&self, index: usize) -> usize {
        (index + 1) % self.spaces.len()
    }

    /// The position `steps` hops after `from`.
    #[must_use]
    pub fn advance(&self, from: usize, steps: usize) -> usize {
        (from + steps) % self.spaces.len()
    }

    /// Whether a move of `steps` hops from `from` crosses Start without
    /// landing on it.
    ///
    /// Start must be crossed on a hop strictly before the final one; landing
    /// exactly on Start is a separate event handled by the landing resolver.
    #[must_use]
    pub fn passes_start(&self, from: usize, steps: usize) -> bool {
        let mut pos = from;
        for hop in 1..=steps {
            pos = self.next(pos);
            if pos == self.start && hop < steps {
                return true;
            }
        }
        false
    }
}
