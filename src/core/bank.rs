//! The bank: treasury plus the pool of currently-unowned properties.
//!
//! Every property is in exactly one of two places at any time: a player's
//! owned set or the bank's unowned pool. The engine moves indexes between the
//! two on purchase, sale and elimination.

use serde::{Deserialize, Serialize};

/// Treasury and the unowned-property pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    /// Money held by the bank. Credited by taxes and purchases, debited by
    /// salaries and profits. Has no rule-visible effect; the bank never
    /// refuses a payout.
    pub treasury: i64,

    /// Board indexes of properties nobody owns, in board order at game start.
    unowned: Vec<usize>,
}

impl Bank {
    /// Create a bank holding `treasury` and the given unowned pool.
    #[must_use]
    pub fn new(treasury: i64, unowned: Vec<usize>) -> Self {
        Self { treasury, unowned }
    }

    /// Whether the property at `index` sits in the unowned pool.
    #[must_use]
    pub fn is_unowned(&self, index: usize) -> bool {
        self.unowned.contains(&index)
    }

    /// Number of properties in the unowned pool.
    #[must_use]
    pub fn unowned_count(&self) -> usize {
        self.unowned.len()
    }

    /// Remove the property at `index` from the pool (it was bought).
    ///
    /// Returns false if the property was not in the pool.
    pub fn take(&mut self, index: usize) -> bool {
        if let Some(pos) = self.unowned.iter().position(|&i| i == index) {
            self.unowned.remove(pos);
            true
        } else {
            false
        }
    }

    /// Return the property at `index` to the pool (sold or liquidated).
    pub fn restore(&mut self, index: usize) {
        if !self.unowned.contains(&index) {
            self.unowned.push(index);
        }
    }

    /// Credit the treasury.
    pub fn credit(&mut self, amount: i64) {
        self.treasury += amount;
    }

    /// Debit the treasury.
    pub fn debit(&mut self, amount: i64) {
        self.treasury -= amount;
    }
}
