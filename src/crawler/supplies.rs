//! Supplies - commodity ledger carried aboard a crawler

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::Commodity;

/// Commodities held by a crawler, in units. Ordered by commodity so saves
/// and weight sums come out the same on every replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Supplies {
    amounts: BTreeMap<Commodity, f32>,
}

impl Supplies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current amount of a commodity
    pub fn get(&self, commodity: Commodity) -> f32 {
        self.amounts.get(&commodity).copied().unwrap_or(0.0)
    }

    /// Add a commodity, returns the amount added
    pub fn add(&mut self, commodity: Commodity, amount: f32) -> f32 {
        if !(amount > 0.0) {
            return 0.0;
        }
        *self.amounts.entry(commodity).or_insert(0.0) += amount;
        amount
    }

    /// Remove up to `amount`, returns the amount actually removed
    pub fn remove(&mut self, commodity: Commodity, amount: f32) -> f32 {
        if !(amount > 0.0) {
            return 0.0;
        }
        match self.amounts.get_mut(&commodity) {
            Some(held) => {
                let removed = amount.min(*held);
                *held -= removed;
                removed
            }
            None => 0.0,
        }
    }

    pub fn has(&self, commodity: Commodity, amount: f32) -> bool {
        self.get(commodity) >= amount
    }

    /// Remove exactly `amount` or nothing; returns true if consumed
    pub fn consume(&mut self, commodity: Commodity, amount: f32) -> bool {
        if !self.has(commodity, amount) {
            return false;
        }
        self.remove(commodity, amount);
        true
    }

    /// Total mass of everything carried
    pub fn weight(&self) -> f32 {
        self.amounts
            .iter()
            .map(|(commodity, amount)| commodity.unit_weight() * amount)
            .sum()
    }
}
