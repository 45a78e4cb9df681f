//! Population allocation across the five activity categories.

use serde::{Deserialize, Serialize};

/// Five-way split of the population's attention. The sum of all five
/// allocations may never exceed the current total population; updates
/// that would break this are rejected in full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocietyFocus {
    pub growth: u32,
    pub production: u32,
    pub research: u32,
    pub exploration: u32,
    pub trade: u32,
}

impl SocietyFocus {
    /// Total allocated population.
    pub fn total(&self) -> u64 {
        self.growth as u64
            + self.production as u64
            + self.research as u64
            + self.exploration as u64
            + self.trade as u64
    }

    /// The focus with a partial update applied; unset fields keep their
    /// current value.
    pub fn with_update(&self, update: &FocusUpdate) -> SocietyFocus {
        SocietyFocus {
            growth: update.growth.unwrap_or(self.growth),
            production: update.production.unwrap_or(self.production),
            research: update.research.unwrap_or(self.research),
            exploration: update.exploration.unwrap_or(self.exploration),
            trade: update.trade.unwrap_or(self.trade),
        }
    }
}

/// A partial focus reallocation; `None` fields are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusUpdate {
    pub growth: Option<u32>,
    pub production: Option<u32>,
    pub research: Option<u32>,
    pub exploration: Option<u32>,
    pub trade: Option<u32>,
}

/// Population after one turn of growth: the growth focus joins the
/// settlement, capped by housing capacity.
pub fn grown_population(current: u32, growth_focus: u32, max_population: u32) -> u32 {
    current.saturating_add(growth_focus).min(max_population)
}
