//! Ingredient stock ledger.
//!
//! Owns the current quantity of every tracked ingredient and arbitrates
//! availability checks, deductions and refills. Shortages and full tanks are
//! ordinary outcomes; only negative quantities are rejected as errors.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::Amount;
use crate::model::{Ingredient, Requirements};

/// Invalid input to a ledger operation. The ledger is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("negative quantity {amount} for {ingredient}")]
    NegativeQuantity { ingredient: Ingredient, amount: Amount },
}

/// Result of [`StockIngredients::check_availability`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    /// First ingredient, in requirement order, that cannot be covered.
    Insufficient {
        ingredient: Ingredient,
        required: Amount,
        available: Amount,
    },
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Available => f.write_str("ingredients available"),
            Availability::Insufficient { ingredient, .. } => write!(
                f,
                "there's not enough {ingredient} in the machine, try another coffee"
            ),
        }
    }
}

/// Result of [`StockIngredients::refill_to_capacity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefillOutcome {
    AlreadyFull { ingredient: Ingredient },
    Refilled { ingredient: Ingredient, added: Amount },
}

impl fmt::Display for RefillOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefillOutcome::AlreadyFull { ingredient } => write!(f, "{ingredient} is already full"),
            RefillOutcome::Refilled { ingredient, added } => {
                write!(f, "{ingredient} refilled by {added} {}", ingredient.unit())
            }
        }
    }
}

/// Current stock levels of the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockIngredients {
    stock: BTreeMap<Ingredient, Amount>,
}

impl StockIngredients {
    pub const WATER_CAPACITY: Amount = Amount::from_units(2000);
    pub const MILK_CAPACITY: Amount = Amount::from_units(1000);
    pub const COFFEE_BEANS_CAPACITY: Amount = Amount::from_units(500);
    pub const CUPS_CAPACITY: Amount = Amount::from_units(100);

    /// Factory stock: water, milk and coffee beans at capacity, cups untracked.
    pub fn new() -> Self {
        Self::from_levels([
            (Ingredient::Water, Self::WATER_CAPACITY),
            (Ingredient::Milk, Self::MILK_CAPACITY),
            (Ingredient::CoffeeBeans, Self::COFFEE_BEANS_CAPACITY),
        ])
    }

    /// Factory stock including a full stack of cups.
    pub fn with_cups() -> Self {
        let mut stock = Self::new();
        stock.stock.insert(Ingredient::Cups, Self::CUPS_CAPACITY);
        stock
    }

    /// Build a ledger from explicit levels. Negative levels are clamped to zero.
    pub fn from_levels(levels: impl IntoIterator<Item = (Ingredient, Amount)>) -> Self {
        let stock = levels
            .into_iter()
            .map(|(ingredient, amount)| (ingredient, amount.max(Amount::ZERO)))
            .collect();
        Self { stock }
    }

    /// Tracked quantity, or `None` if the ingredient is not tracked.
    pub fn get(&self, ingredient: Ingredient) -> Option<Amount> {
        self.stock.get(&ingredient).copied()
    }

    /// Tracked quantity, treating untracked ingredients as empty.
    pub fn level(&self, ingredient: Ingredient) -> Amount {
        self.get(ingredient).unwrap_or_default()
    }

    pub fn is_tracked(&self, ingredient: Ingredient) -> bool {
        self.stock.contains_key(&ingredient)
    }

    /// Start tracking an ingredient at zero. Existing levels are kept.
    pub fn track(&mut self, ingredient: Ingredient) {
        self.stock.entry(ingredient).or_default();
    }

    /// Stop tracking an ingredient, returning its last level.
    pub fn untrack(&mut self, ingredient: Ingredient) -> Option<Amount> {
        self.stock.remove(&ingredient)
    }

    /// Read-only view of every tracked ingredient.
    pub fn snapshot(&self) -> impl Iterator<Item = (Ingredient, Amount)> + '_ {
        self.stock.iter().map(|(i, a)| (*i, *a))
    }

    /// Check whether every requirement can be covered, without mutating anything.
    ///
    /// Reports the first shortage in requirement order.
    pub fn check_availability(
        &self,
        requirements: &Requirements,
    ) -> Result<Availability, LedgerError> {
        validate(requirements)?;

        for (ingredient, required) in requirements.iter() {
            let available = self.level(ingredient);
            if available < required {
                return Ok(Availability::Insufficient {
                    ingredient,
                    required,
                    available,
                });
            }
        }
        Ok(Availability::Available)
    }

    /// Deduct every requirement from the tracked stock.
    ///
    /// Callers must have just obtained [`Availability::Available`] for the same
    /// requirements; levels are not re-checked here. Untracked ingredients are
    /// skipped.
    pub fn take(&mut self, requirements: &Requirements) -> Result<(), LedgerError> {
        validate(requirements)?;

        for (ingredient, amount) in requirements.iter() {
            if let Some(level) = self.stock.get_mut(&ingredient) {
                *level -= amount;
            }
        }
        Ok(())
    }

    /// Add `amount` to an ingredient, starting to track it if needed.
    /// Returns the amount applied.
    pub fn refill(
        &mut self,
        ingredient: Ingredient,
        amount: Amount,
    ) -> Result<Amount, LedgerError> {
        if amount.is_negative() {
            return Err(LedgerError::NegativeQuantity { ingredient, amount });
        }
        *self.stock.entry(ingredient).or_default() += amount;
        Ok(amount)
    }

    /// Top an ingredient up to exactly `max_capacity`, never beyond it.
    pub fn refill_to_capacity(
        &mut self,
        ingredient: Ingredient,
        max_capacity: Amount,
    ) -> Result<RefillOutcome, LedgerError> {
        if max_capacity.is_negative() {
            return Err(LedgerError::NegativeQuantity {
                ingredient,
                amount: max_capacity,
            });
        }

        let current = self.level(ingredient);
        if current >= max_capacity {
            return Ok(RefillOutcome::AlreadyFull { ingredient });
        }

        let added = self.refill(ingredient, max_capacity - current)?;
        Ok(RefillOutcome::Refilled { ingredient, added })
    }
}

impl Default for StockIngredients {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(requirements: &Requirements) -> Result<(), LedgerError> {
    match requirements.iter().find(|(_, amount)| amount.is_negative()) {
        Some((ingredient, amount)) => Err(LedgerError::NegativeQuantity { ingredient, amount }),
        None => Ok(()),
    }
}
