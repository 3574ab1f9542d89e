//! Invalid-input errors for machine operations.
//!
//! Shortages, full tanks and empty cash boxes are not errors; they are
//! reported through the outcome types in the parent module.

use thiserror::Error;

use crate::Amount;
use crate::model::Ingredient;
use crate::recipe::RecipeError;
use crate::stock::LedgerError;

/// Top-level error returned by [`Machine`](super::Machine) operations.
///
/// Every variant is raised before any state is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("order failed: {0}")]
    Recipe(#[from] RecipeError),

    #[error("stock operation failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("{0} is not tracked by this machine")]
    NotTracked(Ingredient),

    #[error("amount must not be negative, got {0}")]
    NegativeAmount(Amount),
}
