//! Core domain types for the coffee machine.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::Amount;

/// A consumable tracked by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ingredient {
    /// Measured in millilitres.
    Water,
    /// Measured in millilitres.
    Milk,
    /// Measured in grams.
    CoffeeBeans,
    /// Unit count.
    Cups,
}

impl Ingredient {
    pub const ALL: [Ingredient; 4] = [
        Ingredient::Water,
        Ingredient::Milk,
        Ingredient::CoffeeBeans,
        Ingredient::Cups,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Ingredient::Water => "water",
            Ingredient::Milk => "milk",
            Ingredient::CoffeeBeans => "coffee_beans",
            Ingredient::Cups => "cups",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Ingredient::Water | Ingredient::Milk => "ml",
            Ingredient::CoffeeBeans => "g",
            Ingredient::Cups => "units",
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ingredient '{0}'")]
pub struct UnknownIngredient(pub String);

impl FromStr for Ingredient {
    type Err = UnknownIngredient;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "water" => Ok(Ingredient::Water),
            "milk" => Ok(Ingredient::Milk),
            "coffee_beans" | "beans" => Ok(Ingredient::CoffeeBeans),
            "cups" => Ok(Ingredient::Cups),
            other => Err(UnknownIngredient(other.to_string())),
        }
    }
}

/// Ordered list of ingredient quantities needed for one operation.
///
/// Iteration follows insertion order, which is the order availability
/// checks report the first shortage in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Requirements(Vec<(Ingredient, Amount)>);

impl Requirements {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a requirement, replacing any previous quantity for the same ingredient.
    pub fn with(mut self, ingredient: Ingredient, amount: Amount) -> Self {
        match self.0.iter_mut().find(|(i, _)| *i == ingredient) {
            Some(entry) => entry.1 = amount,
            None => self.0.push((ingredient, amount)),
        }
        self
    }

    pub fn get(&self, ingredient: Ingredient) -> Option<Amount> {
        self.0
            .iter()
            .find(|(i, _)| *i == ingredient)
            .map(|(_, amount)| *amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ingredient, Amount)> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Ingredient, Amount)> for Requirements {
    fn from_iter<T: IntoIterator<Item = (Ingredient, Amount)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Requirements::new(), |req, (i, a)| req.with(i, a))
    }
}

impl fmt::Display for Requirements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (ingredient, amount)) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ingredient} {amount} {}", ingredient.unit())?;
        }
        Ok(())
    }
}

/// An operator action, as issued by a front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Brew and sell one coffee. Identifiers are validated by recipe resolution.
    Order { coffee: String, size: String },
    /// Top one ingredient up to its capacity.
    Refill { ingredient: Ingredient },
    /// Top every tracked ingredient up to its capacity.
    FillAll,
    /// Take money out of the cash box.
    Withdraw { amount: Amount },
    /// Give money away from the cash box.
    Donate { amount: Amount },
}
