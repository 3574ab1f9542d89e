//! Recipes and pricing.
//!
//! A coffee type selects a base recipe (quantities and price for a small
//! cup); the size selects a scale factor applied to both through
//! [`Size::scale`], so quantities and price can never disagree.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::Amount;
use crate::model::{Ingredient, Requirements};

/// Error returned when an order names an unknown coffee type or size.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    #[error("type of coffee '{0}' not found")]
    UnknownType(String),
    #[error("size '{0}' not found")]
    UnknownSize(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoffeeType {
    Espresso,
    Latte,
    Cappuccino,
}

/// Base quantities for a small cup, in whole units.
struct BaseRecipe {
    water: i64,
    milk: i64,
    coffee_beans: i64,
    price: i64,
}

impl CoffeeType {
    pub const ALL: [CoffeeType; 3] = [
        CoffeeType::Espresso,
        CoffeeType::Latte,
        CoffeeType::Cappuccino,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CoffeeType::Espresso => "espresso",
            CoffeeType::Latte => "latte",
            CoffeeType::Cappuccino => "cappuccino",
        }
    }

    fn base(self) -> BaseRecipe {
        match self {
            CoffeeType::Espresso => BaseRecipe {
                water: 250,
                milk: 0,
                coffee_beans: 16,
                price: 4,
            },
            CoffeeType::Latte => BaseRecipe {
                water: 350,
                milk: 75,
                coffee_beans: 20,
                price: 7,
            },
            CoffeeType::Cappuccino => BaseRecipe {
                water: 200,
                milk: 100,
                coffee_beans: 12,
                price: 6,
            },
        }
    }

    /// Ingredients for a small cup.
    pub fn base_ingredients(self) -> Requirements {
        let base = self.base();
        Requirements::new()
            .with(Ingredient::Water, Amount::from_units(base.water))
            .with(Ingredient::Milk, Amount::from_units(base.milk))
            .with(Ingredient::CoffeeBeans, Amount::from_units(base.coffee_beans))
    }

    /// Price of a small cup.
    pub fn base_price(self) -> Amount {
        Amount::from_units(self.base().price)
    }
}

impl fmt::Display for CoffeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoffeeType {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "espresso" => Ok(CoffeeType::Espresso),
            "latte" => Ok(CoffeeType::Latte),
            // older menus used the single-p spelling
            "cappuccino" | "capuccino" => Ok(CoffeeType::Cappuccino),
            _ => Err(RecipeError::UnknownType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];

    pub fn as_str(self) -> &'static str {
        match self {
            Size::Small => "small",
            Size::Medium => "medium",
            Size::Large => "large",
        }
    }

    /// Scale factor in thousandths.
    pub fn per_mille(self) -> i64 {
        match self {
            Size::Small => 1000,
            Size::Medium => 1200,
            Size::Large => 1500,
        }
    }

    pub fn factor(self) -> f64 {
        self.per_mille() as f64 / 1000.0
    }

    /// Apply this size's scale factor to a base quantity or price.
    pub fn scale(self, amount: Amount) -> Amount {
        amount.scale_per_mille(self.per_mille())
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Size {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(Size::Small),
            "medium" => Ok(Size::Medium),
            "large" => Ok(Size::Large),
            _ => Err(RecipeError::UnknownSize(s.to_string())),
        }
    }
}

/// One requested beverage with its resolved ingredients and unit price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coffee {
    coffee_type: CoffeeType,
    size: Size,
    ingredients: Requirements,
    price: Amount,
}

impl Coffee {
    /// Decimal places prices are rounded to.
    pub const PRICE_DECIMALS: u32 = 2;

    pub fn new(coffee_type: CoffeeType, size: Size) -> Self {
        let ingredients = coffee_type
            .base_ingredients()
            .iter()
            .map(|(ingredient, amount)| (ingredient, size.scale(amount)))
            .collect();
        let price = size
            .scale(coffee_type.base_price())
            .round_dp(Self::PRICE_DECIMALS);

        Self {
            coffee_type,
            size,
            ingredients,
            price,
        }
    }

    /// Resolve raw identifiers into a coffee. The type is checked first.
    pub fn resolve(coffee_type: &str, size: &str) -> Result<Self, RecipeError> {
        let coffee_type = coffee_type.parse::<CoffeeType>()?;
        let size = size.parse::<Size>()?;
        Ok(Self::new(coffee_type, size))
    }

    pub fn coffee_type(&self) -> CoffeeType {
        self.coffee_type
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn ingredients(&self) -> &Requirements {
        &self.ingredients
    }

    pub fn price(&self) -> Amount {
        self.price
    }

    pub fn into_parts(self) -> (Requirements, Amount) {
        (self.ingredients, self.price)
    }

    /// One-line summary for display.
    pub fn describe(&self) -> String {
        format!(
            "coffee: {} | size: {} | price: {} u | ingredients: {}",
            self.coffee_type,
            self.size,
            self.price.to_fixed(Self::PRICE_DECIMALS),
            self.ingredients
        )
    }
}
