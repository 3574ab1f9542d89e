//! Append-only record of completed sales.

use crate::Amount;
use crate::recipe::{Coffee, CoffeeType, Size};

/// One completed sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sale {
    pub coffee: CoffeeType,
    pub size: Size,
    /// Unit price charged.
    pub price: Amount,
}

impl From<&Coffee> for Sale {
    fn from(coffee: &Coffee) -> Self {
        Self {
            coffee: coffee.coffee_type(),
            size: coffee.size(),
            price: coffee.price(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SalesLedger {
    sales: Vec<Sale>,
}

impl SalesLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sale: Sale) {
        self.sales.push(sale);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sale> + '_ {
        self.sales.iter()
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    pub fn total_revenue(&self) -> Amount {
        self.sales.iter().map(|sale| sale.price).sum()
    }
}
