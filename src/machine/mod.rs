//! Order fulfillment and machine session state.
//!
//! The machine owns the stock ledger, the sales ledger and the cash box.
//! Every mutation of stock goes through [`StockIngredients`], and an order
//! always checks availability before taking ingredients, with nothing in
//! between.
//! Also supports async stream of commands.

use std::fmt;

use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::Amount;
use crate::config::MachineConfig;
use crate::model::{Command, Ingredient, Requirements};
use crate::recipe::Coffee;
use crate::sales::{Sale, SalesLedger};
use crate::stock::{Availability, RefillOutcome, StockIngredients};

mod state;
pub use state::CashBox;

mod error;
pub use error::MachineError;

const ONE_CUP: Amount = Amount::from_units(1);

/// Why an order was turned down. Nothing is deducted or recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoCups,
    Insufficient {
        ingredient: Ingredient,
        required: Amount,
        available: Amount,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoCups => f.write_str("no cups available, please refill the machine"),
            Rejection::Insufficient { ingredient, .. } => write!(
                f,
                "there's not enough {ingredient} in the machine, try another coffee"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderOutcome {
    Served(Sale),
    Rejected(Rejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashOutcome {
    Withdrawn { amount: Amount, balance: Amount },
    Donated { amount: Amount, balance: Amount },
    /// The cash box holds nothing.
    Empty,
    InsufficientFunds { balance: Amount, requested: Amount },
}

impl fmt::Display for CashOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CashOutcome::Withdrawn { amount, balance } => write!(
                f,
                "withdrew {}, current amount {}",
                amount.to_fixed(2),
                balance.to_fixed(2)
            ),
            CashOutcome::Donated { amount, .. } => {
                write!(f, "thank you for your donation of {}", amount.to_fixed(2))
            }
            CashOutcome::Empty => f.write_str("no money available"),
            CashOutcome::InsufficientFunds { balance, requested } => write!(
                f,
                "insufficient funds: balance {}, requested {}",
                balance.to_fixed(2),
                requested.to_fixed(2)
            ),
        }
    }
}

/// Result of [`Machine::apply`], for front-ends that only render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Order(OrderOutcome),
    Refill(RefillOutcome),
    FillAll(Vec<RefillOutcome>),
    Cash(CashOutcome),
}

/// A coffee machine instance.
#[derive(Debug, Clone)]
pub struct Machine {
    config: MachineConfig,
    stock: StockIngredients,
    sales: SalesLedger,
    cash: CashBox,
}

/// Public API
impl Machine {
    /// A freshly stocked machine.
    pub fn new(config: MachineConfig) -> Self {
        let stock = config.initial_stock();
        Self::with_stock(config, stock)
    }

    /// A machine starting from the given stock levels.
    ///
    /// Cups are tracked exactly when the config says so: missing cups start
    /// at zero, and cups in an untracked config are dropped.
    pub fn with_stock(config: MachineConfig, mut stock: StockIngredients) -> Self {
        if config.track_cups {
            stock.track(Ingredient::Cups);
        } else {
            stock.untrack(Ingredient::Cups);
        }
        Self {
            config,
            stock,
            sales: SalesLedger::new(),
            cash: CashBox::default(),
        }
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn stock(&self) -> &StockIngredients {
        &self.stock
    }

    pub fn sales(&self) -> &SalesLedger {
        &self.sales
    }

    pub fn balance(&self) -> Amount {
        self.cash.balance()
    }

    /// Run the machine with the given command stream
    pub async fn run(&mut self, mut stream: impl Stream<Item = Command> + Unpin) {
        while let Some(command) = stream.next().await {
            // a bad command must not stop the machine; it is already logged
            let _ = self.apply(command);
        }
    }

    /// Apply a single operator command and log its outcome.
    pub fn apply(&mut self, command: Command) -> Result<Outcome, MachineError> {
        let result = match &command {
            Command::Order { coffee, size } => self.order(coffee, size).map(Outcome::Order),
            Command::Refill { ingredient } => self.refill(*ingredient).map(Outcome::Refill),
            Command::FillAll => self.fill_all().map(Outcome::FillAll),
            Command::Withdraw { amount } => self.withdraw(*amount).map(Outcome::Cash),
            Command::Donate { amount } => self.donate(*amount).map(Outcome::Cash),
        };
        self.log_result(&command, &result);
        result
    }

    /// Fulfil one order: cups, recipe, availability, deduction, sale.
    ///
    /// A rejected order consumes nothing, cups included.
    pub fn order(&mut self, coffee: &str, size: &str) -> Result<OrderOutcome, MachineError> {
        let tracks_cups = self.config.track_cups;
        if tracks_cups && self.stock.level(Ingredient::Cups) < ONE_CUP {
            return Ok(OrderOutcome::Rejected(Rejection::NoCups));
        }

        let coffee = Coffee::resolve(coffee, size)?;

        match self.stock.check_availability(coffee.ingredients())? {
            Availability::Available => {}
            Availability::Insufficient {
                ingredient,
                required,
                available,
            } => {
                return Ok(OrderOutcome::Rejected(Rejection::Insufficient {
                    ingredient,
                    required,
                    available,
                }));
            }
        }

        self.stock.take(coffee.ingredients())?;
        if tracks_cups {
            self.stock
                .take(&Requirements::new().with(Ingredient::Cups, ONE_CUP))?;
        }

        let sale = Sale::from(&coffee);
        self.sales.record(sale);
        self.cash.credit(sale.price);

        Ok(OrderOutcome::Served(sale))
    }

    /// Top one ingredient up to its configured capacity.
    pub fn refill(&mut self, ingredient: Ingredient) -> Result<RefillOutcome, MachineError> {
        let capacity = self
            .config
            .capacity(ingredient)
            .ok_or(MachineError::NotTracked(ingredient))?;
        Ok(self.stock.refill_to_capacity(ingredient, capacity)?)
    }

    /// Top every tracked ingredient up to its configured capacity.
    pub fn fill_all(&mut self) -> Result<Vec<RefillOutcome>, MachineError> {
        let capacities: Vec<_> = self.config.capacities().collect();
        let mut outcomes = Vec::with_capacity(capacities.len());
        for (ingredient, capacity) in capacities {
            outcomes.push(self.stock.refill_to_capacity(ingredient, capacity)?);
        }
        Ok(outcomes)
    }

    pub fn withdraw(&mut self, amount: Amount) -> Result<CashOutcome, MachineError> {
        if let Some(refusal) = self.check_cash(amount)? {
            return Ok(refusal);
        }
        self.cash.debit(amount);
        Ok(CashOutcome::Withdrawn {
            amount,
            balance: self.cash.balance(),
        })
    }

    pub fn donate(&mut self, amount: Amount) -> Result<CashOutcome, MachineError> {
        if let Some(refusal) = self.check_cash(amount)? {
            return Ok(refusal);
        }
        self.cash.debit(amount);
        Ok(CashOutcome::Donated {
            amount,
            balance: self.cash.balance(),
        })
    }
}

/// Private API
impl Machine {
    /// Validate a cash movement; `Some` carries the reason it is refused.
    fn check_cash(&self, amount: Amount) -> Result<Option<CashOutcome>, MachineError> {
        if amount.is_negative() {
            return Err(MachineError::NegativeAmount(amount));
        }

        let balance = self.cash.balance();
        if !balance.is_positive() {
            return Ok(Some(CashOutcome::Empty));
        }
        if amount > balance {
            return Ok(Some(CashOutcome::InsufficientFunds {
                balance,
                requested: amount,
            }));
        }
        Ok(None)
    }

    /// Small helper to log `apply` results
    fn log_result(&self, command: &Command, result: &Result<Outcome, MachineError>) {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(command = ?command, reason = %e, "command rejected");
                return;
            }
        };

        match outcome {
            Outcome::Order(OrderOutcome::Served(sale)) => {
                info!(
                    coffee = %sale.coffee,
                    size = %sale.size,
                    price = %sale.price,
                    sales = self.sales.len(),
                    "order served"
                );
            }
            Outcome::Order(OrderOutcome::Rejected(rejection)) => {
                info!(command = ?command, reason = %rejection, "order rejected");
            }
            Outcome::Refill(refill) => {
                info!("{refill}");
            }
            Outcome::FillAll(refills) => {
                for refill in refills {
                    info!("{refill}");
                }
                info!("all ingredients refill complete");
            }
            Outcome::Cash(cash) => {
                info!(balance = %self.cash.balance(), "{cash}");
            }
        }
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(MachineConfig::default())
    }
}
