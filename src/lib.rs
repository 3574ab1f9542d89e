pub mod amount;
pub mod config;
pub mod csv;
pub mod machine;
pub mod model;
pub mod recipe;
pub mod sales;
pub mod stock;

pub use amount::Amount;
pub use config::MachineConfig;
pub use machine::{Machine, MachineError, OrderOutcome, Outcome};
pub use model::{Command, Ingredient, Requirements};
pub use recipe::{Coffee, CoffeeType, Size};
pub use sales::{Sale, SalesLedger};
pub use stock::StockIngredients;
