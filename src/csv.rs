use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

use crate::model::{Ingredient, UnknownIngredient};
use crate::recipe::Coffee;
use crate::{Amount, Command, Machine};

/// Errors that can occur when reading command rows
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open command file: {0}")]
    Open(csv::Error),

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized action '{action}'")]
    UnrecognizedAction { line: usize, action: String },

    #[error("line {line}: {action} missing {field}")]
    MissingField {
        line: usize,
        action: &'static str,
        field: &'static str,
    },

    #[error("line {line}: {source}")]
    UnknownIngredient {
        line: usize,
        source: UnknownIngredient,
    },

    #[error("line {line}: invalid amount {amount}")]
    InvalidAmount { line: usize, amount: f64 },
}

#[derive(Debug, Deserialize)]
struct InputRow {
    action: String,
    coffee: Option<String>,
    size: Option<String>,
    ingredient: Option<String>,
    amount: Option<f64>,
}

#[derive(Debug, Serialize)]
struct StockRow {
    ingredient: &'static str,
    quantity: String,
    unit: &'static str,
    capacity: Option<String>,
}

#[derive(Debug, Serialize)]
struct SaleRow {
    coffee: &'static str,
    size: &'static str,
    price: String,
}

#[derive(Debug, Serialize)]
struct SummaryRow {
    sales: usize,
    revenue: String,
    balance: String,
}

/// Read operator commands from a csv file
pub fn read_commands(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Command, CsvError>>, CsvError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(CsvError::Open)?;

    Ok(reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            parse_row(line, row)
        }))
}

fn parse_row(line: usize, row: InputRow) -> Result<Command, CsvError> {
    match row.action.as_str() {
        "order" => {
            let coffee = required(line, "order", "coffee", row.coffee)?;
            let size = required(line, "order", "size", row.size)?;
            Ok(Command::Order { coffee, size })
        }
        "refill" => {
            let ingredient = required(line, "refill", "ingredient", row.ingredient)?;
            let ingredient = ingredient
                .parse::<Ingredient>()
                .map_err(|source| CsvError::UnknownIngredient { line, source })?;
            Ok(Command::Refill { ingredient })
        }
        "fill_all" => Ok(Command::FillAll),
        "withdraw" => Ok(Command::Withdraw {
            amount: amount(line, "withdraw", row.amount)?,
        }),
        "donate" => Ok(Command::Donate {
            amount: amount(line, "donate", row.amount)?,
        }),
        other => Err(CsvError::UnrecognizedAction {
            line,
            action: other.to_string(),
        }),
    }
}

fn required(
    line: usize,
    action: &'static str,
    field: &'static str,
    value: Option<String>,
) -> Result<String, CsvError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(CsvError::MissingField {
            line,
            action,
            field,
        })
}

fn amount(line: usize, action: &'static str, value: Option<f64>) -> Result<Amount, CsvError> {
    let value = value.ok_or(CsvError::MissingField {
        line,
        action,
        field: "amount",
    })?;
    Amount::try_from_float(value).ok_or(CsvError::InvalidAmount {
        line,
        amount: value,
    })
}

/// Write the machine state as three csv blocks (stock, sales, summary)
/// separated by blank lines
pub fn write_report(mut out: impl Write, machine: &Machine) -> Result<(), csv::Error> {
    {
        let mut writer = csv::Writer::from_writer(&mut out);
        for (ingredient, quantity) in machine.stock().snapshot() {
            writer.serialize(StockRow {
                ingredient: ingredient.as_str(),
                quantity: quantity.to_string(),
                unit: ingredient.unit(),
                capacity: machine.config().capacity(ingredient).map(|c| c.to_string()),
            })?;
        }
        writer.flush()?;
    }
    out.write_all(b"\n")?;

    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut out);
        writer.write_record(["coffee", "size", "price"])?;
        for sale in machine.sales().iter() {
            writer.serialize(SaleRow {
                coffee: sale.coffee.as_str(),
                size: sale.size.as_str(),
                price: sale.price.to_fixed(Coffee::PRICE_DECIMALS),
            })?;
        }
        writer.flush()?;
    }
    out.write_all(b"\n")?;

    let mut writer = csv::Writer::from_writer(&mut out);
    writer.serialize(SummaryRow {
        sales: machine.sales().len(),
        revenue: machine.sales().total_revenue().to_fixed(Coffee::PRICE_DECIMALS),
        balance: machine.balance().to_fixed(Coffee::PRICE_DECIMALS),
    })?;
    writer.flush()?;
    Ok(())
}

/// Write the report to stdout
pub fn write_report_stdout(machine: &Machine) -> Result<(), csv::Error> {
    let stdout = io::stdout();
    write_report(stdout.lock(), machine)
}
