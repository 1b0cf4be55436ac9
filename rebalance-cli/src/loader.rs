//! CSV inputs for the CLI.
//!
//! - scores: `date,instrument,score`
//! - quotes: `date,instrument,price,factor,tradable` (`factor` may be empty)
//! - holdings: `instrument,amount,periods`

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rebalance_core::config::VenueConfig;
use rebalance_core::scores::ScoreTable;
use rebalance_core::sim::{Quote, SimLedger, SimVenue};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ScoreRow {
    date: NaiveDate,
    instrument: String,
    score: f64,
}

#[derive(Debug, Deserialize)]
struct QuoteRow {
    date: NaiveDate,
    instrument: String,
    price: f64,
    factor: Option<f64>,
    tradable: bool,
}

#[derive(Debug, Deserialize)]
struct HoldingRow {
    instrument: String,
    amount: f64,
    #[serde(default)]
    periods: u32,
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::Reader::from_path(path).with_context(|| format!("failed to open {}", path.display()))
}

pub fn read_scores<R: Read>(mut reader: csv::Reader<R>) -> Result<ScoreTable> {
    let mut table = ScoreTable::new();
    for (line, row) in reader.deserialize::<ScoreRow>().enumerate() {
        let row = row.with_context(|| format!("bad score row {}", line + 1))?;
        table.insert(row.date, row.instrument, row.score);
    }
    Ok(table)
}

pub fn read_quotes<R: Read>(mut reader: csv::Reader<R>, config: VenueConfig) -> Result<SimVenue> {
    let mut venue = SimVenue::new(config);
    for (line, row) in reader.deserialize::<QuoteRow>().enumerate() {
        let row = row.with_context(|| format!("bad quote row {}", line + 1))?;
        let quote = Quote {
            price: row.price,
            factor: row.factor.unwrap_or(1.0),
            tradable: row.tradable,
        };
        venue.insert_quote(row.date, row.instrument, quote);
    }
    Ok(venue)
}

pub fn read_holdings<R: Read>(mut reader: csv::Reader<R>, cash: f64) -> Result<SimLedger> {
    let mut ledger = SimLedger::new(cash);
    for (line, row) in reader.deserialize::<HoldingRow>().enumerate() {
        let row = row.with_context(|| format!("bad holding row {}", line + 1))?;
        ledger.set_holding(row.instrument, row.amount, row.periods);
    }
    Ok(ledger)
}

pub fn load_scores(path: &Path) -> Result<ScoreTable> {
    read_scores(open(path)?).with_context(|| format!("in {}", path.display()))
}

pub fn load_quotes(path: &Path, config: VenueConfig) -> Result<SimVenue> {
    read_quotes(open(path)?, config).with_context(|| format!("in {}", path.display()))
}

pub fn load_holdings(path: &Path, cash: f64) -> Result<SimLedger> {
    read_holdings(open(path)?, cash).with_context(|| format!("in {}", path.display()))
}
