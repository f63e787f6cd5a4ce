//! CSV export of the report ledger

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use incomelens_finance::report::LedgerEntry;

#[derive(Debug, Serialize)]
struct LedgerRow<'a> {
    id: &'a str,
    date: String,
    name: &'a str,
    amount: Option<f64>,
    direction: &'static str,
    category: &'a str,
    pending: bool,
    is_payroll: bool,
    running_balance: f64,
    issues: String,
}

impl<'a> From<&'a LedgerEntry> for LedgerRow<'a> {
    fn from(e: &'a LedgerEntry) -> Self {
        let issues = e
            .issues
            .iter()
            .map(|i| format!("{i:?}"))
            .collect::<Vec<_>>()
            .join("; ");

        Self {
            id: &e.id,
            date: e.date.map(|d| d.to_string()).unwrap_or_default(),
            name: &e.name,
            amount: e.amount,
            direction: if e.is_income { "income" } else { "expense" },
            category: &e.category,
            pending: e.pending,
            is_payroll: e.is_payroll,
            running_balance: e.running_balance,
            issues,
        }
    }
}

pub fn write_ledger<W: Write>(writer: W, entries: &[LedgerEntry]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for entry in entries {
        wtr.serialize(LedgerRow::from(entry)).context("write ledger row")?;
    }
    wtr.flush().context("flush ledger csv")?;
    Ok(())
}

pub fn write_ledger_file(path: &Path, entries: &[LedgerEntry]) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_ledger(file, entries)
}
