//! Window aggregation: historical and projected totals, expense breakdown,
//! and the running-balance ledger.
//!
//! Both windows are anchored to an explicit report date. Averages divide by
//! the months of the window the history actually covers, never by more.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use incomelens_core::{EvaluationWindow, NormalizedTransaction};

use crate::config::WindowConfig;

/// Total and count of one transaction set inside one window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowTotals {
    pub total: f64,
    pub count: usize,
    /// Divisor for the monthly average
    pub months: u32,
}

impl WindowTotals {
    pub fn monthly(&self) -> f64 {
        if self.months == 0 {
            0.0
        } else {
            self.total / f64::from(self.months)
        }
    }
}

/// Historical and projected figures for one income set
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IncomeFigures {
    pub historical: WindowTotals,
    pub projected: WindowTotals,
}

impl IncomeFigures {
    pub fn monthly_historical(&self) -> f64 {
        self.historical.monthly()
    }

    pub fn monthly_projected(&self) -> f64 {
        self.projected.monthly()
    }

    /// Projected monthly average, annualized linearly
    pub fn annual_projected(&self) -> f64 {
        self.monthly_projected() * 12.0
    }

    pub fn deposit_count(&self) -> usize {
        self.historical.count
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    /// Spend as a positive magnitude
    pub total: f64,
    pub count: usize,
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpenseBreakdown {
    pub by_category: Vec<CategoryTotal>,
    pub historical: WindowTotals,
    pub projected: WindowTotals,
}

/// Computes totals over the historical and projected windows of one report
#[derive(Debug, Clone)]
pub struct WindowAggregator {
    historical: EvaluationWindow,
    projected: EvaluationWindow,
    historical_divisor: u32,
    projected_divisor: u32,
}

impl WindowAggregator {
    /// `history_start` is the first day the snapshot covers, if known
    pub fn new(as_of: NaiveDate, config: &WindowConfig, history_start: Option<NaiveDate>) -> Self {
        let historical = EvaluationWindow::trailing_complete_months(as_of, config.historical_months);
        let projected = EvaluationWindow::trailing_complete_months(as_of, config.projected_months);
        Self {
            historical,
            projected,
            historical_divisor: historical.covered_months(history_start),
            projected_divisor: projected.covered_months(history_start),
        }
    }

    pub fn historical(&self) -> &EvaluationWindow {
        &self.historical
    }

    pub fn projected(&self) -> &EvaluationWindow {
        &self.projected
    }

    /// Totals of aggregatable transactions by canonical amount.
    ///
    /// Projected totals are summed from the same transactions as historical
    /// ones, so the projected window can never see a deposit the historical
    /// window missed.
    pub fn income_figures(&self, deposits: &[&NormalizedTransaction]) -> IncomeFigures {
        IncomeFigures {
            historical: self.totals(&self.historical, self.historical_divisor, deposits, |t| t.signed_amount()),
            projected: self.totals(&self.projected, self.projected_divisor, deposits, |t| t.signed_amount()),
        }
    }

    /// Expense spend by category over the historical window, largest first
    pub fn expense_breakdown(&self, expenses: &[&NormalizedTransaction]) -> ExpenseBreakdown {
        let mut by_name: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for txn in expenses {
            let Some(date) = txn.date else { continue };
            if !txn.is_aggregatable() || !self.historical.contains(date) {
                continue;
            }
            let entry = by_name.entry(txn.category_label()).or_insert((0.0, 0));
            entry.0 += txn.abs_amount();
            entry.1 += 1;
        }

        let total: f64 = by_name.values().map(|(t, _)| t).sum();
        let mut by_category: Vec<CategoryTotal> = by_name
            .into_iter()
            .map(|(name, (t, count))| CategoryTotal {
                category: name.to_string(),
                total: t,
                count,
                pct: if total != 0.0 { t / total * 100.0 } else { 0.0 },
            })
            .collect();
        by_category.sort_by(|a, b| {
            b.total
                .total_cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });

        ExpenseBreakdown {
            by_category,
            historical: self.totals(&self.historical, self.historical_divisor, expenses, |t| t.abs_amount()),
            projected: self.totals(&self.projected, self.projected_divisor, expenses, |t| t.abs_amount()),
        }
    }

    fn totals(
        &self,
        window: &EvaluationWindow,
        months: u32,
        txns: &[&NormalizedTransaction],
        value: impl Fn(&NormalizedTransaction) -> f64,
    ) -> WindowTotals {
        let mut totals = WindowTotals {
            months,
            ..WindowTotals::default()
        };
        for txn in txns {
            if !txn.is_aggregatable() {
                continue;
            }
            if txn.date.is_some_and(|d| window.contains(d)) {
                totals.total += value(*txn);
                totals.count += 1;
            }
        }
        totals
    }
}

/// Ledger rows: every transaction dated from `from` through `as_of`, then
/// every undated record. Ascending by date; ties keep input order.
pub fn ledger_entries(
    txns: &[NormalizedTransaction],
    from: NaiveDate,
    as_of: NaiveDate,
) -> Vec<&NormalizedTransaction> {
    let mut dated: Vec<&NormalizedTransaction> = txns
        .iter()
        .filter(|t| t.date.is_some_and(|d| d >= from && d <= as_of))
        .collect();
    dated.sort_by_key(|t| t.date);
    dated.extend(txns.iter().filter(|t| t.date.is_none()));
    dated
}

/// Balance after each ledger row, ending at `ending_balance`.
///
/// Rows that are not aggregatable (pending, unreadable) leave the balance
/// unchanged.
pub fn running_balances(ledger: &[&NormalizedTransaction], ending_balance: f64) -> Vec<f64> {
    let net: f64 = ledger
        .iter()
        .filter(|t| t.is_aggregatable())
        .map(|t| t.signed_amount())
        .sum();

    let mut balance = ending_balance - net;
    ledger
        .iter()
        .map(|t| {
            if t.is_aggregatable() {
                balance += t.signed_amount();
            }
            balance
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use incomelens_core::RecordIssue;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn txn(id: &str, date: NaiveDate, amount: f64) -> NormalizedTransaction {
        NormalizedTransaction::new(id, Some(date), Some(amount), id)
    }

    fn aggregator(history_start: Option<NaiveDate>) -> WindowAggregator {
        WindowAggregator::new(d(2026, 10, 15), &WindowConfig::default(), history_start)
    }

    #[test]
    fn test_income_figures_by_window() {
        let txns = vec![
            txn("old", d(2025, 9, 30), 999.0),   // before historical window
            txn("hist", d(2026, 2, 1), 1200.0),  // historical only
            txn("proj", d(2026, 8, 1), 600.0),   // both windows
            txn("now", d(2026, 10, 2), 700.0),   // current month, excluded
        ];
        let refs: Vec<_> = txns.iter().collect();
        let figures = aggregator(Some(d(2024, 1, 1))).income_figures(&refs);

        assert_eq!(figures.historical.total, 1800.0);
        assert_eq!(figures.historical.count, 2);
        assert_eq!(figures.projected.total, 600.0);
        assert_eq!(figures.monthly_historical(), 150.0);
        assert_eq!(figures.monthly_projected(), 200.0);
        assert_eq!(figures.annual_projected(), 2400.0);
        assert!(figures.projected.total <= figures.historical.total);
    }

    #[test]
    fn test_short_history_divides_by_covered_months() {
        // Two covered months (Aug partial, Sep): 1000 / 2, not / 12.
        let txns = vec![txn("a", d(2026, 8, 20), 500.0), txn("b", d(2026, 9, 20), 500.0)];
        let refs: Vec<_> = txns.iter().collect();
        let figures = aggregator(Some(d(2026, 8, 15))).income_figures(&refs);
        assert_eq!(figures.historical.months, 2);
        assert_eq!(figures.monthly_historical(), 500.0);
        assert_eq!(figures.projected.months, 2);
    }

    #[test]
    fn test_empty_input_is_zero_not_nan() {
        let figures = aggregator(None).income_figures(&[]);
        assert_eq!(figures.monthly_historical(), 0.0);
        assert_eq!(figures.annual_projected(), 0.0);
        assert_eq!(WindowTotals::default().monthly(), 0.0);
    }

    #[test]
    fn test_pending_and_invalid_are_skipped() {
        let txns = vec![
            txn("ok", d(2026, 9, 1), 100.0),
            txn("pending", d(2026, 9, 2), 100.0).with_pending(true),
            txn("flagged", d(2026, 9, 3), 100.0).with_issue(RecordIssue::MalformedRecord("x".into())),
        ];
        let refs: Vec<_> = txns.iter().collect();
        let figures = aggregator(None).income_figures(&refs);
        assert_eq!(figures.projected.total, 100.0);
        assert_eq!(figures.projected.count, 1);
    }

    #[test]
    fn test_expense_breakdown_sorted_with_pct() {
        let txns = vec![
            txn("rent", d(2026, 9, 1), -1500.0).with_category("Rent"),
            txn("food1", d(2026, 9, 2), -300.0).with_category("Food"),
            txn("food2", d(2026, 9, 9), -200.0).with_category("Food"),
            txn("misc", d(2026, 9, 10), -0.0),
            txn("old", d(2024, 1, 1), -900.0).with_category("Rent"),
        ];
        let refs: Vec<_> = txns.iter().collect();
        let breakdown = aggregator(None).expense_breakdown(&refs);

        let names: Vec<_> = breakdown.by_category.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, ["Rent", "Food", "Uncategorized"]);
        assert_eq!(breakdown.by_category[0].pct, 75.0);
        assert_eq!(breakdown.by_category[1].count, 2);
        assert_eq!(breakdown.historical.total, 2000.0);
        assert_eq!(breakdown.projected.total, 2000.0);
    }

    #[test]
    fn test_ledger_order_and_running_balance() {
        let txns = vec![
            txn("b", d(2026, 9, 5), -50.0),
            NormalizedTransaction::new("bad", None, Some(10.0), "bad")
                .with_issue(RecordIssue::InvalidDate("??".into())),
            txn("a", d(2026, 9, 1), 1000.0),
            txn("c", d(2026, 10, 10), -25.0),
            txn("future", d(2026, 11, 1), -5.0),
            txn("ancient", d(2020, 1, 1), 1.0),
        ];
        let ledger = ledger_entries(&txns, d(2025, 10, 1), d(2026, 10, 15));
        let ids: Vec<_> = ledger.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "bad"]);

        let balances = running_balances(&ledger, 2000.0);
        // Start = 2000 - (1000 - 50 - 25) = 1075
        assert_eq!(balances, vec![2075.0, 2025.0, 2000.0, 2000.0]);
    }
}
