//! The income engine: one pure pass from a normalized snapshot to a report.
//!
//! Nothing here reads the clock, touches the filesystem or mutates its input.
//! The report date and generation timestamp come in through [`ReportContext`].

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use incomelens_core::{EvaluationWindow, NormalizedTransaction};
use incomelens_ingest::{NormalizedSnapshot, SnapshotInput};

use crate::aggregate::{WindowAggregator, ledger_entries, running_balances};
use crate::confidence;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::payroll_rules::PayrollClassifier;
use crate::recurring::{SourceKeyer, group_deposits, primary_source};
use crate::report::{self, IncomeReport, ReportParts, ReportWindows, SnapshotCoverage};
use crate::split::split;

/// Reference points for one report generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportContext {
    /// Windows end at the start of this date's month
    pub as_of: NaiveDate,
    pub generated_at: DateTime<Utc>,
}

impl ReportContext {
    pub fn new(as_of: NaiveDate, generated_at: DateTime<Utc>) -> Self {
        Self { as_of, generated_at }
    }
}

/// Stateless engine holding the compiled rule set and grouping config
#[derive(Debug, Clone)]
pub struct IncomeEngine {
    config: EngineConfig,
    classifier: PayrollClassifier,
    keyer: SourceKeyer,
}

impl IncomeEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let classifier = PayrollClassifier::new(&config.rules);
        let keyer = SourceKeyer::new(&config.grouping)?;
        Ok(Self {
            config,
            classifier,
            keyer,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &PayrollClassifier {
        &self.classifier
    }

    pub fn generate(&self, input: &SnapshotInput, ctx: &ReportContext) -> IncomeReport {
        match input {
            SnapshotInput::Current(snapshot) => self.generate_current(snapshot, ctx),
            SnapshotInput::Legacy(legacy) => {
                debug!("upgrading legacy report");
                report::upgrade_legacy(legacy, ctx.as_of, ctx.generated_at)
            }
        }
    }

    fn generate_current(&self, snapshot: &NormalizedSnapshot, ctx: &ReportContext) -> IncomeReport {
        let txns = &snapshot.transactions;
        let parts = split(txns);
        debug_assert_eq!(parts.len(), txns.len());

        let (payroll, other): (Vec<&NormalizedTransaction>, Vec<&NormalizedTransaction>) = parts
            .income
            .iter()
            .copied()
            .partition(|t| self.classifier.is_payroll(&t.name));

        let history_start = snapshot.history_start();
        let aggregator = WindowAggregator::new(ctx.as_of, &self.config.windows, history_start);
        let all_income = aggregator.income_figures(&parts.income);
        let payroll_figures = aggregator.income_figures(&payroll);
        let other_figures = aggregator.income_figures(&other);

        let historical = *aggregator.historical();
        let projected = *aggregator.projected();

        let groups = group_deposits(
            &within(&payroll, &historical),
            &self.keyer,
            all_income.historical.total,
            &self.config.confidence,
        );
        let projected_groups = group_deposits(
            &within(&payroll, &projected),
            &self.keyer,
            all_income.projected.total,
            &self.config.confidence,
        );
        let primary = primary_source(&projected_groups);
        let income_confidence = confidence::overall(primary);

        debug!(
            income = parts.income.len(),
            expenses = parts.expenses.len(),
            net = parts.income_total() + parts.expense_total(),
            payroll = payroll.len(),
            groups = groups.len(),
            "classified transactions"
        );

        let deposits = within(&parts.income, &historical)
            .into_iter()
            .map(|t| (t, self.classifier.explain(&t.name)))
            .collect();

        let total_balance: f64 = snapshot.accounts.iter().map(|a| a.current_or_zero()).sum();
        let rows = ledger_entries(txns, historical.start, ctx.as_of);
        let balances = running_balances(&rows, total_balance);
        let ledger = rows
            .into_iter()
            .zip(balances)
            .map(|(t, balance)| (t, t.is_income && self.classifier.is_payroll(&t.name), balance))
            .collect();

        let report = report::assemble(ReportParts {
            provider: snapshot.provider,
            as_of: ctx.as_of,
            generated_at: ctx.generated_at,
            windows: ReportWindows { historical, projected },
            coverage: SnapshotCoverage {
                fetched_at: snapshot.fetched_at,
                range_start: snapshot.range_start,
                range_end: snapshot.range_end,
                history_start,
            },
            accounts: &snapshot.accounts,
            transaction_count: txns.len(),
            all_income,
            payroll: payroll_figures,
            other: other_figures,
            confidence: income_confidence,
            primary,
            groups: &groups,
            deposits,
            expenses: aggregator.expense_breakdown(&parts.expenses),
            ledger,
        });

        info!(
            provider = %snapshot.provider,
            as_of = %ctx.as_of,
            transactions = txns.len(),
            confidence = income_confidence.label(),
            monthly = report.summary.estimated_monthly_income,
            "generated income report"
        );
        report
    }
}

/// Aggregatable transactions dated inside `window`, in input order
fn within<'a>(txns: &[&'a NormalizedTransaction], window: &EvaluationWindow) -> Vec<&'a NormalizedTransaction> {
    txns.iter()
        .copied()
        .filter(|t| t.is_aggregatable() && t.date.is_some_and(|d| window.contains(d)))
        .collect()
}
