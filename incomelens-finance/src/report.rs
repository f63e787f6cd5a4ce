//! Report assembly: the serialized `IncomeReport` shape and the legacy upgrade.
//!
//! Assembly only reshapes what the engine computed. Summary and detail are
//! built from the same `IncomeFigures`, so 3-month figures are always a
//! subset of the 12-month ones. Money is rounded to cents here and nowhere
//! earlier.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use incomelens_core::{
    Confidence, EvaluationWindow, IncomeType, NormalizedAccount, NormalizedTransaction,
    PayFrequency, RecordIssue, RecurringSourceGroup,
};
use incomelens_ingest::{LegacySnapshot, Provider};

use crate::aggregate::{CategoryTotal, ExpenseBreakdown, IncomeFigures, ledger_entries, running_balances};
use crate::confidence::LEGACY_CONFIDENCE;
use crate::payroll_rules::PayrollMatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    /// Computed from a provider snapshot
    Current,
    /// Upgraded from a pre-computed legacy report
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeReport {
    pub source: ReportSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub as_of: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows: Option<ReportWindows>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<SnapshotCoverage>,
    pub summary: ReportSummary,
    pub accounts: Vec<AccountView>,
    pub income: IncomeDetail,
    pub expenses: ExpenseDetail,
    pub transactions: Vec<LedgerEntry>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportWindows {
    pub historical: EvaluationWindow,
    pub projected: EvaluationWindow,
}

/// What the snapshot said about itself, next to the history actually used
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotCoverage {
    pub fetched_at: Option<DateTime<Utc>>,
    pub range_start: Option<NaiveDate>,
    pub range_end: Option<NaiveDate>,
    /// Start of the history the monthly divisors were computed from
    pub history_start: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_income_12_mo: f64,
    pub total_income_3_mo: f64,
    /// 12-month monthly average of the headline income set
    pub estimated_monthly_income: f64,
    pub monthly_estimate_historical: f64,
    pub monthly_estimate_projected: f64,
    /// Projected monthly payroll income
    pub verified_monthly_income: f64,
    pub projected_annual_income: f64,
    pub income_confidence: Confidence,
    pub total_balance: f64,
    pub total_available: f64,
    pub account_count: usize,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub name: String,
    pub official_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub subtype: Option<String>,
    pub mask: Option<String>,
    pub current_balance: Option<f64>,
    pub available_balance: Option<f64>,
}

impl From<&NormalizedAccount> for AccountView {
    fn from(a: &NormalizedAccount) -> Self {
        Self {
            id: a.id.clone(),
            name: a.name.clone(),
            official_name: a.official_name.clone(),
            kind: a.kind.clone(),
            subtype: a.subtype.clone(),
            mask: a.mask.clone(),
            current_balance: a.current_balance.map(cents),
            available_balance: a.available_balance.map(cents),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeBlock {
    pub total_12_mo: f64,
    pub total_3_mo: f64,
    pub monthly_historical: f64,
    pub monthly_projected: f64,
    pub annual_projected: f64,
    pub deposit_count: usize,
}

impl From<&IncomeFigures> for IncomeBlock {
    fn from(f: &IncomeFigures) -> Self {
        Self {
            total_12_mo: cents(f.historical.total),
            total_3_mo: cents(f.projected.total),
            monthly_historical: cents(f.monthly_historical()),
            monthly_projected: cents(f.monthly_projected()),
            annual_projected: cents(f.annual_projected()),
            deposit_count: f.deposit_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeDetail {
    /// All income, payroll or not
    pub total_12_mo: f64,
    pub total_3_mo: f64,
    pub monthly_estimate: f64,
    pub verified: IncomeBlock,
    pub other: IncomeBlock,
    pub primary_source: Option<RecurringDepositView>,
    pub recurring_deposits: Vec<RecurringDepositView>,
    pub all_deposits: Vec<DepositView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringDepositView {
    pub source_key: String,
    pub display_name: String,
    pub occurrence_count: usize,
    pub total_amount: f64,
    pub approximate_amount: f64,
    pub frequency: PayFrequency,
    pub on_schedule_count: usize,
    pub income_type: IncomeType,
    pub confidence: Confidence,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub occurrences: Vec<NaiveDate>,
}

impl From<&RecurringSourceGroup> for RecurringDepositView {
    fn from(g: &RecurringSourceGroup) -> Self {
        Self {
            source_key: g.source_key.clone(),
            display_name: g.display_name.clone(),
            occurrence_count: g.occurrence_count,
            total_amount: cents(g.total_amount),
            approximate_amount: cents(g.approximate_amount),
            frequency: g.frequency,
            on_schedule_count: g.on_schedule_count,
            income_type: g.income_type,
            confidence: g.confidence,
            first_date: g.first_date(),
            last_date: g.last_date(),
            occurrences: g.occurrences.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositView {
    pub id: String,
    pub date: Option<NaiveDate>,
    pub name: String,
    pub amount: f64,
    pub category: Option<String>,
    pub is_payroll: bool,
    /// Keyword that decided the label, exclusion or inclusion
    pub matched_rule: Option<String>,
}

impl DepositView {
    fn new(txn: &NormalizedTransaction, label: &PayrollMatch) -> Self {
        Self {
            id: txn.id.clone(),
            date: txn.date,
            name: txn.name.clone(),
            amount: cents(txn.signed_amount()),
            category: txn.category.clone(),
            is_payroll: label.is_payroll(),
            matched_rule: label.keyword().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDetail {
    pub by_category: Vec<CategoryView>,
    pub total_12_mo: f64,
    pub total_3_mo: f64,
    pub monthly_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub category: String,
    pub total: f64,
    pub count: usize,
    pub pct: f64,
}

impl From<&CategoryTotal> for CategoryView {
    fn from(c: &CategoryTotal) -> Self {
        Self {
            category: c.category.clone(),
            total: cents(c.total),
            count: c.count,
            pct: cents(c.pct),
        }
    }
}

impl From<&ExpenseBreakdown> for ExpenseDetail {
    fn from(b: &ExpenseBreakdown) -> Self {
        Self {
            by_category: b.by_category.iter().map(CategoryView::from).collect(),
            total_12_mo: cents(b.historical.total),
            total_3_mo: cents(b.projected.total),
            monthly_average: cents(b.historical.monthly()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub date: Option<NaiveDate>,
    pub name: String,
    pub amount: Option<f64>,
    pub is_income: bool,
    pub category: String,
    pub pending: bool,
    pub is_payroll: bool,
    pub account_id: Option<String>,
    pub running_balance: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<RecordIssue>,
}

impl LedgerEntry {
    fn new(txn: &NormalizedTransaction, is_payroll: bool, running_balance: f64) -> Self {
        Self {
            id: txn.id.clone(),
            date: txn.date,
            name: txn.name.clone(),
            amount: txn.amount.map(cents),
            is_income: txn.is_income,
            category: txn.category_label().to_string(),
            pending: txn.pending,
            is_payroll,
            account_id: txn.account_id.clone(),
            running_balance: cents(running_balance),
            issues: txn.issues.clone(),
        }
    }
}

/// Everything the engine computed for one current-schema report
pub struct ReportParts<'a> {
    pub provider: Provider,
    pub as_of: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub windows: ReportWindows,
    pub coverage: SnapshotCoverage,
    pub accounts: &'a [NormalizedAccount],
    pub transaction_count: usize,
    pub all_income: IncomeFigures,
    pub payroll: IncomeFigures,
    pub other: IncomeFigures,
    pub confidence: Confidence,
    pub primary: Option<&'a RecurringSourceGroup>,
    pub groups: &'a [RecurringSourceGroup],
    /// Historical-window deposits with their payroll label
    pub deposits: Vec<(&'a NormalizedTransaction, PayrollMatch)>,
    pub expenses: ExpenseBreakdown,
    /// Ledger rows with payroll flag and running balance
    pub ledger: Vec<(&'a NormalizedTransaction, bool, f64)>,
}

pub fn assemble(parts: ReportParts<'_>) -> IncomeReport {
    debug_assert!(parts.windows.projected.is_within(&parts.windows.historical));
    debug_assert!(parts.all_income.projected.total <= parts.all_income.historical.total + 1e-6);

    // Headline figures are payroll-only whenever payroll was detected.
    let headline = if parts.payroll.historical.count > 0 {
        &parts.payroll
    } else {
        &parts.all_income
    };

    let summary = ReportSummary {
        total_income_12_mo: cents(headline.historical.total),
        total_income_3_mo: cents(headline.projected.total),
        estimated_monthly_income: cents(headline.monthly_historical()),
        monthly_estimate_historical: cents(headline.monthly_historical()),
        monthly_estimate_projected: cents(headline.monthly_projected()),
        verified_monthly_income: cents(parts.payroll.monthly_projected()),
        projected_annual_income: cents(headline.annual_projected()),
        income_confidence: parts.confidence,
        total_balance: cents(parts.accounts.iter().map(|a| a.current_or_zero()).sum()),
        total_available: cents(parts.accounts.iter().map(|a| a.available_or_current()).sum()),
        account_count: parts.accounts.len(),
        transaction_count: parts.transaction_count,
    };

    let income = IncomeDetail {
        total_12_mo: cents(parts.all_income.historical.total),
        total_3_mo: cents(parts.all_income.projected.total),
        monthly_estimate: cents(parts.all_income.monthly_historical()),
        verified: IncomeBlock::from(&parts.payroll),
        other: IncomeBlock::from(&parts.other),
        primary_source: parts.primary.map(RecurringDepositView::from),
        recurring_deposits: parts.groups.iter().map(RecurringDepositView::from).collect(),
        all_deposits: parts
            .deposits
            .iter()
            .map(|(txn, label)| DepositView::new(txn, label))
            .collect(),
    };

    IncomeReport {
        source: ReportSource::Current,
        provider: Some(parts.provider.to_string()),
        as_of: parts.as_of,
        windows: Some(parts.windows),
        coverage: Some(parts.coverage),
        summary,
        accounts: parts.accounts.iter().map(AccountView::from).collect(),
        income,
        expenses: ExpenseDetail::from(&parts.expenses),
        transactions: parts
            .ledger
            .iter()
            .map(|(txn, is_payroll, balance)| LedgerEntry::new(txn, *is_payroll, *balance))
            .collect(),
        generated_at: parts.generated_at,
    }
}

/// Present a legacy report in the current shape.
///
/// Stored totals are carried verbatim and labelled unverified; no grouping
/// or labels are recomputed because those totals were fixed when the report
/// was created.
pub fn upgrade_legacy(
    legacy: &LegacySnapshot,
    as_of: NaiveDate,
    generated_at: DateTime<Utc>,
) -> IncomeReport {
    let t = &legacy.totals;
    let monthly_projected = t.total_income_3mo / 3.0;

    let account_current: f64 = legacy.accounts.iter().map(|a| a.current_or_zero()).sum();
    let account_available: f64 = legacy.accounts.iter().map(|a| a.available_or_current()).sum();
    let total_balance = t.total_balance.unwrap_or(account_current);
    let total_available = t.total_available.unwrap_or(account_available);

    let deposits: Vec<DepositView> = legacy
        .transactions
        .iter()
        .filter(|txn| txn.is_income && txn.is_aggregatable())
        .map(|txn| DepositView::new(txn, &PayrollMatch::Unmatched))
        .collect();

    let other = IncomeBlock {
        total_12_mo: cents(t.total_income_12mo),
        total_3_mo: cents(t.total_income_3mo),
        monthly_historical: cents(t.monthly_income),
        monthly_projected: cents(monthly_projected),
        annual_projected: cents(monthly_projected * 12.0),
        deposit_count: deposits.len(),
    };

    let ledger = ledger_entries(&legacy.transactions, NaiveDate::MIN, NaiveDate::MAX);
    let balances = running_balances(&ledger, total_balance);

    IncomeReport {
        source: ReportSource::Legacy,
        provider: None,
        as_of,
        windows: None,
        coverage: None,
        summary: ReportSummary {
            total_income_12_mo: cents(t.total_income_12mo),
            total_income_3_mo: cents(t.total_income_3mo),
            estimated_monthly_income: cents(t.monthly_income),
            monthly_estimate_historical: cents(t.monthly_income),
            monthly_estimate_projected: cents(monthly_projected),
            verified_monthly_income: 0.0,
            projected_annual_income: cents(monthly_projected * 12.0),
            income_confidence: LEGACY_CONFIDENCE,
            total_balance: cents(total_balance),
            total_available: cents(total_available),
            account_count: legacy.accounts.len(),
            transaction_count: legacy.transactions.len(),
        },
        accounts: legacy.accounts.iter().map(AccountView::from).collect(),
        income: IncomeDetail {
            total_12_mo: cents(t.total_income_12mo),
            total_3_mo: cents(t.total_income_3mo),
            monthly_estimate: cents(t.monthly_income),
            verified: IncomeBlock::default(),
            other,
            primary_source: None,
            recurring_deposits: Vec::new(),
            all_deposits: deposits,
        },
        expenses: ExpenseDetail {
            by_category: Vec::new(),
            total_12_mo: 0.0,
            total_3_mo: 0.0,
            monthly_average: 0.0,
        },
        transactions: ledger
            .iter()
            .zip(balances)
            .map(|(txn, balance)| LedgerEntry::new(txn, false, balance))
            .collect(),
        generated_at: legacy.generated_at.unwrap_or(generated_at),
    }
}

/// Round to cents, folding `-0.0` into `0.0`
pub fn cents(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}
