//! Income/expense partition over normalized transactions.
//!
//! Relies only on the canonical sign, so it never needs to know the provider.
//! Every transaction lands in exactly one side; an unreadable amount counts
//! as a zero expense.

use incomelens_core::NormalizedTransaction;

#[derive(Debug, Default)]
pub struct IncomeExpenseSplit<'a> {
    pub income: Vec<&'a NormalizedTransaction>,
    pub expenses: Vec<&'a NormalizedTransaction>,
}

impl<'a> IncomeExpenseSplit<'a> {
    pub fn income_total(&self) -> f64 {
        signed_total(&self.income)
    }

    pub fn expense_total(&self) -> f64 {
        signed_total(&self.expenses)
    }

    pub fn len(&self) -> usize {
        self.income.len() + self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn split(txns: &[NormalizedTransaction]) -> IncomeExpenseSplit<'_> {
    let (income, expenses): (Vec<_>, Vec<_>) = txns.iter().partition(|t| t.is_income);
    IncomeExpenseSplit { income, expenses }
}

/// Sum of canonical amounts, in slice order
pub fn signed_total(txns: &[&NormalizedTransaction]) -> f64 {
    txns.iter().map(|t| t.signed_amount()).sum()
}
