//! Plain-text rendering of a report for the terminal

use std::fmt::Write;

use incomelens_finance::IncomeReport;
use incomelens_finance::report::ReportSource;

pub fn render_text(report: &IncomeReport) -> String {
    let mut out = String::new();
    let s = &report.summary;

    let source = match report.source {
        ReportSource::Current => report.provider.as_deref().unwrap_or("current"),
        ReportSource::Legacy => "legacy report",
    };
    let _ = writeln!(out, "Income report as of {} ({source})", report.as_of);
    if let Some(w) = &report.windows {
        let _ = writeln!(
            out,
            "Windows: historical {} .. {} | projected {} .. {}",
            w.historical.start, w.historical.end, w.projected.start, w.projected.end
        );
    }
    if let Some(history_start) = report.coverage.and_then(|c| c.history_start) {
        let _ = writeln!(out, "History from: {history_start}");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Confidence:            {}", s.income_confidence.label());
    let _ = writeln!(out, "Income (12 mo):        ${:>12.2}", s.total_income_12_mo);
    let _ = writeln!(out, "Income (3 mo):         ${:>12.2}", s.total_income_3_mo);
    let _ = writeln!(out, "Est. monthly:          ${:>12.2}", s.estimated_monthly_income);
    let _ = writeln!(out, "Verified monthly:      ${:>12.2}", s.verified_monthly_income);
    let _ = writeln!(out, "Projected annual:      ${:>12.2}", s.projected_annual_income);
    let _ = writeln!(
        out,
        "Balance:               ${:>12.2} (available ${:.2}) across {} accounts",
        s.total_balance, s.total_available, s.account_count
    );

    if let Some(p) = &report.income.primary_source {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Primary source: {} | {:?} | {} deposits of ~${:.2}",
            p.display_name, p.frequency, p.occurrence_count, p.approximate_amount
        );
    }

    if !report.income.recurring_deposits.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Recurring deposits (12 mo):");
        for g in &report.income.recurring_deposits {
            let _ = writeln!(
                out,
                "  {:<22} {:>3}x  ${:>11.2}  {:?}  [{}]",
                g.source_key,
                g.occurrence_count,
                g.total_amount,
                g.frequency,
                g.confidence.label()
            );
        }
    }

    if !report.expenses.by_category.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Expenses (12 mo): ${:.2}, ${:.2}/mo",
            report.expenses.total_12_mo, report.expenses.monthly_average
        );
        for c in &report.expenses.by_category {
            let _ = writeln!(
                out,
                "  {:<28} ${:>11.2}  {:>5.1}%  ({})",
                c.category, c.total, c.pct, c.count
            );
        }
    }

    let flagged = report.transactions.iter().filter(|t| !t.issues.is_empty()).count();
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Ledger: {} rows ({} flagged)",
        report.transactions.len(),
        flagged
    );
    out
}
