//! incomelens-finance: payroll classification, recurring-source grouping,
//! window aggregation and report assembly.

pub mod aggregate;
pub mod confidence;
pub mod config;
pub mod engine;
pub mod error;
pub mod payroll_rules;
pub mod recurring;
pub mod report;
pub mod split;

pub use config::EngineConfig;
pub use engine::{IncomeEngine, ReportContext};
pub use error::EngineError;
pub use payroll_rules::{PayrollClassifier, PayrollMatch, PayrollRules};
pub use report::IncomeReport;
