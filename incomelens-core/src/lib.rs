//! incomelens-core: canonical record types and calendar-window helpers for the income engine

pub mod income;
pub mod time;
pub mod transaction;
pub mod window;

pub use income::{Confidence, IncomeType, PayFrequency, RecurringSourceGroup};
pub use transaction::{NormalizedAccount, NormalizedTransaction, RecordIssue};
pub use window::EvaluationWindow;
