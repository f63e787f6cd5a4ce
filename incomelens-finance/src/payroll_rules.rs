//! Payroll keyword rules and the classifier built from them.
//!
//! Exclusions are checked before inclusions and short-circuit: transfer and
//! refund memos often carry payroll-ish tokens, so they must be pruned first.
//! Matching is lowercase substring search, no tokenization, so arbitrary
//! bank-formatted memo strings still match.

use serde::{Deserialize, Serialize};

pub const RULES_VERSION: u32 = 1;

/// Peer-to-peer apps, own-account transfers, refunds, remittance services
const DEFAULT_EXCLUSIONS: &[&str] = &[
    "venmo",
    "zelle",
    "cash app",
    "cashapp",
    "square cash",
    "paypal",
    "apple cash",
    "transfer from",
    "transfer to",
    "online transfer",
    "internal transfer",
    "xfer",
    "from savings",
    "from checking",
    "refund",
    "return",
    "reversal",
    "western union",
    "moneygram",
    "remitly",
    "wise.com",
    "transferwise",
];

/// Generic wage terms and payroll processors
const DEFAULT_INCLUSIONS: &[&str] = &[
    "payroll",
    "salary",
    "direct dep",
    "direct deposit",
    "dir dep",
    "wage",
    "net pay",
    "paycheck",
    "adp",
    "gusto",
    "paychex",
    "trinet",
    "justworks",
    "rippling",
    "workday",
    "ceridian",
    "dayforce",
    "paylocity",
    "zenefits",
];

/// The shared, versioned keyword rule set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollRules {
    pub version: u32,
    pub exclusions: Vec<String>,
    pub inclusions: Vec<String>,
}

impl Default for PayrollRules {
    fn default() -> Self {
        Self {
            version: RULES_VERSION,
            exclusions: DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
            inclusions: DEFAULT_INCLUSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PayrollRules {
    /// First blank keyword, if any. A blank keyword would match every memo.
    pub fn blank_keyword(&self) -> Option<&'static str> {
        if self.exclusions.iter().any(|k| k.trim().is_empty()) {
            return Some("exclusions");
        }
        if self.inclusions.iter().any(|k| k.trim().is_empty()) {
            return Some("inclusions");
        }
        None
    }
}

/// Why a description was or was not labelled payroll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PayrollMatch {
    Excluded { keyword: String },
    Included { keyword: String },
    Unmatched,
}

impl PayrollMatch {
    pub fn is_payroll(&self) -> bool {
        matches!(self, PayrollMatch::Included { .. })
    }

    /// The keyword that decided the outcome
    pub fn keyword(&self) -> Option<&str> {
        match self {
            PayrollMatch::Excluded { keyword } | PayrollMatch::Included { keyword } => Some(keyword),
            PayrollMatch::Unmatched => None,
        }
    }
}

/// Keyword classifier over lowercased rule lists.
///
/// Labels are never stored; callers recompute them so a rule change applies
/// to every report generated afterwards.
#[derive(Debug, Clone)]
pub struct PayrollClassifier {
    version: u32,
    exclusions: Vec<String>,
    inclusions: Vec<String>,
}

impl PayrollClassifier {
    pub fn new(rules: &PayrollRules) -> Self {
        let fold = |list: &[String]| -> Vec<String> {
            list.iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect()
        };

        Self {
            version: rules.version,
            exclusions: fold(&rules.exclusions),
            inclusions: fold(&rules.inclusions),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn explain(&self, description: &str) -> PayrollMatch {
        let desc = description.to_lowercase();

        if let Some(k) = self.exclusions.iter().find(|k| desc.contains(k.as_str())) {
            return PayrollMatch::Excluded { keyword: k.clone() };
        }

        if let Some(k) = self.inclusions.iter().find(|k| desc.contains(k.as_str())) {
            return PayrollMatch::Included { keyword: k.clone() };
        }

        PayrollMatch::Unmatched
    }

    pub fn is_payroll(&self, description: &str) -> bool {
        self.explain(description).is_payroll()
    }
}

impl Default for PayrollClassifier {
    fn default() -> Self {
        Self::new(&PayrollRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payroll_terms_are_included() {
        let c = PayrollClassifier::default();
        assert!(c.is_payroll("ACME Corporation Payroll"));
        assert!(c.is_payroll("GUSTO PAY 123456"));
        assert!(c.is_payroll("Direct Deposit - INITECH"));
        assert!(c.is_payroll("adp wage garnish adj"));
        assert!(!c.is_payroll("STARBUCKS #1234"));
        assert!(!c.is_payroll(""));
    }

    #[test]
    fn test_exclusion_takes_precedence() {
        let c = PayrollClassifier::default();
        // Both lists match; the exclusion must win.
        assert_eq!(
            c.explain("Venmo payroll reimbursement"),
            PayrollMatch::Excluded { keyword: "venmo".to_string() }
        );
        assert!(!c.is_payroll("ONLINE TRANSFER FROM SAVINGS salary fund"));
        assert!(!c.is_payroll("PAYROLL REVERSAL"));
        assert!(!c.is_payroll("Zelle from ACME payroll dept"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let c = PayrollClassifier::default();
        assert!(c.is_payroll("PAYROLL"));
        assert!(c.is_payroll("payroll"));
        assert!(c.is_payroll("PaYrOlL"));
        assert!(!c.is_payroll("VENMO CASHOUT"));
    }

    #[test]
    fn test_custom_rules_are_lowercased() {
        let rules = PayrollRules {
            version: 7,
            exclusions: vec!["BONUS POOL".to_string()],
            inclusions: vec!["  Stipend ".to_string(), "".to_string()],
        };
        let c = PayrollClassifier::new(&rules);
        assert_eq!(c.version(), 7);
        assert_eq!(
            c.explain("University STIPEND"),
            PayrollMatch::Included { keyword: "stipend".to_string() }
        );
        assert!(!c.is_payroll("bonus pool stipend"));
        // Default terms are not implied by custom rules.
        assert!(!c.is_payroll("ACME PAYROLL"));
        assert_eq!(rules.blank_keyword(), Some("inclusions"));
    }

    #[test]
    fn test_explain_keyword() {
        let c = PayrollClassifier::default();
        assert_eq!(c.explain("ACME PAYROLL").keyword(), Some("payroll"));
        assert_eq!(c.explain("grocery store").keyword(), None);
    }
}
