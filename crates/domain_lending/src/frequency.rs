//! Repayment frequencies
//!
//! A loan's term is always expressed in months; the repayment frequency
//! determines how many installments that term is divided into.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How often loan repayments fall due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentFrequency {
    /// Daily collections (30 installments per month)
    Daily,
    /// Weekly collections (4 installments per month)
    Weekly,
    /// Fortnightly collections (2 installments per month)
    Fortnightly,
    /// Monthly installments
    Monthly,
}

impl RepaymentFrequency {
    /// Returns the number of installments for a term of `months`
    pub fn installments(&self, months: u32) -> u32 {
        match self {
            RepaymentFrequency::Daily => months * 30,
            RepaymentFrequency::Weekly => months * 4,
            RepaymentFrequency::Fortnightly => months * 2,
            RepaymentFrequency::Monthly => months,
        }
    }

    /// Returns the stable string tag used in storage and reporting
    pub fn as_str(&self) -> &'static str {
        match self {
            RepaymentFrequency::Daily => "daily",
            RepaymentFrequency::Weekly => "weekly",
            RepaymentFrequency::Fortnightly => "fortnightly",
            RepaymentFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for RepaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installments_per_frequency() {
        assert_eq!(RepaymentFrequency::Daily.installments(6), 180);
        assert_eq!(RepaymentFrequency::Weekly.installments(6), 24);
        assert_eq!(RepaymentFrequency::Fortnightly.installments(6), 12);
        assert_eq!(RepaymentFrequency::Monthly.installments(6), 6);
    }

    #[test]
    fn test_serde_tags() {
        let json = serde_json::to_string(&RepaymentFrequency::Fortnightly).unwrap();
        assert_eq!(json, "\"fortnightly\"");
    }
}
