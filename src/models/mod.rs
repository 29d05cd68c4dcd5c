use serde::{Deserialize, Serialize};
use std::fmt;

pub mod job;
pub mod report;

// Re-exports for convenience
pub use job::*;
pub use report::*;

// Common enums used across models
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Company {
    #[serde(rename = "Binance")]
    Binance,
    #[serde(rename = "OKX")]
    Okx,
    #[serde(rename = "Bitget")]
    Bitget,
}

impl Company {
    pub const ALL: [Company; 3] = [Company::Binance, Company::Okx, Company::Bitget];

    pub fn as_str(&self) -> &'static str {
        match self {
            Company::Binance => "Binance",
            Company::Okx => "OKX",
            Company::Bitget => "Bitget",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|company| company.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MatchReason {
    #[serde(rename = "Location: Hong Kong")]
    HongKong,
    #[serde(rename = "Graduate position (non-mainland)")]
    GraduateNonMainland,
}

impl MatchReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchReason::HongKong => "Location: Hong Kong",
            MatchReason::GraduateNonMainland => "Graduate position (non-mainland)",
        }
    }
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_serialization() {
        assert_eq!(serde_json::to_string(&Company::Binance).unwrap(), "\"Binance\"");
        assert_eq!(serde_json::to_string(&Company::Okx).unwrap(), "\"OKX\"");
        assert_eq!(serde_json::to_string(&Company::Bitget).unwrap(), "\"Bitget\"");
    }

    #[test]
    fn test_company_from_name() {
        assert_eq!(Company::from_name("okx"), Some(Company::Okx));
        assert_eq!(Company::from_name(" Bitget "), Some(Company::Bitget));
        assert_eq!(Company::from_name("coinbase"), None);
    }

    #[test]
    fn test_match_reason_serialization() {
        assert_eq!(
            serde_json::to_string(&MatchReason::HongKong).unwrap(),
            "\"Location: Hong Kong\""
        );
        assert_eq!(
            serde_json::to_string(&MatchReason::GraduateNonMainland).unwrap(),
            "\"Graduate position (non-mainland)\""
        );

        let parsed: MatchReason = serde_json::from_str("\"Location: Hong Kong\"").unwrap();
        assert_eq!(parsed, MatchReason::HongKong);
    }
}
