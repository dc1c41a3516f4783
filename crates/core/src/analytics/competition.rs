use std::fmt;

use serde::{Deserialize, Serialize};

pub const HIGH_COMPETITION_ABOVE: u64 = 5_000;
pub const MEDIUM_COMPETITION_ABOVE: u64 = 1_000;

/// Market saturation proxy derived from a raw order count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
}

impl CompetitionLevel {
    pub fn from_order_count(order_count: u64) -> Self {
        if order_count > HIGH_COMPETITION_ABOVE {
            Self::High
        } else if order_count > MEDIUM_COMPETITION_ABOVE {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "Very popular (high competition)",
            Self::Medium => "Popular (medium competition)",
            Self::Low => "Niche (low competition)",
        }
    }
}

impl fmt::Display for CompetitionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::CompetitionLevel;

    #[test]
    fn thresholds_are_exclusive_on_the_lower_side() {
        assert_eq!(CompetitionLevel::from_order_count(0), CompetitionLevel::Low);
        assert_eq!(CompetitionLevel::from_order_count(1_000), CompetitionLevel::Low);
        assert_eq!(CompetitionLevel::from_order_count(1_001), CompetitionLevel::Medium);
        assert_eq!(CompetitionLevel::from_order_count(5_000), CompetitionLevel::Medium);
        assert_eq!(CompetitionLevel::from_order_count(5_001), CompetitionLevel::High);
        assert_eq!(CompetitionLevel::from_order_count(u64::MAX), CompetitionLevel::High);
    }

    #[test]
    fn serializes_as_snake_case() {
        let encoded = serde_json::to_string(&CompetitionLevel::Medium).expect("serialize");
        assert_eq!(encoded, "\"medium\"");
        assert_eq!(CompetitionLevel::High.to_string(), "Very popular (high competition)");
    }
}
