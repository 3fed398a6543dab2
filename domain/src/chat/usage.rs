//! Token usage and cost value objects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Token counts reported by the model backend for one or more calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    /// Build a usage record; `total_tokens` is always `input + output`.
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total_tokens == 0
    }
}

impl Add for TokenUsage {
    type Output = TokenUsage;

    fn add(self, rhs: TokenUsage) -> TokenUsage {
        TokenUsage::new(
            self.input_tokens + rhs.input_tokens,
            self.output_tokens + rhs.output_tokens,
        )
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: TokenUsage) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for TokenUsage {
    fn sum<I: Iterator<Item = TokenUsage>>(iter: I) -> Self {
        iter.fold(TokenUsage::default(), |acc, u| acc + u)
    }
}

/// Usage and its priced cost, attached to the message whose generation
/// produced it.
///
/// Kept as one value so a message has either both or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub usage: TokenUsage,
    pub cost: Decimal,
}

impl UsageRecord {
    pub fn new(usage: TokenUsage, cost: Decimal) -> Self {
        Self { usage, cost }
    }
}

/// Running aggregate kept on a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTotals {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub cost: Decimal,
}

impl SessionTotals {
    pub fn record(&mut self, record: &UsageRecord) {
        self.input_tokens += record.usage.input_tokens;
        self.output_tokens += record.usage.output_tokens;
        self.total_tokens += record.usage.total_tokens;
        self.cost += record.cost;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_is_derived() {
        let usage = TokenUsage::new(120, 30);
        assert_eq!(usage.total_tokens, 150);
        assert!(!usage.is_zero());
        assert!(TokenUsage::default().is_zero());
    }

    #[test]
    fn test_usage_sum() {
        let total: TokenUsage = vec![TokenUsage::new(10, 5), TokenUsage::new(7, 3)]
            .into_iter()
            .sum();
        assert_eq!(total, TokenUsage::new(17, 8));
    }

    #[test]
    fn test_totals_record() {
        let mut totals = SessionTotals::default();
        totals.record(&UsageRecord::new(TokenUsage::new(100, 50), dec!(0.00003)));
        totals.record(&UsageRecord::new(TokenUsage::new(10, 5), dec!(0.000003)));
        assert_eq!(totals.input_tokens, 110);
        assert_eq!(totals.output_tokens, 55);
        assert_eq!(totals.total_tokens, 165);
        assert_eq!(totals.cost, dec!(0.000033));
    }

    #[test]
    fn test_usage_record_serializes_camel_case() {
        let record = UsageRecord::new(TokenUsage::new(3, 4), dec!(0.5));
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["usage"]["inputTokens"], 3);
        assert_eq!(json["usage"]["totalTokens"], 7);
        assert_eq!(json["cost"], "0.5");
    }
}
