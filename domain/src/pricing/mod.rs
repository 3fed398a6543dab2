//! Pricing: token counts → monetary cost.
//!
//! [`RateTable::cost`] is a pure function over a static per-model rate
//! table. Rates are USD per one million tokens.

use crate::core::model::Model;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const TOKENS_PER_UNIT: Decimal = dec!(1000000);

/// Price of one million input and output tokens for a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRate {
    pub input_per_million: Decimal,
    pub output_per_million: Decimal,
}

impl ModelRate {
    pub const fn new(input_per_million: Decimal, output_per_million: Decimal) -> Self {
        Self {
            input_per_million,
            output_per_million,
        }
    }

    pub fn cost(&self, input_tokens: u64, output_tokens: u64) -> Decimal {
        let input = Decimal::from(input_tokens) * self.input_per_million;
        let output = Decimal::from(output_tokens) * self.output_per_million;
        ((input + output) / TOKENS_PER_UNIT).normalize()
    }
}

/// Per-model rates with a fallback for models the table does not list.
#[derive(Debug, Clone)]
pub struct RateTable {
    rates: HashMap<String, ModelRate>,
    fallback: ModelRate,
}

impl RateTable {
    /// Rates are keyed by [`Model::as_str`].
    pub fn new(fallback: ModelRate) -> Self {
        Self {
            rates: HashMap::new(),
            fallback,
        }
    }

    pub fn with_rate(mut self, model: &Model, rate: ModelRate) -> Self {
        self.rates.insert(model.as_str().to_string(), rate);
        self
    }

    /// Apply overrides (e.g. from configuration) on top of this table.
    pub fn with_overrides<'a>(
        mut self,
        overrides: impl IntoIterator<Item = (&'a str, ModelRate)>,
    ) -> Self {
        for (model, rate) in overrides {
            self.rates.insert(Model::from(model).as_str().to_string(), rate);
        }
        self
    }

    pub fn rate_for(&self, model: &Model) -> ModelRate {
        self.rates
            .get(model.as_str())
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn is_listed(&self, model: &Model) -> bool {
        self.rates.contains_key(model.as_str())
    }

    /// Cost of one generation.
    pub fn cost(&self, model: &Model, input_tokens: u64, output_tokens: u64) -> Decimal {
        self.rate_for(model).cost(input_tokens, output_tokens)
    }
}

impl Default for RateTable {
    fn default() -> Self {
        let flash_2_0 = ModelRate::new(dec!(0.10), dec!(0.40));
        RateTable::new(flash_2_0)
            .with_rate(&Model::Gemini15Flash, ModelRate::new(dec!(0.075), dec!(0.30)))
            .with_rate(&Model::Gemini15Pro, ModelRate::new(dec!(1.25), dec!(5.00)))
            .with_rate(&Model::Gemini20Flash, flash_2_0)
            .with_rate(&Model::Gemini20FlashLite, ModelRate::new(dec!(0.075), dec!(0.30)))
            .with_rate(&Model::Gemini25Flash, ModelRate::new(dec!(0.30), dec!(2.50)))
            .with_rate(&Model::Gemini25Pro, ModelRate::new(dec!(1.25), dec!(10.00)))
    }
}

/// Cost using the built-in rate table.
pub fn calculate_cost(model: &Model, input_tokens: u64, output_tokens: u64) -> Decimal {
    RateTable::default().cost(model, input_tokens, output_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_cost() {
        // 1M in @ 0.10 + 1M out @ 0.40
        let cost = calculate_cost(&Model::Gemini20Flash, 1_000_000, 1_000_000);
        assert_eq!(cost, dec!(0.5));
    }

    #[test]
    fn test_small_call_cost() {
        // 1200 * 1.25 / 1M + 300 * 10 / 1M = 0.0015 + 0.003
        let cost = calculate_cost(&Model::Gemini25Pro, 1200, 300);
        assert_eq!(cost, dec!(0.0045));
    }

    #[test]
    fn test_zero_tokens_cost_nothing() {
        assert_eq!(calculate_cost(&Model::Gemini15Pro, 0, 0), Decimal::ZERO);
    }

    #[test]
    fn test_deterministic() {
        let table = RateTable::default();
        let a = table.cost(&Model::Gemini25Flash, 4321, 987);
        let b = table.cost(&Model::Gemini25Flash, 4321, 987);
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_model_uses_fallback() {
        let table = RateTable::default();
        let custom = Model::Custom("gemini-next".to_string());
        assert!(!table.is_listed(&custom));
        assert_eq!(
            table.cost(&custom, 1000, 1000),
            table.cost(&Model::Gemini20Flash, 1000, 1000)
        );
    }

    #[test]
    fn test_overrides() {
        let table = RateTable::default().with_overrides([(
            "googleai/gemini-1.5-flash",
            ModelRate::new(dec!(1), dec!(2)),
        )]);
        assert_eq!(table.cost(&Model::Gemini15Flash, 1_000_000, 0), dec!(1));
        assert_eq!(table.cost(&Model::Gemini15Flash, 0, 500_000), dec!(1));
    }
}
