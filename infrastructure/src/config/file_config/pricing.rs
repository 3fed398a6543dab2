//! Rate overrides (`[pricing."<model>"]` tables)
//!
//! ```toml
//! [pricing."gemini-2.5-flash"]
//! input_per_million = "0.30"
//! output_per_million = "2.50"
//! ```

use neighborly_domain::{ModelRate, RateTable};
use std::collections::BTreeMap;

/// USD per million tokens, keyed by model id.
pub type FilePricingConfig = BTreeMap<String, ModelRate>;

/// Built-in rate table with the configured overrides applied.
pub fn rate_table(pricing: &FilePricingConfig) -> RateTable {
    RateTable::default().with_overrides(pricing.iter().map(|(model, rate)| (model.as_str(), *rate)))
}
