//! `lookup_business`: directory entry for a business id.
//!
//! Unknown ids and storage failures both come back as
//! [`BusinessLookup::NotFound`], so the model can say it does not know the
//! business instead of the whole flow failing.

use neighborly_application::BusinessDirectory;
use neighborly_domain::tool::names::LOOKUP_BUSINESS;
use neighborly_domain::{BusinessLookup, ToolDefinition, ToolEffect, ToolParameter};
use tracing::warn;

pub fn lookup_business_definition() -> ToolDefinition {
    ToolDefinition::new(
        LOOKUP_BUSINESS,
        "Look up a local business by its place id. Returns name, category, address, \
         phone, website and description, or isFound=false.",
        ToolEffect::ReadOnly,
    )
    .with_parameter(ToolParameter::new("businessId", "Place id of the business", true))
}

pub async fn lookup_business(directory: &dyn BusinessDirectory, business_id: &str) -> BusinessLookup {
    match directory.find_business(business_id).await {
        Ok(found) => BusinessLookup::from(found),
        Err(e) => {
            warn!(tool = LOOKUP_BUSINESS, business_id, error = %e, "Business lookup failed");
            BusinessLookup::NotFound
        }
    }
}
