//! Built-in flows used across the platform.

use super::definition::FlowDefinition;
use super::schema::{FieldType, Schema};
use crate::tool::names;
use std::collections::BTreeMap;

pub const COMMUNITY_ASSISTANT: &str = "community_assistant";
pub const BUSINESS_DESCRIPTION: &str = "business_description";
pub const BLOG_POST_DRAFT: &str = "blog_post_draft";
pub const JOB_POSTING_SUMMARY: &str = "job_posting_summary";
pub const LISTING_DESCRIPTION: &str = "listing_description";

/// Registry of flow definitions keyed by name.
#[derive(Debug, Clone, Default)]
pub struct FlowCatalog {
    flows: BTreeMap<String, FlowDefinition>,
}

impl FlowCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with every built-in flow registered.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register(community_assistant());
        catalog.register(business_description());
        catalog.register(blog_post_draft());
        catalog.register(job_posting_summary());
        catalog.register(listing_description());
        catalog
    }

    pub fn register(&mut self, flow: FlowDefinition) {
        self.flows.insert(flow.name.clone(), flow);
    }

    pub fn get(&self, name: &str) -> Option<&FlowDefinition> {
        self.flows.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.flows.keys().map(String::as_str).collect()
    }

    pub fn all(&self) -> impl Iterator<Item = &FlowDefinition> {
        self.flows.values()
    }
}

/// Chat reply for the community assistant.
///
/// Conversation history is sent as prior turns; only the newest message is
/// rendered here.
pub fn community_assistant() -> FlowDefinition {
    FlowDefinition::new(
        COMMUNITY_ASSISTANT,
        "Answer a community member's chat message",
        "{% if participantName %}You are talking with {{ participantName }}.\n{% endif %}\
{% if businessId %}This conversation concerns the business with id \"{{ businessId }}\". \
Use lookup_business to fetch its details before answering questions about it.\n{% endif %}\
{{ message }}",
    )
    .with_input(
        Schema::new()
            .required("message", FieldType::String, "The member's newest message")
            .optional("businessId", FieldType::String, "Business the conversation is about")
            .optional("participantName", FieldType::String, "Display name of the member"),
    )
    .with_output(Schema::new().required("reply", FieldType::String, "Reply shown to the member"))
    .with_system(
        "Use the tools to look up businesses, search the knowledge base or the web, \
and check calendar availability before booking. Only create an appointment after the \
member has confirmed a time. If a tool finds nothing, say so plainly.",
    )
    .with_tools(&[
        names::LOOKUP_BUSINESS,
        names::SEARCH_KNOWLEDGE_BASE,
        names::WEB_SEARCH,
        names::CHECK_AVAILABILITY,
        names::CREATE_APPOINTMENT,
    ])
}

pub fn business_description() -> FlowDefinition {
    FlowDefinition::new(
        BUSINESS_DESCRIPTION,
        "Write directory listing copy for a local business",
        "Write a friendly two-paragraph description for the local business \"{{ name }}\" \
in the {{ category }} category.\
{% if keywords %} Work in these keywords naturally: {{ keywords | join(\", \") }}.{% endif %}",
    )
    .with_input(
        Schema::new()
            .required("name", FieldType::String, "Business name")
            .required("category", FieldType::String, "Business category")
            .optional("keywords", FieldType::array_of(FieldType::String), "Keywords to include"),
    )
    .with_output(Schema::new().required("description", FieldType::String, "Listing description"))
}

pub fn blog_post_draft() -> FlowDefinition {
    FlowDefinition::new(
        BLOG_POST_DRAFT,
        "Draft a community blog post",
        "Draft a blog post about: {{ topic }}.\
{% if audience %} The intended audience is {{ audience }}.{% endif %} \
Use search_image to find a fitting header image and return the query you used as imageQuery.",
    )
    .with_input(
        Schema::new()
            .required("topic", FieldType::String, "Post topic")
            .optional("audience", FieldType::String, "Intended readers"),
    )
    .with_output(
        Schema::new()
            .required("title", FieldType::String, "Post title")
            .required("body", FieldType::String, "Post body in Markdown")
            .required("imageQuery", FieldType::String, "Query for the header image"),
    )
    .with_tools(&[names::SEARCH_IMAGE])
}

pub fn job_posting_summary() -> FlowDefinition {
    FlowDefinition::new(
        JOB_POSTING_SUMMARY,
        "Summarize a job posting for the job board",
        "Summarize this job posting for local job seekers.\n\
Title: {{ title }}\nCompany: {{ company }}\nLocation: {{ location }}\n\
Requirements:\n{% for r in requirements %}- {{ r }}\n{% endfor %}",
    )
    .with_input(
        Schema::new()
            .required("title", FieldType::String, "Job title")
            .required("company", FieldType::String, "Hiring company")
            .required("location", FieldType::String, "Job location")
            .required("requirements", FieldType::array_of(FieldType::String), "Requirements"),
    )
    .with_output(
        Schema::new()
            .required("summary", FieldType::String, "Short summary")
            .required("highlights", FieldType::array_of(FieldType::String), "Key highlights"),
    )
}

pub fn listing_description() -> FlowDefinition {
    FlowDefinition::new(
        LISTING_DESCRIPTION,
        "Write a real-estate listing description",
        "Write a real-estate listing for {{ address }}: {{ bedrooms }} bedrooms, \
{{ bathrooms }} bathrooms.\
{% if features %} Features: {{ features | join(\", \") }}.{% endif %}",
    )
    .with_input(
        Schema::new()
            .required("address", FieldType::String, "Property address")
            .required("bedrooms", FieldType::Integer, "Bedroom count")
            .required("bathrooms", FieldType::Number, "Bathroom count")
            .required("features", FieldType::array_of(FieldType::String), "Notable features"),
    )
    .with_output(
        Schema::new()
            .required("headline", FieldType::String, "Listing headline")
            .required("description", FieldType::String, "Listing body"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_names() {
        let catalog = FlowCatalog::builtin();
        assert_eq!(
            catalog.names(),
            vec![
                BLOG_POST_DRAFT,
                BUSINESS_DESCRIPTION,
                COMMUNITY_ASSISTANT,
                JOB_POSTING_SUMMARY,
                LISTING_DESCRIPTION,
            ]
        );
        assert!(catalog.get("unknown").is_none());
    }

    #[test]
    fn test_assistant_prompt() {
        let flow = community_assistant();
        let prompt = flow
            .render_prompt(&json!({"message": "Are you open Sunday?", "businessId": "abc123"}))
            .unwrap();
        assert!(prompt.contains("\"abc123\""));
        assert!(prompt.ends_with("Are you open Sunday?"));

        let plain = flow.render_prompt(&json!({"message": "Hi"})).unwrap();
        assert_eq!(plain, "Hi");
        assert!(flow.tools.contains(&names::CREATE_APPOINTMENT.to_string()));
    }

    #[test]
    fn test_every_builtin_template_renders() {
        let inputs = [
            (COMMUNITY_ASSISTANT, json!({"message": "hello"})),
            (BUSINESS_DESCRIPTION, json!({"name": "Corner Bakery", "category": "Food", "keywords": ["sourdough", "coffee"]})),
            (BLOG_POST_DRAFT, json!({"topic": "Spring cleanup day", "audience": "families"})),
            (JOB_POSTING_SUMMARY, json!({"title": "Barista", "company": "Corner Bakery", "location": "Main St", "requirements": ["Early mornings"]})),
            (LISTING_DESCRIPTION, json!({"address": "12 Elm St", "bedrooms": 3, "bathrooms": 1.5, "features": ["garden"]})),
        ];
        let catalog = FlowCatalog::builtin();
        for (name, input) in inputs {
            let flow = catalog.get(name).unwrap();
            flow.input.validate(&input).unwrap();
            let prompt = flow.render_prompt(&input).unwrap();
            assert!(!prompt.is_empty(), "{name} rendered empty");
        }
    }

    #[test]
    fn test_listing_prompt_joins_features() {
        let prompt = listing_description()
            .render_prompt(&json!({"address": "12 Elm St", "bedrooms": 3, "bathrooms": 2, "features": ["garden", "garage"]}))
            .unwrap();
        assert!(prompt.contains("3 bedrooms"));
        assert!(prompt.contains("Features: garden, garage."));
    }
}
