//! Canonical tool names shared by flow definitions and tool adapters.

pub const LOOKUP_BUSINESS: &str = "lookup_business";
pub const SEARCH_KNOWLEDGE_BASE: &str = "search_knowledge_base";
pub const WEB_SEARCH: &str = "web_search";
pub const SEARCH_IMAGE: &str = "search_image";
pub const CHECK_AVAILABILITY: &str = "check_availability";
pub const CREATE_APPOINTMENT: &str = "create_appointment";

/// Short names models tend to use instead of the canonical ones.
pub const ALIASES: [(&str, &str); 6] = [
    ("business", LOOKUP_BUSINESS),
    ("kb", SEARCH_KNOWLEDGE_BASE),
    ("knowledge_base", SEARCH_KNOWLEDGE_BASE),
    ("web", WEB_SEARCH),
    ("image", SEARCH_IMAGE),
    ("availability", CHECK_AVAILABILITY),
];
