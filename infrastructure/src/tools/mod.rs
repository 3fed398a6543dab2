//! Community platform tools
//!
//! Each tool is a definition plus a typed async function whose return type
//! is the tool's output, negative shape included. [`CommunityToolProvider`]
//! validates calls and serializes those outcomes; [`ToolRegistry`] routes
//! calls (and aliases) to providers.
//!
//! | Tool | Alias | Backing service |
//! |------|-------|-----------------|
//! | `lookup_business` | `business` | business directory |
//! | `search_knowledge_base` | `kb`, `knowledge_base` | knowledge base (embeddings) |
//! | `web_search` | `web` | Google Custom Search |
//! | `search_image` | `image` | Unsplash |
//! | `check_availability` | `availability` | owner's calendar |
//! | `create_appointment` | | owner's calendar |

pub mod business;
pub mod calendar;
pub mod knowledge;
pub mod provider;
pub mod registry;
pub mod schema;
pub mod web;

pub use calendar::CalendarTools;
pub use provider::CommunityToolProvider;
pub use registry::{RegistryStats, ToolRegistry};
pub use schema::JsonSchemaToolConverter;
pub use web::{GoogleWebSearch, UnsplashImageSearch};
