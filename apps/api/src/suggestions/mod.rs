// AI-assisted goal suggestions.
// Flow: handlers -> context assembler -> registry.submit -> background provider call -> poll.
// All backend calls go through llm_client; the tier policy lives in tier.rs.

pub mod context;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod provider;
pub mod registry;
pub mod tier;
