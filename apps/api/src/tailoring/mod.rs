// Resume tailoring pipeline.
// Implements: section segmentation, keyword extraction, LLM tailoring with local fallback.
// All LLM calls go through llm_client::TextGenerator.

pub mod handlers;
pub mod keywords;
pub mod orchestrator;
pub mod prompts;
pub mod sections;
