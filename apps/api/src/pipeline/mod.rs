// Content pipeline: topic → search → URL selection → fetch + summarize → post.
// All model calls go through the `LanguageModel` trait; no stage reads config.

pub mod chunking;
pub mod error;
pub mod handlers;
pub mod prompts;
pub mod runner;
pub mod selection;
pub mod template;
