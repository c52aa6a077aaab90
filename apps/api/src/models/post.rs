use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::topic::Topic;
use crate::search::SearchResult;

/// Everything one pipeline run produced, in stage order. Transient: returned
/// to the caller and never stored.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub run_id: Uuid,
    pub topic: Topic,
    pub query: String,
    pub search_results: Vec<SearchResult>,
    pub selected_url: String,
    /// Page text after extraction and the size cap, as summarized.
    pub page_text: String,
    /// Characters in `page_text`.
    pub page_chars: usize,
    /// One summary per page chunk, in page order.
    pub summaries: Vec<String>,
    pub summary: String,
    pub post: String,
    pub generated_at: DateTime<Utc>,
}
