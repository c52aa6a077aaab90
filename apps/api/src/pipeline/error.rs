use thiserror::Error;

use crate::fetch::FetchError;
use crate::llm_client::LlmError;
use crate::pipeline::selection::SelectionError;
use crate::pipeline::template::TemplateError;
use crate::search::SearchError;

/// Failure of a model-backed stage whose only output check is "not empty".
#[derive(Debug, Error)]
pub enum ModelOutputError {
    #[error("model call failed: {0}")]
    Model(#[from] LlmError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("model returned empty output")]
    Empty,
}

/// A pipeline failure, tagged by the stage that failed. A run aborts on the
/// first one.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    #[error("URL selection failed: {0}")]
    Selection(#[from] SelectionError),

    #[error("page fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("summarization failed: {0}")]
    Summarization(ModelOutputError),

    #[error("post generation failed: {0}")]
    Generation(ModelOutputError),
}

impl PipelineError {
    /// Stable error-kind name shown to the user.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Search(_) => "SearchError",
            PipelineError::Selection(_) => "SelectionError",
            PipelineError::Fetch(_) => "FetchError",
            PipelineError::Summarization(_) => "SummarizationError",
            PipelineError::Generation(_) => "GenerationError",
        }
    }
}
