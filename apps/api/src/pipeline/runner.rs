//! Content pipeline: turns a topic into a social-media post.
//!
//! Flow: search(topic) → model picks one result URL → fetch page →
//!       summarize page chunks → model writes the post.
//!
//! Stages run strictly in order; the first failure aborts the run and is
//! reported tagged with its stage. Nothing is retried or persisted.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::fetch::{FetchError, PageFetcher};
use crate::llm_client::{CompletionParams, LanguageModel};
use crate::models::post::PipelineRun;
use crate::models::topic::Topic;
use crate::pipeline::chunking::{cap_chars, split_into_chunks, CHUNK_CHARS, CHUNK_OVERLAP_CHARS};
use crate::pipeline::error::{ModelOutputError, PipelineError};
use crate::pipeline::prompts::{
    GENERATE_POST_PROMPT_TEMPLATE, SELECT_URL_PROMPT_TEMPLATE, SUMMARIZE_PROMPT_TEMPLATE,
};
use crate::pipeline::selection::{format_candidates, parse_selection, SelectionError};
use crate::pipeline::template::render;
use crate::search::{SearchClient, SearchError, SearchResult};

const SELECT_TEMPERATURE: f32 = 1.0;
const SELECT_MAX_TOKENS: u32 = 256;
const SUMMARIZE_TEMPERATURE: f32 = 0.7;
const SUMMARIZE_MAX_TOKENS: u32 = 1024;
const GENERATE_TEMPERATURE: f32 = 0.7;
const GENERATE_MAX_TOKENS: u32 = 2048;

/// Run-independent knobs, taken from `Config` at startup.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub model: String,
    /// Cap on page text characters handed to summarization.
    pub max_page_chars: usize,
}

/// Page text after fetching and sizing.
struct PageText {
    text: String,
    chars: usize,
    chunks: Vec<String>,
}

#[derive(Clone)]
pub struct ContentPipeline {
    search: Arc<dyn SearchClient>,
    llm: Arc<dyn LanguageModel>,
    fetcher: Arc<dyn PageFetcher>,
    settings: PipelineSettings,
}

impl ContentPipeline {
    pub fn new(
        search: Arc<dyn SearchClient>,
        llm: Arc<dyn LanguageModel>,
        fetcher: Arc<dyn PageFetcher>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            search,
            llm,
            fetcher,
            settings,
        }
    }

    /// Runs all four stages and returns the generated post.
    // The HTTP surface uses `run_detailed`; this is the post-only entry point.
    #[allow(dead_code)]
    pub async fn run(&self, topic: &Topic) -> Result<String, PipelineError> {
        Ok(self.run_detailed(topic).await?.post)
    }

    /// Same as `run`, but also returns every intermediate artifact.
    pub async fn run_detailed(&self, topic: &Topic) -> Result<PipelineRun, PipelineError> {
        let run_id = Uuid::new_v4();
        let result = self.execute(run_id, topic).await;
        if let Err(e) = &result {
            warn!(%run_id, kind = e.kind(), "Pipeline run failed: {e}");
        }
        result
    }

    #[instrument(skip_all, fields(run_id = %run_id, topic = %topic))]
    async fn execute(&self, run_id: Uuid, topic: &Topic) -> Result<PipelineRun, PipelineError> {
        // Stage 1: query
        let query = topic.as_str().to_string();
        let search_results = self.search_stage(&query).await?;
        info!(count = search_results.len(), "Search stage complete");

        // Stage 2: URL selection
        let selected_url = self.select_stage(topic, &search_results).await?;
        info!(url = %selected_url, "URL selection stage complete");

        // Stage 3: fetch and summarize
        let page = self.fetch_stage(&selected_url).await?;
        info!(
            page_chars = page.chars,
            chunks = page.chunks.len(),
            "Fetch stage complete"
        );
        let summaries = self
            .summarize_stage(topic, &page.chunks)
            .await
            .map_err(PipelineError::Summarization)?;
        let summary = summaries.join("\n\n");
        info!(summary_chars = summary.len(), "Summarization stage complete");

        // Stage 4: generation
        let post = self
            .generate_stage(topic, &summary)
            .await
            .map_err(PipelineError::Generation)?;
        info!(post_chars = post.len(), "Generation stage complete");

        Ok(PipelineRun {
            run_id,
            topic: topic.clone(),
            query,
            search_results,
            selected_url,
            page_text: page.text,
            page_chars: page.chars,
            summaries,
            summary,
            post,
            generated_at: Utc::now(),
        })
    }

    async fn search_stage(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let results = self.search.search(query).await?;
        if results.is_empty() {
            return Err(SearchError::NoResults {
                query: query.to_string(),
            });
        }
        Ok(results)
    }

    async fn select_stage(
        &self,
        topic: &Topic,
        candidates: &[SearchResult],
    ) -> Result<String, SelectionError> {
        let listing = format_candidates(candidates);
        let prompt = render(
            SELECT_URL_PROMPT_TEMPLATE,
            &[("topic", topic.as_str()), ("candidates", listing.as_str())],
        )?;

        let response = self
            .llm
            .complete(&prompt, &self.params(SELECT_TEMPERATURE, SELECT_MAX_TOKENS))
            .await?;

        parse_selection(&response, candidates)
    }

    async fn fetch_stage(&self, url: &str) -> Result<PageText, FetchError> {
        let text = self.fetcher.fetch(url).await?;

        let capped = cap_chars(&text, self.settings.max_page_chars);
        let chunks = split_into_chunks(capped, CHUNK_CHARS, CHUNK_OVERLAP_CHARS);
        if chunks.is_empty() {
            return Err(FetchError::EmptyPage {
                url: url.to_string(),
            });
        }

        Ok(PageText {
            text: capped.to_string(),
            chars: capped.chars().count(),
            chunks,
        })
    }

    /// One model call per chunk, in page order.
    async fn summarize_stage(
        &self,
        topic: &Topic,
        chunks: &[String],
    ) -> Result<Vec<String>, ModelOutputError> {
        let params = self.params(SUMMARIZE_TEMPERATURE, SUMMARIZE_MAX_TOKENS);
        let mut summaries = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            let prompt = render(
                SUMMARIZE_PROMPT_TEMPLATE,
                &[("text", chunk.as_str()), ("topic", topic.as_str())],
            )?;
            let summary = non_empty(self.llm.complete(&prompt, &params).await?)?;
            summaries.push(summary);
        }

        Ok(summaries)
    }

    async fn generate_stage(&self, topic: &Topic, summary: &str) -> Result<String, ModelOutputError> {
        let prompt = render(
            GENERATE_POST_PROMPT_TEMPLATE,
            &[("summary", summary), ("topic", topic.as_str())],
        )?;
        let params = self.params(GENERATE_TEMPERATURE, GENERATE_MAX_TOKENS);
        non_empty(self.llm.complete(&prompt, &params).await?)
    }

    fn params(&self, temperature: f32, max_tokens: u32) -> CompletionParams {
        CompletionParams {
            model: self.settings.model.clone(),
            temperature,
            max_tokens,
        }
    }
}

fn non_empty(output: String) -> Result<String, ModelOutputError> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Err(ModelOutputError::Empty);
    }
    Ok(trimmed.to_string())
}
