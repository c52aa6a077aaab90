//! URL selection: parse the model's free-form answer, then validate it against
//! the candidate set.
//!
//! A whole answer, or a JSON string element, equal to a candidate wins first.
//! Otherwise candidate URLs are looked up in the text and the earliest mention
//! wins. A match is exact, or exact after dropping one trailing `/` from
//! either side.

use thiserror::Error;

use crate::llm_client::LlmError;
use crate::pipeline::template::TemplateError;
use crate::search::SearchResult;

/// How much of an unusable model answer is kept in the error message.
const RESPONSE_EXCERPT_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("model call failed: {0}")]
    Model(#[from] LlmError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("model response contained no recognizable URL: {response:?}")]
    NoUrl { response: String },

    #[error("model chose '{url}', which is not one of the search results")]
    NotCandidate { url: String },
}

/// Renders the candidate list for the selection prompt.
pub fn format_candidates(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut entry = format!("{}. {}\n   URL: {}", i + 1, r.title, r.url);
            if !r.snippet.is_empty() {
                entry.push_str("\n   ");
                entry.push_str(&r.snippet);
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses `response` and returns the candidate URL it selects, exactly as the
/// search stage reported it.
pub fn parse_selection(
    response: &str,
    candidates: &[SearchResult],
) -> Result<String, SelectionError> {
    let text = strip_code_fences(response);
    let answers = answer_values(text);

    // A whole answer (or JSON element) that is a candidate wins outright.
    let exact = answers
        .iter()
        .find_map(|answer| candidates.iter().find(|c| same_url(&c.url, answer)));
    if let Some(candidate) = exact.or_else(|| first_mentioned_candidate(text, candidates)) {
        return Ok(candidate.url.clone());
    }

    let first = answers
        .iter()
        .find(|answer| !answer.contains(char::is_whitespace) && looks_like_url(answer))
        .cloned()
        .or_else(|| answers.iter().flat_map(|answer| scan_urls(answer)).next());

    match first {
        Some(url) => Err(SelectionError::NotCandidate { url }),
        None => Err(SelectionError::NoUrl {
            response: response.chars().take(RESPONSE_EXCERPT_CHARS).collect(),
        }),
    }
}

/// The answer's string values: the elements of a JSON string or array, or
/// the de-fenced text itself.
fn answer_values(text: &str) -> Vec<String> {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::String(s)) => vec![s.trim().to_string()],
        Ok(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(|s| s.trim().to_string())
            .collect(),
        _ => vec![text.to_string()],
    }
}

/// The candidate whose URL appears earliest in `text` as a whole token.
/// On a tie the longer URL wins.
fn first_mentioned_candidate<'a>(
    text: &str,
    candidates: &'a [SearchResult],
) -> Option<&'a SearchResult> {
    candidates
        .iter()
        .filter_map(|c| mention_position(text, &c.url).map(|pos| (pos, c)))
        .min_by(|(a_pos, a), (b_pos, b)| a_pos.cmp(b_pos).then(b.url.len().cmp(&a.url.len())))
        .map(|(_, c)| c)
}

fn mention_position(text: &str, url: &str) -> Option<usize> {
    let needle = url.strip_suffix('/').unwrap_or(url);
    if needle.is_empty() {
        return None;
    }

    text.match_indices(needle).map(|(pos, _)| pos).find(|&pos| {
        let before = text[..pos].chars().next_back();
        let after = &text[pos + needle.len()..];
        let after = after.strip_prefix('/').unwrap_or(after);
        let tail = after.split(char::is_whitespace).next().unwrap_or_default();

        !before.is_some_and(is_url_char) && tail.chars().all(is_closing_punctuation)
    })
}

fn is_url_char(c: char) -> bool {
    c.is_alphanumeric()
        || matches!(c, '/' | '.' | '-' | '_' | '~' | '%' | '?' | '=' | '&' | '#' | '+' | '@')
}

/// Characters that may follow a URL without being part of it.
fn is_closing_punctuation(c: char) -> bool {
    matches!(
        c,
        '.' | ',' | ';' | ':' | '!' | '?' | ')' | ']' | '}' | '>' | '"' | '\'' | '`' | '*'
    )
}

/// URL-looking tokens in `text`, in order of appearance. Only used to name
/// the offending URL when nothing matches a candidate.
fn scan_urls(text: &str) -> Vec<String> {
    text.split(|c: char| {
        c.is_whitespace()
            || matches!(c, ',' | '"' | '\'' | '`' | '<' | '>' | '[' | ']' | '(' | ')')
    })
    .map(|token| {
        token
            .trim_matches(|c: char| c == '*' || c == '_')
            .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | '?'))
    })
    .filter(|token| looks_like_url(token))
    .map(str::to_string)
    .collect()
}

fn looks_like_url(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    for scheme in ["https://", "http://"] {
        if let Some(rest) = lower.strip_prefix(scheme) {
            return !rest.is_empty();
        }
    }

    // Bare host, optionally followed by a path: `b.com`, `docs.rs/tokio`
    let host = token.split('/').next().unwrap_or_default();
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld = labels[labels.len() - 1];
    labels_ok && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

fn same_url(candidate: &str, mentioned: &str) -> bool {
    fn trim_slash(s: &str) -> &str {
        s.strip_suffix('/').unwrap_or(s)
    }
    trim_slash(candidate) == trim_slash(mentioned)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an info string such as `json` or `text` on the opening line
    let body = match stripped.find('\n') {
        Some(newline) if !stripped[..newline].contains(char::is_whitespace) => {
            &stripped[newline + 1..]
        }
        _ => stripped,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}
