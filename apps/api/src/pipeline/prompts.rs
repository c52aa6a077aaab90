// All LLM prompt templates for the content pipeline.
// Rendered with `pipeline::template::render`; placeholders are listed above each.

/// URL selection prompt. Placeholders: {topic}, {candidates}
pub const SELECT_URL_PROMPT_TEMPLATE: &str = r#"You are a world-class researcher with a talent for finding the most relevant article on any topic.

Below are web search results for the query "{topic}":

{candidates}

Choose the single best article for writing about "{topic}".
Respond with ONLY that article's URL, copied exactly as listed above. Do not add any other text."#;

/// Chunk summarization prompt. Placeholders: {text}, {topic}
pub const SUMMARIZE_PROMPT_TEMPLATE: &str = r#"{text}

You are a world-class researcher. Summarise the text above so it can be used to write a Reddit post about {topic}.
Follow every rule below when summarising:
1/ The content must be engaging and informative, backed by good data
2/ The content must not be too long; no more than 40,000 characters
3/ The content must address the {topic} topic well
4/ The content should be written to go viral and earn at least 1000 upvotes
5/ The content must be easy to read and understand
6/ The content must give the reader actionable advice and insights

SUMMARY:"#;

/// Post generation prompt. Placeholders: {summary}, {topic}
pub const GENERATE_POST_PROMPT_TEMPLATE: &str = r#"{summary}

You are a world-class researcher and a Reddit user with a large amount of karma. The text above is material about {topic}.
Write a Reddit post about {topic} using the text above, following every rule below:
1/ The post must be engaging and informative, backed by good data
2/ The post must not be too long; no more than 40,000 characters
3/ The post must address the {topic} topic well
4/ The post should be written to go viral and earn at least 1000 upvotes
5/ The post must be easy to read and understand
6/ The post must give the reader actionable advice and insights

REDDIT POST:"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::template::render;

    #[test]
    fn test_select_prompt_renders_with_its_variables() {
        let rendered = render(
            SELECT_URL_PROMPT_TEMPLATE,
            &[("topic", "coffee"), ("candidates", "1. a.com")],
        )
        .unwrap();
        assert!(rendered.contains("\"coffee\""));
        assert!(rendered.contains("1. a.com"));
    }

    #[test]
    fn test_summarize_prompt_renders_with_its_variables() {
        let rendered =
            render(SUMMARIZE_PROMPT_TEMPLATE, &[("text", "PAGE"), ("topic", "coffee")]).unwrap();
        assert!(rendered.starts_with("PAGE"));
        assert!(rendered.ends_with("SUMMARY:"));
    }

    #[test]
    fn test_generate_prompt_renders_with_its_variables() {
        let rendered = render(
            GENERATE_POST_PROMPT_TEMPLATE,
            &[("summary", "SUM"), ("topic", "coffee")],
        )
        .unwrap();
        assert!(rendered.starts_with("SUM"));
        assert!(rendered.contains("Reddit post about coffee"));
    }
}
