use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Longest topic accepted from the UI, in characters.
pub const MAX_TOPIC_CHARS: usize = 200;

#[derive(Debug, Error, PartialEq)]
pub enum TopicError {
    #[error("topic cannot be empty")]
    Empty,

    #[error("topic is {len} characters; the limit is {max}", max = MAX_TOPIC_CHARS)]
    TooLong { len: usize },
}

/// A validated, trimmed, non-empty topic. Lives for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    pub fn new(raw: &str) -> Result<Self, TopicError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TopicError::Empty);
        }
        let len = trimmed.chars().count();
        if len > MAX_TOPIC_CHARS {
            return Err(TopicError::TooLong { len });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_is_trimmed() {
        let topic = Topic::new("  coffee brewing \n").unwrap();
        assert_eq!(topic.as_str(), "coffee brewing");
    }

    #[test]
    fn test_blank_topic_rejected() {
        assert_eq!(Topic::new(""), Err(TopicError::Empty));
        assert_eq!(Topic::new(" \t "), Err(TopicError::Empty));
    }

    #[test]
    fn test_overlong_topic_rejected() {
        let raw = "é".repeat(MAX_TOPIC_CHARS + 1);
        assert_eq!(
            Topic::new(&raw),
            Err(TopicError::TooLong {
                len: MAX_TOPIC_CHARS + 1
            })
        );
    }

    #[test]
    fn test_limit_counts_chars_not_bytes() {
        let raw = "é".repeat(MAX_TOPIC_CHARS);
        assert!(Topic::new(&raw).is_ok());
    }

    #[test]
    fn test_topic_serializes_as_plain_string() {
        let topic = Topic::new("sourdough").unwrap();
        assert_eq!(serde_json::to_string(&topic).unwrap(), r#""sourdough""#);
    }
}
