//! Pull a candidate batch out of an assistant reply
//!
//! The assistant embeds generated items as a JSON array between
//! `[QUIZ_DATA]` and `[/QUIZ_DATA]` markers inside its free-text answer.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::ingest::Batch;

#[derive(Error, Debug)]
pub enum ReplyError {
    #[error("Tagged quiz data is not a JSON array: {0}")]
    Json(#[from] serde_json::Error),
}

fn block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[QUIZ_DATA\]([\s\S]*?)\[/QUIZ_DATA\]").expect("quiz data pattern is valid")
    })
}

/// Extract the first tagged batch, if the reply has one.
pub fn extract_batch(reply: &str) -> Result<Option<Batch>, ReplyError> {
    let Some(captures) = block_pattern().captures(reply) else {
        return Ok(None);
    };
    let body = captures.get(1).map_or("", |m| m.as_str()).trim();
    let batch: Batch = serde_json::from_str(body)?;
    Ok(Some(batch))
}

/// Replace the first tagged block with a human-readable notice.
pub fn replace_block(reply: &str, notice: &str) -> String {
    block_pattern()
        .replace(reply, regex::NoExpand(notice))
        .into_owned()
}
