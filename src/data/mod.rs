//! Raw comment input: record types, validation, timestamp parsing and loaders

pub mod flat;
pub mod time;
pub mod validate;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One comment as delivered by the crawler, with its replies nested inside
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawComment {
    #[serde(rename = "评论ID")]
    pub id: i64,

    #[serde(rename = "用户名")]
    pub author: String,

    #[serde(rename = "评论内容")]
    pub content: String,

    #[serde(rename = "点赞数")]
    pub likes: u64,

    #[serde(rename = "回复时间")]
    pub reply_time: String,

    /// 0 for top-level comments
    #[serde(rename = "父评论ID")]
    pub parent_id: i64,

    #[serde(default)]
    pub replies: Vec<RawComment>,
}

impl RawComment {
    /// Create a comment without replies
    pub fn new(
        id: i64,
        author: impl Into<String>,
        content: impl Into<String>,
        likes: u64,
        reply_time: impl Into<String>,
        parent_id: i64,
    ) -> Self {
        Self {
            id,
            author: author.into(),
            content: content.into(),
            likes,
            reply_time: reply_time.into(),
            parent_id,
            replies: Vec::new(),
        }
    }

    /// Attach a reply, returning the comment for chaining
    pub fn with_reply(mut self, reply: RawComment) -> Self {
        self.replies.push(reply);
        self
    }
}

/// Rebuild a nested tree from pre-order records and the pre-order position of
/// each record's parent.
///
/// Children always follow their parent in pre-order, so walking backwards
/// finishes every subtree before its parent is moved.
pub(crate) fn nest_preorder(mut flat: Vec<RawComment>, mut parents: Vec<Option<usize>>) -> Vec<RawComment> {
    let mut roots = Vec::new();

    while let (Some(mut comment), Some(parent)) = (flat.pop(), parents.pop()) {
        comment.replies.reverse();
        match parent {
            Some(slot) => flat[slot].replies.push(comment),
            None => roots.push(comment),
        }
    }

    roots.reverse();
    roots
}

/// Parse and validate a nested comment document.
///
/// Reply threads may nest arbitrarily deep: the parser's recursion limit is
/// lifted and the stack grows on demand while parsing.
pub fn parse_comments(json: &str) -> Result<Vec<RawComment>> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    let value = serde_json::Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;

    Ok(validate::validate_comments(&value)?)
}

/// Load comments from a JSON document or a flat CSV export, chosen by extension
pub fn load_comments(path: &Path) -> Result<Vec<RawComment>> {
    log::info!("Reading comment file: {}", path.display());

    let is_csv = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));

    let comments = if is_csv {
        flat::read_csv(path)?
    } else {
        let json = std::fs::read_to_string(path)?;
        parse_comments(&json)?
    };

    log::info!("Loaded {} top-level comments", comments.len());
    Ok(comments)
}
