//! Structural validation of the raw nested comment document

use crate::data::{nest_preorder, RawComment};
use crate::error::{ValidationError, ValidationRule};
use serde_json::{Map, Value};

/// Pending record on the validation stack
struct Pending<'a> {
    value: &'a Value,
    position: usize,
    depth: usize,
    expected_parent: i64,
    parent_slot: Option<usize>,
}

/// Check the whole document and convert it into typed records.
///
/// Comments are visited in pre-order (a comment, its replies, then the next
/// sibling) and the first violation aborts the scan.
pub fn validate_comments(value: &Value) -> Result<Vec<RawComment>, ValidationError> {
    let top_level = value.as_array().ok_or(ValidationError {
        position: 0,
        depth: 0,
        rule: ValidationRule::NotAnArray,
    })?;

    let mut stack: Vec<Pending> = top_level
        .iter()
        .enumerate()
        .rev()
        .map(|(i, value)| Pending {
            value,
            position: i + 1,
            depth: 0,
            expected_parent: 0,
            parent_slot: None,
        })
        .collect();

    // Flattened pre-order records plus the slot of their parent
    let mut flat: Vec<RawComment> = Vec::new();
    let mut parents: Vec<Option<usize>> = Vec::new();

    while let Some(pending) = stack.pop() {
        let fail = |rule| ValidationError {
            position: pending.position,
            depth: pending.depth,
            rule,
        };

        let record = pending
            .value
            .as_object()
            .ok_or_else(|| fail(ValidationRule::MalformedRecord))?;

        let (comment, replies) = check_record(record).map_err(|field| fail(ValidationRule::InvalidField(field)))?;

        if comment.parent_id != pending.expected_parent {
            return Err(fail(ValidationRule::ParentMismatch {
                expected: pending.expected_parent,
                found: comment.parent_id,
            }));
        }

        let slot = flat.len();
        let comment_id = comment.id;
        flat.push(comment);
        parents.push(pending.parent_slot);

        for (i, reply) in replies.iter().enumerate().rev() {
            stack.push(Pending {
                value: reply,
                position: i + 1,
                depth: pending.depth + 1,
                expected_parent: comment_id,
                parent_slot: Some(slot),
            });
        }
    }

    Ok(nest_preorder(flat, parents))
}

/// Check field presence and primitive types, in document field order
fn check_record(record: &Map<String, Value>) -> Result<(RawComment, &Vec<Value>), &'static str> {
    let int = |field: &'static str| record.get(field).and_then(Value::as_i64).ok_or(field);
    let text = |field: &'static str| {
        record
            .get(field)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or(field)
    };

    let id = int("评论ID")?;
    let author = text("用户名")?;
    let content = text("评论内容")?;
    let likes = record.get("点赞数").and_then(Value::as_u64).ok_or("点赞数")?;
    let reply_time = text("回复时间")?;
    let parent_id = int("父评论ID")?;
    let replies = record.get("replies").and_then(Value::as_array).ok_or("replies")?;

    let comment = RawComment::new(id, author, content, likes, reply_time, parent_id);
    Ok((comment, replies))
}
