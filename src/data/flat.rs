//! Flat comment exports (one row per comment) and tree assembly

use crate::data::{nest_preorder, RawComment};
use crate::error::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// One row of the crawler's CSV export
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlatComment {
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

    #[serde(rename = "父评论ID")]
    pub parent_id: i64,
}

/// Read a CSV export from disk and assemble it into a comment tree
pub fn read_csv(path: &Path) -> Result<Vec<RawComment>> {
    let file = std::fs::File::open(path)?;
    read_csv_from(file)
}

/// Read CSV rows from any reader and assemble them into a comment tree
pub fn read_csv_from<R: Read>(reader: R) -> Result<Vec<RawComment>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let rows = csv_reader
        .deserialize()
        .collect::<std::result::Result<Vec<FlatComment>, csv::Error>>()?;

    log::info!("Read {} comment rows", rows.len());
    Ok(assemble_tree(rows))
}

/// Nest flat rows under their parents.
///
/// Rows with parent id 0 become roots in row order. Other rows attach to the
/// last row carrying their parent id. Rows whose parent is absent, or whose
/// parent chain loops without reaching a root, are dropped.
pub fn assemble_tree(rows: Vec<FlatComment>) -> Vec<RawComment> {
    let mut last_by_id: HashMap<i64, usize> = HashMap::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        last_by_id.insert(row.id, idx);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); rows.len()];
    let mut roots = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        if row.parent_id == 0 {
            roots.push(idx);
        } else if let Some(&parent) = last_by_id.get(&row.parent_id) {
            children[parent].push(idx);
        }
    }

    // Pre-order walk from the roots; every row sits in exactly one list
    let mut order: Vec<(usize, Option<usize>)> = Vec::with_capacity(rows.len());
    let mut stack: Vec<(usize, Option<usize>)> = roots.iter().rev().map(|&r| (r, None)).collect();
    while let Some((idx, parent)) = stack.pop() {
        let position = order.len();
        order.push((idx, parent));
        for &child in children[idx].iter().rev() {
            stack.push((child, Some(position)));
        }
    }

    let dropped = rows.len() - order.len();
    if dropped > 0 {
        log::warn!("Dropped {} rows whose parent comment is missing", dropped);
    }

    let mut slots: Vec<Option<FlatComment>> = rows.into_iter().map(Some).collect();
    let mut flat = Vec::with_capacity(order.len());
    let mut parents = Vec::with_capacity(order.len());
    for (idx, parent) in order {
        if let Some(row) = slots[idx].take() {
            flat.push(RawComment::new(
                row.id,
                row.author,
                row.content,
                row.likes,
                row.reply_time,
                row.parent_id,
            ));
            parents.push(parent);
        }
    }

    nest_preorder(flat, parents)
}
