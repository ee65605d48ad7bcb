//! Aggregate statistics over the explicit comments of a run

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Read-only snapshot of comment-level figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentStats {
    pub total_comments: usize,
    pub total_users: usize,
    /// Mean body length in characters
    pub average_comment_length: f64,
    /// Sum of like counts, saturating at `u64::MAX`
    pub total_likes: u64,
    pub average_likes: f64,
    /// Fraction of comments that are replies
    pub reply_rate: f64,
    /// Earliest known reply time, 0 when no time was known
    pub earliest_comment: i64,
    /// Latest known reply time, 0 when no time was known
    pub latest_comment: i64,
    /// Days between earliest and latest, rounded up
    pub comment_period_days: i64,
}

/// Running totals collected while the builder walks the tree
#[derive(Debug, Default)]
pub(crate) struct StatsAccumulator {
    comments: usize,
    authors: HashSet<String>,
    content_chars: usize,
    /// Summed in u128 so `u64` counts cannot overflow
    likes: u128,
    replies: usize,
    earliest: Option<i64>,
    latest: Option<i64>,
}

impl StatsAccumulator {
    pub fn record(&mut self, author: &str, content: &str, likes: u64, is_reply: bool, time: Option<i64>) {
        self.comments += 1;
        if !self.authors.contains(author) {
            self.authors.insert(author.to_string());
        }
        self.content_chars += content.chars().count();
        self.likes += u128::from(likes);
        if is_reply {
            self.replies += 1;
        }
        if let Some(t) = time {
            self.earliest = Some(self.earliest.map_or(t, |e| e.min(t)));
            self.latest = Some(self.latest.map_or(t, |l| l.max(t)));
        }
    }

    pub fn finish(self) -> CommentStats {
        if self.comments == 0 {
            log::warn!("No comments to summarise");
            return CommentStats::default();
        }

        let total = self.comments as f64;
        let (earliest, latest) = match (self.earliest, self.latest) {
            (Some(e), Some(l)) => (e, l),
            _ => (0, 0),
        };
        let span = latest - earliest;

        CommentStats {
            total_comments: self.comments,
            total_users: self.authors.len(),
            average_comment_length: self.content_chars as f64 / total,
            total_likes: u64::try_from(self.likes).unwrap_or(u64::MAX),
            average_likes: self.likes as f64 / total,
            reply_rate: self.replies as f64 / total,
            earliest_comment: earliest,
            latest_comment: latest,
            comment_period_days: (span + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY,
        }
    }
}
