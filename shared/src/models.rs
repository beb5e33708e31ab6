//! Shared data models.

use serde::{Deserialize, Serialize};

/// Kind of calendar content, derived from the source sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Feed,
    Story,
}

/// Lifecycle state of a post, computed from its date and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Scheduled,
    Published,
}

/// A single calendar entry backed by one spreadsheet row.
///
/// Every field is always present; absent source columns map to empty
/// strings. `id` is `{sheet_name}_{row_index}` and is only stable for as
/// long as the row does not move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub sheet_name: String,
    /// 1-based physical row in the source sheet (row 1 is the header).
    pub row_index: usize,
    /// `YYYY-MM-DD`, no timezone.
    pub date: String,
    /// `HH:MM` 24-hour, or empty.
    pub time: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub platform: String,
    pub image_url: String,
    pub status: PostStatus,
}
