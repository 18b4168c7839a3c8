use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a single blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cleaned field values ready to be written into a [`Post`].
///
/// Only produced by [`crate::form::PostForm`] validation, so every field is
/// non-empty and within its length limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub author: String,
}

impl Post {
    /// Create a new post with a fresh id and timestamps.
    pub fn new(draft: PostDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            content: draft.content,
            author: draft.author,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the editable fields. `id` and `created_at` are untouched.
    pub fn apply(&mut self, draft: PostDraft) {
        self.title = draft.title;
        self.content = draft.content;
        self.author = draft.author;
        self.updated_at = Utc::now();
    }
}
