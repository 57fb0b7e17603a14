//! Post store adapter.
//!
//! Handlers only see the [`PostStore`] trait. [`MemoryStore`] is the
//! collection the binary ships with; a hosted document database plugs in by
//! implementing the same two operations.

use crate::models::Post;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store call timed out")]
    Timeout,
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Newest first. `limit` caps the number of posts returned.
    async fn list(&self, limit: Option<usize>) -> Result<Vec<Post>, StoreError>;

    async fn append(&self, post: Post) -> Result<(), StoreError>;
}

/// Sort newest first and apply an optional cap.
pub fn newest_first(mut posts: Vec<Post>, limit: Option<usize>) -> Vec<Post> {
    posts.sort_by(|a, b| b.time.cmp(&a.time));
    if let Some(limit) = limit {
        posts.truncate(limit);
    }
    posts
}

/// In-process `cheeps` collection keyed by document id.
#[derive(Clone, Default)]
pub struct MemoryStore {
    posts: Arc<DashMap<Uuid, Post>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list(&self, limit: Option<usize>) -> Result<Vec<Post>, StoreError> {
        let posts: Vec<Post> = self
            .posts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        Ok(newest_first(posts, limit))
    }

    async fn append(&self, post: Post) -> Result<(), StoreError> {
        self.posts.insert(Uuid::new_v4(), post);
        Ok(())
    }
}
