//! The store gateway the handlers read and write blog posts through.
//!
//! Handlers only depend on [`StoreGateway`]. [`DynamoStore`] is the production backend;
//! [`MemoryStore`] keeps records in process for local runs and tests.

/// Amazon DynamoDB backend.
pub mod dynamo;

/// In-process backend.
pub mod memory;

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

use crate::{error::StoreError, model::BlogPost, write::update_item::Mutation};

use async_trait::async_trait;
use std::sync::Arc;

/// Persistent storage of blog posts, one record per id.
///
/// Every method is a single store call. Implementations must be safe to share between
/// concurrently running requests.
#[async_trait]
pub trait StoreGateway: Send + Sync {
    /// Every stored post, in the store's natural scan order.
    async fn scan(&self) -> Result<Vec<BlogPost>, StoreError>;

    /// The post with `id`, if any.
    async fn get(&self, id: &str) -> Result<Option<BlogPost>, StoreError>;

    /// Stores a new post. Fails with [`StoreError::Conflict`] if the id is taken.
    async fn put(&self, post: &BlogPost) -> Result<(), StoreError>;

    /// Applies `mutation` to the post with `id` and returns the updated post, or `None`
    /// if there is no such post.
    async fn update(&self, id: &str, mutation: Mutation) -> Result<Option<BlogPost>, StoreError>;

    /// Removes the post with `id` and returns it, or `None` if there was no such post.
    async fn delete(&self, id: &str) -> Result<Option<BlogPost>, StoreError>;
}

#[async_trait]
impl<T: StoreGateway + ?Sized> StoreGateway for Arc<T> {
    async fn scan(&self) -> Result<Vec<BlogPost>, StoreError> {
        (**self).scan().await
    }

    async fn get(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
        (**self).get(id).await
    }

    async fn put(&self, post: &BlogPost) -> Result<(), StoreError> {
        (**self).put(post).await
    }

    async fn update(&self, id: &str, mutation: Mutation) -> Result<Option<BlogPost>, StoreError> {
        (**self).update(id, mutation).await
    }

    async fn delete(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
        (**self).delete(id).await
    }
}
