use crate::{error::StoreError, model::BlogPost, store::StoreGateway, write::update_item::Mutation};

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;

/// [`StoreGateway`] keeping posts in process memory.
///
/// Scans return posts in insertion order. Deleting a post shifts the later ones up.
///
/// ```rust
/// use blog_posts_crud::store::MemoryStore;
///
/// let store = MemoryStore::default();
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: RwLock<IndexMap<String, BlogPost>>,
}

impl MemoryStore {
    /// A store holding `posts`, in order.
    pub fn with_posts(posts: impl IntoIterator<Item = BlogPost>) -> Self {
        let posts = posts
            .into_iter()
            .map(|post| (post.id.clone(), post))
            .collect();
        Self {
            posts: RwLock::new(posts),
        }
    }

    /// Number of stored posts.
    pub fn len(&self) -> usize {
        self.posts.read().len()
    }

    /// Whether no post is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn apply(post: &BlogPost, mutation: Mutation) -> Result<BlogPost, StoreError> {
    let mut document = serde_json::to_value(post)?;
    if let Value::Object(fields) = &mut document {
        for assignment in mutation.into_assignments() {
            fields.insert(assignment.field, assignment.value);
        }
    }
    Ok(serde_json::from_value(document)?)
}

#[async_trait]
impl StoreGateway for MemoryStore {
    async fn scan(&self) -> Result<Vec<BlogPost>, StoreError> {
        Ok(self.posts.read().values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
        Ok(self.posts.read().get(id).cloned())
    }

    async fn put(&self, post: &BlogPost) -> Result<(), StoreError> {
        let mut posts = self.posts.write();
        if posts.contains_key(&post.id) {
            return Err(StoreError::Conflict {
                id: post.id.clone(),
            });
        }
        posts.insert(post.id.clone(), post.clone());
        Ok(())
    }

    async fn update(&self, id: &str, mutation: Mutation) -> Result<Option<BlogPost>, StoreError> {
        let mut posts = self.posts.write();
        let Some(post) = posts.get_mut(id) else {
            return Ok(None);
        };
        // the record is only replaced once the whole mutation applied cleanly
        let updated = apply(post, mutation)?;
        *post = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
        Ok(self.posts.write().shift_remove(id))
    }
}
