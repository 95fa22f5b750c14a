use aws_sdk_dynamodb::types;
use std::collections;

/// Name of the partition key attribute of the blog post table.
pub const PARTITION_KEY: &str = "id";

/// Primary key of a blog post.
///
/// The table is keyed by a single string partition key, so a key is just the post id.
///
/// ```rust
/// use blog_posts_crud::common::key;
///
/// let key = key::Key::new("4a6f0d1c");
/// assert_eq!(key.value, "4a6f0d1c");
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Key {
    /// The attribute name of the key.
    pub name: String,
    /// The value of the key.
    pub value: String,
}

impl Key {
    /// Key of the blog post with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            name: PARTITION_KEY.to_string(),
            value: id.into(),
        }
    }
}

impl From<Key> for collections::HashMap<String, types::AttributeValue> {
    fn from(key: Key) -> Self {
        Self::from([(key.name, types::AttributeValue::S(key.value))])
    }
}
