use crate::common;

use std::collections;

/// Existence check on a single attribute.
///
/// ```rust
/// use blog_posts_crud::common::condition;
///
/// let exists = condition::Condition::Exists;
/// let not_exists = condition::Condition::NotExists;
/// assert_ne!(exists, not_exists);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Condition {
    /// Checks if an attribute exists.
    Exists,
    /// Checks if an attribute does not exist.
    NotExists,
}

impl Condition {
    fn get_expression(self, key_placeholder: &str) -> String {
        match self {
            Self::Exists => format!("attribute_exists({key_placeholder})"),
            Self::NotExists => format!("attribute_not_exists({key_placeholder})"),
        }
    }
}

/// Condition applied to an attribute.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct KeyCondition {
    /// The condition to apply to the attribute.
    pub condition: Condition,
    /// The name of the attribute to apply the condition to.
    pub name: String,
}

impl KeyCondition {
    /// Condition on the partition key of the blog post table.
    pub fn partition_key(condition: Condition) -> Self {
        Self {
            condition,
            name: common::key::PARTITION_KEY.to_string(),
        }
    }
}

impl From<KeyCondition> for common::ExpressionInput {
    fn from(key_condition: KeyCondition) -> Self {
        let placeholder = common::name_placeholder(common::CONDITION_PREFIX, 0);
        let expression = key_condition.condition.get_expression(&placeholder);
        Self {
            expression,
            expression_attribute_names: collections::HashMap::from([(
                placeholder,
                key_condition.name,
            )]),
            ..Default::default()
        }
    }
}
