//! Common utilities for DynamoDB operations.
//!
//! This module provides shared types and utilities used across read and write operations,
//! including key handling, key-attribute conditions and placeholder aliasing.

/// Key-attribute conditions for conditional writes.
pub mod condition;

/// Key type for identifying blog posts in the table.
pub mod key;

use aws_sdk_dynamodb::types;
use std::collections;

/// Prefix of attribute-name placeholders minted for conditions.
pub(crate) const CONDITION_PREFIX: &str = "c";

/// Prefix of attribute-name placeholders minted for updated fields.
pub(crate) const FIELD_PREFIX: &str = "f";

/// Prefix of attribute-value placeholders minted for updated values.
pub(crate) const VALUE_PREFIX: &str = "v";

/// Opaque attribute-name placeholder, never derived from the attribute name itself.
pub(crate) fn name_placeholder(prefix: &str, index: usize) -> String {
    format!("#{prefix}{index}")
}

/// Opaque attribute-value placeholder.
pub(crate) fn value_placeholder(prefix: &str, index: usize) -> String {
    format!(":{prefix}{index}")
}

fn get_expression(left: String, operator: &str, right: String) -> String {
    if left.is_empty() {
        right
    } else if right.is_empty() {
        left
    } else {
        format!("{left}{operator}{right}")
    }
}

/// expression operation
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ExpressionInput {
    pub(crate) expression: String,
    pub(crate) expression_attribute_names: collections::HashMap<String, String>,
    pub(crate) expression_attribute_values: collections::HashMap<String, types::AttributeValue>,
}

impl ExpressionInput {
    pub(crate) fn merge(operator: &str, items: Vec<Self>) -> Self {
        let mut operation = Self::default();
        for item in items {
            operation
                .expression_attribute_names
                .extend(item.expression_attribute_names);
            operation
                .expression_attribute_values
                .extend(item.expression_attribute_values);
            operation.expression = get_expression(operation.expression, operator, item.expression);
        }
        operation
    }

    pub(crate) fn merge_into(
        self,
        names: &mut Option<collections::HashMap<String, String>>,
        values: &mut Option<collections::HashMap<String, types::AttributeValue>>,
    ) -> String {
        if !self.expression_attribute_names.is_empty() {
            match names {
                Some(existing) => existing.extend(self.expression_attribute_names),
                None => *names = Some(self.expression_attribute_names),
            }
        }
        if !self.expression_attribute_values.is_empty() {
            match values {
                Some(existing) => existing.extend(self.expression_attribute_values),
                None => *values = Some(self.expression_attribute_values),
            }
        }
        self.expression
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::field(FIELD_PREFIX, 0, "#f0", ":f0")]
    #[case::condition(CONDITION_PREFIX, 12, "#c12", ":c12")]
    fn test_placeholders(
        #[case] prefix: &str,
        #[case] index: usize,
        #[case] expected_name: &str,
        #[case] expected_value: &str,
    ) {
        assert_eq!(name_placeholder(prefix, index), expected_name);
        assert_eq!(value_placeholder(prefix, index), expected_value);
    }

    #[rstest]
    #[case::both_empty("", "", "")]
    #[case::left_empty("", "b", "b")]
    #[case::right_empty("a", "", "a")]
    #[case::both("a", "b", "a, b")]
    fn test_get_expression(#[case] left: &str, #[case] right: &str, #[case] expected: &str) {
        let actual = get_expression(left.to_string(), ", ", right.to_string());
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_merge_into_keeps_existing_placeholders() {
        let operation = ExpressionInput {
            expression: "SET #f0 = :v0".to_string(),
            expression_attribute_names: collections::HashMap::from([(
                "#f0".to_string(),
                "title".to_string(),
            )]),
            expression_attribute_values: collections::HashMap::from([(
                ":v0".to_string(),
                types::AttributeValue::S("a".to_string()),
            )]),
        };
        let mut names = Some(collections::HashMap::from([(
            "#c0".to_string(),
            "id".to_string(),
        )]));
        let mut values = None;
        let expression = operation.merge_into(&mut names, &mut values);
        assert_eq!(expression, "SET #f0 = :v0");
        assert_eq!(
            names,
            Some(collections::HashMap::from([
                ("#c0".to_string(), "id".to_string()),
                ("#f0".to_string(), "title".to_string()),
            ]))
        );
        assert_eq!(
            values,
            Some(collections::HashMap::from([(
                ":v0".to_string(),
                types::AttributeValue::S("a".to_string()),
            )]))
        );
    }
}
