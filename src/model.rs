//! The blog post record and its fixed attribute schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum length of [`BlogPost::title`].
pub const TITLE_MAX_LENGTH: usize = 100;
/// Maximum length of [`BlogPost::summary`].
pub const SUMMARY_MAX_LENGTH: usize = 500;
/// Maximum length of [`BlogPost::layout`].
pub const LAYOUT_MAX_LENGTH: usize = 50;
/// Maximum length of [`BlogPost::bibliography`].
pub const BIBLIOGRAPHY_MAX_LENGTH: usize = 500;
/// Maximum length of [`BlogPost::canonical_url`].
pub const CANONICAL_URL_MAX_LENGTH: usize = 100;

/// A blog post as stored in the table.
///
/// Every field but `id` is optional. Absent fields are not written to the store.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// Server generated identifier, immutable after creation.
    pub id: String,
    /// Title, at most [`TITLE_MAX_LENGTH`] characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Publication timestamp (`YYYY-MM-DDTHH:MM:SS.mmmZ`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Ordered tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Last modification timestamp (`YYYY-MM-DDTHH:MM:SS.mmmZ`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
    /// Whether the post is unpublished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    /// Summary, at most [`SUMMARY_MAX_LENGTH`] characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Images, either a list of URLs or a structured object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Value>,
    /// Author handles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    /// Layout name, at most [`LAYOUT_MAX_LENGTH`] characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    /// Bibliography reference, at most [`BIBLIOGRAPHY_MAX_LENGTH`] characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bibliography: Option<String>,
    /// Canonical URL, at most [`CANONICAL_URL_MAX_LENGTH`] characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    /// Body, unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// The shape a field value must have.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FieldKind {
    /// A string, optionally bounded in characters.
    Text {
        /// Maximum number of characters, if any.
        max_length: Option<usize>,
    },
    /// A `YYYY-MM-DDTHH:MM:SS.mmmZ` timestamp.
    Date,
    /// A boolean.
    Boolean,
    /// A list of strings, possibly empty.
    StringList,
    /// A key-value mapping.
    Object,
    /// Either a list of strings or a key-value mapping.
    StringListOrObject,
}

/// Every field a client may write, with the validator that applies to it.
pub const FIELDS: &[(&str, FieldKind)] = &[
    (
        "title",
        FieldKind::Text {
            max_length: Some(TITLE_MAX_LENGTH),
        },
    ),
    ("date", FieldKind::Date),
    ("tags", FieldKind::StringList),
    ("lastmod", FieldKind::Date),
    ("draft", FieldKind::Boolean),
    (
        "summary",
        FieldKind::Text {
            max_length: Some(SUMMARY_MAX_LENGTH),
        },
    ),
    ("images", FieldKind::StringListOrObject),
    ("authors", FieldKind::StringList),
    (
        "layout",
        FieldKind::Text {
            max_length: Some(LAYOUT_MAX_LENGTH),
        },
    ),
    (
        "bibliography",
        FieldKind::Text {
            max_length: Some(BIBLIOGRAPHY_MAX_LENGTH),
        },
    ),
    (
        "canonicalUrl",
        FieldKind::Text {
            max_length: Some(CANONICAL_URL_MAX_LENGTH),
        },
    ),
    ("content", FieldKind::Text { max_length: None }),
];

/// Kind of the writable field `name`, if the schema has one.
pub fn field_kind(name: &str) -> Option<FieldKind> {
    FIELDS
        .iter()
        .find(|(field, _)| *field == name)
        .map(|(_, kind)| *kind)
}
