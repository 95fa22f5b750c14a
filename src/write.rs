//! Write operations for modifying blog posts in DynamoDB tables.
//!
//! This module provides operations for writing data to DynamoDB:
//! - Putting new items
//! - Updating existing items field by field
//! - Deleting items by primary key

/// Common utilities and types for write operations.
pub mod common;

/// Delete item operation for removing items from tables.
pub mod delete_item;

/// Put item operation for creating items.
pub mod put_item;

/// Update item operation and the mutation builder behind it.
pub mod update_item;
