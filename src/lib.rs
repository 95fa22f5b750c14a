#![deny(missing_docs)]
#![deny(warnings)]

//! # Blog posts CRUD
//!
//! Validated create, read, update, delete and list handlers for blog posts kept in an
//! Amazon DynamoDB table.
//!
//! ## Overview
//!
//! Each handler takes a [`api::Request`] (path parameters and a raw JSON body) and always
//! answers with an [`api::Response`]:
//! - payloads are checked against a fixed field schema before any store call
//! - partial updates are turned into a single `SET` expression whose attribute names and
//!   values are bound through opaque placeholders, so reserved words are never an issue
//! - every store call goes through the [`store::StoreGateway`] trait and is bounded by a
//!   timeout
//!
//! ## Quick Example
//!
//! ```no_run
//! use blog_posts_crud::{api::Request, config::Config, handler::BlogHandlers, store::DynamoStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let store = DynamoStore::connect(&config.store).await;
//! let handlers = BlogHandlers::new(store, config.handler);
//!
//! let request = Request::default()
//!     .with_id("0b8a3c52-64a1-4f55-9d4c-2c6f4a8e9f10")
//!     .with_body(r#"{"title": "Hello again", "draft": false}"#);
//! let response = handlers.update(&request).await;
//! println!("{} {}", response.status_code, response.body);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@handler`] - The request handlers
//! - [`mod@validate`] - Field validators and payload validation
//! - [`mod@store`] - The store gateway and its backends
//! - [`mod@common`], [`mod@read`], [`mod@write`] - DynamoDB operation builders

/// Request and response envelopes.
pub mod api;

/// Common utilities for keys, conditions, and placeholders.
pub mod common;

/// Configuration resolved from the environment.
pub mod config;

/// Error types.
pub mod error;

/// The CRUD request handlers.
pub mod handler;

/// The blog post record.
pub mod model;

/// Read operations for retrieving blog posts from DynamoDB tables.
///
/// This module provides operations for:
/// - Getting individual items by key
/// - Scanning entire tables
pub mod read;

/// Storage backends behind a common gateway.
pub mod store;

/// Payload validation.
pub mod validate;

/// Write operations for modifying blog posts in DynamoDB tables.
///
/// This module provides operations for:
/// - Putting new items
/// - Updating items field by field
/// - Deleting items by key
pub mod write;
