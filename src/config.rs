//! Startup configuration, resolved once from the environment.
//!
//! ```rust
//! use blog_posts_crud::config::Config;
//!
//! let config = Config::from_lookup(|name| match name {
//!     "BLOG_TABLE_NAME" => Some("blog-posts".to_string()),
//!     "AWSENV" => Some("AWS_SAM_LOCAL".to_string()),
//!     _ => None,
//! })
//! .unwrap();
//! assert_eq!(config.store.endpoint_url.as_deref(), Some("http://dynamodb-local:8000"));
//! ```

use crate::error::ConfigError;

use std::{env, time};

/// Table name variable, required.
pub const TABLE_NAME_VAR: &str = "BLOG_TABLE_NAME";
/// Explicit store endpoint variable.
pub const ENDPOINT_VAR: &str = "BLOG_STORE_ENDPOINT";
/// Deployment environment variable set by the local SAM runtime.
pub const ENVIRONMENT_VAR: &str = "AWSENV";
/// Region variable.
pub const REGION_VAR: &str = "BLOG_STORE_REGION";
/// Per-call store timeout variable, in milliseconds.
pub const TIMEOUT_VAR: &str = "BLOG_STORE_TIMEOUT_MS";
/// Consistent read variable.
pub const CONSISTENT_READ_VAR: &str = "BLOG_CONSISTENT_READ";
/// List ordering variable.
pub const SORT_BY_DATE_VAR: &str = "BLOG_LIST_SORT_BY_DATE";

/// [`ENVIRONMENT_VAR`] value selecting the local endpoint.
pub const LOCAL_ENVIRONMENT: &str = "AWS_SAM_LOCAL";
/// Endpoint of DynamoDB Local next to a SAM local runtime.
pub const LOCAL_ENDPOINT: &str = "http://dynamodb-local:8000";
/// Region used when neither the configuration nor the provider chain has one.
pub const DEFAULT_REGION: &str = "us-east-1";
/// Store timeout used when [`TIMEOUT_VAR`] is unset.
pub const DEFAULT_STORE_TIMEOUT: time::Duration = time::Duration::from_secs(5);

/// Where and how to reach the blog post table.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct StoreConfig {
    /// Table name.
    pub table_name: String,
    /// Explicit endpoint; `None` means the managed service endpoint.
    pub endpoint_url: Option<String>,
    /// Region; `None` defers to the AWS provider chain.
    pub region: Option<String>,
    /// Whether reads are strongly consistent.
    pub consistent_read: bool,
}

impl StoreConfig {
    /// Managed-endpoint configuration for `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            endpoint_url: None,
            region: None,
            consistent_read: false,
        }
    }

    /// Whether an explicit (local) endpoint is configured.
    pub fn is_local(&self) -> bool {
        self.endpoint_url.is_some()
    }
}

/// Behavior knobs of the request handlers.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct HandlerOptions {
    /// Upper bound of a single store call.
    pub store_timeout: time::Duration,
    /// Whether list results are ordered by `date`, newest first.
    pub sort_by_date: bool,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            store_timeout: DEFAULT_STORE_TIMEOUT,
            sort_by_date: true,
        }
    }
}

/// Complete startup configuration.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Config {
    /// Store gateway settings.
    pub store: StoreConfig,
    /// Handler settings.
    pub handler: HandlerOptions,
}

impl Config {
    /// Resolves the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolves the configuration from `lookup`, which maps a variable name to its value.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let table_name = var(TABLE_NAME_VAR).ok_or(ConfigError::MissingVar(TABLE_NAME_VAR))?;
        let endpoint_url = var(ENDPOINT_VAR).or_else(|| {
            var(ENVIRONMENT_VAR)
                .filter(|environment| environment == LOCAL_ENVIRONMENT)
                .map(|_| LOCAL_ENDPOINT.to_string())
        });
        let store_timeout = match var(TIMEOUT_VAR) {
            Some(value) => parse_timeout(value)?,
            None => DEFAULT_STORE_TIMEOUT,
        };
        let consistent_read = match var(CONSISTENT_READ_VAR) {
            Some(value) => parse_flag(CONSISTENT_READ_VAR, value)?,
            None => false,
        };
        let sort_by_date = match var(SORT_BY_DATE_VAR) {
            Some(value) => parse_flag(SORT_BY_DATE_VAR, value)?,
            None => true,
        };
        Ok(Self {
            store: StoreConfig {
                table_name,
                endpoint_url,
                region: var(REGION_VAR),
                consistent_read,
            },
            handler: HandlerOptions {
                store_timeout,
                sort_by_date,
            },
        })
    }
}

fn parse_timeout(value: String) -> Result<time::Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(millis) if millis > 0 => Ok(time::Duration::from_millis(millis)),
        _ => Err(ConfigError::InvalidVar {
            name: TIMEOUT_VAR,
            value,
            reason: "expected a positive number of milliseconds".to_string(),
        }),
    }
}

fn parse_flag(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidVar {
            name,
            value,
            reason: "expected true or false".to_string(),
        }),
    }
}
