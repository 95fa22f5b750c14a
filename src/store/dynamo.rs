use crate::{
    common,
    config::{self, StoreConfig},
    error::StoreError,
    model::BlogPost,
    read,
    store::StoreGateway,
    write::{self, update_item::Mutation},
};

use async_trait::async_trait;
use aws_config::{BehaviorVersion, meta::region::RegionProviderChain, retry::RetryConfig};
use aws_sdk_dynamodb::{
    Client,
    config::{Credentials, Region},
    error::{DisplayErrorContext, SdkError},
    operation::{
        put_item::{PutItemError, PutItemOutput},
        update_item::{UpdateItemError, UpdateItemOutput},
    },
    types,
};
use serde_dynamo::from_item;
use std::{collections, error};

type Item = collections::HashMap<String, types::AttributeValue>;

fn request_error<E, R>(operation: &'static str, source: SdkError<E, R>) -> StoreError
where
    SdkError<E, R>: error::Error + Send + Sync + 'static,
{
    tracing::debug!(operation, error = %DisplayErrorContext(&source), "DynamoDB request failed");
    StoreError::request(operation, source)
}

fn to_post(item: Option<Item>) -> Result<Option<BlogPost>, StoreError> {
    let post: Option<BlogPost> = item.map(|item| from_item(item)).transpose()?;
    Ok(post)
}

/// Maps a conditional put: a failed `attribute_not_exists` check means the id is taken.
fn put_outcome<R>(
    id: &str,
    result: Result<PutItemOutput, SdkError<PutItemError, R>>,
) -> Result<(), StoreError>
where
    SdkError<PutItemError, R>: error::Error + Send + Sync + 'static,
{
    match result {
        Ok(_) => Ok(()),
        Err(error)
            if error
                .as_service_error()
                .is_some_and(PutItemError::is_conditional_check_failed_exception) =>
        {
            Err(StoreError::Conflict { id: id.to_string() })
        }
        Err(error) => Err(request_error("put", error)),
    }
}

/// Maps a conditional update: a failed `attribute_exists` check means there is no such post.
fn update_outcome<R>(
    result: Result<UpdateItemOutput, SdkError<UpdateItemError, R>>,
) -> Result<Option<BlogPost>, StoreError>
where
    SdkError<UpdateItemError, R>: error::Error + Send + Sync + 'static,
{
    match result {
        Ok(output) => to_post(output.attributes),
        Err(error)
            if error
                .as_service_error()
                .is_some_and(UpdateItemError::is_conditional_check_failed_exception) =>
        {
            Ok(None)
        }
        Err(error) => Err(request_error("update", error)),
    }
}

/// [`StoreGateway`] backed by an Amazon DynamoDB table keyed by `id`.
///
/// The client is cheap to clone and safe to share, so one instance serves every request.
///
/// ```rust,no_run
/// use blog_posts_crud::{config::StoreConfig, store::DynamoStore};
///
/// # async fn example() {
/// let store = DynamoStore::connect(&StoreConfig::new("blog-posts")).await;
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct DynamoStore {
    client: Client,
    table_name: String,
    consistent_read: bool,
}

impl DynamoStore {
    /// Wraps an already configured client.
    pub fn new(client: Client, config: &StoreConfig) -> Self {
        Self {
            client,
            table_name: config.table_name.clone(),
            consistent_read: config.consistent_read,
        }
    }

    /// Builds a client for the configured endpoint and wraps it.
    ///
    /// A local endpoint gets static placeholder credentials, which DynamoDB Local accepts.
    /// SDK retries are disabled: every gateway call is a single request.
    pub async fn connect(config: &StoreConfig) -> Self {
        let region = RegionProviderChain::first_try(config.region.clone().map(Region::new))
            .or_default_provider()
            .or_else(Region::from_static(config::DEFAULT_REGION));
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .retry_config(RetryConfig::disabled());
        match &config.endpoint_url {
            Some(endpoint_url) => {
                tracing::info!(
                    endpoint_url = %endpoint_url,
                    table_name = %config.table_name,
                    "using local DynamoDB"
                );
                loader = loader.endpoint_url(endpoint_url).credentials_provider(
                    Credentials::new("local", "local", None, None, "blog-posts-crud"),
                );
            }
            None => {
                tracing::info!(table_name = %config.table_name, "using AWS DynamoDB");
            }
        }
        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config), config)
    }

    fn read_args(&self) -> read::common::ReadArgs {
        read::common::ReadArgs {
            consistent_read: Some(self.consistent_read),
            table_name: self.table_name.clone(),
        }
    }

    fn write_args(
        &self,
        condition: Option<common::condition::Condition>,
        return_values: types::ReturnValue,
    ) -> write::common::WriteArgs {
        write::common::WriteArgs {
            condition: condition.map(common::condition::KeyCondition::partition_key),
            return_values: Some(return_values),
            table_name: self.table_name.clone(),
        }
    }
}

#[async_trait]
impl StoreGateway for DynamoStore {
    async fn scan(&self) -> Result<Vec<BlogPost>, StoreError> {
        let scan = read::scan::Scan {
            read_args: self.read_args(),
        };
        let items = scan
            .send(&self.client)
            .await
            .map_err(|error| request_error("scan", error))?;
        let mut posts: Vec<BlogPost> = Vec::with_capacity(items.len());
        for item in items {
            posts.push(from_item(item)?);
        }
        Ok(posts)
    }

    async fn get(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
        let get_item = read::get_item::GetItem {
            key: common::key::Key::new(id),
            read_args: self.read_args(),
        };
        let output = get_item
            .send(&self.client)
            .await
            .map_err(|error| request_error("get", error))?;
        to_post(output.item)
    }

    async fn put(&self, post: &BlogPost) -> Result<(), StoreError> {
        let put_item = write::put_item::PutItem {
            item: post,
            write_args: self.write_args(
                Some(common::condition::Condition::NotExists),
                types::ReturnValue::None,
            ),
        };
        put_outcome(&post.id, put_item.send(&self.client).await)
    }

    async fn update(&self, id: &str, mutation: Mutation) -> Result<Option<BlogPost>, StoreError> {
        let update_item = write::update_item::UpdateItem {
            key: common::key::Key::new(id),
            mutation,
            write_args: self.write_args(
                Some(common::condition::Condition::Exists),
                types::ReturnValue::AllNew,
            ),
        };
        update_outcome(update_item.send(&self.client).await)
    }

    async fn delete(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
        let delete_item = write::delete_item::DeleteItem {
            key: common::key::Key::new(id),
            write_args: self.write_args(None, types::ReturnValue::AllOld),
        };
        let output = delete_item
            .send(&self.client)
            .await
            .map_err(|error| request_error("delete", error))?;
        to_post(output.attributes)
    }
}
