use crate::{common, read};

use aws_sdk_dynamodb::{Client, error, operation, types};
use std::collections;

/// get item operation
#[derive(Clone, Debug, Default, PartialEq)]
struct GetItemInput {
    keys: collections::HashMap<String, types::AttributeValue>,
    read_operation: read::common::ReadInput,
}

/// Get item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use blog_posts_crud::{common, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let get_item = read::get_item::GetItem {
///     key: common::key::Key::new("1"),
///     read_args: read::common::ReadArgs {
///         table_name: "blog-posts".to_string(),
///         ..Default::default()
///     },
/// };
/// get_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GetItem {
    /// The primary key of the item to retrieve.
    pub key: common::key::Key,
    /// Additional read operation arguments (table name, consistent read).
    pub read_args: read::common::ReadArgs,
}

impl From<GetItem> for GetItemInput {
    fn from(get_item: GetItem) -> Self {
        Self {
            keys: get_item.key.into(),
            read_operation: get_item.read_args.into(),
        }
    }
}

impl GetItem {
    /// Execute the get item operation.
    #[tracing::instrument(name = "blog_posts_crud.get_item", skip_all, fields(key = %self.key.value), err)]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::get_item::GetItemOutput,
        error::SdkError<operation::get_item::GetItemError>,
    > {
        let get_item: GetItemInput = self.into();
        let builder = client.get_item().set_key(Some(get_item.keys));
        crate::apply_read_operation!(builder, get_item.read_operation)
            .send()
            .await
    }
}
