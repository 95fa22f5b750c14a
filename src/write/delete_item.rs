use crate::{common, write};

use aws_sdk_dynamodb::{Client, error, operation, types};
use std::collections;

/// delete item operation
#[derive(Debug, PartialEq)]
struct DeleteItemInput {
    keys: collections::HashMap<String, types::AttributeValue>,
    write_operation: write::common::WriteInput,
}

/// Delete item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types};
/// use blog_posts_crud::{common, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let delete_item = write::delete_item::DeleteItem {
///     key: common::key::Key::new("1"),
///     write_args: write::common::WriteArgs {
///         return_values: Some(types::ReturnValue::AllOld),
///         table_name: "blog-posts".to_string(),
///         ..Default::default()
///     },
/// };
/// delete_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq)]
pub struct DeleteItem {
    /// The primary key of the item to delete.
    pub key: common::key::Key,
    /// Additional write operation arguments (table name, condition, return values).
    pub write_args: write::common::WriteArgs,
}

impl From<DeleteItem> for DeleteItemInput {
    fn from(delete_item: DeleteItem) -> Self {
        Self {
            keys: delete_item.key.into(),
            write_operation: delete_item.write_args.into(),
        }
    }
}

impl DeleteItem {
    /// Execute the delete item operation.
    #[tracing::instrument(name = "blog_posts_crud.delete_item", skip_all, fields(key = %self.key.value), err)]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::delete_item::DeleteItemOutput,
        error::SdkError<operation::delete_item::DeleteItemError>,
    > {
        let delete_item: DeleteItemInput = self.into();
        let builder = client.delete_item().set_key(Some(delete_item.keys));
        crate::apply_write_operation!(builder, delete_item.write_operation)
            .send()
            .await
    }
}
