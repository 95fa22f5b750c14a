use crate::read;

use aws_sdk_dynamodb::{Client, error, operation, types};
use std::collections;

/// scan operation
#[derive(Clone, Debug, Default, PartialEq)]
struct ScanInput {
    read_operation: read::common::ReadInput,
}

/// Scan operation.
///
/// Reads every page of the table, so the returned items are the whole table in the
/// store's natural scan order.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use blog_posts_crud::read;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let scan = read::scan::Scan {
///     read_args: read::common::ReadArgs {
///         table_name: "blog-posts".to_string(),
///         ..Default::default()
///     },
/// };
/// let items = scan.send(client).await?;
/// println!("{} items", items.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scan {
    /// Additional read operation arguments (table name, consistent read).
    pub read_args: read::common::ReadArgs,
}

impl From<Scan> for ScanInput {
    fn from(scan: Scan) -> Self {
        Self {
            read_operation: scan.read_args.into(),
        }
    }
}

impl Scan {
    /// Execute the scan operation, following pagination until the last page.
    #[tracing::instrument(name = "blog_posts_crud.scan", skip_all, fields(table_name = %self.read_args.table_name), err)]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        Vec<collections::HashMap<String, types::AttributeValue>>,
        error::SdkError<operation::scan::ScanError>,
    > {
        let scan: ScanInput = self.into();
        let builder = client.scan();
        let mut paginator = crate::apply_read_operation!(builder, scan.read_operation)
            .into_paginator()
            .send();
        let mut items = Vec::new();
        while let Some(page) = paginator.next().await {
            if let Some(page_items) = page?.items {
                items.extend(page_items);
            }
        }
        Ok(items)
    }
}
