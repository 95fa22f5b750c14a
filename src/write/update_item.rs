use crate::{common, error::EmptyUpdateError, write};

use aws_sdk_dynamodb::{Client, error, operation, types};
use indexmap::IndexMap;
use serde_dynamo::{Error, Result, to_attribute_value};
use serde_json::Value;
use std::collections;

/// One field overwrite of a [`Mutation`].
///
/// Both the field name and the value travel to the store as opaque placeholders, so no
/// field name can be read as a reserved word and no value can change the expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    /// Placeholder standing in for the field name, e.g. `#f0`.
    pub name_placeholder: String,
    /// Placeholder standing in for the value, e.g. `:v0`.
    pub value_placeholder: String,
    /// The field to overwrite.
    pub field: String,
    /// The new value; `null` clears the field.
    pub value: Value,
}

/// Field-level partial update of a single record.
///
/// A present field fully replaces its prior value. Nested structures are not merged.
///
/// ```rust
/// use blog_posts_crud::write::update_item::Mutation;
/// use serde_json::json;
///
/// let mutation = Mutation::build([
///     ("title".to_string(), json!("Hello")),
///     ("draft".to_string(), json!(false)),
/// ])
/// .unwrap();
/// assert_eq!(mutation.assignments().len(), 2);
/// assert!(Mutation::build(Vec::<(String, serde_json::Value)>::new()).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Mutation {
    assignments: Vec<Assignment>,
}

impl Mutation {
    /// Aliases every `(field, value)` pair behind fresh placeholders.
    ///
    /// A field given more than once keeps its last value. Fails when no field is given.
    pub fn build<I>(fields: I) -> std::result::Result<Self, EmptyUpdateError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let fields: IndexMap<String, Value> = fields.into_iter().collect();
        if fields.is_empty() {
            return Err(EmptyUpdateError);
        }
        let assignments = fields
            .into_iter()
            .enumerate()
            .map(|(index, (field, value))| Assignment {
                name_placeholder: common::name_placeholder(common::FIELD_PREFIX, index),
                value_placeholder: common::value_placeholder(common::VALUE_PREFIX, index),
                field,
                value,
            })
            .collect();
        Ok(Self { assignments })
    }

    /// The field overwrites, one per distinct input field.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Consumes the mutation into its field overwrites.
    pub fn into_assignments(self) -> Vec<Assignment> {
        self.assignments
    }
}

impl TryFrom<Mutation> for common::ExpressionInput {
    type Error = Error;

    fn try_from(mutation: Mutation) -> Result<Self> {
        let mut operations = Vec::with_capacity(mutation.assignments.len());
        for assignment in mutation.assignments {
            let value = to_attribute_value(assignment.value)?;
            let expression = format!(
                "{} = {}",
                assignment.name_placeholder, assignment.value_placeholder
            );
            let operation = common::ExpressionInput {
                expression,
                expression_attribute_names: collections::HashMap::from([(
                    assignment.name_placeholder,
                    assignment.field,
                )]),
                expression_attribute_values: collections::HashMap::from([(
                    assignment.value_placeholder,
                    value,
                )]),
            };
            operations.push(operation);
        }
        let mut operation = common::ExpressionInput::merge(", ", operations);
        operation.expression = format!("SET {}", operation.expression);
        Ok(operation)
    }
}

/// update item operation
#[derive(Clone, Debug, Default, PartialEq)]
struct UpdateItemInput {
    keys: collections::HashMap<String, types::AttributeValue>,
    update_expression: String,
    write_operation: write::common::WriteInput,
}

/// Update item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types};
/// use blog_posts_crud::{common, write};
/// use serde_json::json;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let update_item = write::update_item::UpdateItem {
///     key: common::key::Key::new("1"),
///     mutation: write::update_item::Mutation::build([("title".to_string(), json!("New"))])?,
///     write_args: write::common::WriteArgs {
///         condition: Some(common::condition::KeyCondition::partition_key(
///             common::condition::Condition::Exists,
///         )),
///         return_values: Some(types::ReturnValue::AllNew),
///         table_name: "blog-posts".to_string(),
///     },
/// };
/// update_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateItem {
    /// The primary key of the item to update.
    pub key: common::key::Key,
    /// The fields to overwrite.
    pub mutation: Mutation,
    /// Additional write operation arguments (table name, condition, return values).
    pub write_args: write::common::WriteArgs,
}

impl TryFrom<UpdateItem> for UpdateItemInput {
    type Error = Error;

    fn try_from(update_item: UpdateItem) -> Result<Self> {
        let keys = update_item.key.into();
        let mut write_operation: write::common::WriteInput = update_item.write_args.into();
        let operation = update_item.mutation.try_into()?;
        let update_expression = write_operation.merge_expression(operation);
        let operation = Self {
            keys,
            update_expression,
            write_operation,
        };
        Ok(operation)
    }
}

impl UpdateItem {
    /// Execute the update item operation.
    #[tracing::instrument(name = "blog_posts_crud.update_item", skip_all, fields(key = %self.key.value), err)]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::update_item::UpdateItemOutput,
        error::SdkError<operation::update_item::UpdateItemError>,
    > {
        let update_item: UpdateItemInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client
            .update_item()
            .set_key(Some(update_item.keys))
            .update_expression(update_item.update_expression);
        crate::apply_write_operation!(builder, update_item.write_operation)
            .send()
            .await
    }
}
