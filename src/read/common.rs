#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ReadInput {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) table_name: String,
}

/// Arguments common to read operations (GetItem, Scan).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct ReadArgs {
    /// Whether to use a consistent read.
    ///
    /// `true` for strongly consistent reads, `false` or `None` for eventually consistent reads.
    /// Consistent reads consume more capacity units but guarantee you see the latest data.
    pub consistent_read: Option<bool>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl From<ReadArgs> for ReadInput {
    fn from(read_args: ReadArgs) -> Self {
        Self {
            // `false` is the service default, so it is left off the request.
            consistent_read: read_args.consistent_read.filter(|consistent| *consistent),
            table_name: read_args.table_name,
        }
    }
}

/// apply common read operation settings to a builder
#[doc(hidden)]
#[macro_export]
macro_rules! apply_read_operation {
    ($builder:expr, $read_operation:expr) => {
        $builder
            .set_consistent_read($read_operation.consistent_read)
            .table_name($read_operation.table_name)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::default(
        ReadArgs {
            table_name: "a".to_string(),
            ..Default::default()
        },
        ReadInput {
            table_name: "a".to_string(),
            ..Default::default()
        }
    )]
    #[case::eventually_consistent(
        ReadArgs {
            consistent_read: Some(false),
            table_name: "a".to_string(),
        },
        ReadInput {
            table_name: "a".to_string(),
            ..Default::default()
        }
    )]
    #[case::consistent(
        ReadArgs {
            consistent_read: Some(true),
            table_name: "a".to_string(),
        },
        ReadInput {
            consistent_read: Some(true),
            table_name: "a".to_string(),
        }
    )]
    fn test_read_args(#[case] args: ReadArgs, #[case] expected: ReadInput) {
        let actual: ReadInput = args.into();
        assert_eq!(actual, expected);
    }
}
