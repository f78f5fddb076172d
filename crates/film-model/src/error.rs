use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("schema has no columns")]
    EmptySchema,
    #[error("column {index} has an empty name")]
    EmptyColumnName { index: usize },
    #[error("duplicate column '{column}'")]
    DuplicateColumn { column: String },
    #[error("row {row} has {found} fields, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
