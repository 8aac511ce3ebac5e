use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchemaGraphError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaGraphError {
    #[error("Schema not found: {0}")]
    SchemaNotFound(String),
}
