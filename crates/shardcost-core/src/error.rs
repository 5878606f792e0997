use thiserror::Error;

/// Canonical result for shardcost.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("field '{field}' not found in collection '{collection}'")]
    FieldNotFound { field: String, collection: String },

    #[error("field '{field}' in collection '{collection}' is unsupported for type resolution")]
    UnsupportedField { field: String, collection: String },

    #[error("unknown collection '{0}'")]
    UnknownCollection(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Query error: {0}")]
    Query(String),

    // Decoders in higher layers map their format errors into this variant.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(e.to_string())
    }
}
