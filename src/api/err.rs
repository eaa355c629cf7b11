/// Custom error type
#[derive(thiserror::Error, Debug)]
pub enum CustomError {
    /// A required shipment field was absent
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// The shipment date is not a recognizable date/time
    #[error("failed to parse shipment date {value:?}: {source}")]
    DateParseError {
        value: String,
        #[source]
        source: time::error::Parse,
    },
    /// Reading the data file or writing the listing failed
    #[error("failed to read or write: {0}")]
    FileReadError(#[from] std::io::Error),
    /// Query output could not be rendered as json
    #[error("failed to render json: {0}")]
    JsonError(#[from] serde_json::Error),
    /// The query has no json rendering
    #[error("unsupported query: {0}")]
    UsageError(String),
}
