//! Errors raised while decoding scanner documents

use thiserror::Error;

/// Failure to turn a retrieved payload into domain types
#[derive(Debug, Error)]
pub enum DataError {
    #[error("malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("daily document for {symbol} has no `{column}` column")]
    MissingColumn { symbol: String, column: &'static str },
}

pub type DataResult<T> = Result<T, DataError>;
