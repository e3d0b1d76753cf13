//! Error types for the packscan-core library.

use thiserror::Error;

/// Main error type for the packscan library.
#[derive(Error, Debug)]
pub enum PackscanError {
    /// Insight extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Annotation error.
    #[error("annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    /// Insight store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Product API error.
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to insight extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The caller requested a category absent from the pattern registry.
    #[error("unknown insight type: {0}")]
    UnknownInsightType(String),
}

/// Errors related to insight annotation.
#[derive(Error, Debug)]
pub enum AnnotationError {
    /// No annotator is registered for the insight type.
    #[error("unknown annotator: {0}")]
    UnknownAnnotator(String),

    /// The insight's data payload does not carry the fields the annotator needs.
    #[error("invalid {insight_type} payload: {reason}")]
    InvalidData {
        insight_type: String,
        reason: String,
    },

    /// The atomic sibling-offset update aborted; nothing was shifted.
    #[error("offset reconciliation failed: {0}")]
    Reconciliation(#[source] StoreError),

    /// Transport-level failure talking to the product API.
    #[error("product update failed: {0}")]
    Transport(#[from] ClientError),
}

/// Errors related to the insight store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// No insight with the given id.
    #[error("insight not found: {0}")]
    NotFound(uuid::Uuid),

    /// A stored row could not be decoded back into an insight.
    #[error("corrupt insight row: {0}")]
    Corrupt(String),
}

/// Errors related to the product API client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, timeout, status, decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The barcode cannot be mapped to an image path.
    #[error(transparent)]
    Barcode(#[from] BarcodeError),
}

/// Errors related to barcode handling.
#[derive(Error, Debug)]
pub enum BarcodeError {
    /// Neither EAN-13 nor EAN-8.
    #[error("unknown barcode format: {0}")]
    UnknownFormat(String),
}

/// Result type for the packscan library.
pub type Result<T> = std::result::Result<T, PackscanError>;
