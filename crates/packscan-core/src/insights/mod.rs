//! Insight extraction module.

mod extract;
pub mod patterns;
mod registry;

pub use extract::extract;
pub use registry::{DetailFn, InsightRegistry, Matcher, NormalizeFn, REGISTRY};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One extracted insight, as emitted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRecord {
    /// Identifier of the matcher that produced the record (packager code
    /// kind, label tag, ...).
    pub tag: String,

    /// The matched substring, verbatim.
    pub raw: String,

    /// Canonical value: the matcher's normalizer output, or `raw` when the
    /// matcher has none.
    pub value: String,

    /// Structured sub-fields (weight value/unit, temperature bounds, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// All insights extracted from one source document; one batch-output line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInsights {
    /// Requested insight category.
    #[serde(rename = "type")]
    pub insight_type: String,

    /// Product barcode, when recoverable from the document source.
    pub barcode: Option<String>,

    /// Extracted records, in engine order.
    pub insights: Vec<InsightRecord>,

    /// Path of the source image, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}
