//! Insight annotation: per-type side effects applied when an insight is
//! accepted.
//!
//! Each insight type maps to one annotator through a registry built once at
//! startup. Dispatch on an unregistered type is an error, never a silent
//! no-op.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::{ProductClient, UPDATE_SUCCESS_STATUS};
use crate::error::AnnotationError;
use crate::store::{InsightStore, PendingInsight};

/// Capability interface: one operation per insight type.
#[async_trait]
pub trait InsightAnnotator: Send + Sync {
    /// Apply the side effect of accepting `insight`.
    async fn annotate(&self, insight: &PendingInsight) -> Result<(), AnnotationError>;
}

/// Static mapping from insight-type identifier to its annotator.
pub struct AnnotatorRegistry {
    annotators: HashMap<&'static str, Box<dyn InsightAnnotator>>,
}

impl AnnotatorRegistry {
    /// The standard mapping, wired to the shared client and store.
    pub fn standard(client: Arc<ProductClient>, store: Arc<dyn InsightStore>) -> Self {
        let mut annotators: HashMap<&'static str, Box<dyn InsightAnnotator>> = HashMap::new();
        annotators.insert(
            "packager_code",
            Box::new(PackagerCodeAnnotator::new(client)),
        );
        annotators.insert(
            "ingredient_spellcheck",
            Box::new(IngredientSpellcheckAnnotator::new(store)),
        );

        Self { annotators }
    }

    /// Resolve the annotator for an insight-type identifier.
    pub fn get(&self, identifier: &str) -> Result<&dyn InsightAnnotator, AnnotationError> {
        self.annotators
            .get(identifier)
            .map(|annotator| annotator.as_ref())
            .ok_or_else(|| AnnotationError::UnknownAnnotator(identifier.to_string()))
    }

    /// Dispatch `insight` to the annotator registered for its type.
    pub async fn annotate(&self, insight: &PendingInsight) -> Result<(), AnnotationError> {
        self.get(&insight.insight_type)?.annotate(insight).await
    }
}

/// Pushes the accepted packager code to the product database.
///
/// The update is fire-and-forget relative to local state: an unexpected
/// acknowledgement is logged, only a transport failure is an error.
pub struct PackagerCodeAnnotator {
    client: Arc<ProductClient>,
}

impl PackagerCodeAnnotator {
    pub fn new(client: Arc<ProductClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InsightAnnotator for PackagerCodeAnnotator {
    async fn annotate(&self, insight: &PendingInsight) -> Result<(), AnnotationError> {
        let code = insight
            .data
            .get("text")
            .and_then(Value::as_str)
            .ok_or_else(|| AnnotationError::InvalidData {
                insight_type: insight.insight_type.clone(),
                reason: "missing text field".to_string(),
            })?;

        let status = self
            .client
            .update_product_field(&insight.barcode, "add_emb_codes", code)
            .await?;

        if status != UPDATE_SUCCESS_STATUS {
            warn!("unexpected status during product update: {status}");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct SpellcheckPayload {
    original: String,
    correction: String,
}

/// Reconciles sibling offsets after an accepted spelling correction.
///
/// All offsets of one (product, type) pair index the same reference text, so
/// a length-changing correction shifts every still-pending sibling in one
/// atomic store operation, before the annotation is considered complete.
pub struct IngredientSpellcheckAnnotator {
    store: Arc<dyn InsightStore>,
}

impl IngredientSpellcheckAnnotator {
    pub fn new(store: Arc<dyn InsightStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl InsightAnnotator for IngredientSpellcheckAnnotator {
    async fn annotate(&self, insight: &PendingInsight) -> Result<(), AnnotationError> {
        let payload: SpellcheckPayload =
            serde_json::from_value(insight.data.clone()).map_err(|err| {
                AnnotationError::InvalidData {
                    insight_type: insight.insight_type.clone(),
                    reason: err.to_string(),
                }
            })?;

        let delta = payload.correction.chars().count() as i64
            - payload.original.chars().count() as i64;

        if delta == 0 {
            return Ok(());
        }

        let shifted = self
            .store
            .shift_sibling_offsets(&insight.barcode, &insight.insight_type, insight.id, delta)
            .map_err(AnnotationError::Reconciliation)?;

        debug!(
            barcode = %insight.barcode,
            delta, shifted, "reconciled sibling offsets"
        );

        Ok(())
    }
}
