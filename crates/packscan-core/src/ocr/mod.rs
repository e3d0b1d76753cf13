//! OCR provider response model.
//!
//! Wraps one provider response in typed, queryable text fields. Construction
//! is total: missing or malformed optional payload fields degrade to empty
//! values and are logged at debug level, never raised.

use std::borrow::Cow;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Which text field of an [`OcrDocument`] a matcher runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrField {
    /// Raw full text, newlines preserved.
    FullText,
    /// Full text with every newline collapsed to a single space.
    ContiguousText,
    /// Each detected text region separately, in provider order.
    Regions,
}

/// One OCR-detected text region.
#[derive(Debug, Clone)]
pub struct TextAnnotation {
    /// BCP-47 locale the provider guessed for the region, if any.
    pub locale: Option<String>,
    /// Recognized text content.
    pub text: String,
    /// Vertices of the detected region, in provider order.
    pub bounding_poly: Vec<(i64, i64)>,
}

/// The provider's whole-image text block.
#[derive(Debug, Clone)]
pub struct FullTextAnnotation {
    /// Raw joined text as returned by the provider.
    pub text: String,
    /// `text` with every newline replaced by a single space. Derived once at
    /// construction; multi-line matches run against this field.
    pub contiguous_text: String,
    /// Raw page structure. Carried through but unused by extraction.
    pub pages: Vec<Value>,
}

impl FullTextAnnotation {
    fn new(raw: RawFullTextAnnotation) -> Self {
        let contiguous_text = raw.text.replace('\n', " ");
        Self {
            text: raw.text,
            contiguous_text,
            pages: raw.pages,
        }
    }
}

/// A parsed OCR provider response.
#[derive(Debug, Clone, Default)]
pub struct OcrDocument {
    /// Detected text regions, possibly empty.
    pub text_annotations: Vec<TextAnnotation>,
    /// Whole-image text block, if the provider produced one.
    pub full_text_annotation: Option<FullTextAnnotation>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawVertex {
    x: Option<i64>,
    y: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawBoundingPoly {
    vertices: Vec<RawVertex>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawTextAnnotation {
    locale: Option<String>,
    description: String,
    #[serde(rename = "boundingPoly")]
    bounding_poly: RawBoundingPoly,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawFullTextAnnotation {
    text: String,
    pages: Vec<Value>,
}

impl OcrDocument {
    /// Build a document from one provider response object.
    pub fn from_response(response: &Value) -> Self {
        let mut text_annotations = Vec::new();

        if let Some(items) = response.get("textAnnotations").and_then(Value::as_array) {
            for item in items {
                match serde_json::from_value::<RawTextAnnotation>(item.clone()) {
                    Ok(raw) => text_annotations.push(TextAnnotation {
                        locale: raw.locale,
                        text: raw.description,
                        bounding_poly: raw
                            .bounding_poly
                            .vertices
                            .into_iter()
                            .map(|v| (v.x.unwrap_or(0), v.y.unwrap_or(0)))
                            .collect(),
                    }),
                    Err(err) => debug!("skipping malformed text annotation: {err}"),
                }
            }
        }

        let full_text_annotation = response.get("fullTextAnnotation").and_then(|value| {
            match serde_json::from_value::<RawFullTextAnnotation>(value.clone()) {
                Ok(raw) => Some(FullTextAnnotation::new(raw)),
                Err(err) => {
                    debug!("skipping malformed full text annotation: {err}");
                    None
                }
            }
        });

        Self {
            text_annotations,
            full_text_annotation,
        }
    }

    /// Build a document from a provider envelope (`{"responses": [...]}`).
    ///
    /// Returns `None` when the envelope holds no response or the response
    /// carries an error; such documents are skipped, not failed.
    pub fn from_provider(data: &Value) -> Option<Self> {
        ocr_response(data).map(Self::from_response)
    }

    /// The provider's whole-image text, if any.
    pub fn full_text(&self, lowercase: bool) -> Option<Cow<'_, str>> {
        self.full_text_annotation
            .as_ref()
            .map(|full| casefold(&full.text, lowercase))
    }

    /// The whole-image text with newlines collapsed to single spaces.
    pub fn contiguous_text(&self, lowercase: bool) -> Option<Cow<'_, str>> {
        self.full_text_annotation
            .as_ref()
            .map(|full| casefold(&full.contiguous_text, lowercase))
    }

    /// Per-region texts, lazily, in provider order.
    pub fn region_texts(&self, lowercase: bool) -> impl Iterator<Item = Cow<'_, str>> + '_ {
        self.text_annotations
            .iter()
            .map(move |annotation| casefold(&annotation.text, lowercase))
    }

    /// Candidate strings for a matcher's field selector.
    pub fn text_for(&self, field: OcrField, lowercase: bool) -> Vec<Cow<'_, str>> {
        match field {
            OcrField::FullText => self.full_text(lowercase).into_iter().collect(),
            OcrField::ContiguousText => self.contiguous_text(lowercase).into_iter().collect(),
            OcrField::Regions => self.region_texts(lowercase).collect(),
        }
    }
}

/// Extract the first usable response from a provider envelope.
pub fn ocr_response(data: &Value) -> Option<&Value> {
    let response = data.get("responses")?.as_array()?.first()?;

    if response.get("error").is_some() {
        debug!("provider response carries an error, skipping");
        return None;
    }

    Some(response)
}

fn casefold(text: &str, lowercase: bool) -> Cow<'_, str> {
    if lowercase {
        Cow::Owned(text.to_lowercase())
    } else {
        Cow::Borrowed(text)
    }
}
