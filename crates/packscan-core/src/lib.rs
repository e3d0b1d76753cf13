//! Core library for product-packaging OCR insight processing.
//!
//! This crate provides:
//! - OCR provider response parsing into queryable text fields
//! - Field-aware pattern extraction of typed insights (packager codes,
//!   label claims, weights, storage instructions, ...)
//! - Polymorphic per-type annotation with sibling offset reconciliation
//! - The pending-insight store contract and its SQLite implementation

pub mod annotate;
pub mod barcode;
pub mod client;
pub mod config;
pub mod error;
pub mod insights;
pub mod ocr;
pub mod store;

pub use annotate::{AnnotatorRegistry, InsightAnnotator};
pub use client::{ProductClient, UPDATE_SUCCESS_STATUS};
pub use config::PackscanConfig;
pub use error::{PackscanError, Result};
pub use insights::{DocumentInsights, InsightRecord, InsightRegistry, REGISTRY, extract};
pub use ocr::{FullTextAnnotation, OcrDocument, OcrField, TextAnnotation};
pub use store::{InsightStore, PendingInsight, SqliteInsightStore};
