//! The extraction engine: runs a category's matchers over a document.

use tracing::debug;

use super::{InsightRecord, REGISTRY};
use crate::error::ExtractionError;
use crate::ocr::OcrDocument;

/// Run every matcher of `category` against `document`.
///
/// A pure function of its inputs: record order is matcher order, then
/// candidate order, then match order within each candidate, so re-running on
/// an unchanged document reproduces identical output. Overlapping matches
/// from different matchers of one category are all reported; the engine does
/// not deduplicate.
pub fn extract(
    document: &OcrDocument,
    category: &str,
) -> std::result::Result<Vec<InsightRecord>, ExtractionError> {
    let matchers = REGISTRY
        .matchers(category)
        .ok_or_else(|| ExtractionError::UnknownInsightType(category.to_string()))?;

    let mut records = Vec::new();

    for matcher in matchers {
        for text in document.text_for(matcher.field, matcher.lowercase) {
            for caps in matcher.regex.captures_iter(&text) {
                let raw = caps.get(0).map_or("", |m| m.as_str()).to_string();
                let value = match matcher.normalize {
                    Some(normalize) => normalize(&caps),
                    None => raw.clone(),
                };

                records.push(InsightRecord {
                    tag: matcher.tag.to_string(),
                    raw,
                    value,
                    data: matcher.detail.map(|detail| detail(&caps)),
                });
            }
        }
    }

    debug!(
        category,
        count = records.len(),
        "extracted insight records"
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::error::ExtractionError;

    fn document_with_full_text(text: &str) -> OcrDocument {
        OcrDocument::from_response(&json!({
            "fullTextAnnotation": {"text": text}
        }))
    }

    fn document_with_regions(regions: &[&str]) -> OcrDocument {
        let annotations: Vec<_> = regions
            .iter()
            .map(|text| json!({"description": text, "boundingPoly": {"vertices": []}}))
            .collect();
        OcrDocument::from_response(&json!({"textAnnotations": annotations}))
    }

    #[test]
    fn test_unknown_insight_type() {
        let document = document_with_full_text("anything");
        let err = extract(&document, "logo").unwrap_err();
        assert!(matches!(err, ExtractionError::UnknownInsightType(ref t) if t == "logo"));
    }

    #[test]
    fn test_no_matches_yields_empty() {
        let document = document_with_full_text("plain packaging text");
        assert!(extract(&document, "packager_code").unwrap().is_empty());
        assert!(extract(&document, "label").unwrap().is_empty());
    }

    #[test]
    fn test_empty_document_yields_empty() {
        let document = OcrDocument::default();
        assert!(extract(&document, "packager_code").unwrap().is_empty());
    }

    #[test]
    fn test_packager_code_eu_fr() {
        let document = document_with_full_text("Fabriqué en France\nFR 83.400.011 CE\n");
        let records = extract(&document, "packager_code").unwrap();

        assert_eq!(
            records,
            vec![InsightRecord {
                tag: "eu_fr".to_string(),
                raw: "FR 83.400.011 CE".to_string(),
                value: "FR 83.400.011 CE".to_string(),
                data: None,
            }]
        );
    }

    #[test]
    fn test_packager_code_eu_fr_normalizes_separators() {
        let document = document_with_full_text("FR 62-448-034 EC");
        let records = extract(&document, "packager_code").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].raw, "FR 62-448-034 EC");
        assert_eq!(records[0].value, "FR 62.448.034 EC");
    }

    #[test]
    fn test_packager_code_spans_newline_via_contiguous_text() {
        let document = document_with_full_text("FR 83.400.011\nCE");
        let records = extract(&document, "packager_code").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].raw, "FR 83.400.011 CE");
    }

    #[test]
    fn test_packager_code_fr_emb_from_regions() {
        let document = document_with_regions(&["EMB 50155A", "ignore me"]);
        let records = extract(&document, "packager_code").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tag, "fr_emb");
        assert_eq!(records[0].value, "EMB 50155A");
    }

    #[test]
    fn test_label_organic() {
        let document = document_with_full_text("issu de l'agriculture biologique (FR)");
        let records = extract(&document, "label").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tag, "en:organic");
        assert_eq!(records[0].raw, "agriculture biologique ");
    }

    #[test]
    fn test_label_eu_bio_code_normalized() {
        let document = document_with_regions(&["FR-BIO-09"]);
        let records = extract(&document, "label").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tag, "xx-bio-xx");
        assert_eq!(records[0].value, "FR-BIO-09");
    }

    #[test]
    fn test_label_duplicate_emission_is_preserved() {
        // "ingrédients biologiques" fires the long form, and "agriculture
        // biologique" fires the agriculture form: two records, same tag.
        let document =
            document_with_full_text("ingrédients biologiques, agriculture biologique ");
        let records = extract(&document, "label").unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.tag == "en:organic"));
    }

    #[test]
    fn test_exhaustive_matching_within_one_candidate() {
        let document = document_with_regions(&["EMB 50155 ... EMB 29048B"]);
        let records = extract(&document, "packager_code").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value, "EMB 50155");
        assert_eq!(records[1].value, "EMB 29048B");
    }

    #[test]
    fn test_deterministic_output() {
        let document = document_with_full_text(
            "agriculture biologique \nFR 83.400.011 CE\ningrédients bio ",
        );

        let first = extract(&document, "label").unwrap();
        let second = extract(&document, "label").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_weight_value_subfields() {
        let document = document_with_full_text("Poids net: 250 g");
        let records = extract(&document, "weight_value").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data, Some(json!({"value": "250", "unit": "g"})));
    }

    #[test]
    fn test_storage_instruction_subfields() {
        let document = document_with_full_text("À conserver entre +2°C et +6°C.");
        let records = extract(&document, "storage_instruction").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tag, "between");
        let data = records[0].data.as_ref().unwrap();
        assert_eq!(data["between"]["min"], json!({"value": "+2", "unit": "C"}));
        assert_eq!(data["between"]["max"], json!({"value": "+6", "unit": "C"}));
    }

    #[test]
    fn test_best_before_date_tags() {
        let document = document_with_full_text("best before 12 Jan 2025\n15/03/26");
        let records = extract(&document, "best_before_date").unwrap();

        let tags: Vec<_> = records.iter().map(|r| r.tag.as_str()).collect();
        assert!(tags.contains(&"en"));
        assert!(tags.contains(&"full_digits"));
    }
}
