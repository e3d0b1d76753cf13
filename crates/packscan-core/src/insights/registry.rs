//! Declarative registry of field-bound pattern matchers, grouped by insight
//! category.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::{Value, json};

use super::patterns::*;
use crate::ocr::OcrField;

/// Maps raw capture groups to a canonical insight value.
pub type NormalizeFn = fn(&Captures) -> String;

/// Extracts structured sub-fields from a match.
pub type DetailFn = fn(&Captures) -> Value;

/// A compiled pattern bound to one target text field.
#[derive(Clone)]
pub struct Matcher {
    /// Identifier reported on every record this matcher produces.
    pub tag: &'static str,
    /// Compiled pattern.
    pub regex: &'static Regex,
    /// Which document field the pattern runs against.
    pub field: OcrField,
    /// Lowercase the candidate text before matching.
    pub lowercase: bool,
    /// Canonical-value function; identity on the raw match if absent.
    pub normalize: Option<NormalizeFn>,
    /// Structured sub-field extractor, if the category carries any.
    pub detail: Option<DetailFn>,
}

impl Matcher {
    fn new(tag: &'static str, regex: &'static Regex, field: OcrField) -> Self {
        Self {
            tag,
            regex,
            field,
            lowercase: false,
            normalize: None,
            detail: None,
        }
    }

    fn with_lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    fn with_normalizer(mut self, normalize: NormalizeFn) -> Self {
        self.normalize = Some(normalize);
        self
    }

    fn with_detail(mut self, detail: DetailFn) -> Self {
        self.detail = Some(detail);
        self
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("tag", &self.tag)
            .field("pattern", &self.regex.as_str())
            .field("field", &self.field)
            .field("lowercase", &self.lowercase)
            .finish()
    }
}

/// Ordered table of matcher groups, keyed by insight category.
#[derive(Debug)]
pub struct InsightRegistry {
    categories: Vec<(&'static str, Vec<Matcher>)>,
}

impl InsightRegistry {
    /// The standard category table.
    pub fn standard() -> Self {
        let categories = vec![
            (
                "packager_code",
                vec![
                    Matcher::new("fr_emb", &FR_EMB, OcrField::Regions)
                        .with_normalizer(normalize_fr_emb),
                    Matcher::new("eu_fr", &EU_FR_PACKAGING, OcrField::ContiguousText)
                        .with_normalizer(normalize_fr_packaging),
                ],
            ),
            (
                "label",
                vec![
                    Matcher::new("en:organic", &ORGANIC_INGREDIENTS, OcrField::ContiguousText)
                        .with_lowercase(),
                    Matcher::new(
                        "en:organic",
                        &ORGANIC_INGREDIENTS_SHORT,
                        OcrField::ContiguousText,
                    )
                    .with_lowercase(),
                    Matcher::new("en:organic", &ORGANIC_EU_NON_EU, OcrField::ContiguousText)
                        .with_lowercase(),
                    Matcher::new("en:organic", &ORGANIC_AGRICULTURE, OcrField::ContiguousText)
                        .with_lowercase(),
                    Matcher::new("en:organic", &ORGANIC_PRODUCTION, OcrField::ContiguousText)
                        .with_lowercase(),
                    Matcher::new("xx-bio-xx", &EU_BIO_CODE, OcrField::Regions)
                        .with_normalizer(normalize_eu_bio),
                    Matcher::new(
                        "fr:ab-agriculture-biologique",
                        &CERTIFIED_AB,
                        OcrField::ContiguousText,
                    )
                    .with_lowercase(),
                ],
            ),
            (
                "nutriscore",
                vec![Matcher::new("nutriscore", &NUTRISCORE, OcrField::FullText)],
            ),
            (
                "recycling_instruction",
                vec![
                    Matcher::new("recycling", &RECYCLE, OcrField::ContiguousText),
                    Matcher::new("throw_away", &THROW_AWAY, OcrField::ContiguousText),
                ],
            ),
            (
                "best_before_date",
                vec![
                    Matcher::new("en", &BEST_BEFORE_EN, OcrField::FullText),
                    Matcher::new("fr", &BEST_BEFORE_FR, OcrField::FullText),
                    Matcher::new("full_digits", &BEST_BEFORE_DIGITS, OcrField::FullText),
                ],
            ),
            (
                "weight_value",
                vec![
                    Matcher::new("weight_value", &WEIGHT_VALUE, OcrField::FullText)
                        .with_detail(weight_detail),
                ],
            ),
            (
                "weight_mention",
                vec![Matcher::new(
                    "weight_mention",
                    &WEIGHT_MENTION,
                    OcrField::FullText,
                )],
            ),
            (
                "storage_instruction",
                vec![
                    Matcher::new("max", &STORAGE_MAX, OcrField::ContiguousText)
                        .with_detail(storage_max_detail),
                    Matcher::new("between", &STORAGE_BETWEEN, OcrField::ContiguousText)
                        .with_detail(storage_between_detail),
                ],
            ),
        ];

        Self { categories }
    }

    /// Matchers for a category, in declaration order.
    pub fn matchers(&self, category: &str) -> Option<&[Matcher]> {
        self.categories
            .iter()
            .find(|(name, _)| *name == category)
            .map(|(_, matchers)| matchers.as_slice())
    }

    /// Registered category names, in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.categories.iter().map(|(name, _)| *name)
    }
}

lazy_static! {
    /// Process-wide standard registry.
    pub static ref REGISTRY: InsightRegistry = InsightRegistry::standard();
}

fn normalize_fr_packaging(caps: &Captures) -> String {
    format!(
        "{} {}.{}.{} {}",
        &caps[1], &caps[2], &caps[3], &caps[4], &caps[5]
    )
}

fn normalize_fr_emb(caps: &Captures) -> String {
    let city_code = caps[2].replace(' ', "");
    let company_code = caps.get(3).map(|m| m.as_str()).unwrap_or("");
    format!("{} {}{}", &caps[1], city_code, company_code)
}

fn normalize_eu_bio(caps: &Captures) -> String {
    format!("{}-{}-{}", &caps[1], &caps[2], &caps[3])
}

fn weight_detail(caps: &Captures) -> Value {
    json!({
        "value": &caps[1],
        "unit": &caps[2],
    })
}

fn storage_max_detail(caps: &Captures) -> Value {
    json!({ "max": temperature_parts(&caps[1]) })
}

fn storage_between_detail(caps: &Captures) -> Value {
    json!({
        "between": {
            "min": temperature_parts(&caps[1]),
            "max": temperature_parts(&caps[2]),
        }
    })
}

fn temperature_parts(text: &str) -> Value {
    match TEMPERATURE_PARTS.captures(text) {
        Some(caps) => json!({
            "value": &caps["value"],
            "unit": &caps["unit"],
        }),
        None => Value::Null,
    }
}
