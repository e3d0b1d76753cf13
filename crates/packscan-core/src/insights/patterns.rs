//! Common regex patterns for packaging insight extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Temperature mention, e.g. `+4 °C`. Reused inside the storage patterns.
const TEMPERATURE: &str = r"[+-]?\s*\d+\s*°?C";

lazy_static! {
    // Packager codes
    pub static ref FR_EMB: Regex = Regex::new(
        r"(EMB) ?(\d ?\d ?\d ?\d ?\d)([a-zA-Z]{1,2})?"
    ).unwrap();

    pub static ref EU_FR_PACKAGING: Regex = Regex::new(
        r"(FR) (\d{1,3})[\-\s.](\d{1,3})[\-\s.](\d{1,3}) (CE|EC)"
    ).unwrap();

    // Label claims
    pub static ref ORGANIC_INGREDIENTS: Regex = Regex::new(
        r"ingr[ée]dients?\sbiologiques?"
    ).unwrap();

    pub static ref ORGANIC_INGREDIENTS_SHORT: Regex = Regex::new(
        r"ingr[ée]dients?\sbio[\s.,)]"
    ).unwrap();

    pub static ref ORGANIC_EU_NON_EU: Regex = Regex::new(
        r"agriculture ue/non ue biologique"
    ).unwrap();

    pub static ref ORGANIC_AGRICULTURE: Regex = Regex::new(
        r"agriculture bio(?:logique)?[\s.,)]"
    ).unwrap();

    pub static ref ORGANIC_PRODUCTION: Regex = Regex::new(
        r"production bio(?:logique)?[\s.,)]"
    ).unwrap();

    pub static ref EU_BIO_CODE: Regex = Regex::new(
        r"([A-Z]{2})[\-\s.](BIO|ÖKO)[\-\s.](\d{2,3})"
    ).unwrap();

    pub static ref CERTIFIED_AB: Regex = Regex::new(
        r"certifi[ée] ab[\s.,)]"
    ).unwrap();

    // Nutri-Score mention
    pub static ref NUTRISCORE: Regex = Regex::new(
        r"(?i)nutri[-\s]?score"
    ).unwrap();

    // Recycling instructions
    pub static ref RECYCLE: Regex = Regex::new(
        r"(?i)recycle"
    ).unwrap();

    pub static ref THROW_AWAY: Regex = Regex::new(
        r"(?i)(?:throw away)|(?:jeter)"
    ).unwrap();

    // Weights
    pub static ref WEIGHT_VALUE: Regex = Regex::new(
        r"([0-9]+[,.]?[0-9]*)\s*(fl oz|dl|cl|mg|mL|lbs|oz|g|kg|L)\b"
    ).unwrap();

    pub static ref WEIGHT_MENTION: Regex = Regex::new(
        r"(?i)poids net:|poids net égoutté:|net weight:|peso neto:|peso liquido:|netto gewicht:"
    ).unwrap();

    // Best-before dates
    pub static ref BEST_BEFORE_EN: Regex = Regex::new(
        r"(?i)\d\d\s(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)(?:\s\d{4})?"
    ).unwrap();

    pub static ref BEST_BEFORE_FR: Regex = Regex::new(
        r"(?i)\d\d\s(?:Jan|Fev|Mar|Avr|Mai|Juin|Juil|Aou|Sep|Oct|Nov|Dec)(?:\s\d{4})?"
    ).unwrap();

    pub static ref BEST_BEFORE_DIGITS: Regex = Regex::new(
        r"\d{2}[./]\d{2}[./](?:\d{2}){1,2}"
    ).unwrap();

    // Storage instructions
    pub static ref STORAGE_MAX: Regex = Regex::new(
        &format!(r"(?i)[aà] conserver [àa] ({TEMPERATURE}) maximum")
    ).unwrap();

    pub static ref STORAGE_BETWEEN: Regex = Regex::new(
        &format!(r"(?i)[aà] conserver entre ({TEMPERATURE}) et ({TEMPERATURE})")
    ).unwrap();

    pub static ref TEMPERATURE_PARTS: Regex = Regex::new(
        r"(?i)(?P<value>[+-]?\s*\d+)\s*°?(?P<unit>C)"
    ).unwrap();
}
