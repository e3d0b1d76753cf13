//! Barcode helpers shared by the client and the batch tooling.

use std::path::Path;

use crate::error::BarcodeError;

/// Whether the text looks like an EAN-13 barcode.
pub fn is_barcode(text: &str) -> bool {
    text.len() == 13 && text.chars().all(|c| c.is_ascii_digit())
}

/// Split a barcode into the path segments used by the image file host.
///
/// EAN-13 barcodes split into four segments (3/3/3/4 digits), EAN-8 barcodes
/// are kept whole.
pub fn split_barcode(barcode: &str) -> std::result::Result<Vec<&str>, BarcodeError> {
    if !barcode.chars().all(|c| c.is_ascii_digit()) {
        return Err(BarcodeError::UnknownFormat(barcode.to_string()));
    }

    match barcode.len() {
        13 => Ok(vec![
            &barcode[0..3],
            &barcode[3..6],
            &barcode[6..9],
            &barcode[9..13],
        ]),
        8 => Ok(vec![barcode]),
        _ => Err(BarcodeError::UnknownFormat(barcode.to_string())),
    }
}

/// Recover a barcode from a document path.
///
/// Image archives store documents under nested digit-named directories
/// (`.../301/453/200/3101/1.json`); walking parents outwards and prepending
/// each digit-only segment reconstructs the barcode.
pub fn barcode_from_path(path: &Path) -> Option<String> {
    let mut barcode = String::new();

    for parent in path.ancestors().skip(1) {
        match parent.file_name().and_then(|name| name.to_str()) {
            Some(name) if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) => {
                barcode.insert_str(0, name);
            }
            _ => break,
        }
    }

    if barcode.is_empty() { None } else { Some(barcode) }
}

/// Canonical source path of the image a document was OCRed from.
pub fn source_image_path(
    barcode: &str,
    image_name: &str,
) -> std::result::Result<String, BarcodeError> {
    let segments = split_barcode(barcode)?;
    Ok(format!("/{}/{}.jpg", segments.join("/"), image_name))
}
