//! Product API client.
//!
//! One long-lived HTTP client, constructed once at startup and passed into
//! every component that talks to the product database or the static OCR file
//! host.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::barcode::split_barcode;
use crate::config::ApiConfig;
use crate::error::ClientError;

/// The only update acknowledgement that counts as success; anything else is
/// reported as a warning by callers, not an error.
pub const UPDATE_SUCCESS_STATUS: &str = "fields saved";

/// Shared client for the product database and the OCR file host.
#[derive(Debug)]
pub struct ProductClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ProductClient {
    /// Build the client from configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// Push one field update for a product, returning the verbose status
    /// string from the acknowledgement body.
    pub async fn update_product_field(
        &self,
        barcode: &str,
        field: &str,
        value: &str,
    ) -> Result<String, ClientError> {
        let url = format!("{}/cgi/product_jqm2.pl", self.config.product_base_url);
        let query = [
            ("code", barcode),
            (field, value),
            ("user_id", self.config.user_id.as_str()),
            ("password", self.config.password.as_str()),
        ];

        let response = self.get_with_retry(&url, &query).await?;
        let body: Value = response.error_for_status()?.json().await?;

        Ok(body
            .get("status_verbose")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    /// Digit-named image identifiers known for a product, in ascending order.
    pub async fn fetch_product_images(&self, barcode: &str) -> Result<Vec<String>, ClientError> {
        let url = format!(
            "{}/api/v0/product/{}.json?fields=images",
            self.config.product_base_url, barcode
        );

        let response = self.get_with_retry(&url, &[]).await?;
        let body: Value = response.error_for_status()?.json().await?;

        let mut names: Vec<String> = body
            .pointer("/product/images")
            .and_then(Value::as_object)
            .map(|images| {
                images
                    .keys()
                    .filter(|name| name.chars().all(|c| c.is_ascii_digit()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        names.sort_by_key(|name| name.parse::<u64>().unwrap_or(u64::MAX));
        Ok(names)
    }

    /// Fetch the OCR JSON attached to one product image. `None` when the
    /// file host has no OCR for that image.
    pub async fn fetch_ocr(
        &self,
        barcode: &str,
        image_name: &str,
    ) -> Result<Option<Value>, ClientError> {
        let url = self.ocr_url(barcode, image_name)?;
        let response = self.get_with_retry(&url, &[]).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("no OCR file for {barcode}/{image_name}");
            return Ok(None);
        }

        let body: Value = response.error_for_status()?.json().await?;
        Ok(Some(body))
    }

    /// URL of the OCR JSON for one product image on the static file host.
    pub fn ocr_url(&self, barcode: &str, image_name: &str) -> Result<String, ClientError> {
        let segments = split_barcode(barcode)?;
        Ok(format!(
            "{}/images/products/{}/{}.json",
            self.config.static_base_url,
            segments.join("/"),
            image_name
        ))
    }

    async fn get_with_retry(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, ClientError> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.http.get(url).query(query).send().await {
                Ok(response) => return Ok(response),
                Err(err)
                    if attempt <= self.config.max_retries
                        && (err.is_timeout() || err.is_connect()) =>
                {
                    warn!("request to {url} failed (attempt {attempt}): {err}");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ocr_url() {
        let client = ProductClient::new(ApiConfig::default()).unwrap();
        assert_eq!(
            client.ocr_url("3014532003101", "4").unwrap(),
            "https://static.openfoodfacts.org/images/products/301/453/200/3101/4.json"
        );
    }

    #[test]
    fn test_ocr_url_rejects_bad_barcode() {
        let client = ProductClient::new(ApiConfig::default()).unwrap();
        assert!(client.ocr_url("123", "1").is_err());
    }
}
