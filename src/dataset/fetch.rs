//! Browser loaders for the dataset and morals files
//!
//! Thin async wrappers over `window.fetch`; parsing is delegated to `store.rs`.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::store::{parse_collection, parse_morals, Collection, DatasetError, MoralsTable};
use crate::config::{ExplorerConfig, TaskVariant};

fn describe(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// GET `url` and return the body as text
async fn fetch_text(url: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or_else(|| "no global window".to_string())?;
    let response = JsFuture::from(window.fetch_with_str(url)).await.map_err(describe)?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| "fetch did not resolve to a Response".to_string())?;
    if !response.ok() {
        return Err(format!("HTTP {} {}", response.status(), response.status_text()));
    }
    let body = JsFuture::from(response.text().map_err(describe)?)
        .await
        .map_err(describe)?;
    body.as_string().ok_or_else(|| "response body is not text".to_string())
}

/// Fetch and parse the record set for `variant`. No partial collection on failure.
pub async fn load(config: &ExplorerConfig, variant: TaskVariant) -> Result<Collection, DatasetError> {
    let source = config.source_for(variant);
    let body = fetch_text(source)
        .await
        .map_err(|reason| DatasetError::DataUnavailable {
            source: source.to_string(),
            reason,
        })?;
    parse_collection(variant, source, &body)
}

/// Fetch and parse the morals table. Callers treat failure as an empty table.
pub async fn load_morals(config: &ExplorerConfig) -> Result<MoralsTable, DatasetError> {
    let source = &config.morals_source;
    let body = fetch_text(source)
        .await
        .map_err(|reason| DatasetError::MoralsUnavailable {
            source: source.clone(),
            reason,
        })?;
    parse_morals(source, &body)
}
