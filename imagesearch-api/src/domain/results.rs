use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::config::LinkSettings;

use super::fields::MORE_FIELDS;

/// The public page envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSearchResults {
    pub service_name: String,
    pub link_to_service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_to_documentation: Option<String>,
    pub link_to_more_fields: String,
    pub next_page: String,
    pub previous_page: String,
    pub total_items: u64,
    pub number_of_response_items: u64,
    pub offset: u64,
    pub response_items: Vec<Map<String, Value>>,
}

impl ImageSearchResults {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        links: &LinkSettings,
        request_url: &str,
        total_items: u64,
        offset: u64,
        start: usize,
        limit: usize,
        response_items: Vec<Map<String, Value>>,
        documentation: bool,
    ) -> Self {
        let number_of_response_items = (response_items.len() as u64).min(total_items);
        Self {
            service_name: links.service_name.clone(),
            link_to_service: links.service.clone(),
            link_to_documentation: documentation.then(|| links.documentation.clone()),
            link_to_more_fields: with_query_param(request_url, "more", MORE_FIELDS),
            next_page: with_query_param(
                request_url,
                "offset",
                &next_offset(start, limit, total_items).to_string(),
            ),
            previous_page: with_query_param(
                request_url,
                "offset",
                &previous_offset(start, limit).to_string(),
            ),
            total_items,
            number_of_response_items,
            offset,
            response_items,
        }
    }
}

/// Envelope wrapped with the backend's own response header metadata,
/// returned when `debug=on`.
#[derive(Debug, Serialize)]
pub struct ImageSearchResponseDebug {
    #[serde(rename = "responseHeader")]
    pub response_header: Value,
    pub response: ImageSearchResults,
}

/// Replaces the normal envelope on failure: one {failure-kind: message}
/// entry plus the usual service metadata and zero items.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSearchErrorResponse {
    pub error: HashMap<String, String>,
    pub service_name: String,
    pub link_to_service: String,
    pub link_to_documentation: String,
    pub total_items: u64,
    pub number_of_response_items: u64,
    pub offset: u64,
    pub response_items: Vec<Map<String, Value>>,
}

impl ImageSearchErrorResponse {
    pub fn new(links: &LinkSettings, kind: &str, message: String) -> Self {
        let mut error = HashMap::new();
        error.insert(kind.to_string(), message);
        Self {
            error,
            service_name: links.service_name.clone(),
            link_to_service: links.service.clone(),
            link_to_documentation: links.documentation.clone(),
            total_items: 0,
            number_of_response_items: 0,
            offset: 0,
            response_items: Vec::new(),
        }
    }
}

pub fn next_offset(start: usize, limit: usize, total: u64) -> u64 {
    ((start + limit) as u64).min(total)
}

pub fn previous_offset(start: usize, limit: usize) -> usize {
    if start == 0 {
        0
    } else {
        start.saturating_sub(limit)
    }
}

/// Rebuilds `url` with the given query parameter replaced (or added).
fn with_query_param(url: &str, name: &str, value: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    let surviving: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| key != name)
        .map(|(key, val)| (key.into_owned(), val.into_owned()))
        .collect();
    {
        let mut pairs = parsed.query_pairs_mut();
        pairs.clear();
        for (key, val) in &surviving {
            pairs.append_pair(key, val);
        }
        pairs.append_pair(name, value);
    }
    parsed.to_string()
}
