use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::SelectQuery;

/// Client for a single Solr collection. The inner `reqwest::Client` is
/// shared and safe to reuse across concurrent requests.
pub struct SolrClient {
    http: reqwest::Client,
    select_url: String,
}

impl SolrClient {
    pub fn new(host: &str, collection: &str) -> Self {
        let select_url = format!(
            "{}/{}/select",
            host.trim_end_matches('/'),
            collection.trim_matches('/')
        );
        Self {
            http: reqwest::Client::new(),
            select_url,
        }
    }

    #[tracing::instrument(skip(self, query), fields(q = query.query()))]
    pub async fn select(&self, query: &SelectQuery) -> Result<SelectResponse, SolrFetchError> {
        let resp = self
            .http
            .get(&self.select_url)
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| SolrFetchError::ResponseError(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SolrFetchError::ErrorStatus(status.as_u16(), body));
        }

        let resp_data = resp.json::<SelectResponse>().await.map_err(|e| {
            SolrFetchError::ParsingError(format!("Failed to parse response as JSON: {}", e))
        })?;

        Ok(resp_data)
    }
}

#[derive(Error, Debug)]
pub enum SolrFetchError {
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ErrorStatus: {0}: {1}")]
    ErrorStatus(u16, String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
}

/// A document as Solr returns it: backend field names mapped to JSON
/// values, with presence decided per document.
pub type SolrDocument = Map<String, Value>;

#[derive(Debug, Clone, Deserialize)]
pub struct SelectResponse {
    #[serde(rename = "responseHeader", default)]
    pub response_header: Value,
    pub response: DocumentList,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList {
    #[serde(rename = "numFound")]
    pub num_found: u64,
    pub start: u64,
    pub docs: Vec<SolrDocument>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_select_response() {
        let raw = serde_json::json!({
            "responseHeader": {"status": 0, "QTime": 4},
            "response": {
                "numFound": 2,
                "start": 0,
                "docs": [
                    {"imgUrl": "http://x/a.jpg", "safe": 0.1},
                    {"imgUrl": "http://x/b.png"}
                ]
            }
        });

        let parsed: SelectResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.response.num_found, 2);
        assert_eq!(parsed.response.start, 0);
        assert_eq!(parsed.response.docs.len(), 2);
        assert_eq!(parsed.response.docs[0]["imgUrl"], "http://x/a.jpg");
    }

    #[test]
    fn builds_select_url() {
        let client = SolrClient::new("http://localhost:8983/solr/", "images");
        assert_eq!(client.select_url, "http://localhost:8983/solr/images/select");
    }
}
