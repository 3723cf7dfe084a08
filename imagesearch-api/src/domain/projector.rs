use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};
use solr_client::SolrDocument;
use thiserror::Error;

use super::dates;
use super::fields::FIELD_MAP;

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("invalid backend timestamp in {field}: {value}")]
    InvalidTimestamp { field: &'static str, value: String },
    #[error("backend safety score is not a number: {0}")]
    InvalidSafetyScore(Value),
}

const SAFE: &str = "safe";
const IMAGE_TSTAMP: &str = "imgCrawlTimestamp";
const PAGE_TSTAMP: &str = "pageCrawlTimestamp";
const IMAGE_LINK_TO_ARCHIVE: &str = "imgLinkToArchive";
const PAGE_LINK_TO_ARCHIVE: &str = "pageLinkToArchive";
/// Marker segment that makes the archive replay serve the raw image.
const IMAGE_MARKER: &str = "im_/";

/// Reshapes backend documents into the public representation: renames
/// fields to the public vocabulary, transforms values (safety score
/// inversion, compact timestamps, thumbnail alias), synthesizes the
/// archive links and applies the requested-field allowlist.
///
/// Allowlist membership is memoized per backend field name across the
/// whole page. Derived links are computed from the pre-filter values
/// and then subjected to the same allowlist test.
pub fn project_documents(
    docs: &[SolrDocument],
    allowlist: Option<&HashSet<String>>,
    wayback: &str,
) -> Result<Vec<Map<String, Value>>, ProjectError> {
    let mut memo: HashMap<String, bool> = HashMap::new();
    let mut projected = Vec::with_capacity(docs.len());

    for doc in docs {
        let mut translated: Vec<(&String, &str, Value)> = Vec::with_capacity(doc.len());
        for (key, value) in doc {
            let public_name = FIELD_MAP.to_public(key);
            let value = transform_value(key, value)?;
            translated.push((key, public_name, value));
        }

        let derived = derive_archive_links(&translated, wayback);

        let mut output = Map::new();
        for (backend_name, public_name, value) in translated {
            let allowed = match allowlist {
                None => true,
                Some(requested) => *memo
                    .entry(backend_name.clone())
                    .or_insert_with(|| requested.contains(public_name)),
            };
            if allowed {
                output.insert(public_name.to_string(), value);
            }
        }
        for (name, value) in derived {
            if allowlist.map_or(true, |requested| requested.contains(name)) {
                output.insert(name.to_string(), Value::String(value));
            }
        }

        projected.push(output);
    }

    Ok(projected)
}

fn transform_value(backend_name: &str, value: &Value) -> Result<Value, ProjectError> {
    match backend_name {
        SAFE => {
            let score = value
                .as_f64()
                .ok_or_else(|| ProjectError::InvalidSafetyScore(value.clone()))?;
            let inverted = serde_json::Number::from_f64(1.0 - score)
                .ok_or_else(|| ProjectError::InvalidSafetyScore(value.clone()))?;
            Ok(Value::Number(inverted))
        }
        IMAGE_TSTAMP => Ok(Value::String(compact_timestamp(IMAGE_TSTAMP, value)?)),
        PAGE_TSTAMP => Ok(Value::String(compact_timestamp(PAGE_TSTAMP, value)?)),
        _ => Ok(value.clone()),
    }
}

fn compact_timestamp(field: &'static str, value: &Value) -> Result<String, ProjectError> {
    let raw = value.as_str().unwrap_or_default();
    dates::parse_backend(raw)
        .map(dates::format_compact)
        .map_err(|_| ProjectError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

/// Synthesizes the archive links when both the URL and the (already
/// compacted) timestamp of the item or its container are present.
fn derive_archive_links(
    translated: &[(&String, &str, Value)],
    wayback: &str,
) -> Vec<(&'static str, String)> {
    let get = |public_name: &str| {
        translated
            .iter()
            .find(|(_, name, _)| *name == public_name)
            .and_then(|(_, _, value)| value.as_str())
    };

    let mut links = Vec::new();
    if let (Some(url), Some(tstamp)) = (get("imgSrc"), get("imgTstamp")) {
        links.push((
            IMAGE_LINK_TO_ARCHIVE,
            format!("{}{}{}{}", wayback, tstamp, IMAGE_MARKER, url),
        ));
    }
    if let (Some(url), Some(tstamp)) = (get("pageURL"), get("pageTstamp")) {
        links.push((PAGE_LINK_TO_ARCHIVE, format!("{}{}/{}", wayback, tstamp, url)));
    }
    links
}
