use itertools::Itertools;
use solr_client::{escape_query_chars, SortOrder};

use super::filters::FilterSet;
use super::sort::{compile_sort, SortParseError};

/// Default safety filter: keep documents whose backend safety score is
/// at most 0.49.
pub const SAFE_FILTER: &str = "safe:[0 TO 0.49]";

/// Scans the free-text query for embedded operators, turning them into
/// filter clauses and sort directives. Returns the residual literal
/// text with the operator tokens removed.
///
/// A token is an operator iff it starts (case-insensitively) with one
/// of the recognized prefixes; at most one operator kind matches per
/// token. Everything else is preserved verbatim, in order.
pub fn extract_operators(
    q: &str,
    filters: &mut FilterSet,
    sorts: &mut Vec<(String, SortOrder)>,
) -> Result<String, SortParseError> {
    let mut literal_tokens = Vec::new();

    for token in q.split(' ') {
        if let Some(payload) = strip_operator(token, "site:") {
            if let Some(clause) = site_filter(payload) {
                filters.push(clause);
            }
        } else if let Some(payload) = strip_operator(token, "collapse:") {
            filters.push(collapse_filter(payload));
        } else if let Some(payload) = strip_operator(token, "type:") {
            if let Some(clause) = mime_type_filter(payload) {
                filters.push(clause);
            }
        } else if let Some(payload) = strip_operator(token, "safe:") {
            let choice = payload.to_lowercase();
            // An explicit on/off decision replaces whatever safety
            // clause was seeded earlier; anything but "off" re-enables
            // the default range.
            if choice == "off" || choice == "on" {
                filters.evict("safe");
            }
            if choice != "off" {
                filters.push(SAFE_FILTER);
            }
        } else if let Some(payload) = strip_operator(token, "size:") {
            if let Some(clause) = size_filter(&payload.to_lowercase()) {
                filters.push(clause);
            }
        } else if let Some(payload) = strip_operator(token, "fq:") {
            // Underscores stand in for spaces, since the payload is a
            // single whitespace-free token.
            let decoded = payload.replace('_', " ");
            for clause in decoded.split(';') {
                filters.replace(clause);
            }
        } else if let Some(payload) = strip_operator(token, "sort:") {
            sorts.extend(compile_sort(payload)?);
        } else {
            literal_tokens.push(token);
        }
    }

    Ok(literal_tokens.join(" "))
}

/// Prefix match at token start only; `notsite:foo` is literal text.
fn strip_operator<'a>(token: &'a str, prefix: &str) -> Option<&'a str> {
    match token.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => Some(&token[prefix.len()..]),
        _ => None,
    }
}

/// Builds the site filter from a comma-separated domain list. Values
/// are escaped for the query syntax, except that `*` is restored so it
/// still matches any subdomain. Empty values are skipped; an all-empty
/// list yields no clause.
pub fn site_filter(payload: &str) -> Option<String> {
    let escaped = escape_query_chars(payload);
    let clause = escaped
        .split(',')
        .map(|domain| domain.replace("\\*", "*"))
        .filter(|domain| !domain.is_empty())
        .map(|domain| format!("pageHost:{}", domain))
        .join(" OR ");
    (!clause.is_empty()).then_some(clause)
}

/// Builds the mime-type filter. `jpg` and `jpeg` are aliases matching
/// either backend spelling; a comma list becomes an OR of per-value
/// clauses.
pub fn mime_type_filter(payload: &str) -> Option<String> {
    let clause = payload
        .split(',')
        .filter(|value| !value.is_empty())
        .map(|value| {
            if value.eq_ignore_ascii_case("jpeg") || value.eq_ignore_ascii_case("jpg") {
                "imgMimeType:image/jpeg OR imgMimeType:image/jpg".to_string()
            } else {
                format!("imgMimeType: image/{}", value)
            }
        })
        .join(" OR ");
    (!clause.is_empty()).then_some(clause)
}

/// Fixed, non-overlapping area buckets; unknown values add no filter.
pub fn size_filter(bucket: &str) -> Option<&'static str> {
    match bucket {
        // up to 256x256px
        "sm" => Some("{!frange u=65536 }product(imgHeight,imgWidth)"),
        // between 256x256px and 900x900px
        "md" => Some("{!frange l=65537 u=810000 }product(imgHeight,imgWidth)"),
        // bigger than 900x900px
        "lg" => Some("{!frange l=810001}product(imgHeight,imgWidth)"),
        _ => None,
    }
}

/// Group-by-field directive keeping one representative per group.
pub fn collapse_filter(field: &str) -> String {
    format!("{{!collapse field={}}}", escape_query_chars(field))
}
