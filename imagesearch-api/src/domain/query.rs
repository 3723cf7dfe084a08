use std::collections::HashSet;

use itertools::Itertools;
use serde::Deserialize;
use solr_client::{SelectQuery, SortOrder};

use super::dates;
use super::fields::{DEFAULT_FIELDS, FIELD_MAP};
use super::filters::FilterSet;
use super::operators::{
    extract_operators, mime_type_filter, site_filter, size_filter, SAFE_FILTER,
};
use super::sort::SortParseError;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

/// Backend fields the projector always needs to compute the archive
/// links, whether or not the caller asked for them.
const FORCED_FIELDS: [&str; 4] = [
    "imgUrl",
    "imgCrawlTimestamp",
    "pageUrl",
    "pageCrawlTimestamp",
];

/// Per-term relevance weights fed to the backend's extended relevance
/// mode, plus three phrase-proximity tables at x1000/x100/x10.
const QUERY_FIELD_BOOSTS: [(&str, u32); 6] = [
    ("imgTitle", 4),
    ("imgAlt", 3),
    ("imgCaption", 3),
    ("imgUrlTokens", 2),
    ("pageTitle", 1),
    ("pageUrlTokens", 1),
];

/// The public request parameters, as extracted from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub q: Option<String>,
    pub offset: Option<String>,
    pub max_items: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub safe_search: Option<String>,
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
    pub size: Option<String>,
    pub more: Option<String>,
    pub fields: Option<String>,
    pub site_search: Option<String>,
    pub collection: Option<String>,
    pub pretty_print: Option<String>,
    pub debug: Option<String>,
    pub callback: Option<String>,
}

impl SearchRequest {
    pub fn pretty_print(&self) -> bool {
        self.pretty_print.as_deref() == Some("true")
    }

    pub fn debug(&self) -> bool {
        self.debug.as_deref() == Some("on")
    }
}

/// A fully compiled backend query plus what the projector needs to
/// reshape the documents coming back.
pub struct CompiledQuery {
    pub select: SelectQuery,
    /// Public field names the caller asked for; `None` when the caller
    /// did not restrict the field list explicitly.
    pub allowlist: Option<HashSet<String>>,
    pub start: usize,
    pub limit: usize,
}

/// Combines the structured parameters and the free-text query (with its
/// embedded operators) into one backend query descriptor.
pub fn compile(request: &SearchRequest) -> Result<CompiledQuery, SortParseError> {
    let start = parse_or(request.offset.as_deref(), 0).max(0) as usize;
    let limit = parse_or(request.max_items.as_deref(), DEFAULT_LIMIT).clamp(0, MAX_LIMIT) as usize;

    let mut filters = FilterSet::new();

    let date_from = dates::resolve_from(request.from.as_deref());
    let date_to = dates::resolve_to(request.to.as_deref());
    filters.push(format!("imgCrawlTimestamp:[{} TO {}]", date_from, date_to));

    if request.safe_search.as_deref() != Some("off") {
        filters.push(SAFE_FILTER);
    }
    filters.push("blocked:0");

    if let Some(clause) = request.mime_type.as_deref().and_then(mime_type_filter) {
        filters.push(clause);
    }
    if let Some(clause) = request.size.as_deref().and_then(size_filter) {
        filters.push(clause);
    }
    if let Some(clause) = request.site_search.as_deref().and_then(site_filter) {
        filters.push(clause);
    }
    if let Some(collections) = request.collection.as_deref().filter(|c| !c.is_empty()) {
        let clause = collections
            .split(',')
            .map(|c| format!("collection:{}", c))
            .join(" OR ");
        filters.push(clause);
    }

    // Embedded operators run last so they can override any clause above.
    let mut sorts: Vec<(String, SortOrder)> = Vec::new();
    let literal = extract_operators(
        request.q.as_deref().unwrap_or(""),
        &mut filters,
        &mut sorts,
    )?;
    let q = if literal.trim().is_empty() {
        "*:*".to_string()
    } else {
        literal
    };

    let (field_list, allowlist) = build_field_list(request);

    let mut select = SelectQuery::new(q);
    select
        .set_start(start)
        .set_rows(limit)
        .set_fields(field_list);
    for fq in filters.into_queries() {
        select.add_filter_query(fq);
    }
    apply_boosts(&mut select);

    if sorts.is_empty() {
        select
            .add_sort("score", SortOrder::Desc)
            .add_sort("imgCrawlTimestamp", SortOrder::Asc)
            .add_sort("imgUrl", SortOrder::Asc);
    } else {
        for (expression, order) in sorts {
            select.add_sort(expression, order);
        }
    }

    Ok(CompiledQuery {
        select,
        allowlist,
        start,
        limit,
    })
}

/// Translates the requested public field names to backend names and
/// force-includes the fields the projector depends on. The allowlist is
/// only active when the caller restricted the list with `fields`.
fn build_field_list(request: &SearchRequest) -> (String, Option<HashSet<String>>) {
    let mut requested: Vec<&str> = Vec::new();
    if let Some(more) = request.more.as_deref() {
        requested.extend(more.split(',').filter(|f| !f.is_empty()));
    }
    match request.fields.as_deref() {
        Some(fields) => requested.extend(fields.split(',').filter(|f| !f.is_empty())),
        None => requested.extend(DEFAULT_FIELDS.split(',')),
    }

    let mut backend_fields: Vec<String> = requested
        .iter()
        .map(|name| FIELD_MAP.to_backend(name).to_string())
        .collect();
    for forced in FORCED_FIELDS {
        if !backend_fields.iter().any(|f| f == forced) {
            backend_fields.push(forced.to_string());
        }
    }

    let allowlist = request
        .fields
        .is_some()
        .then(|| requested.iter().map(|f| f.to_string()).collect());

    (backend_fields.join(","), allowlist)
}

fn apply_boosts(select: &mut SelectQuery) {
    select.set("defType", "edismax");
    select.set("qf", weighted_fields(1));
    select.set("pf", weighted_fields(1000));
    select.set("ps", "1");
    select.set("pf2", weighted_fields(100));
    select.set("ps2", "2");
    select.set("pf3", weighted_fields(10));
    select.set("ps3", "3");
}

fn weighted_fields(multiplier: u32) -> String {
    QUERY_FIELD_BOOSTS
        .iter()
        .map(|(field, weight)| format!("{}^{}", field, weight * multiplier))
        .join(" ")
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.parse::<i64>().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_becomes_match_all() {
        let compiled = compile(&SearchRequest::default()).unwrap();
        assert_eq!(compiled.select.query(), "*:*");
    }

    #[test]
    fn query_reduced_to_operators_becomes_match_all() {
        let request = SearchRequest {
            q: Some("site:example.pt".to_string()),
            ..Default::default()
        };
        let compiled = compile(&request).unwrap();
        assert_eq!(compiled.select.query(), "*:*");
        assert!(compiled
            .select
            .filter_queries()
            .contains(&"pageHost:example.pt".to_string()));
    }

    #[test]
    fn pagination_defaults_and_clamps() {
        let compiled = compile(&SearchRequest::default()).unwrap();
        assert_eq!(compiled.start, 0);
        assert_eq!(compiled.limit, 50);

        let request = SearchRequest {
            offset: Some("100".to_string()),
            max_items: Some("500".to_string()),
            ..Default::default()
        };
        let compiled = compile(&request).unwrap();
        assert_eq!(compiled.start, 100);
        assert_eq!(compiled.limit, 200);

        let request = SearchRequest {
            max_items: Some("-5".to_string()),
            ..Default::default()
        };
        assert_eq!(compile(&request).unwrap().limit, 0);

        let request = SearchRequest {
            max_items: Some("many".to_string()),
            ..Default::default()
        };
        assert_eq!(compile(&request).unwrap().limit, 50);
    }

    #[test]
    fn seeds_date_safety_and_block_filters_in_order() {
        let compiled = compile(&SearchRequest::default()).unwrap();
        let fqs = compiled.select.filter_queries();
        assert!(fqs[0].starts_with("imgCrawlTimestamp:[1996-01-01T00:00:00Z TO "));
        assert_eq!(fqs[1], SAFE_FILTER);
        assert_eq!(fqs[2], "blocked:0");
    }

    #[test]
    fn safe_search_off_skips_the_safety_filter() {
        let request = SearchRequest {
            safe_search: Some("off".to_string()),
            ..Default::default()
        };
        let compiled = compile(&request).unwrap();
        assert!(!compiled
            .select
            .filter_queries()
            .contains(&SAFE_FILTER.to_string()));
    }

    #[test]
    fn collection_list_is_or_joined() {
        let request = SearchRequest {
            collection: Some("AWP1,AWP2".to_string()),
            ..Default::default()
        };
        let compiled = compile(&request).unwrap();
        assert!(compiled
            .select
            .filter_queries()
            .contains(&"collection:AWP1 OR collection:AWP2".to_string()));
    }

    #[test]
    fn embedded_fq_overrides_the_seeded_date_filter() {
        let request = SearchRequest {
            q: Some("fq:imgCrawlTimestamp:[2000_TO_2010]".to_string()),
            ..Default::default()
        };
        let compiled = compile(&request).unwrap();
        let date_clauses: Vec<_> = compiled
            .select
            .filter_queries()
            .iter()
            .filter(|fq| fq.starts_with("imgCrawlTimestamp"))
            .collect();
        assert_eq!(date_clauses, vec!["imgCrawlTimestamp:[2000 TO 2010]"]);
    }

    #[test]
    fn default_fields_have_no_allowlist_and_include_forced() {
        let compiled = compile(&SearchRequest::default()).unwrap();
        assert!(compiled.allowlist.is_none());

        let params = compiled.select.to_params();
        let fl = &params.iter().find(|(k, _)| k == "fl").unwrap().1;
        for forced in FORCED_FIELDS {
            assert!(fl.split(',').any(|f| f == forced), "missing {}", forced);
        }
    }

    #[test]
    fn explicit_fields_translate_and_force_include() {
        let request = SearchRequest {
            fields: Some("imgSrc,imgTstamp".to_string()),
            more: Some("safe".to_string()),
            ..Default::default()
        };
        let compiled = compile(&request).unwrap();

        let params = compiled.select.to_params();
        let fl = &params.iter().find(|(k, _)| k == "fl").unwrap().1;
        let fl_fields: Vec<&str> = fl.split(',').collect();
        assert!(fl_fields.contains(&"imgUrl"));
        assert!(fl_fields.contains(&"imgCrawlTimestamp"));
        assert!(fl_fields.contains(&"safe"));
        assert!(fl_fields.contains(&"pageUrl"));

        let allowlist = compiled.allowlist.unwrap();
        assert!(allowlist.contains("imgSrc"));
        assert!(allowlist.contains("imgTstamp"));
        assert!(allowlist.contains("safe"));
        assert!(!allowlist.contains("imgUrl"));
    }

    #[test]
    fn default_sort_sequence_applies_without_sort_operator() {
        let compiled = compile(&SearchRequest::default()).unwrap();
        let sorts: Vec<_> = compiled
            .select
            .sorts()
            .iter()
            .map(|(f, o)| (f.as_str(), *o))
            .collect();
        assert_eq!(
            sorts,
            vec![
                ("score", SortOrder::Desc),
                ("imgCrawlTimestamp", SortOrder::Asc),
                ("imgUrl", SortOrder::Asc),
            ]
        );
    }

    #[test]
    fn sort_operator_replaces_the_default_sequence() {
        let request = SearchRequest {
            q: Some("cats sort:imgTstamp,desc".to_string()),
            ..Default::default()
        };
        let compiled = compile(&request).unwrap();
        assert_eq!(compiled.select.query(), "cats");
        assert_eq!(
            compiled.select.sorts(),
            &[("imgTstamp".to_string(), SortOrder::Desc)]
        );
    }

    #[test]
    fn sets_extended_relevance_weights() {
        let compiled = compile(&SearchRequest::default()).unwrap();
        let params = compiled.select.to_params();
        let get = |name: &str| &params.iter().find(|(k, _)| k == name).unwrap().1;

        assert_eq!(get("defType"), "edismax");
        assert_eq!(
            get("qf"),
            "imgTitle^4 imgAlt^3 imgCaption^3 imgUrlTokens^2 pageTitle^1 pageUrlTokens^1"
        );
        assert_eq!(
            get("pf"),
            "imgTitle^4000 imgAlt^3000 imgCaption^3000 imgUrlTokens^2000 pageTitle^1000 pageUrlTokens^1000"
        );
        assert_eq!(get("ps"), "1");
        assert_eq!(get("ps2"), "2");
        assert_eq!(get("ps3"), "3");
        assert!(get("pf2").contains("imgTitle^400"));
        assert!(get("pf3").contains("imgTitle^40"));
    }
}
