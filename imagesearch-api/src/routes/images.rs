use axum::{
    extract::{OriginalUri, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::Value;
use tracing::instrument;

use crate::{
    domain::{
        self, projector, ImageSearchErrorResponse, ImageSearchResponseDebug, ImageSearchResults,
        SearchRequest,
    },
    routes::SearchError,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(image_search))
}

#[instrument(name = "GET /imagesearch", skip(app_state, request), fields(q = request.q.as_deref().unwrap_or("")))]
async fn image_search(
    State(app_state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(request): Query<SearchRequest>,
) -> Response {
    let settings = app_state.settings.clone();
    let request_url = format!(
        "{}{}",
        settings.application.public_url.trim_end_matches('/'),
        uri
    );
    tracing::info!("request\t{}", request_url);

    let (status, payload) = match run_search(&app_state, &request, &request_url).await {
        Ok(payload) => (StatusCode::OK, payload),
        Err(err) => {
            tracing::error!("imagesearch request failed: {}", err);
            let envelope =
                ImageSearchErrorResponse::new(&settings.links, err.kind(), err.to_string());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::to_value(envelope).unwrap_or(Value::Null),
            )
        }
    };

    let mut body = if request.pretty_print() {
        serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
    } else {
        payload.to_string()
    };

    // A non-empty callback switches the response to JSONP.
    let content_type = match request.callback.as_deref().filter(|cb| !cb.is_empty()) {
        Some(callback) => {
            body = format!("{}({});", callback, body);
            "text/javascript"
        }
        None => "application/json",
    };

    (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

async fn run_search(
    app_state: &AppState,
    request: &SearchRequest,
    request_url: &str,
) -> Result<Value, SearchError> {
    let compiled = domain::query::compile(request)?;
    let solr_response = app_state.solr.select(&compiled.select).await?;

    let documents = projector::project_documents(
        &solr_response.response.docs,
        compiled.allowlist.as_ref(),
        &app_state.settings.links.wayback,
    )?;
    tracing::debug!(
        total = solr_response.response.num_found,
        returned = documents.len(),
        "projected result page"
    );

    let results = ImageSearchResults::new(
        &app_state.settings.links,
        request_url,
        solr_response.response.num_found,
        solr_response.response.start,
        compiled.start,
        compiled.limit,
        documents,
        request.pretty_print(),
    );

    let payload = if request.debug() {
        serde_json::to_value(ImageSearchResponseDebug {
            response_header: solr_response.response_header,
            response: results,
        })
    } else {
        serde_json::to_value(results)
    };

    Ok(payload.unwrap_or(Value::Null))
}
