use solr_client::SolrFetchError;
use thiserror::Error;

use crate::domain::{projector::ProjectError, sort::SortParseError};

/// Everything that can fail between receiving the parameters and
/// producing the envelope. Converted into the JSON error envelope at
/// the handler boundary, never propagated further.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Sort(#[from] SortParseError),
    #[error(transparent)]
    Solr(#[from] SolrFetchError),
    #[error(transparent)]
    Project(#[from] ProjectError),
}

impl SearchError {
    /// Failure-kind key used in the error envelope's map.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::Sort(_) => "SortParseError",
            SearchError::Solr(_) => "SolrFetchError",
            SearchError::Project(_) => "ProjectionError",
        }
    }
}
