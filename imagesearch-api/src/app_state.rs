use std::sync::Arc;

use solr_client::SolrClient;

use crate::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub solr: Arc<SolrClient>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(solr: SolrClient, settings: Settings) -> Self {
        Self {
            solr: Arc::new(solr),
            settings: Arc::new(settings),
        }
    }
}
