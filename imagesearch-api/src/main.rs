use imagesearch_api::{config::read_config, domain::fields, router, AppState};
use solr_client::SolrClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Validates the field dictionary before any request can hit it.
    fields::init();

    let settings = read_config()?;
    let solr = SolrClient::new(&settings.solr.host, &settings.solr.collection);

    let address = format!(
        "{}:{}",
        settings.application.host, settings.application.port
    );
    let app = router::create(AppState::new(solr, settings));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("listening on {}", address);
    axum::serve(listener, app).await?;

    Ok(())
}
