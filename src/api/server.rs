use log::info;
use std::sync::Arc;
use std::time::Duration;
use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    routing::get,
    Router,
};
use prometheus_client::registry::Registry;
use tower::{BoxError, ServiceBuilder};

use crate::config::config::Config;
use crate::api::action::healthz::healthz;
use crate::api::action::metrics::metrics;

pub(crate) type SharedRegistry = Arc<Registry>;

pub(crate) fn router(configuration: &Config, registry: SharedRegistry) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(&configuration.metrics_path, get(metrics))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|error: BoxError| async move {
                    if error.is::<tower::timeout::error::Elapsed>() {
                        Ok(StatusCode::REQUEST_TIMEOUT)
                    } else {
                        Err((
                            StatusCode::INTERNAL_SERVER_ERROR,
                            format!("Unhandled internal error: {}", error),
                        ))
                    }
                }))
                .timeout(Duration::from_secs(configuration.scrape_timeout))
                .into_inner(),
        )
        .with_state(registry)
}

pub(crate) async fn start(registry: SharedRegistry, configuration: Config) -> std::io::Result<()> {
    let address = listen_address(&configuration.listen_address);
    info!("Starting server on {}{}", address, configuration.metrics_path);

    let app = router(&configuration, registry);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    axum::serve(listener, app).await
}

// ":8080" binds every interface.
fn listen_address(address: &str) -> String {
    if address.starts_with(':') {
        format!("0.0.0.0{}", address)
    } else {
        address.to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum_test::TestServer;
    use crate::fixtures::sinfo::{cluster_fetcher, CannedFetcher};
    use crate::metrics::collector::build_registry;

    pub(crate) fn new_test_app() -> Router {
        new_test_app_with(Config::default(), cluster_fetcher())
    }

    pub(crate) fn new_test_app_with(configuration: Config, fetcher: CannedFetcher) -> Router {
        let registry = build_registry(&configuration, Arc::new(fetcher));

        router(&configuration, Arc::new(registry))
    }

    #[test]
    fn test_listen_address() {
        assert_eq!(listen_address(":8080"), "0.0.0.0:8080");
        assert_eq!(listen_address("127.0.0.1:9341"), "127.0.0.1:9341");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let server = TestServer::new(new_test_app()).unwrap();

        let response = server.get("/deployments").await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_custom_metrics_path() {
        let mut configuration = Config::default();
        configuration.metrics_path = "/slurm/metrics".to_string();
        let server = TestServer::new(new_test_app_with(configuration, cluster_fetcher())).unwrap();

        let response = server.get("/slurm/metrics").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains("slurm_gpus_total"));

        let response = server.get("/metrics").await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }
}
