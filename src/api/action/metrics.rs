use axum::extract::State;
use axum::response::{IntoResponse, Response};
use http::{header, StatusCode};
use prometheus_client::encoding::text::encode;
use tokio::task;

use crate::api::server::SharedRegistry;

pub(crate) const OPENMETRICS_CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// Every scrape re-runs the registered collectors. They shell out and block,
/// so encoding happens on the blocking pool.
pub(crate) async fn metrics(State(registry): State<SharedRegistry>) -> Response {
    let encoded = task::spawn_blocking(move || {
        let mut body = String::new();
        encode(&mut body, &registry).map(|_| body)
    })
    .await;

    match encoded {
        Ok(Ok(body)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)],
            body,
        ).into_response(),
        Ok(Err(err)) => {
            error!("Failed to encode metrics: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(err) => {
            error!("Metrics scrape aborted: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
