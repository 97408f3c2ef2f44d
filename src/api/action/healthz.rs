use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct Liveness {
    state: &'static str,
}

/// Never runs sinfo.
pub(crate) async fn healthz() -> Json<Liveness> {
    Json(Liveness { state: "UP" })
}
