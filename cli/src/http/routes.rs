use axum::{
    extract::State,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::http::{
    middleware::{create_timeout_layer, request_logger},
    pages,
    state::AppState,
};

/// `GET /` is the only route.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(report_handler))
        .layer(middleware::from_fn(request_logger))
        .layer(create_timeout_layer())
        .with_state(state)
}

async fn report_handler(State(state): State<AppState>) -> Response {
    let snapshot = state.report.snapshot();
    pages::render(&snapshot).into_response()
}
