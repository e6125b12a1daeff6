//! Router assembly

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::AppState;
use super::handlers;

/// Any origin, method and header.
pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/preco", get(handlers::get_price))
        .route("/verificar_quedas", post(handlers::check_drops))
        .route("/registrar_compra", post(handlers::register_purchases))
        .route("/relatorio_mensal", get(handlers::monthly_report))
        .route("/compras", get(handlers::list_purchases))
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
