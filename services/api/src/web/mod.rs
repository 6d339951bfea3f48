pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

pub use middleware::{resolve_session, CurrentUser};
pub use rest::ApiDoc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::web::state::AppState;

/// Builds every API route. Each one passes through session resolution; the
/// handlers decide what a guest may do.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/me", get(auth::me_handler))
        .route("/analyze", post(rest::analyze_handler))
        .route("/documents", get(rest::list_documents_handler))
        .route("/documents/summary", get(rest::summary_handler))
        .route(
            "/documents/{id}",
            get(rest::get_document_handler).delete(rest::delete_document_handler),
        )
        .route("/documents/{id}/regenerate", post(rest::regenerate_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            resolve_session,
        ))
        .with_state(app_state)
}
