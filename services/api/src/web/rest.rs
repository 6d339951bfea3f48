//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the analysis and document endpoints, and the
//! master definition for the OpenAPI specification.

use crate::error::to_http;
use crate::web::auth::{self, AuthResponse, LoginRequest, SignupRequest};
use crate::web::middleware::CurrentUser;
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::me_handler,
        analyze_handler,
        list_documents_handler,
        summary_handler,
        get_document_handler,
        delete_document_handler,
        regenerate_handler,
    ),
    components(
        schemas(AnalyzeRequest, SignupRequest, LoginRequest, AuthResponse)
    ),
    tags(
        (name = "ChartGenius API", description = "Turns articles into documents with generated charts.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Payload Structs
//=========================================================================================

/// The article to analyze.
#[derive(Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    pub text: String,
}

type HandlerResult<T> = Result<T, (StatusCode, String)>;

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Analyze an article.
///
/// Signed-in users get a persisted document back; guests get the blocks only.
#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis result, tagged `persisted` or `ephemeral`"),
        (status = 400, description = "Text too short"),
        (status = 429, description = "Model is rate limiting, retry shortly"),
        (status = 502, description = "Model returned no usable analysis")
    )
)]
pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<AnalyzeRequest>,
) -> HandlerResult<impl IntoResponse> {
    let result = state
        .pipeline
        .run(user.as_ref(), &req.text)
        .await
        .map_err(to_http)?;
    Ok(Json(result))
}

/// List the current user's documents, newest first.
#[utoipa::path(
    get,
    path = "/documents",
    responses((status = 200, description = "Documents (empty without a session)"))
)]
pub async fn list_documents_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> HandlerResult<impl IntoResponse> {
    let documents = state.documents.list(user.as_ref()).await.map_err(to_http)?;
    Ok(Json(documents))
}

/// Totals and recent documents for the dashboard.
#[utoipa::path(
    get,
    path = "/documents/summary",
    responses((status = 200, description = "Workspace summary"))
)]
pub async fn summary_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> HandlerResult<impl IntoResponse> {
    let summary = state.documents.summary(user.as_ref()).await.map_err(to_http)?;
    Ok(Json(summary))
}

/// Fetch one document. Documents of other users are reported as missing.
#[utoipa::path(
    get,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 200, description = "The document"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_document_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> HandlerResult<impl IntoResponse> {
    match state.documents.get(user.as_ref(), id).await.map_err(to_http)? {
        Some(document) => Ok(Json(document)),
        None => Err((StatusCode::NOT_FOUND, "Document not found".to_string())),
    }
}

/// Delete a document. Always succeeds from the caller's point of view.
#[utoipa::path(
    delete,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "Document id")),
    responses((status = 204, description = "Deleted, or nothing to delete"))
)]
pub async fn delete_document_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> HandlerResult<StatusCode> {
    state
        .documents
        .delete(user.as_ref(), id)
        .await
        .map_err(to_http)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Re-analyze a saved document's original text into a new document.
#[utoipa::path(
    post,
    path = "/documents/{id}/regenerate",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 201, description = "The newly created document"),
        (status = 404, description = "Not found")
    )
)]
pub async fn regenerate_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> HandlerResult<impl IntoResponse> {
    match state
        .pipeline
        .regenerate(user.as_ref(), id)
        .await
        .map_err(to_http)?
    {
        Some(document) => Ok((StatusCode::CREATED, Json(document))),
        None => Err((StatusCode::NOT_FOUND, "Document not found".to_string())),
    }
}
