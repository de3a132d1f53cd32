//! # API REST
//!
//! REST API implementation for FRR.
//!
//! Handles:
//! - HTTP endpoints with axum (report submission, listing, share rendering,
//!   notes, activity log)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, `x-api-key` guard)
//!
//! All domain behaviour lives in `frr-core`; handlers translate between HTTP
//! and the core services and map [`CoreError`] values onto status codes.

#![warn(rust_2018_idioms)]

pub mod auth;

use axum::extract::{Path as AxumPath, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use frr_core::{
    ActivityLog, CoreConfig, CoreError, NotesService, ReportingService, SubmitOutcome,
};
use frr_report::{FieldValue, SubmitMode};
use frr_share::{share_link, share_text};
use frr_store::{DocumentId, FsDocumentStore};
use frr_types::{CategorySlug, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers.
///
/// Contains the core services needed by the endpoints; all of them share one
/// document store.
#[derive(Clone)]
pub struct AppState {
    reporting: ReportingService<FsDocumentStore>,
    notes: NotesService<FsDocumentStore>,
    activity: ActivityLog<FsDocumentStore>,
}

impl AppState {
    /// Builds the service stack over a filesystem store rooted at the
    /// configured data directory.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        let store = Arc::new(FsDocumentStore::new(cfg.data_dir()));
        Self {
            reporting: ReportingService::new(Arc::clone(&cfg), Arc::clone(&store)),
            notes: NotesService::new(Arc::clone(&store)),
            activity: ActivityLog::new(store),
        }
    }

    pub fn reporting(&self) -> &ReportingService<FsDocumentStore> {
        &self.reporting
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryRes {
    pub category: String,
    pub submit_mode: String,
    pub exceptions: Vec<String>,
    pub optional_sections: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListCategoriesRes {
    pub categories: Vec<CategoryRes>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitReportReq {
    /// Incident category slug, e.g. `animal-on-road`.
    pub category: String,
    /// The draft as assembled by the form UI.
    #[schema(value_type = Object)]
    pub form_data: serde_json::Value,
    /// Optional-section toggles currently switched off.
    #[serde(default)]
    pub hidden_sections: Vec<String>,
    /// Opaque user id from the authentication collaborator.
    #[serde(default)]
    pub reported_by: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitReportRes {
    /// `persisted` or `staged`.
    pub outcome: String,
    /// Document id of a persisted report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The normalized report, returned for staged forms so the client can
    /// drive its preview screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub report: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportRes {
    pub id: String,
    pub category: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_by: Option<String>,
    #[schema(value_type = Object)]
    pub form_data: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListReportsRes {
    pub reports: Vec<ReportRes>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShareRes {
    pub text: String,
    pub link: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateNoteReq {
    pub author: String,
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateNoteRes {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NoteRes {
    pub id: String,
    pub author: String,
    pub body: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListNotesRes {
    pub notes: Vec<NoteRes>,
}

#[derive(Debug, Deserialize)]
pub struct NotesQuery {
    pub author: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivityRes {
    pub actor: String,
    pub action: String,
    pub detail: String,
    pub recorded_at: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListActivityRes {
    pub entries: Vec<ActivityRes>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_categories,
        submit_report,
        list_reports,
        share_report,
        create_note,
        list_notes,
        list_activity,
    ),
    components(schemas(
        HealthRes,
        CategoryRes,
        ListCategoriesRes,
        SubmitReportReq,
        SubmitReportRes,
        ReportRes,
        ListReportsRes,
        ShareRes,
        CreateNoteReq,
        CreateNoteRes,
        NoteRes,
        ListNotesRes,
        ActivityRes,
        ListActivityRes,
    ))
)]
struct ApiDoc;

/// Builds the REST router over the given application state.
///
/// `/health` and the Swagger UI are open; every other route sits behind the
/// `x-api-key` guard.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/categories", get(list_categories))
        .route("/reports", get(list_reports).post(submit_report))
        .route("/reports/:id/share", get(share_report))
        .route("/notes", get(list_notes).post(create_note))
        .route("/activity", get(list_activity))
        .route_layer(axum::middleware::from_fn(auth::require_api_key));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves the router until the process stops.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Maps core failures onto HTTP status codes.
///
/// Validation failures are client errors and carry a stable message; store
/// failures are logged in full but surface generically.
fn map_core_error(e: CoreError) -> (StatusCode, &'static str) {
    match e {
        CoreError::IncompleteReport => {
            (StatusCode::UNPROCESSABLE_ENTITY, "Required fields missing")
        }
        CoreError::UnknownCategory(_) => (StatusCode::NOT_FOUND, "Unknown incident category"),
        CoreError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid input"),
        CoreError::NothingStaged | CoreError::AlreadySubmitted => {
            (StatusCode::CONFLICT, "Conflicting form state")
        }
        other => {
            tracing::error!("core error: {:?}", other);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the FRR REST API service.
/// This endpoint is used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "FRR REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "Registered incident categories", body = ListCategoriesRes),
        (status = 401, description = "Invalid API key")
    )
)]
/// List the registered incident categories
///
/// Each entry describes one form profile: its slug, whether a valid
/// submission persists immediately or stages for preview, and the exception
/// keys and optional sections the form carries.
#[axum::debug_handler]
async fn list_categories(State(state): State<AppState>) -> Json<ListCategoriesRes> {
    let categories = state
        .reporting
        .registry()
        .profiles()
        .iter()
        .map(|profile| CategoryRes {
            category: profile.category().to_string(),
            submit_mode: match profile.submit_mode() {
                SubmitMode::Persist => "persist".to_string(),
                SubmitMode::Stage => "stage".to_string(),
            },
            exceptions: profile.exceptions().iter().cloned().collect(),
            optional_sections: profile
                .optional_sections()
                .iter()
                .map(|section| section.name.clone())
                .collect(),
        })
        .collect();

    Json(ListCategoriesRes { categories })
}

#[utoipa::path(
    post,
    path = "/reports",
    request_body = SubmitReportReq,
    responses(
        (status = 201, description = "Report persisted", body = SubmitReportRes),
        (status = 200, description = "Report staged for preview", body = SubmitReportRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Unknown incident category"),
        (status = 422, description = "Required fields missing"),
        (status = 500, description = "Internal server error")
    )
)]
/// Submit an incident report
///
/// Runs the full submit pipeline: validation against the category's form
/// profile, placeholder filling, hidden-section overrides, and metadata
/// attachment. `Persist`-mode categories write to the document store and
/// answer `201` with the new id; `Stage`-mode categories answer `200` with
/// the normalized report for the client's preview screen.
///
/// # Errors
/// Returns `422` when required fields are missing; the client keeps its
/// draft and may resubmit after the reporter fills the gaps.
#[axum::debug_handler]
async fn submit_report(
    State(state): State<AppState>,
    Json(req): Json<SubmitReportReq>,
) -> Result<(StatusCode, Json<SubmitReportRes>), (StatusCode, &'static str)> {
    let category = CategorySlug::new(&req.category)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid category slug"))?;

    let draft = FieldValue::from(req.form_data);
    let hidden: BTreeSet<String> = req.hidden_sections.into_iter().collect();

    match state
        .reporting
        .submit(&category, draft, &hidden, req.reported_by)
    {
        Ok(SubmitOutcome::Persisted(id)) => Ok((
            StatusCode::CREATED,
            Json(SubmitReportRes {
                outcome: "persisted".into(),
                id: Some(id.to_string()),
                report: None,
            }),
        )),
        Ok(SubmitOutcome::Staged(report)) => {
            let report = serde_json::to_value(&report).map_err(|e| {
                tracing::error!("Staged report serialization error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            })?;
            Ok((
                StatusCode::OK,
                Json(SubmitReportRes {
                    outcome: "staged".into(),
                    id: None,
                    report: Some(report),
                }),
            ))
        }
        Err(e) => Err(map_core_error(e)),
    }
}

#[utoipa::path(
    get,
    path = "/reports",
    responses(
        (status = 200, description = "All persisted reports", body = ListReportsRes),
        (status = 401, description = "Invalid API key"),
        (status = 500, description = "Internal server error")
    )
)]
/// List all persisted reports
#[axum::debug_handler]
async fn list_reports(
    State(state): State<AppState>,
) -> Result<Json<ListReportsRes>, (StatusCode, &'static str)> {
    let stored = state.reporting.list_reports().map_err(map_core_error)?;

    let mut reports = Vec::with_capacity(stored.len());
    for entry in stored {
        let form_data = serde_json::to_value(&entry.report.form_data).map_err(|e| {
            tracing::error!("Report serialization error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        })?;
        reports.push(ReportRes {
            id: entry.id.to_string(),
            category: entry.report.category.to_string(),
            created_at: entry.report.created_at.to_rfc3339(),
            reported_by: entry.report.reported_by,
            form_data,
        });
    }

    Ok(Json(ListReportsRes { reports }))
}

#[utoipa::path(
    get,
    path = "/reports/{id}/share",
    params(
        ("id" = String, Path, description = "Report document id (32 lowercase hex characters)")
    ),
    responses(
        (status = 200, description = "Share rendering of the report", body = ShareRes),
        (status = 400, description = "Invalid report id"),
        (status = 404, description = "Report not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Render the share message for one report
///
/// Produces the flattened, uppercased text rendering (sentinel-valued
/// fields omitted) and a `wa.me` link wrapping it.
#[axum::debug_handler]
async fn share_report(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<ShareRes>, (StatusCode, &'static str)> {
    let id =
        DocumentId::parse(&id).map_err(|_| (StatusCode::BAD_REQUEST, "Invalid report id"))?;

    let report = state
        .reporting
        .get_report(&id)
        .map_err(map_core_error)?
        .ok_or((StatusCode::NOT_FOUND, "Report not found"))?;

    let text = share_text(&report);
    let link = share_link(&text);
    Ok(Json(ShareRes { text, link }))
}

#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteReq,
    responses(
        (status = 201, description = "Note created", body = CreateNoteRes),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
/// Create a personal note
#[axum::debug_handler]
async fn create_note(
    State(state): State<AppState>,
    Json(req): Json<CreateNoteReq>,
) -> Result<(StatusCode, Json<CreateNoteRes>), (StatusCode, &'static str)> {
    let body = NonEmptyText::new(&req.body)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Note body cannot be empty"))?;

    let id = state
        .notes
        .create_note(&req.author, body)
        .map_err(map_core_error)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateNoteRes { id: id.to_string() }),
    ))
}

#[utoipa::path(
    get,
    path = "/notes",
    params(
        ("author" = Option<String>, Query, description = "Restrict to one author's notes")
    ),
    responses(
        (status = 200, description = "Notes, oldest first", body = ListNotesRes),
        (status = 401, description = "Invalid API key"),
        (status = 500, description = "Internal server error")
    )
)]
/// List notes, optionally restricted to one author
#[axum::debug_handler]
async fn list_notes(
    State(state): State<AppState>,
    Query(query): Query<NotesQuery>,
) -> Result<Json<ListNotesRes>, (StatusCode, &'static str)> {
    let notes = state
        .notes
        .list_notes(query.author.as_deref())
        .map_err(map_core_error)?
        .into_iter()
        .map(|(id, note)| NoteRes {
            id: id.to_string(),
            author: note.author,
            body: note.body.to_string(),
            created_at: note.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(ListNotesRes { notes }))
}

#[utoipa::path(
    get,
    path = "/activity",
    responses(
        (status = 200, description = "Activity log, oldest first", body = ListActivityRes),
        (status = 401, description = "Invalid API key"),
        (status = 500, description = "Internal server error")
    )
)]
/// List the activity log
#[axum::debug_handler]
async fn list_activity(
    State(state): State<AppState>,
) -> Result<Json<ListActivityRes>, (StatusCode, &'static str)> {
    let entries = state
        .activity
        .list()
        .map_err(map_core_error)?
        .into_iter()
        .map(|entry| ActivityRes {
            actor: entry.actor,
            action: entry.action.as_str().to_string(),
            detail: entry.detail,
            recorded_at: entry.recorded_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(ListActivityRes { entries }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state(temp_dir: &TempDir) -> AppState {
        let cfg = Arc::new(
            CoreConfig::new(
                temp_dir.path().to_path_buf(),
                NonEmptyText::new("test-ops").unwrap(),
            )
            .expect("config should build"),
        );
        AppState::new(cfg)
    }

    #[tokio::test]
    async fn health_is_open_and_other_routes_are_guarded() {
        // One test covers all key states to avoid racing on the
        // process-wide API_KEY variable.
        std::env::set_var("API_KEY", "secret");

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = router(test_state(&temp_dir));

        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "health needs no key");

        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/reports")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            res.status(),
            StatusCode::UNAUTHORIZED,
            "missing key should be rejected"
        );

        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/reports")
                    .header("x-api-key", "wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            res.status(),
            StatusCode::UNAUTHORIZED,
            "wrong key should be rejected"
        );

        let res = app
            .oneshot(
                Request::builder()
                    .uri("/reports")
                    .header("x-api-key", "secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "correct key should pass");
    }

    #[tokio::test]
    async fn submit_report_maps_validation_failures_to_422() {
        std::env::set_var("API_KEY", "secret");

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = router(test_state(&temp_dir));

        let body = serde_json::json!({
            "category": "animal-on-road",
            "form_data": {"rodovia": "ms-112", "qth": ""}
        });

        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/reports")
                    .header("x-api-key", "secret")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn submit_report_persists_valid_drafts() {
        std::env::set_var("API_KEY", "secret");

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let state = test_state(&temp_dir);
        let app = router(state.clone());

        let body = serde_json::json!({
            "category": "animal-on-road",
            "form_data": {"rodovia": "ms-112", "qth": "km 42", "animal": "capivara"},
            "reported_by": "op-7f3a"
        });

        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/reports")
                    .header("x-api-key", "secret")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        let stored = state.reporting().list_reports().expect("list");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].report.reported_by.as_deref(), Some("op-7f3a"));
    }

    #[tokio::test]
    async fn unknown_category_maps_to_404() {
        std::env::set_var("API_KEY", "secret");

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = router(test_state(&temp_dir));

        let body = serde_json::json!({
            "category": "ufo-landing",
            "form_data": {"qth": "km 1"}
        });

        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/reports")
                    .header("x-api-key", "secret")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
