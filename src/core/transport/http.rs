//! HTTP transport implementation.
//!
//! REST endpoints over the resource store:
//!
//! | Method | Path              | Success |
//! |--------|-------------------|---------|
//! | POST   | `/resources`      | 201     |
//! | GET    | `/resources`      | 200     |
//! | GET    | `/resources/{id}` | 200     |
//! | PUT    | `/resources/{id}` | 200     |
//! | DELETE | `/resources/{id}` | 204     |
//!
//! Unknown ids answer 404 with an empty body. Rejected input answers 400
//! with `{"error": "..."}`. Deleting an unknown id still answers 204.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use super::{HttpConfig, TransportError, TransportResult};
use crate::core::ResourceServer;
use crate::domains::resources::{NewResource, Resource, ResourceError, ResourcePatch, Status};

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Run the HTTP transport until Ctrl-C is received.
    pub async fn run(self, server: ResourceServer) -> TransportResult<()> {
        let addr = self.config.address();
        info!("Starting transport: {}", self.config.description());

        let app = router(server, self.config.enable_cors);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        info!("  → Resources: /resources, /resources/{{id}}");
        info!("  → Health:    GET /health");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(TransportError::HttpError)?;

        Ok(())
    }
}

/// Build the application router.
pub fn router(server: ResourceServer, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .route("/resources", get(list_resources).post(create_resource))
        .route(
            "/resources/{id}",
            get(get_resource).put(update_resource).delete(delete_resource),
        )
        .route("/health", get(health_check))
        .route("/", get(root_handler))
        .with_state(server);

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app.layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Failed to listen for Ctrl-C, running until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error returned by handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The store refused the operation.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// The body is not a JSON object of the expected shape.
    #[error("Invalid body: {}", .0.body_text())]
    Json(#[from] JsonRejection),

    /// The query string could not be parsed.
    #[error("Invalid query: {}", .0.body_text())]
    Query(#[from] QueryRejection),

    /// A required field is missing.
    #[error("{0} is required")]
    MissingField(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Resource(ResourceError::NotFound(_)) => {
                return StatusCode::NOT_FOUND.into_response();
            }
            Self::Resource(ResourceError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Resource(ResourceError::InvalidArgument(_))
            | Self::Json(_)
            | Self::Query(_)
            | Self::MissingField(_) => StatusCode::BAD_REQUEST,
        };

        let message = self.to_string();
        if status.is_server_error() {
            warn!("Request failed: {}", message);
        } else {
            info!("Request rejected: {}", message);
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Body of `POST /resources`.
///
/// Shares the object-only field parsing of [`ResourcePatch`], so missing
/// fields produce a readable 400 instead of a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct CreateResourceRequest(ResourcePatch);

impl CreateResourceRequest {
    /// Check field presence; the store checks the values.
    fn into_new_resource(self) -> Result<NewResource, ApiError> {
        let ResourcePatch {
            name,
            description,
            status,
        } = self.0;

        Ok(NewResource {
            name: name.flatten().ok_or(ApiError::MissingField("name"))?,
            description: description
                .flatten()
                .ok_or(ApiError::MissingField("description"))?,
            // `null` means omitted here
            status: status.flatten(),
        })
    }
}

/// Query of `GET /resources`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Root handler - provides API info.
async fn root_handler(State(server): State<ResourceServer>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": server.name(),
        "version": server.version(),
        "transport": "HTTP",
        "endpoints": {
            "resources": "/resources",
            "resource": "/resources/{id}",
            "health": "/health"
        }
    }))
}

/// Health check endpoint.
async fn health_check(State(server): State<ResourceServer>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "resources": server.store().len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[instrument(skip_all)]
async fn create_resource(
    State(server): State<ResourceServer>,
    payload: Result<Json<CreateResourceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Resource>), ApiError> {
    let Json(request) = payload?;
    let resource = server.store().create(request.into_new_resource()?)?;
    Ok((StatusCode::CREATED, Json(resource)))
}

#[instrument(skip_all)]
async fn list_resources(
    State(server): State<ResourceServer>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Resource>>, ApiError> {
    let Query(query) = query?;

    // An empty `?status=` means no filter
    let filter = match query.status.as_deref() {
        None | Some("") => None,
        Some(status) => Some(status.parse::<Status>()?),
    };

    Ok(Json(server.store().list(filter)))
}

#[instrument(skip_all, fields(id = %id))]
async fn get_resource(
    State(server): State<ResourceServer>,
    Path(id): Path<String>,
) -> Result<Json<Resource>, ApiError> {
    Ok(Json(server.store().get(&id)?))
}

#[instrument(skip_all, fields(id = %id))]
async fn update_resource(
    State(server): State<ResourceServer>,
    Path(id): Path<String>,
    payload: Result<Json<ResourcePatch>, JsonRejection>,
) -> Result<Json<Resource>, ApiError> {
    let Json(patch) = payload?;
    Ok(Json(server.store().update(&id, patch)?))
}

#[instrument(skip_all, fields(id = %id))]
async fn delete_resource(
    State(server): State<ResourceServer>,
    Path(id): Path<String>,
) -> StatusCode {
    server.store().delete(&id);
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::domains::resources::IdStrategy;
    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        app_with(Config::default())
    }

    fn app_with(config: Config) -> Router {
        router(ResourceServer::new(config).unwrap(), false)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    fn json(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    async fn create(app: &Router, body: Value) -> Value {
        let (status, bytes) = send(app, Method::POST, "/resources", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        json(&bytes)
    }

    #[tokio::test]
    async fn test_end_to_end_lifecycle() {
        let app = app();

        let created = create(
            &app,
            json!({ "name": "Alpha", "description": "d", "status": "active" }),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());
        assert!(created["createdAt"].is_string());

        let (status, bytes) = send(&app, Method::GET, "/resources", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&bytes), json!([created.clone()]));

        let (status, bytes) = send(&app, Method::GET, "/resources?status=inactive", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&bytes), json!([]));

        let uri = format!("/resources/{}", id);
        let (status, bytes) =
            send(&app, Method::PUT, &uri, Some(json!({ "status": "inactive" }))).await;
        assert_eq!(status, StatusCode::OK);
        let updated = json(&bytes);
        assert_eq!(updated["status"], "inactive");
        assert_eq!(updated["name"], created["name"]);
        assert_eq!(updated["description"], created["description"]);
        assert_eq!(updated["createdAt"], created["createdAt"]);

        let (status, bytes) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&bytes), updated);

        let (status, bytes) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(bytes.is_empty());

        let (status, bytes) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_create_defaults_status() {
        let created = create(&app(), json!({ "name": "n", "description": "" })).await;
        assert_eq!(created["status"], "active");
    }

    #[tokio::test]
    async fn test_create_requires_status_when_no_default() {
        let mut config = Config::default();
        config.resources.default_status = None;
        let app = app_with(config);

        let (status, bytes) = send(
            &app,
            Method::POST,
            "/resources",
            Some(json!({ "name": "n", "description": "d" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json(&bytes)["error"].is_string());
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let app = app();
        for body in [
            json!({ "description": "d" }),
            json!({ "name": "n" }),
            json!({ "name": "n", "description": "d", "status": "paused" }),
        ] {
            let (status, _) = send(&app, Method::POST, "/resources", Some(body.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        }

        let (_, bytes) = send(&app, Method::GET, "/resources", None).await;
        assert_eq!(json(&bytes), json!([]));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/resources")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_invalid_status_leaves_record() {
        let app = app();
        let created = create(&app, json!({ "name": "n", "description": "d" })).await;
        let uri = format!("/resources/{}", created["id"].as_str().unwrap());

        let (status, bytes) = send(
            &app,
            Method::PUT,
            &uri,
            Some(json!({ "name": "changed", "status": "paused" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json(&bytes)["error"].as_str().unwrap().contains("paused"));

        let (_, bytes) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(json(&bytes), created);
    }

    #[tokio::test]
    async fn test_array_bodies_are_rejected() {
        let app = app();
        let created = create(
            &app,
            json!({ "name": "Alpha", "description": "d", "status": "active" }),
        )
        .await;
        let uri = format!("/resources/{}", created["id"].as_str().unwrap());

        for body in [json!(["renamed", "x", "inactive"]), json!([])] {
            let (status, bytes) = send(&app, Method::PUT, &uri, Some(body.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "PUT {body}");
            assert!(json(&bytes)["error"].is_string());
        }

        let (status, bytes) = send(
            &app,
            Method::POST,
            "/resources",
            Some(json!(["n", "d", "active"])),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json(&bytes)["error"].is_string());

        let (_, bytes) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(json(&bytes), created);

        let (_, bytes) = send(&app, Method::GET, "/resources", None).await;
        assert_eq!(json(&bytes), json!([created]));
    }

    #[test]
    fn test_api_error_messages() {
        assert_eq!(
            ApiError::MissingField("name").to_string(),
            "name is required"
        );
        assert_eq!(
            ApiError::from(ResourceError::invalid_argument("bad status")).to_string(),
            "Invalid argument: bad status"
        );
    }

    #[tokio::test]
    async fn test_update_ignores_id_and_created_at() {
        let app = app();
        let created = create(&app, json!({ "name": "n", "description": "d" })).await;
        let uri = format!("/resources/{}", created["id"].as_str().unwrap());

        let (status, bytes) = send(
            &app,
            Method::PUT,
            &uri,
            Some(json!({ "id": "hijack", "createdAt": "1999-01-01T00:00:00Z", "name": "m" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let updated = json(&bytes);
        assert_eq!(updated["id"], created["id"]);
        assert_eq!(updated["createdAt"], created["createdAt"]);
        assert_eq!(updated["name"], "m");
    }

    #[tokio::test]
    async fn test_update_unknown_is_empty_404() {
        let (status, bytes) = send(
            &app(),
            Method::PUT,
            "/resources/missing",
            Some(json!({ "name": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_is_no_content() {
        let (status, bytes) = send(&app(), Method::DELETE, "/resources/missing", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_list_filter_handling() {
        let mut config = Config::default();
        config.resources.seed_demo_data = true;
        config.resources.id_strategy = IdStrategy::Sequential;
        let app = app_with(config);

        let (_, bytes) = send(&app, Method::GET, "/resources?status=active", None).await;
        let active = json(&bytes);
        assert_eq!(active.as_array().unwrap().len(), 1);
        assert_eq!(active[0]["name"], "Alpha Project");

        let (_, bytes) = send(&app, Method::GET, "/resources?status=", None).await;
        assert_eq!(json(&bytes).as_array().unwrap().len(), 2);

        let (status, _) = send(&app, Method::GET, "/resources?status=all", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_reports_count() {
        let app = app();
        create(&app, json!({ "name": "n", "description": "d" })).await;

        let (status, bytes) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        let health = json(&bytes);
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["resources"], 1);
    }

    #[tokio::test]
    async fn test_cors_header_when_enabled() {
        let app = router(ResourceServer::new(Config::default()).unwrap(), true);
        let request = Request::builder()
            .uri("/resources")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
