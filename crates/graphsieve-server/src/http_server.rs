//! HTTP/REST API server implementation using Axum

use crate::cors::CorsConfig;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use graphsieve_core::{
    Direction, Error, FilterRequest, LogicalOperator, NodeFilter, NodeResult, OperatorKind,
    PropertyPredicate, RelationshipFilter, RelationshipResult,
};
use graphsieve_graph::{FilterService, GraphSession};
use graphsieve_protocol::{
    endpoints, ErrorBody, FilterExample, FilterResponse, FilterSummary, HealthResponse,
};
use graphsieve_query::QueryTarget;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FilterService>,
    pub session: Arc<dyn GraphSession>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(service: FilterService, session: Arc<dyn GraphSession>) -> Self {
        Self {
            service: Arc::new(service),
            session,
            start_time: Instant::now(),
        }
    }
}

/// Create HTTP server router
pub fn create_router(state: AppState, api_prefix: &str, cors: &CorsConfig) -> Router {
    let prefix = api_prefix.trim_end_matches('/');
    let route = |path: &str| format!("{}{}", prefix, path);

    Router::new()
        .route(endpoints::HEALTH, get(health_check))
        .route(&route(endpoints::NODES_FILTER), post(filter_nodes))
        .route(&route(endpoints::RELATIONSHIPS_FILTER), post(filter_relationships))
        .route(&route(endpoints::NODES_FILTER_SUMMARY), get(nodes_filter_summary))
        .route(
            &route(endpoints::RELATIONSHIPS_FILTER_SUMMARY),
            get(relationships_filter_summary),
        )
        .layer(cors.build_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ==================== Errors ====================

/// Error returned by API handlers
#[derive(Debug)]
pub struct ApiError(Error);

impl ApiError {
    fn status(&self) -> StatusCode {
        if self.0.is_validation() {
            StatusCode::BAD_REQUEST
        } else if self.0.is_unavailable() {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.0.error_code(), "Request failed: {}", self.0);
        } else {
            warn!(code = self.0.error_code(), "Request rejected: {}", self.0);
        }

        let body = ErrorBody::new(
            status.canonical_reason().unwrap_or("Error"),
            self.0.error_code(),
            self.0.to_string(),
        );
        (status, Json(body)).into_response()
    }
}

// ==================== Health Check ====================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let version = match state.session.server_info().await {
        Ok(info) => Some(info.version),
        Err(e) => {
            warn!("Health probe failed: {}", e);
            None
        }
    };

    Json(HealthResponse::from_probe(
        version,
        state.start_time.elapsed().as_secs(),
    ))
}

// ==================== Filtering ====================

async fn filter_nodes(
    State(state): State<AppState>,
    payload: Result<Json<FilterRequest>, JsonRejection>,
) -> Result<Json<FilterResponse<NodeResult>>, ApiError> {
    let Json(request) = payload?;
    let page = state
        .service
        .filter_nodes(state.session.as_ref(), &request)
        .await?;
    Ok(Json(page))
}

async fn filter_relationships(
    State(state): State<AppState>,
    payload: Result<Json<FilterRequest>, JsonRejection>,
) -> Result<Json<FilterResponse<RelationshipResult>>, ApiError> {
    let Json(request) = payload?;
    let page = state
        .service
        .filter_relationships(state.session.as_ref(), &request)
        .await?;
    Ok(Json(page))
}

// ==================== Documented Examples ====================

async fn nodes_filter_summary(
    State(state): State<AppState>,
) -> Result<Json<FilterSummary>, ApiError> {
    let examples = vec![
        (
            "People older than 25",
            FilterRequest {
                node_filter: Some(NodeFilter {
                    node_types: vec!["Person".to_string()],
                    property_filters: vec![PropertyPredicate::new(
                        "age",
                        OperatorKind::GreaterThan,
                        25i64,
                    )],
                    logical_operator: LogicalOperator::And,
                }),
                limit: 10,
                ..Default::default()
            },
        ),
        (
            "Nodes located in one of several countries",
            FilterRequest {
                node_filter: Some(NodeFilter {
                    property_filters: vec![PropertyPredicate::new(
                        "country",
                        OperatorKind::In,
                        vec!["USA", "Canada"],
                    )],
                    ..Default::default()
                }),
                ..Default::default()
            },
        ),
        (
            "Free-text search across labels and properties",
            FilterRequest {
                search_query: Some("john".to_string()),
                ..Default::default()
            },
        ),
    ];

    summary(&state, endpoints::NODES_FILTER, QueryTarget::Nodes, examples)
}

async fn relationships_filter_summary(
    State(state): State<AppState>,
) -> Result<Json<FilterSummary>, ApiError> {
    let examples = vec![
        (
            "Direct WORKS_AT relationships",
            FilterRequest {
                relationship_filter: Some(RelationshipFilter {
                    relationship_types: vec!["WORKS_AT".to_string()],
                    direction: Direction::Outgoing,
                    ..Default::default()
                }),
                ..Default::default()
            },
        ),
        (
            "Paths of up to two hops from offices, filtered on a hop property",
            FilterRequest {
                node_filter: Some(NodeFilter {
                    node_types: vec!["OFFICE".to_string()],
                    ..Default::default()
                }),
                relationship_filter: Some(RelationshipFilter {
                    relationship_types: vec!["SEND_TO".to_string(), "PROCESSED_BY".to_string()],
                    min_depth: 1,
                    max_depth: 2,
                    property_filters: vec![PropertyPredicate::new(
                        "OFFICE",
                        OperatorKind::Equal,
                        "21TO",
                    )],
                    ..Default::default()
                }),
                limit: 50,
                ..Default::default()
            },
        ),
        (
            "Incoming relationships into companies",
            FilterRequest {
                relationship_filter: Some(RelationshipFilter {
                    direction: Direction::Incoming,
                    ..Default::default()
                }),
                node_filter: Some(NodeFilter {
                    node_types: vec!["Company".to_string()],
                    ..Default::default()
                }),
                ..Default::default()
            },
        ),
    ];

    summary(
        &state,
        endpoints::RELATIONSHIPS_FILTER,
        QueryTarget::Relationships,
        examples,
    )
}

fn summary(
    state: &AppState,
    endpoint: &str,
    target: QueryTarget,
    examples: Vec<(&str, FilterRequest)>,
) -> Result<Json<FilterSummary>, ApiError> {
    let config = state.service.config();
    let examples = examples
        .into_iter()
        .map(|(description, mut request)| -> Result<FilterExample, ApiError> {
            // examples must stay valid under the configured limits
            request.limit = request.limit.min(config.max_page_size);
            if let Some(rel) = request.relationship_filter.as_mut() {
                rel.max_depth = rel.max_depth.min(config.max_depth);
                rel.min_depth = rel.min_depth.min(rel.max_depth);
            }
            Ok(FilterExample {
                description: description.to_string(),
                active_filters: state.service.active_filters(&request, target)?,
                request: serde_json::to_value(&request).map_err(Error::from)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(FilterSummary {
        endpoint: endpoint.to_string(),
        operators: OperatorKind::ALL.iter().map(|op| op.symbol().to_string()).collect(),
        examples,
    }))
}
