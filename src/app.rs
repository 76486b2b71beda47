use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenIssuer;
use crate::config::AppConfig;
use crate::database::models::{EducationArea, ExhibitionRoom, Recommendation};
use crate::database::{DocumentStore, Resource};
use crate::handlers::{resource, system};
use crate::middleware::jwt_auth_middleware;
use crate::services::ResourceService;

/// Shared request state: the document store and the token issuer.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, tokens: TokenIssuer) -> Self {
        Self { store, tokens }
    }

    pub fn service<R: Resource>(&self) -> ResourceService<R> {
        ResourceService::new(self.store.clone())
    }
}

/// Router with public and token-protected routes, without global layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(public_routes::<EducationArea>())
        .merge(public_routes::<Recommendation>())
        .merge(public_routes::<ExhibitionRoom>())
        .route(
            &collection_path::<ExhibitionRoom>(),
            post(resource::create::<ExhibitionRoom>),
        )
        // Protected
        .merge(protected_routes(state.clone()))
        .with_state(state)
}

/// Full application: router plus CORS, tracing and body limits
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut app = router(state).layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        app = app.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

fn collection_path<R: Resource>() -> String {
    format!("/api/{}", R::DESCRIPTOR.route)
}

fn record_path<R: Resource>() -> String {
    format!("/api/{}/:id", R::DESCRIPTOR.route)
}

fn public_routes<R: Resource>() -> Router<AppState> {
    Router::new()
        .route(&collection_path::<R>(), get(resource::find::<R>))
        .route(&record_path::<R>(), get(resource::show::<R>))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(&collection_path::<EducationArea>(), post(resource::create::<EducationArea>))
        .route(&collection_path::<Recommendation>(), post(resource::create::<Recommendation>))
        .merge(record_mutation_routes::<EducationArea>())
        .merge(record_mutation_routes::<Recommendation>())
        .merge(record_mutation_routes::<ExhibitionRoom>())
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn record_mutation_routes<R: Resource>() -> Router<AppState> {
    Router::new().route(
        &record_path::<R>(),
        axum::routing::patch(resource::update::<R>)
            .put(resource::update::<R>)
            .delete(resource::remove::<R>),
    )
}
