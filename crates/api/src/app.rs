use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use anyhow::Context;
use domain::services::Notifier;
use shared::jwt::JwtConfig;

use crate::config::Config;
use crate::middleware::metrics::{metrics_handler, metrics_middleware};
use crate::middleware::trace_id::trace_id;
use crate::routes::{
    auth, categories, companies, dashboard, departments, equipment, health, requests, teams,
    work_centers, worker, workers,
};
use crate::services::email::EmailService;
use crate::services::notifier::EmailNotifier;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub email: EmailService,
    pub notifier: Arc<dyn Notifier>,
}

pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let config = Arc::new(config);

    let jwt = JwtConfig::from_pem_keys(
        &config.jwt.private_key,
        &config.jwt.public_key,
        config.jwt.access_token_expiry_secs,
        config.jwt.refresh_token_expiry_secs,
        config.jwt.leeway_secs,
    )
    .context("Failed to load JWT signing keys")?;

    let email = EmailService::new(config.email.clone());
    let notifier: Arc<dyn Notifier> = Arc::new(EmailNotifier::new(email.clone()));

    let state = AppState {
        pool,
        config: config.clone(),
        jwt: Arc::new(jwt),
        email,
        notifier,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Authentication routes (no token required)
    let auth_routes = Router::new()
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/request-otp", post(auth::request_otp))
        .route("/api/v1/auth/verify-email", post(auth::verify_email))
        .route("/api/v1/auth/reset-password", post(auth::reset_password));

    // Maintenance request routes (admin side of the workflow)
    let request_routes = Router::new()
        .route(
            "/api/v1/requests",
            post(requests::create_request).get(requests::list_requests),
        )
        .route(
            "/api/v1/requests/:id",
            get(requests::get_request)
                .put(requests::update_request)
                .delete(requests::delete_request),
        )
        .route("/api/v1/requests/:id/stage", post(requests::update_stage))
        .route(
            "/api/v1/requests/:id/allocate",
            post(requests::allocate_request),
        )
        .route(
            "/api/v1/requests/:id/deadline-response",
            post(requests::respond_to_deadline),
        );

    // Worker-facing routes (the allocated worker's side of the workflow)
    let worker_routes = Router::new()
        .route("/api/v1/worker/dashboard", get(worker::worker_dashboard))
        .route("/api/v1/worker/requests", get(worker::my_requests))
        .route(
            "/api/v1/worker/requests/:id/respond",
            post(worker::respond_to_allocation),
        )
        .route(
            "/api/v1/worker/requests/:id/status",
            post(worker::update_work_status),
        );

    // Master data routes
    let master_data_routes = Router::new()
        .route(
            "/api/v1/equipment",
            post(equipment::create_equipment).get(equipment::list_equipment),
        )
        .route(
            "/api/v1/equipment/:id",
            get(equipment::get_equipment)
                .put(equipment::update_equipment)
                .delete(equipment::delete_equipment),
        )
        .route(
            "/api/v1/equipment/:id/notify-third-party",
            post(equipment::notify_third_parties),
        )
        .route(
            "/api/v1/workers",
            post(workers::create_worker).get(workers::list_workers),
        )
        .route(
            "/api/v1/workers/:id",
            put(workers::update_worker).delete(workers::deactivate_worker),
        )
        .route("/api/v1/teams", post(teams::create_team).get(teams::list_teams))
        .route(
            "/api/v1/teams/:id",
            put(teams::update_team).delete(teams::delete_team),
        )
        .route(
            "/api/v1/categories",
            post(categories::create_category).get(categories::list_categories),
        )
        .route(
            "/api/v1/categories/:id",
            put(categories::update_category).delete(categories::delete_category),
        )
        .route(
            "/api/v1/companies",
            post(companies::create_company).get(companies::list_companies),
        )
        .route(
            "/api/v1/companies/:id",
            put(companies::update_company).delete(companies::delete_company),
        )
        .route(
            "/api/v1/work-centers",
            post(work_centers::create_work_center).get(work_centers::list_work_centers),
        )
        .route(
            "/api/v1/work-centers/:id",
            put(work_centers::update_work_center).delete(work_centers::delete_work_center),
        )
        .route(
            "/api/v1/departments",
            post(departments::create_department).get(departments::list_departments),
        )
        .route(
            "/api/v1/departments/:id",
            put(departments::update_department).delete(departments::delete_department),
        );

    // Dashboard routes
    let dashboard_routes =
        Router::new().route("/api/v1/dashboard", get(dashboard::admin_dashboard));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    let app = Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(request_routes)
        .merge(worker_routes)
        .merge(master_data_routes)
        .merge(dashboard_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state);

    Ok(app)
}
