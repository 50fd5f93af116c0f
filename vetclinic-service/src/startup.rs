//! Application startup and lifecycle management.

use crate::config::ClinicConfig;
use crate::handlers;
use crate::middleware::{auth_middleware, metrics_middleware};
use crate::services::{init_metrics, Database, JwtService, RegistrationService};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::tracing::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ClinicConfig,
    pub db: Arc<Database>,
    pub jwt: JwtService,
    pub registration: RegistrationService,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: ClinicConfig) -> Result<Self, AppError> {
        Self::build_internal(config, true).await
    }

    /// Build the application without running migrations.
    /// Use this in tests when migrations are already applied by the test harness.
    pub async fn build_without_migrations(config: ClinicConfig) -> Result<Self, AppError> {
        Self::build_internal(config, false).await
    }

    async fn build_internal(config: ClinicConfig, run_migrations: bool) -> Result<Self, AppError> {
        init_metrics();

        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        if run_migrations {
            db.run_migrations().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to run migrations");
                e
            })?;
        }

        let db = Arc::new(db);
        let jwt = JwtService::new(&config.auth);
        let registration = RegistrationService::new(db.clone());

        let state = AppState {
            config,
            db,
            jwt,
            registration,
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "Listener bound");

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &Database {
        &self.state.db
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state.clone());

        tracing::info!(
            service = "vetclinic-service",
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            "Service ready to accept connections"
        );

        axum::serve(self.listener, router).await
    }
}

/// Build the full router: public auth and probe endpoints, and the
/// authenticated API surface behind the token middleware.
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .route("/metrics", get(handlers::health::metrics))
        .route("/api/register", post(handlers::auth::register_client))
        .route("/api/doctor/register", post(handlers::auth::register_doctor))
        .route("/api/login", post(handlers::auth::login_client))
        .route("/api/doctor/login", post(handlers::auth::login_doctor));

    let authenticated = Router::new()
        .route(
            "/api/clients",
            get(handlers::clients::list_clients),
        )
        .route(
            "/api/clients/:id",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        .route(
            "/api/patients",
            get(handlers::patients::list_patients).post(handlers::patients::create_patient),
        )
        .route(
            "/api/patients/:id",
            get(handlers::patients::get_patient)
                .put(handlers::patients::update_patient)
                .delete(handlers::patients::delete_patient),
        )
        .route(
            "/api/appointments",
            get(handlers::scheduling::list_appointments)
                .post(handlers::scheduling::create_appointment),
        )
        .route(
            "/api/appointments/:id",
            get(handlers::scheduling::get_appointment)
                .put(handlers::scheduling::update_appointment)
                .delete(handlers::scheduling::delete_appointment),
        )
        .route(
            "/api/receipts",
            get(handlers::scheduling::list_receipts).post(handlers::scheduling::create_receipt),
        )
        .route(
            "/api/receipts/:id",
            get(handlers::scheduling::get_receipt)
                .put(handlers::scheduling::update_receipt)
                .delete(handlers::scheduling::delete_receipt),
        )
        .route(
            "/api/visits",
            get(handlers::clinical::list_visits).post(handlers::clinical::create_visit),
        )
        .route(
            "/api/visits/:id",
            get(handlers::clinical::get_visit)
                .put(handlers::clinical::update_visit)
                .delete(handlers::clinical::delete_visit),
        )
        .route(
            "/api/vitals",
            get(handlers::clinical::list_vital_signs)
                .post(handlers::clinical::create_vital_signs),
        )
        .route(
            "/api/vitals/:id",
            get(handlers::clinical::get_vital_signs)
                .put(handlers::clinical::update_vital_signs)
                .delete(handlers::clinical::delete_vital_signs),
        )
        .route(
            "/api/allergies",
            get(handlers::clinical::list_allergy_alerts)
                .post(handlers::clinical::create_allergy_alert),
        )
        .route(
            "/api/allergies/:id",
            get(handlers::clinical::get_allergy_alert)
                .put(handlers::clinical::update_allergy_alert)
                .delete(handlers::clinical::delete_allergy_alert),
        )
        .route(
            "/api/medical-notes",
            get(handlers::clinical::list_clinical_notes)
                .post(handlers::clinical::create_clinical_note),
        )
        .route(
            "/api/medical-notes/:id",
            get(handlers::clinical::get_clinical_note)
                .put(handlers::clinical::update_clinical_note)
                .delete(handlers::clinical::delete_clinical_note),
        )
        .route(
            "/api/medications",
            get(handlers::clinical::list_medications)
                .post(handlers::clinical::create_medication),
        )
        .route(
            "/api/medications/:id",
            get(handlers::clinical::get_medication)
                .put(handlers::clinical::update_medication)
                .delete(handlers::clinical::delete_medication),
        )
        .route(
            "/api/treatments",
            get(handlers::clinical::list_treatment_plans)
                .post(handlers::clinical::create_treatment_plan),
        )
        .route(
            "/api/treatments/:id",
            get(handlers::clinical::get_treatment_plan)
                .put(handlers::clinical::update_treatment_plan)
                .delete(handlers::clinical::delete_treatment_plan),
        )
        .route(
            "/api/documents",
            get(handlers::clinical::list_documents).post(handlers::clinical::create_document),
        )
        .route(
            "/api/documents/:id",
            get(handlers::clinical::get_document)
                .put(handlers::clinical::update_document)
                .delete(handlers::clinical::delete_document),
        )
        .route(
            "/api/communications",
            get(handlers::communications::list_communication_notes)
                .post(handlers::communications::create_communication_note),
        )
        .route(
            "/api/communications/:id",
            get(handlers::communications::get_communication_note)
                .put(handlers::communications::update_communication_note)
                .delete(handlers::communications::delete_communication_note),
        )
        .route("/api/dashboard", get(handlers::dashboard::dashboard))
        .route("/api/overview", get(handlers::overview::overview))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public
        .merge(authenticated)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
