//! Disease Risk Prediction API Server
//!
//! REST surface over the prediction pipeline and the user store:
//! registration, login with bearer-token sessions, and per-disease risk
//! predictions backed by serialized model artifacts.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod routes;
mod session;
mod settings;

pub use error::ApiError;
pub use session::SessionStore;
pub use settings::{
    AppConfig, ArtifactConfig, DatabaseConfig, DiseaseArtifacts, ServerConfig,
};

use model_artifacts::ArtifactCache;
use notifier::Notifier;
use user_store::UserStore;

/// Application state shared across handlers
pub struct AppState {
    /// Resolved configuration
    pub settings: AppConfig,
    /// Process-lifetime cache of loaded model bundles
    pub artifacts: ArtifactCache,
    /// User registry
    pub users: UserStore,
    /// Active session tokens
    pub sessions: SessionStore,
    /// Welcome-email sender
    pub notifier: Notifier,
    /// Start time
    pub start_time: Instant,
}

/// Shared handle to the application state
pub type SharedState = Arc<AppState>;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub cached_bundles: usize,
    pub registered_users: i64,
}

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/diseases", get(routes::diseases::list))
        .route("/api/v1/auth/register", post(routes::auth::register))
        .route("/api/v1/auth/login", post(routes::auth::login))
        .route("/api/v1/auth/logout", post(routes::auth::logout))
        .route("/api/v1/predict/:disease", post(routes::predict::predict))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(
    State(state): State<SharedState>,
) -> Result<Json<HealthResponse>, ApiError> {
    let registered_users = state.users.user_count().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        cached_bundles: state.artifacts.len().await,
        registered_users,
    }))
}

/// Initialize logging
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Build the shared state from resolved configuration
pub async fn build_state(settings: AppConfig) -> anyhow::Result<SharedState> {
    let users = UserStore::connect(&settings.database.url).await?;

    let notifier = match &settings.smtp {
        Some(smtp) => Notifier::from_config(smtp)?,
        None => Notifier::disabled(),
    };
    if !notifier.is_enabled() {
        info!("smtp not configured; welcome emails disabled");
    }

    Ok(Arc::new(AppState {
        settings,
        artifacts: ArtifactCache::new(),
        users,
        sessions: SessionStore::new(),
        notifier,
        start_time: Instant::now(),
    }))
}

/// Run the server
pub async fn run_server(settings: AppConfig) -> anyhow::Result<()> {
    let bind_addr = settings.server.bind_addr.clone();
    let state = build_state(settings).await?;
    let app = create_router(state);

    info!("starting API server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn write_artifacts(dir: &Path) -> ArtifactConfig {
        // Coefficients and scaler statistics in the diabetes schema's
        // training order: pregnancies, glucose, blood_pressure,
        // skin_thickness, insulin, bmi, diabetes_pedigree_function, age.
        let diabetes_model = write(
            dir,
            "diabetes_model.json",
            r#"{"kind":"logistic_regression",
                "coefficients":[0.4,1.1,-0.2,0.05,-0.1,0.7,0.3,0.4],
                "intercept":-0.8}"#,
        );
        let diabetes_scaler = write(
            dir,
            "diabetes_scaler.json",
            r#"{"mean":[4.0,120.0,70.0,20.0,80.0,32.0,0.47,33.0],
                "scale":[3.0,30.0,19.0,16.0,115.0,7.0,0.33,12.0]}"#,
        );

        let heart_model = write(
            dir,
            "heart_model.json",
            r#"{"kind":"logistic_regression",
                "coefficients":[0.1,0.1,0.1,0.1,0.1,0.1,0.1,0.1,0.1,0.1,0.1,0.1,0.1],
                "intercept":-1.0}"#,
        );
        let heart_scaler = write(
            dir,
            "heart_scaler.json",
            r#"{"mean":[0,0,0,0,0,0,0,0,0,0,0,0,0],
                "scale":[1,1,1,1,1,1,1,1,1,1,1,1,1]}"#,
        );
        let heart_imputer = write(
            dir,
            "heart_imputer.json",
            r#"{"statistics":[0,0,0,0,0,0,0,0,0,0,0,0,0]}"#,
        );

        let parkinsons_model = write(
            dir,
            "parkinsons_model.json",
            r#"{"kind":"logistic_regression",
                "coefficients":[0.01,0.01,0.01],
                "intercept":-2.0}"#,
        );
        let parkinsons_scaler = write(
            dir,
            "parkinsons_scaler.json",
            r#"{"mean":[0,0,0],"scale":[1,1,1]}"#,
        );
        let parkinsons_names = write(
            dir,
            "parkinsons_feature_names.json",
            r#"["MDVP:Fo(Hz)","MDVP:Fhi(Hz)","MDVP:Flo(Hz)"]"#,
        );

        ArtifactConfig {
            diabetes: DiseaseArtifacts {
                model: diabetes_model,
                scaler: Some(diabetes_scaler),
                imputer: None,
                feature_names: None,
            },
            heart_disease: DiseaseArtifacts {
                model: heart_model,
                scaler: Some(heart_scaler),
                imputer: Some(heart_imputer),
                feature_names: None,
            },
            parkinsons: DiseaseArtifacts {
                model: parkinsons_model,
                scaler: Some(parkinsons_scaler),
                imputer: None,
                feature_names: Some(parkinsons_names),
            },
        }
    }

    async fn test_app(artifacts: ArtifactConfig) -> Router {
        let settings = AppConfig {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
            },
            artifacts,
            smtp: None,
        };
        create_router(build_state(settings).await.unwrap())
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn login_token(app: &Router) -> String {
        let (status, _) = send(
            app,
            request(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "username": "alice",
                    "email": "alice@example.com",
                    "password": "secret1"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            app,
            request(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(json!({"username": "alice", "password": "secret1"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    fn diabetes_fields() -> Value {
        json!({
            "pregnancies": 0.0,
            "glucose": 100.0,
            "blood_pressure": 70.0,
            "skin_thickness": 20.0,
            "insulin": 80.0,
            "bmi": 30.0,
            "diabetes_pedigree_function": 0.5,
            "age": 30.0
        })
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let app = test_app(write_artifacts(dir.path())).await;

        let (status, body) = send(&app, request("GET", "/api/v1/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["registered_users"], 0);
    }

    #[tokio::test]
    async fn test_register_login_predict_flow() {
        let dir = TempDir::new().unwrap();
        let app = test_app(write_artifacts(dir.path())).await;
        let token = login_token(&app).await;

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/predict/diabetes",
                Some(&token),
                Some(json!({"fields": diabetes_fields()})),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["predicted_class"], 0);
        assert_eq!(body["risk_label"], "Not Diabetic");
        assert_eq!(body["severity"], "low");
        let confidence = body["confidence_percent"].as_f64().unwrap();
        assert!((50.0..=100.0).contains(&confidence));

        // Same artifacts, same input: identical result.
        let (_, again) = send(
            &app,
            request(
                "POST",
                "/api/v1/predict/diabetes",
                Some(&token),
                Some(json!({"fields": diabetes_fields()})),
            ),
        )
        .await;
        assert_eq!(body, again);
    }

    #[tokio::test]
    async fn test_heart_disease_at_risk_path() {
        let dir = TempDir::new().unwrap();
        let app = test_app(write_artifacts(dir.path())).await;
        let token = login_token(&app).await;

        let fields = json!({
            "age": 50.0, "sex": 1.0, "chest_pain_type": 0.0,
            "resting_bp": 120.0, "cholesterol": 200.0,
            "fasting_blood_sugar": 0.0, "resting_ecg": 0.0,
            "max_heart_rate": 150.0, "exercise_induced_angina": 0.0,
            "st_depression": 1.0, "st_slope": 0.0,
            "major_vessels_blocked": 0.0, "thalassemia_result": 2.0
        });

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/predict/heart-disease",
                Some(&token),
                Some(json!({"fields": fields})),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["predicted_class"], 1);
        assert_eq!(body["risk_label"], "High Risk (Heart Disease)");
        assert_eq!(body["severity"], "elevated");
        assert!(body["guidance"].as_str().unwrap().contains("cardiologist"));
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let dir = TempDir::new().unwrap();
        let app = test_app(write_artifacts(dir.path())).await;

        let alice = json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "secret1"
        });
        let (status, body) = send(
            &app,
            request("POST", "/api/v1/auth/register", None, Some(alice.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email_sent"], false);

        let (status, body) = send(
            &app,
            request("POST", "/api/v1/auth/register", None, Some(alice)),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "duplicate_user");

        // Same email under a different username conflicts too.
        let (status, _) = send(
            &app,
            request(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "username": "bob",
                    "email": "alice@example.com",
                    "password": "secret2"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let dir = TempDir::new().unwrap();
        let app = test_app(write_artifacts(dir.path())).await;
        login_token(&app).await;

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(json!({"username": "alice", "password": "wrong1"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "auth_failure");
    }

    #[tokio::test]
    async fn test_predict_requires_session() {
        let dir = TempDir::new().unwrap();
        let app = test_app(write_artifacts(dir.path())).await;

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/predict/diabetes",
                None,
                Some(json!({"fields": diabetes_fields()})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");
    }

    #[tokio::test]
    async fn test_logout_revokes_session() {
        let dir = TempDir::new().unwrap();
        let app = test_app(write_artifacts(dir.path())).await;
        let token = login_token(&app).await;

        let (status, _) = send(
            &app,
            request("POST", "/api/v1/auth/logout", Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(
            &app,
            request(
                "POST",
                "/api/v1/predict/diabetes",
                Some(&token),
                Some(json!({"fields": diabetes_fields()})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_disease_rejected() {
        let dir = TempDir::new().unwrap();
        let app = test_app(write_artifacts(dir.path())).await;
        let token = login_token(&app).await;

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/predict/gout",
                Some(&token),
                Some(json!({"fields": {}})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "unknown_disease");
    }

    #[tokio::test]
    async fn test_negative_field_rejected() {
        let dir = TempDir::new().unwrap();
        let app = test_app(write_artifacts(dir.path())).await;
        let token = login_token(&app).await;

        let mut fields = diabetes_fields();
        fields["glucose"] = json!(-1.0);

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/predict/diabetes",
                Some(&token),
                Some(json!({"fields": fields})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_parkinsons_schema_and_all_zero_rule() {
        let dir = TempDir::new().unwrap();
        let app = test_app(write_artifacts(dir.path())).await;
        let token = login_token(&app).await;

        // The listing serves the schema straight from the artifact.
        let (status, body) = send(&app, request("GET", "/api/v1/diseases", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        let parkinsons = body
            .as_array()
            .unwrap()
            .iter()
            .find(|d| d["disease"] == "parkinsons")
            .unwrap()
            .clone();
        assert_eq!(parkinsons["fields"].as_array().unwrap().len(), 3);

        let zeros = json!({
            "MDVP:Fo(Hz)": 0.0, "MDVP:Fhi(Hz)": 0.0, "MDVP:Flo(Hz)": 0.0
        });
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/predict/parkinsons",
                Some(&token),
                Some(json!({"fields": zeros})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "invalid_input");

        let voiced = json!({
            "MDVP:Fo(Hz)": 119.992, "MDVP:Fhi(Hz)": 157.302, "MDVP:Flo(Hz)": 74.997
        });
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/predict/parkinsons",
                Some(&token),
                Some(json!({"fields": voiced})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["predicted_class"].is_number());
    }

    #[tokio::test]
    async fn test_missing_artifact_is_service_unavailable() {
        let dir = TempDir::new().unwrap();
        let mut artifacts = write_artifacts(dir.path());
        artifacts.diabetes.model = dir.path().join("absent_model.json");
        let app = test_app(artifacts).await;
        let token = login_token(&app).await;

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/predict/diabetes",
                Some(&token),
                Some(json!({"fields": diabetes_fields()})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "missing_artifact");
    }

    #[tokio::test]
    async fn test_corrupt_artifact_is_service_unavailable() {
        let dir = TempDir::new().unwrap();
        let mut artifacts = write_artifacts(dir.path());
        artifacts.diabetes.model = write(dir.path(), "broken_model.json", "{ definitely not json");
        let app = test_app(artifacts).await;
        let token = login_token(&app).await;

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/predict/diabetes",
                Some(&token),
                Some(json!({"fields": diabetes_fields()})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "corrupt_artifact");
    }

    #[tokio::test]
    async fn test_schema_drift_is_distinct_server_error() {
        let dir = TempDir::new().unwrap();
        let mut artifacts = write_artifacts(dir.path());
        // A scaler trained on a different width than the model's schema.
        artifacts.diabetes.scaler = Some(write(
            dir.path(),
            "drifted_scaler.json",
            r#"{"mean":[0,0,0],"scale":[1,1,1]}"#,
        ));
        let app = test_app(artifacts).await;
        let token = login_token(&app).await;

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/predict/diabetes",
                Some(&token),
                Some(json!({"fields": diabetes_fields()})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "schema_mismatch");
    }
}
