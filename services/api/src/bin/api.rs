//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{BunnyVideoAdapter, DbAdapter, DemoAdapter, DemoVideoService},
    config::{BackendMode, Config},
    error::ApiError,
    web::{
        auth::{login_handler, logout_handler, signup_handler},
        middleware::require_auth,
        rest::{
            add_lesson_handler, complete_lesson_handler, create_course_handler,
            create_video_handler, delete_course_handler, delete_lesson_handler,
            enroll_handler, get_course_handler, get_lesson_handler, get_profile_handler,
            list_courses_handler, list_enrollments_handler, list_trainer_courses_handler,
            publish_course_handler, trainer_stats_handler, unpublish_course_handler,
            update_course_handler, update_profile_handler, upload_video_handler,
        },
        ApiDoc, AppState,
    },
};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use course_market_core::ports::{DataService, VideoService};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Select and Build the Backend ---
    // The one place the backend mode is branched on. Everything downstream
    // sees `Arc<dyn DataService>` and `Arc<dyn VideoService>` only.
    let (data, video): (Arc<dyn DataService>, Arc<dyn VideoService>) = match config.backend {
        BackendMode::Live => {
            let database_url = config
                .database_url
                .as_ref()
                .ok_or_else(|| ApiError::Internal("DATABASE_URL is required".to_string()))?;
            info!("Backend mode: live. Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let db_adapter = Arc::new(DbAdapter::new(db_pool));
            info!("Running database migrations...");
            db_adapter.run_migrations().await?;
            info!("Database migrations complete.");

            let library_id = config
                .bunny_library_id
                .clone()
                .ok_or_else(|| ApiError::Internal("BUNNY_LIBRARY_ID is required".to_string()))?;
            let api_key = config
                .bunny_api_key
                .clone()
                .ok_or_else(|| ApiError::Internal("BUNNY_API_KEY is required".to_string()))?;
            let video_adapter = Arc::new(BunnyVideoAdapter::new(
                config.bunny_base_url.clone(),
                library_id,
                api_key,
            ));
            (db_adapter, video_adapter)
        }
        BackendMode::Demo => {
            info!("Backend mode: demo. Seeding in-memory data...");
            let demo_adapter = Arc::new(DemoAdapter::seeded(config.demo_latency)?);
            let video_adapter = Arc::new(DemoVideoService::new(config.demo_latency));
            info!(
                "Demo accounts ready: trainer@demo.test / learner@demo.test (password: demo123)"
            );
            (demo_adapter, video_adapter)
        }
    };

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        data,
        video,
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(
            "http://localhost:3000"
                .parse::<HeaderValue>()
                .map_err(|e| ApiError::Internal(e.to_string()))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/courses", get(list_courses_handler).post(create_course_handler))
        .route(
            "/courses/{id}",
            get(get_course_handler)
                .patch(update_course_handler)
                .delete(delete_course_handler),
        )
        .route("/courses/{id}/publish", post(publish_course_handler))
        .route("/courses/{id}/unpublish", post(unpublish_course_handler))
        .route("/courses/{id}/lessons", post(add_lesson_handler))
        .route(
            "/lessons/{id}",
            get(get_lesson_handler).delete(delete_lesson_handler),
        )
        .route("/enrollments", get(list_enrollments_handler).post(enroll_handler))
        .route(
            "/enrollments/{enrollment_id}/lessons/{lesson_id}/complete",
            post(complete_lesson_handler),
        )
        .route("/trainer/stats", get(trainer_stats_handler))
        .route("/trainer/courses", get(list_trainer_courses_handler))
        .route(
            "/profile",
            get(get_profile_handler).patch(update_profile_handler),
        )
        .route("/videos", post(create_video_handler))
        .route("/videos/{id}", put(upload_video_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(500 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
