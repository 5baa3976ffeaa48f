use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{get, http::header, web, App, HttpResponse, HttpServer, Responder};
use dotenvy::dotenv;
use std::env;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use budget_recon::config::AppConfig;
use budget_recon::extractors::API_KEY_HEADER;
use budget_recon::store::{AirtableClient, StoreHandle};
use budget_recon::{api_routes, openapi};

/// Health check endpoint that reports whether the record store is configured
#[get("/health")]
async fn health_check(store: web::Data<StoreHandle>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "store": if store.is_configured() { "configured" } else { "unconfigured" }
    }))
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();

    let store = match &config.airtable_token {
        Some(token) => StoreHandle::connected(Arc::new(AirtableClient::new(
            config.airtable_api_url.clone(),
            token.clone(),
        ))),
        None => {
            warn!("AIRTABLE_TOKEN is not set; /api requests will fail until it is");
            StoreHandle::unconfigured()
        }
    };
    if config.api_key.is_none() {
        warn!("X_API_KEY is not set; /api requests are not authenticated");
    }

    // Get allowed origins from environment (comma-separated), default to localhost
    let allowed_origins =
        env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env_or("PORT", 8080);

    // Every /api request costs at least one record store call
    let per_second: u64 = env_or("RATE_LIMIT_PER_SECOND", 5).max(1);
    let burst: u32 = env_or("RATE_LIMIT_BURST", 10).max(1);
    let governor_config = GovernorConfigBuilder::default()
        .milliseconds_per_request((1000 / per_second).max(1))
        .burst_size(burst)
        .finish()
        .expect("Failed to create rate limiter config");

    info!("Starting server at http://{bind_address}:{port}");

    let config = web::Data::new(config);
    let store = web::Data::new(store);

    HttpServer::new(move || {
        // Clone allowed_origins for this closure invocation
        let allowed_origins = allowed_origins.clone();

        // Configure CORS
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origin_str = origin.to_str().unwrap_or("");
                allowed_origins
                    .split(',')
                    .any(|allowed| allowed.trim() == origin_str)
            })
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                header::CONTENT_TYPE,
                header::HeaderName::from_static(API_KEY_HEADER),
            ])
            .max_age(3600);

        App::new()
            // Middleware (order matters: outer to inner)
            .wrap(TracingLogger::default())
            .wrap(cors)
            // Shared state
            .app_data(config.clone())
            .app_data(store.clone())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
            )
            // Health endpoint (no rate limiting)
            .service(health_check)
            .service(
                web::scope("/api")
                    .wrap(Governor::new(&governor_config))
                    .configure(api_routes),
            )
    })
    .bind((bind_address.as_str(), port))?
    .run()
    .await
}
