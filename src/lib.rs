pub mod budget;
pub mod category;
pub mod config;
pub mod errors;
pub mod extractors;
pub mod openapi;
pub mod store;
pub mod summary;

use actix_web::web;

use errors::AppError;

/// Register the `/api` routes on a scope.
///
/// Each handler is followed by a catch-all resource on the same path, so a
/// wrong method gets 405 instead of falling through to 404.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| reject("Invalid JSON body", err).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| reject("Invalid query string", err).into()),
    )
    .service(summary::summarize)
    .route(
        "/summarize",
        web::route().to(summary::summarize_method_not_allowed),
    )
    .service(budget::create_budgets)
    .route(
        "/budgets",
        web::route().to(budget::budgets_method_not_allowed),
    );
}

fn reject(what: &str, err: impl std::fmt::Display) -> AppError {
    AppError::ValidationError(format!("{what}: {err}"))
}
