use actix_web::{get, web, HttpResponse};

use crate::config::AppConfig;
use crate::errors::{AppError, ErrorResponse};
use crate::extractors::ApiKeyGuard;
use crate::store::StoreHandle;

use super::models::{SummaryQuery, SummaryResponse};
use super::service::{SummaryRequest, SummaryService};

/// GET /summarize - Spend per category for one month
#[utoipa::path(
    get,
    context_path = "/api",
    tag = "Summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Monthly summary", body = SummaryResponse),
        (status = 400, description = "Missing or invalid month", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Configuration or record store failure", body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
#[get("/summarize")]
pub async fn summarize(
    _guard: ApiKeyGuard,
    config: web::Data<AppConfig>,
    store: web::Data<StoreHandle>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, AppError> {
    let month = query.month()?.to_string();
    let store = store.get()?;

    let tables = &config.tables;
    let request = SummaryRequest {
        month,
        time_zone: query
            .time_zone
            .clone()
            .filter(|tz| !tz.is_empty())
            .unwrap_or_else(|| config.default_time_zone.clone()),
        transactions: tables.location(
            query.base_id.as_deref(),
            query.table_id.as_deref(),
            tables.transactions_table_id.as_deref(),
            "tableId",
        )?,
        categories: tables.location(
            query.base_id.as_deref(),
            query.categories_table_id.as_deref(),
            tables.categories_table_id.as_deref(),
            "categoriesTableId",
        )?,
    };

    let response = SummaryService::summarize(store, &request).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Any other method on /summarize
pub async fn summarize_method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed("GET"))
}
