use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::config::AppConfig;
use crate::errors::{AppError, ErrorResponse};
use crate::extractors::ApiKeyGuard;
use crate::store::StoreHandle;

use super::models::{BudgetsQuery, CreateBudgetsDto, CreateBudgetsResponse};
use super::service::{BudgetService, BudgetTables};

/// POST /budgets - Create planned budget rows
#[utoipa::path(
    post,
    context_path = "/api",
    tag = "Budgets",
    params(BudgetsQuery),
    request_body = CreateBudgetsDto,
    responses(
        (status = 200, description = "Rows created; rejected rows listed in failures", body = CreateBudgetsResponse),
        (status = 400, description = "Malformed body or empty rows", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Configuration or record store failure", body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
#[post("/budgets")]
pub async fn create_budgets(
    _guard: ApiKeyGuard,
    config: web::Data<AppConfig>,
    store: web::Data<StoreHandle>,
    query: web::Query<BudgetsQuery>,
    body: web::Json<CreateBudgetsDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(validation_message(&e)))?;

    let store = store.get()?;

    let defaults = &config.tables;
    let tables = BudgetTables {
        budgets: defaults.location(
            query.base_id.as_deref(),
            query.budgets_table_id.as_deref(),
            defaults.budgets_table_id.as_deref(),
            "budgetsTableId",
        )?,
        categories: defaults.location(
            query.base_id.as_deref(),
            query.categories_table_id.as_deref(),
            defaults.categories_table_id.as_deref(),
            "categoriesTableId",
        )?,
    };

    let response =
        BudgetService::create_budgets(store, &tables, &config.budget_fields, &body.rows).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Any other method on /budgets
pub async fn budgets_method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed("POST"))
}

// Field-level messages only; the derive's default rendering prefixes the field path
fn validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .next()
        .unwrap_or_else(|| errors.to_string())
}
