use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::budget::models::{
    BudgetRowDto, CreateBudgetsDto, CreateBudgetsResponse, CreatedRecord, RowFailure,
};
use crate::errors::ErrorResponse;
use crate::extractors::API_KEY_HEADER;
use crate::summary::models::{CategoryTotal, SummaryDebug, SummaryResponse};

/// Security scheme modifier for the shared-secret header
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    API_KEY_HEADER,
                    "Shared secret, required only when the server sets X_API_KEY",
                ))),
            );
        }
    }
}

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Budget Recon API",
        version = "1.0.0",
        description = "Monthly spend summaries and budget entry over an Airtable base",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "Summary", description = "Read path: monthly spend per category"),
        (name = "Budgets", description = "Write path: planned budget rows")
    ),
    paths(
        crate::summary::handlers::summarize,
        crate::budget::handlers::create_budgets,
    ),
    components(
        schemas(
            ErrorResponse,
            // Summary schemas
            SummaryResponse,
            CategoryTotal,
            SummaryDebug,
            // Budget schemas
            CreateBudgetsDto,
            BudgetRowDto,
            CreateBudgetsResponse,
            RowFailure,
            CreatedRecord,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;
