use secrecy::Secret;
use std::env;

use crate::errors::AppError;
use crate::store::{TableLocation, DEFAULT_API_URL};

pub const DEFAULT_TIME_ZONE: &str = "America/Los_Angeles";

/// Record-store coordinates used when a request does not name its own.
#[derive(Debug, Clone, Default)]
pub struct TableDefaults {
    pub base_id: Option<String>,
    pub transactions_table_id: Option<String>,
    pub categories_table_id: Option<String>,
    pub budgets_table_id: Option<String>,
}

impl TableDefaults {
    /// Build a location from request overrides, falling back to configuration.
    pub fn location(
        &self,
        base_id: Option<&str>,
        table_id: Option<&str>,
        default_table: Option<&str>,
        table_param: &str,
    ) -> Result<TableLocation, AppError> {
        let base = pick(base_id, self.base_id.as_deref(), "baseId")?;
        let table = pick(table_id, default_table, table_param)?;
        Ok(TableLocation::new(base, table))
    }
}

fn pick(requested: Option<&str>, fallback: Option<&str>, param: &str) -> Result<String, AppError> {
    requested
        .filter(|v| !v.is_empty())
        .or(fallback.filter(|v| !v.is_empty()))
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::ConfigurationError(format!(
                "No {param} given and no default configured"
            ))
        })
}

/// Column names written on created budget records.
#[derive(Debug, Clone)]
pub struct BudgetFieldNames {
    pub month: String,
    pub category: String,
    pub planned: String,
    pub notes: String,
}

impl Default for BudgetFieldNames {
    fn default() -> Self {
        Self {
            month: "Month".to_string(),
            category: "Category".to_string(),
            planned: "Planned $".to_string(),
            notes: "Notes".to_string(),
        }
    }
}

/// Per-request configuration shared as app data.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bearer token for the record store; handlers refuse to run without it
    pub airtable_token: Option<Secret<String>>,
    pub airtable_api_url: String,
    /// Shared secret expected in `x-api-key`, when set
    pub api_key: Option<Secret<String>>,
    pub tables: TableDefaults,
    pub default_time_zone: String,
    pub budget_fields: BudgetFieldNames,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            airtable_token: None,
            airtable_api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            tables: TableDefaults::default(),
            default_time_zone: DEFAULT_TIME_ZONE.to_string(),
            budget_fields: BudgetFieldNames::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = AppConfig::default();
        let fields = BudgetFieldNames::default();

        Self {
            airtable_token: non_empty("AIRTABLE_TOKEN").map(Secret::new),
            airtable_api_url: non_empty("AIRTABLE_API_URL").unwrap_or(defaults.airtable_api_url),
            api_key: non_empty("X_API_KEY").map(Secret::new),
            tables: TableDefaults {
                base_id: non_empty("AIRTABLE_BASE_ID"),
                transactions_table_id: non_empty("AIRTABLE_TRANSACTIONS_TABLE_ID"),
                categories_table_id: non_empty("AIRTABLE_CATEGORIES_TABLE_ID"),
                budgets_table_id: non_empty("AIRTABLE_BUDGETS_TABLE_ID"),
            },
            default_time_zone: non_empty("DEFAULT_TIME_ZONE")
                .unwrap_or(defaults.default_time_zone),
            budget_fields: BudgetFieldNames {
                month: non_empty("BUDGET_FIELD_MONTH").unwrap_or(fields.month),
                category: non_empty("BUDGET_FIELD_CATEGORY").unwrap_or(fields.category),
                planned: non_empty("BUDGET_FIELD_PLANNED").unwrap_or(fields.planned),
                notes: non_empty("BUDGET_FIELD_NOTES").unwrap_or(fields.notes),
            },
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
