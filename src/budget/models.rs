use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::store::{cell_text, StoreRecord};

pub const MISSING_CATEGORY: &str = "Missing CategoryId/CategoryName or not found";
pub const INVALID_PLANNED: &str = "Invalid Planned value";

/// Request body for creating budget rows
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBudgetsDto {
    /// Rows to create, in order
    #[serde(default)]
    #[validate(length(min = 1, message = "Body must include non-empty rows[]"))]
    pub rows: Vec<BudgetRowDto>,
}

/// One budget row as entered by a person
///
/// Text fields accept any JSON scalar and are read as text, so one odd row
/// becomes a row failure instead of rejecting the whole body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct BudgetRowDto {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "2025-10")]
    pub month: Value,
    /// Category record id; wins over `CategoryName`
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "recA1b2C3d4E5f6G7")]
    pub category_id: Value,
    /// Category name, matched case-insensitively
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Travel")]
    pub category_name: Value,
    /// Planned amount; empty means 0
    #[serde(default)]
    #[schema(value_type = Option<f64>, example = 800)]
    pub planned: Value,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Flights for the conference")]
    pub notes: Value,
}

impl BudgetRowDto {
    pub fn month(&self) -> Option<String> {
        cell_text(&self.month)
    }

    /// The explicit category id, when one was given.
    pub fn explicit_category_id(&self) -> Option<String> {
        non_empty_text(&self.category_id)
    }

    pub fn category_name(&self) -> Option<String> {
        non_empty_text(&self.category_name)
    }

    /// Notes, unless blank, `false` or zero.
    pub fn notes(&self) -> Option<String> {
        match &self.notes {
            Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            other => non_empty_text(other),
        }
    }

    /// Whether the row can only be resolved through the category name index.
    pub fn needs_name_lookup(&self) -> bool {
        self.explicit_category_id().is_none() && self.category_name().is_some()
    }
}

fn non_empty_text(value: &Value) -> Option<String> {
    cell_text(value).filter(|text| !text.is_empty())
}

/// Coerce a `Planned` cell to a number.
///
/// Empty values are 0; numbers and numeric strings are taken as written.
pub fn planned_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Null => Some(Decimal::ZERO),
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) if s.trim().is_empty() => Some(Decimal::ZERO),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Query parameters naming the tables a budget write goes to
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BudgetsQuery {
    /// Base holding the tables (defaults to configuration)
    pub base_id: Option<String>,
    /// Budgets table (defaults to configuration)
    pub budgets_table_id: Option<String>,
    /// Categories table (defaults to configuration)
    pub categories_table_id: Option<String>,
}

/// A row that was rejected before reaching the store
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RowFailure {
    /// Position of the row in the request
    #[schema(example = 1)]
    pub index: usize,
    #[schema(example = "Missing CategoryId/CategoryName or not found")]
    pub reason: String,
}

/// A record the store created
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedRecord {
    #[schema(example = "recN3wB5dg3tR0w1")]
    pub id: String,
    #[schema(value_type = Object)]
    pub fields: Map<String, Value>,
}

impl From<StoreRecord> for CreatedRecord {
    fn from(record: StoreRecord) -> Self {
        Self {
            id: record.id,
            fields: record.fields,
        }
    }
}

/// Outcome of a budget write
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBudgetsResponse {
    #[schema(example = 1)]
    pub created_count: usize,
    #[schema(example = 1)]
    pub failed_count: usize,
    pub failures: Vec<RowFailure>,
    pub records: Vec<CreatedRecord>,
}
