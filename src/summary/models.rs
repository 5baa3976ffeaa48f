use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::aggregate::{Aggregation, Bucket};
use crate::errors::AppError;

lazy_static! {
    /// Month parameter format: `YYYY-MM`
    static ref MONTH_PATTERN: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}$").unwrap();
}

const INVALID_MONTH: &str = "Missing or invalid month (YYYY-MM)";

/// Query parameters for a monthly summary
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// Month to summarize
    #[validate(
        required(message = "Missing or invalid month (YYYY-MM)"),
        regex(path = *MONTH_PATTERN, message = "Missing or invalid month (YYYY-MM)")
    )]
    #[param(example = "2025-10")]
    pub month: Option<String>,
    /// Time zone the store evaluates `Date` in
    #[param(example = "America/Los_Angeles")]
    pub time_zone: Option<String>,
    /// Base holding the tables (defaults to configuration)
    pub base_id: Option<String>,
    /// Transactions table (defaults to configuration)
    pub table_id: Option<String>,
    /// Categories table (defaults to configuration)
    pub categories_table_id: Option<String>,
}

impl SummaryQuery {
    /// The validated `YYYY-MM` month.
    pub fn month(&self) -> Result<&str, AppError> {
        self.validate()
            .map_err(|_| AppError::ValidationError(INVALID_MONTH.to_string()))?;
        self.month
            .as_deref()
            .ok_or_else(|| AppError::ValidationError(INVALID_MONTH.to_string()))
    }
}

/// Spend for one category
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryTotal {
    /// Category display name, raw id, or "(Uncategorized)"
    #[schema(example = "Travel")]
    pub name: String,
    /// Transactions that referenced the category
    #[schema(example = 1)]
    pub count: usize,
    #[schema(example = 100.00)]
    pub total: Decimal,
}

impl From<Bucket> for CategoryTotal {
    fn from(bucket: Bucket) -> Self {
        Self {
            name: bucket.name,
            count: bucket.count,
            total: bucket.total.to_decimal(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryDebug {
    /// Page requests made against the transactions table
    #[schema(example = 1)]
    pub pages: usize,
}

/// Monthly spend summary
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    #[schema(example = "2025-10")]
    pub month: String,
    /// Transactions in the month
    #[schema(example = 2)]
    pub count: usize,
    /// Grand total, each transaction counted once
    #[schema(example = 150.25)]
    pub total: Decimal,
    /// Per-category totals in first-seen order
    pub by_category: Vec<CategoryTotal>,
    pub debug: SummaryDebug,
}

impl SummaryResponse {
    pub fn new(month: &str, aggregation: Aggregation, pages: usize) -> Self {
        Self {
            month: month.to_string(),
            count: aggregation.count,
            total: aggregation.total.to_decimal(),
            by_category: aggregation
                .buckets
                .into_iter()
                .map(CategoryTotal::from)
                .collect(),
            debug: SummaryDebug { pages },
        }
    }
}
