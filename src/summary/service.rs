use tracing::info;

use super::aggregate::{aggregate, referenced_ids};
use super::models::SummaryResponse;
use crate::category::CategoryService;
use crate::errors::AppError;
use crate::store::{formula, ListQuery, Paginator, RecordStore, TableLocation};

/// Locale transaction cells are rendered in.
const TRANSACTION_LOCALE: &str = "en-us";

/// Everything one summary run needs, resolved from the request.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub month: String,
    pub time_zone: String,
    pub transactions: TableLocation,
    pub categories: TableLocation,
}

/// Service layer for monthly spend summaries.
pub struct SummaryService;

impl SummaryService {
    /// Page in the month's transactions, resolve the categories they
    /// reference, then total them.
    pub async fn summarize(
        store: &dyn RecordStore,
        request: &SummaryRequest,
    ) -> Result<SummaryResponse, AppError> {
        let query = ListQuery::default()
            .json_cells(TRANSACTION_LOCALE)
            .in_time_zone(request.time_zone.as_str())
            .with_filter(formula::month_filter(&request.month));

        let fetched = Paginator::new(store, &request.transactions, &query)
            .collect_all()
            .await?;

        let ids = referenced_ids(&fetched.records);
        let names = CategoryService::display_names(store, &request.categories, &ids).await?;

        let aggregation = aggregate(&fetched.records, &names);

        info!(
            month = %request.month,
            transactions = aggregation.count,
            categories = aggregation.buckets.len(),
            pages = fetched.pages,
            "Month summarized"
        );

        Ok(SummaryResponse::new(
            &request.month,
            aggregation,
            fetched.pages,
        ))
    }
}
