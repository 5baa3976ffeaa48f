use serde_json::{Map, Value};
use tracing::{info, warn};

use super::models::{
    planned_amount, BudgetRowDto, CreateBudgetsResponse, CreatedRecord, RowFailure,
    INVALID_PLANNED, MISSING_CATEGORY,
};
use super::writer::BatchWriter;
use crate::category::{CategoryService, NameIndex};
use crate::config::BudgetFieldNames;
use crate::errors::AppError;
use crate::store::{NewRecord, RecordStore, TableLocation};

/// Tables a budget write touches.
#[derive(Debug, Clone)]
pub struct BudgetTables {
    pub budgets: TableLocation,
    pub categories: TableLocation,
}

/// Rows split into what will be sent and what was rejected up front.
#[derive(Debug, Default, PartialEq)]
pub struct PreparedRows {
    pub records: Vec<NewRecord>,
    pub failures: Vec<RowFailure>,
}

/// Service layer for budget row creation.
pub struct BudgetService;

impl BudgetService {
    /// Resolve categories, reject unusable rows, and write the rest.
    ///
    /// Rejected rows are reported alongside the created records. A failed
    /// create call fails the whole request; records created by earlier calls
    /// are kept in the store.
    pub async fn create_budgets(
        store: &dyn RecordStore,
        tables: &BudgetTables,
        fields: &BudgetFieldNames,
        rows: &[BudgetRowDto],
    ) -> Result<CreateBudgetsResponse, AppError> {
        let index = if rows.iter().any(BudgetRowDto::needs_name_lookup) {
            CategoryService::name_index(store, &tables.categories).await?
        } else {
            NameIndex::default()
        };

        let prepared = Self::prepare(rows, &index, fields);

        let outcome = BatchWriter::new(store, &tables.budgets)
            .write(&prepared.records)
            .await;

        let created = match outcome.into_result() {
            Ok(created) => created,
            Err((err, created)) => {
                let ids: Vec<&str> = created.iter().map(|r| r.id.as_str()).collect();
                warn!(
                    created = created.len(),
                    ids = ?ids,
                    "Budget write aborted; created records were not rolled back"
                );
                return Err(err.into());
            }
        };

        info!(
            rows = rows.len(),
            created = created.len(),
            failed = prepared.failures.len(),
            "Budget rows written"
        );

        Ok(CreateBudgetsResponse {
            created_count: created.len(),
            failed_count: prepared.failures.len(),
            failures: prepared.failures,
            records: created.into_iter().map(CreatedRecord::from).collect(),
        })
    }

    /// Validate every row before anything is sent.
    pub fn prepare(rows: &[BudgetRowDto], index: &NameIndex, fields: &BudgetFieldNames) -> PreparedRows {
        let mut prepared = PreparedRows::default();

        for (i, row) in rows.iter().enumerate() {
            let category_id = row.explicit_category_id().or_else(|| {
                row.category_name()
                    .and_then(|name| index.resolve(&name).map(str::to_string))
            });

            let Some(category_id) = category_id else {
                prepared.failures.push(RowFailure {
                    index: i,
                    reason: MISSING_CATEGORY.to_string(),
                });
                continue;
            };

            let Some(planned) = planned_amount(&row.planned) else {
                prepared.failures.push(RowFailure {
                    index: i,
                    reason: INVALID_PLANNED.to_string(),
                });
                continue;
            };

            let mut record = Map::new();
            if let Some(month) = row.month() {
                record.insert(fields.month.clone(), Value::from(month));
            }
            record.insert(
                fields.category.clone(),
                Value::Array(vec![Value::from(category_id)]),
            );
            record.insert(fields.planned.clone(), serde_json::json!(planned));
            if let Some(notes) = row.notes() {
                record.insert(fields.notes.clone(), Value::from(notes));
            }

            prepared.records.push(NewRecord { fields: record });
        }

        prepared
    }
}
