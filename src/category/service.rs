use tracing::{debug, info};

use super::models::{DisplayNames, NameIndex};
use crate::store::{
    formula, ListQuery, Paginator, RecordStore, StoreError, TableLocation, RECORD_ID_BATCH,
};

/// Locale the full category scan is rendered in.
const SCAN_LOCALE: &str = "en-us";

/// Resolves category names and ids against the category table.
///
/// Both lookups are built completely before the caller uses them, and live
/// only for the request that built them.
pub struct CategoryService;

impl CategoryService {
    /// Scan the whole category table once into a name → id index.
    pub async fn name_index(
        store: &dyn RecordStore,
        categories: &TableLocation,
    ) -> Result<NameIndex, StoreError> {
        let query = ListQuery::default().json_cells(SCAN_LOCALE);
        let scanned = Paginator::new(store, categories, &query)
            .collect_all()
            .await?;

        let index: NameIndex = scanned.records.iter().collect();

        info!(
            categories = scanned.records.len(),
            names = index.len(),
            pages = scanned.pages,
            "Category name index built"
        );

        Ok(index)
    }

    /// Fetch display names for just the given ids.
    ///
    /// Ids go out in batches of [`RECORD_ID_BATCH`], one batch at a time.
    /// Ids the table does not know are simply absent from the result.
    pub async fn display_names(
        store: &dyn RecordStore,
        categories: &TableLocation,
        ids: &[String],
    ) -> Result<DisplayNames, StoreError> {
        let mut names = DisplayNames::default();

        for (batch_no, batch) in ids.chunks(RECORD_ID_BATCH).enumerate() {
            let query = ListQuery::default().with_filter(formula::record_id_filter(batch));
            let fetched = Paginator::new(store, categories, &query)
                .collect_all()
                .await?;

            debug!(
                batch = batch_no,
                requested = batch.len(),
                found = fetched.records.len(),
                "Category batch resolved"
            );

            for record in &fetched.records {
                names.insert(record);
            }
        }

        Ok(names)
    }
}
