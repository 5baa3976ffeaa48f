use tracing::debug;

use super::{ListQuery, RecordStore, StoreError, StoreRecord, TableLocation};

/// Every record of a list, plus how many page requests it took.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paginated {
    pub records: Vec<StoreRecord>,
    pub pages: usize,
}

/// Walks a filtered list one page per call, following continuation tokens.
///
/// A page is only requested once the previous page's token is known, and the
/// walk ends after the first page that carries no token.
pub struct Paginator<'a> {
    store: &'a dyn RecordStore,
    location: &'a TableLocation,
    query: &'a ListQuery,
    offset: Option<String>,
    pages: usize,
    done: bool,
}

impl<'a> Paginator<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        location: &'a TableLocation,
        query: &'a ListQuery,
    ) -> Self {
        Self {
            store,
            location,
            query,
            offset: None,
            pages: 0,
            done: false,
        }
    }

    /// Page requests issued so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Fetch the next page, or `None` once the list is exhausted.
    ///
    /// A failed request ends the walk; nothing fetched so far is kept.
    pub async fn next_page(&mut self) -> Result<Option<Vec<StoreRecord>>, StoreError> {
        if self.done {
            return Ok(None);
        }

        let result = self
            .store
            .list_page(self.location, self.query, self.offset.as_deref())
            .await;
        self.pages += 1;

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                self.done = true;
                return Err(err);
            }
        };

        self.offset = page.offset;
        self.done = self.offset.is_none();
        Ok(Some(page.records))
    }

    /// Drain every remaining page.
    pub async fn collect_all(mut self) -> Result<Paginated, StoreError> {
        let mut records = Vec::new();
        while let Some(page) = self.next_page().await? {
            records.extend(page);
        }

        debug!(
            table = %self.location.table_id,
            pages = self.pages,
            records = records.len(),
            "Pagination finished"
        );

        Ok(Paginated {
            records,
            pages: self.pages,
        })
    }
}
