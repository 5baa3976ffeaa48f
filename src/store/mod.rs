//! Access to the remote tabular record store.
//!
//! Everything above this module talks to the store through the
//! [`RecordStore`] trait, so the pipelines can run against the real HTTP
//! client or a scripted fake in tests.

mod client;
pub mod formula;
mod models;
mod paginator;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::AppError;

pub use client::{AirtableClient, DEFAULT_API_URL};
pub use models::{cell_text, ListQuery, NewRecord, RecordPage, StoreRecord, TableLocation};
pub use paginator::{Paginated, Paginator};

/// Largest page the store will return for a list call.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Largest number of records the store accepts in one create call.
pub const CREATE_BATCH_LIMIT: usize = 10;

/// Record ids per membership filter, bounded by the store's formula length.
pub const RECORD_ID_BATCH: usize = 50;

/// Failure of a single call against the record store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The request never produced a response.
    Transport(String),
    /// The store answered with a non-success status.
    Remote { status: u16, message: String },
    /// The store answered, but the body was not what we expected.
    Decode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Transport(msg) => write!(f, "Record store unreachable: {msg}"),
            StoreError::Remote { message, .. } => write!(f, "{message}"),
            StoreError::Decode(msg) => write!(f, "Unexpected record store response: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// The two primitives every pipeline is built from.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch one page of a filtered list, continuing from `offset` if given.
    async fn list_page(
        &self,
        location: &TableLocation,
        query: &ListQuery,
        offset: Option<&str>,
    ) -> Result<RecordPage, StoreError>;

    /// Create up to [`CREATE_BATCH_LIMIT`] records in a single call.
    async fn create_records(
        &self,
        location: &TableLocation,
        records: &[NewRecord],
        typecast: bool,
    ) -> Result<Vec<StoreRecord>, StoreError>;
}

/// Shared app data slot for the store.
///
/// The store is optional at startup: a missing credential is reported per
/// request as a configuration error rather than refusing to boot.
#[derive(Clone)]
pub struct StoreHandle(Option<Arc<dyn RecordStore>>);

impl StoreHandle {
    pub fn connected(store: Arc<dyn RecordStore>) -> Self {
        Self(Some(store))
    }

    pub fn unconfigured() -> Self {
        Self(None)
    }

    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    /// Borrow the store, or fail with the configuration error clients see.
    pub fn get(&self) -> Result<&dyn RecordStore, AppError> {
        self.0.as_deref().ok_or_else(|| {
            AppError::ConfigurationError("Missing Airtable token env var".to_string())
        })
    }
}
