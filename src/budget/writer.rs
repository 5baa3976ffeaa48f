use tracing::{debug, warn};

use crate::store::{
    NewRecord, RecordStore, StoreError, StoreRecord, TableLocation, CREATE_BATCH_LIMIT,
};

/// What a write run achieved.
///
/// When `aborted` is set, `created` holds only what earlier chunks created;
/// those records stay in the store.
#[derive(Debug, Default, PartialEq)]
pub struct WriteOutcome {
    pub created: Vec<StoreRecord>,
    /// Create calls issued, the failing one included
    pub calls: usize,
    pub aborted: Option<StoreError>,
}

impl WriteOutcome {
    pub fn is_done(&self) -> bool {
        self.aborted.is_none()
    }

    /// Split into the created records or the error that stopped the run.
    pub fn into_result(self) -> Result<Vec<StoreRecord>, (StoreError, Vec<StoreRecord>)> {
        match self.aborted {
            None => Ok(self.created),
            Some(err) => Err((err, self.created)),
        }
    }
}

/// Writes records in chunks, one create call at a time.
pub struct BatchWriter<'a> {
    store: &'a dyn RecordStore,
    location: &'a TableLocation,
    chunk_size: usize,
}

impl<'a> BatchWriter<'a> {
    pub fn new(store: &'a dyn RecordStore, location: &'a TableLocation) -> Self {
        Self {
            store,
            location,
            chunk_size: CREATE_BATCH_LIMIT,
        }
    }

    /// Create every record, in order. The first failing chunk stops the run.
    pub async fn write(&self, records: &[NewRecord]) -> WriteOutcome {
        let chunks: Vec<&[NewRecord]> = records.chunks(self.chunk_size).collect();
        let mut outcome = WriteOutcome::default();

        for (i, chunk) in chunks.iter().enumerate() {
            debug!(chunk = i + 1, of = chunks.len(), size = chunk.len(), "Writing chunk");
            outcome.calls += 1;

            match self.store.create_records(self.location, chunk, true).await {
                Ok(created) => outcome.created.extend(created),
                Err(err) => {
                    warn!(
                        chunk = i + 1,
                        of = chunks.len(),
                        already_created = outcome.created.len(),
                        error = %err,
                        "Chunk failed; remaining chunks skipped"
                    );
                    outcome.aborted = Some(err);
                    break;
                }
            }
        }

        outcome
    }
}
