//! Scripted in-memory store for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use super::{ListQuery, NewRecord, RecordPage, RecordStore, StoreError, StoreRecord, TableLocation};

/// A call the fake observed, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List {
        location: TableLocation,
        query: ListQuery,
        offset: Option<String>,
    },
    Create {
        location: TableLocation,
        count: usize,
        typecast: bool,
    },
}

/// Answers list and create calls from queues filled by the test.
///
/// An exhausted list queue answers with an empty final page; an exhausted
/// create queue echoes the payload back with generated ids.
#[derive(Default)]
pub struct ScriptedStore {
    lists: Mutex<VecDeque<Result<RecordPage, StoreError>>>,
    creates: Mutex<VecDeque<Result<Vec<StoreRecord>, StoreError>>>,
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<usize>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(self, page: RecordPage) -> Self {
        self.lists.lock().unwrap().push_back(Ok(page));
        self
    }

    pub fn push_pages(self, pages: Vec<RecordPage>) -> Self {
        pages.into_iter().fold(self, Self::push_page)
    }

    pub fn push_list_error(self, err: StoreError) -> Self {
        self.lists.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn push_create_error(self, err: StoreError) -> Self {
        self.creates.lock().unwrap().push_back(Err(err));
        self
    }

    /// Leave the create call at this position to the echo behaviour.
    pub fn push_create_echo(self) -> Self {
        self.creates.lock().unwrap().push_back(Ok(Vec::new()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::List { .. }))
            .collect()
    }

    pub fn create_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Create { .. }))
            .collect()
    }

    fn echo(&self, records: &[NewRecord]) -> Vec<StoreRecord> {
        let mut next_id = self.next_id.lock().unwrap();
        records
            .iter()
            .map(|r| {
                *next_id += 1;
                StoreRecord {
                    id: format!("recNew{}", *next_id),
                    fields: r.fields.clone(),
                }
            })
            .collect()
    }
}

#[async_trait]
impl RecordStore for ScriptedStore {
    async fn list_page(
        &self,
        location: &TableLocation,
        query: &ListQuery,
        offset: Option<&str>,
    ) -> Result<RecordPage, StoreError> {
        self.calls.lock().unwrap().push(Call::List {
            location: location.clone(),
            query: query.clone(),
            offset: offset.map(str::to_string),
        });
        self.lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(RecordPage::default()))
    }

    async fn create_records(
        &self,
        location: &TableLocation,
        records: &[NewRecord],
        typecast: bool,
    ) -> Result<Vec<StoreRecord>, StoreError> {
        self.calls.lock().unwrap().push(Call::Create {
            location: location.clone(),
            count: records.len(),
            typecast,
        });
        match self.creates.lock().unwrap().pop_front() {
            Some(Ok(scripted)) if !scripted.is_empty() => Ok(scripted),
            Some(Err(err)) => Err(err),
            _ => Ok(self.echo(records)),
        }
    }
}

pub fn record(id: &str, fields: Value) -> StoreRecord {
    let fields: Map<String, Value> = match fields {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    StoreRecord {
        id: id.to_string(),
        fields,
    }
}

pub fn category(id: &str, name: &str) -> StoreRecord {
    record(id, json!({ "Name": name }))
}

/// Split `records` into pages of `page_size`, chaining continuation tokens.
pub fn paged(records: Vec<StoreRecord>, page_size: usize) -> Vec<RecordPage> {
    let chunks: Vec<Vec<StoreRecord>> = records
        .chunks(page_size.max(1))
        .map(<[StoreRecord]>::to_vec)
        .collect();
    let last = chunks.len().saturating_sub(1);
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, records)| RecordPage {
            records,
            offset: (i < last).then(|| format!("itr{}", i + 1)),
        })
        .collect()
}

pub fn remote_error(message: &str) -> StoreError {
    StoreError::Remote {
        status: 422,
        message: message.to_string(),
    }
}
