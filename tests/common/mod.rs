use actix_web::{http::header, test, web, App};
use async_trait::async_trait;
use secrecy::Secret;
use serde_json::{json, Map, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use budget_recon::api_routes;
use budget_recon::config::{AppConfig, TableDefaults};
use budget_recon::extractors::API_KEY_HEADER;
use budget_recon::store::{
    ListQuery, NewRecord, RecordPage, RecordStore, StoreError, StoreHandle, StoreRecord,
    TableLocation,
};

pub static API_KEY: &str = "test_api_key_for_integration_tests";

/// What the fake store saw, in order
#[derive(Debug, Clone)]
pub enum Seen {
    List { table: String, filter: Option<String> },
    Create { table: String, count: usize },
}

/// Record store answering from queues; unscripted creates echo their payload.
#[derive(Default)]
pub struct FakeStore {
    lists: Mutex<VecDeque<Result<RecordPage, StoreError>>>,
    creates: Mutex<VecDeque<StoreError>>,
    seen: Mutex<Vec<Seen>>,
    created: Mutex<usize>,
}

impl FakeStore {
    pub fn page(self, records: Vec<StoreRecord>, offset: Option<&str>) -> Self {
        self.lists.lock().unwrap().push_back(Ok(RecordPage {
            records,
            offset: offset.map(str::to_string),
        }));
        self
    }

    pub fn failing_create(self, message: &str) -> Self {
        self.creates.lock().unwrap().push_back(StoreError::Remote {
            status: 422,
            message: message.to_string(),
        });
        self
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn list_page(
        &self,
        location: &TableLocation,
        query: &ListQuery,
        _offset: Option<&str>,
    ) -> Result<RecordPage, StoreError> {
        self.seen.lock().unwrap().push(Seen::List {
            table: location.table_id.clone(),
            filter: query.filter.clone(),
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
        _typecast: bool,
    ) -> Result<Vec<StoreRecord>, StoreError> {
        self.seen.lock().unwrap().push(Seen::Create {
            table: location.table_id.clone(),
            count: records.len(),
        });
        if let Some(err) = self.creates.lock().unwrap().pop_front() {
            return Err(err);
        }
        let mut created = self.created.lock().unwrap();
        Ok(records
            .iter()
            .map(|r| {
                *created += 1;
                StoreRecord {
                    id: format!("recCreated{}", *created),
                    fields: r.fields.clone(),
                }
            })
            .collect())
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

pub struct TestResponse {
    status: u16,
    allow: Option<String>,
    body: bytes::Bytes,
}

impl TestResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn allow(&self) -> Option<&str> {
        self.allow.as_deref()
    }

    pub async fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }
}

pub struct TestApp {
    pub store: Arc<FakeStore>,
    config: AppConfig,
    connected: bool,
}

impl TestApp {
    /// App with every table configured and no api key.
    pub fn new(store: FakeStore) -> Self {
        TestApp {
            store: Arc::new(store),
            config: AppConfig {
                airtable_token: Some(Secret::new("patTest".to_string())),
                tables: TableDefaults {
                    base_id: Some("appTest".to_string()),
                    transactions_table_id: Some("tblTransactions".to_string()),
                    categories_table_id: Some("tblCategories".to_string()),
                    budgets_table_id: Some("tblBudgets".to_string()),
                },
                ..AppConfig::default()
            },
            connected: true,
        }
    }

    pub fn with_api_key(mut self) -> Self {
        self.config.api_key = Some(Secret::new(API_KEY.to_string()));
        self
    }

    pub fn without_token(mut self) -> Self {
        self.config.airtable_token = None;
        self.connected = false;
        self
    }

    pub fn without_tables(mut self) -> Self {
        self.config.tables = TableDefaults::default();
        self
    }

    fn handle(&self) -> StoreHandle {
        if self.connected {
            StoreHandle::connected(self.store.clone())
        } else {
            StoreHandle::unconfigured()
        }
    }

    async fn call(&self, req: test::TestRequest) -> TestResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(self.config.clone()))
                .app_data(web::Data::new(self.handle()))
                .service(web::scope("/api").configure(api_routes)),
        )
        .await;

        let resp = test::call_service(&app, req.to_request()).await;

        let status = resp.status().as_u16();
        let allow = resp
            .headers()
            .get(header::ALLOW)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        let body = test::read_body(resp).await;

        TestResponse {
            status,
            allow,
            body,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.call(test::TestRequest::get().uri(path)).await
    }

    pub async fn get_with_key(&self, path: &str, key: &str) -> TestResponse {
        self.call(
            test::TestRequest::get()
                .uri(path)
                .insert_header((API_KEY_HEADER, key)),
        )
        .await
    }

    pub async fn post(&self, path: &str, payload: &Value) -> TestResponse {
        self.call(test::TestRequest::post().uri(path).set_json(payload))
            .await
    }

    pub async fn post_raw(&self, path: &str, body: &'static str) -> TestResponse {
        self.call(
            test::TestRequest::post()
                .uri(path)
                .insert_header((header::CONTENT_TYPE, "application/json"))
                .set_payload(body),
        )
        .await
    }

    pub async fn put(&self, path: &str) -> TestResponse {
        self.call(test::TestRequest::put().uri(path)).await
    }
}
