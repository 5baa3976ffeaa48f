use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::MAX_PAGE_SIZE;

/// `{base}/{table}` address of a table in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLocation {
    pub base_id: String,
    pub table_id: String,
}

impl TableLocation {
    pub fn new(base_id: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self {
            base_id: base_id.into(),
            table_id: table_id.into(),
        }
    }
}

/// Parameters of a list call. Unset options are left off the request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page_size: u32,
    pub filter: Option<String>,
    pub cell_format: Option<String>,
    pub user_locale: Option<String>,
    pub time_zone: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            filter: None,
            cell_format: None,
            user_locale: None,
            time_zone: None,
        }
    }
}

impl ListQuery {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// JSON cell values rendered for the given locale.
    pub fn json_cells(mut self, locale: impl Into<String>) -> Self {
        self.cell_format = Some("json".to_string());
        self.user_locale = Some(locale.into());
        self
    }

    pub fn in_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    /// Query-string pairs in the store's parameter naming.
    pub fn to_pairs(&self, offset: Option<&str>) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("pageSize", self.page_size.to_string())];
        if let Some(format) = &self.cell_format {
            pairs.push(("cellFormat", format.clone()));
        }
        if let Some(locale) = &self.user_locale {
            pairs.push(("userLocale", locale.clone()));
        }
        if let Some(tz) = &self.time_zone {
            pairs.push(("timeZone", tz.clone()));
        }
        if let Some(filter) = &self.filter {
            pairs.push(("filterByFormula", filter.clone()));
        }
        if let Some(offset) = offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}

/// Render a cell value as display text.
///
/// Lookup and link cells arrive as arrays and are joined with `,`; objects
/// and nulls have no text.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| cell_text(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Null | Value::Object(_) => None,
    }
}

/// A record as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl StoreRecord {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// One page of a list call plus the token for the next one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub records: Vec<StoreRecord>,
    #[serde(default)]
    pub offset: Option<String>,
}

/// Payload for a record the store should create.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRecord {
    pub fields: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateRecordsBody<'a> {
    pub records: &'a [NewRecord],
    pub typecast: bool,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct CreatedRecords {
    #[serde(default)]
    pub records: Vec<StoreRecord>,
}
