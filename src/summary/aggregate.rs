use std::collections::{HashMap, HashSet};

use serde_json::Value;

use super::money::{to_cents, Cents};
use crate::category::DisplayNames;
use crate::store::StoreRecord;

pub const AMOUNT_FIELD: &str = "Amount";
pub const CATEGORY_FIELD: &str = "Category";

/// Bucket for transactions that reference no category.
pub const UNCATEGORIZED: &str = "(Uncategorized)";

/// Category ids referenced by a `Category` cell.
///
/// A single id or a list of ids. `None` marks an uncategorized slot: a
/// missing cell, an empty list, or a blank or non-text list element.
pub fn category_refs(value: Option<&Value>) -> Vec<Option<&str>> {
    match value {
        Some(Value::Array(items)) if !items.is_empty() => items
            .iter()
            .map(|item| item.as_str().filter(|id| !id.is_empty()))
            .collect(),
        Some(Value::String(id)) if !id.is_empty() => vec![Some(id.as_str())],
        _ => vec![None],
    }
}

/// Every distinct category id across `records`, in first-seen order.
pub fn referenced_ids(records: &[StoreRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for record in records {
        for id in category_refs(record.field(CATEGORY_FIELD)).into_iter().flatten() {
            if seen.insert(id) {
                ids.push(id.to_string());
            }
        }
    }
    ids
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub name: String,
    pub count: usize,
    pub total: Cents,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub count: usize,
    pub total: Cents,
    /// In the order each bucket was first touched.
    pub buckets: Vec<Bucket>,
}

impl Aggregation {
    fn bucket_mut<'a>(
        buckets: &'a mut Vec<Bucket>,
        positions: &mut HashMap<String, usize>,
        name: &str,
    ) -> &'a mut Bucket {
        let position = *positions.entry(name.to_string()).or_insert_with(|| {
            buckets.push(Bucket {
                name: name.to_string(),
                count: 0,
                total: Cents::ZERO,
            });
            buckets.len() - 1
        });
        &mut buckets[position]
    }
}

/// Sum transactions into a grand total and per-category buckets.
///
/// A transaction adds its full amount to every category it references, but
/// only once to the grand total, so bucket totals may add up to more than the
/// grand total.
pub fn aggregate(records: &[StoreRecord], names: &DisplayNames) -> Aggregation {
    let mut total = Cents::ZERO;
    let mut buckets = Vec::new();
    let mut positions = HashMap::new();

    for record in records {
        let cents = record
            .field(AMOUNT_FIELD)
            .map(to_cents)
            .unwrap_or_default();
        total += cents;

        for id in category_refs(record.field(CATEGORY_FIELD)) {
            let key = id.map_or(UNCATEGORIZED, |id| names.display(id));
            let bucket = Aggregation::bucket_mut(&mut buckets, &mut positions, key);
            bucket.count += 1;
            bucket.total += cents;
        }
    }

    Aggregation {
        count: records.len(),
        total,
        buckets,
    }
}
