//! Builders for the store's `filterByFormula` expressions.

/// Quote a value as a formula string literal.
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// Match records whose `Date` falls in the given `YYYY-MM` month.
pub fn month_filter(month: &str) -> String {
    format!("DATETIME_FORMAT({{Date}}, 'YYYY-MM')={}", quote(month))
}

/// Match records whose id is one of `ids`.
pub fn record_id_filter<S: AsRef<str>>(ids: &[S]) -> String {
    let terms: Vec<String> = ids
        .iter()
        .map(|id| format!("RECORD_ID()={}", quote(id.as_ref())))
        .collect();
    format!("OR({})", terms.join(","))
}
