//! Table projection: records to dotted-path rows and form edits back to records.

pub mod styling;

use serde_json::{Map, Value};

use crate::models::{ensure_record_id, Record, Row, ID_FIELD};
use crate::path;
use crate::schema::enumerate_properties;

/// Column headers for a category: the id column, then every schema path.
pub fn headers(schema: &Value) -> Vec<String> {
    let mut headers = vec![ID_FIELD.to_string()];
    headers.extend(enumerate_properties(schema, ""));
    headers
}

/// Projects each record onto `headers`.
///
/// Every row carries `opendb_id`; unresolved paths become `""`.
pub fn flatten(records: &[Record], headers: &[String]) -> Vec<Row> {
    records.iter().map(|r| flatten_one(r, headers)).collect()
}

fn flatten_one(record: &Record, headers: &[String]) -> Row {
    let mut row = Map::new();
    row.insert(
        ID_FIELD.to_string(),
        record
            .get(ID_FIELD)
            .cloned()
            .unwrap_or_else(|| Value::String(String::new())),
    );

    for header in headers {
        if header == ID_FIELD {
            continue;
        }
        let value = path::get(record, header)
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()));
        row.insert(header.clone(), value);
    }
    row
}

/// Text shown in a table cell.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Object(_) => "{...}".to_string(),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Display text of `header` in `row`; absent cells render empty.
pub fn cell_text(row: &Row, header: &str) -> String {
    row.get(header).map(display_value).unwrap_or_default()
}

/// Applies path-keyed edits to a copy of `base` and makes sure the result
/// carries an identifier.
pub fn unflatten_edits<'a, I>(base: &Record, edits: I) -> Record
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    let mut record = base.clone();
    for (field, value) in edits {
        path::set(&mut record, field, value.clone());
    }
    ensure_record_id(&mut record);
    record
}
