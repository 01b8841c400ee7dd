use serde_json::{Map, Value};

use crate::error::SeedError;
use crate::schema::{is_json_literal_field, TableSchema, FLATTEN_SEPARATOR};

/// An ordered column → value mapping produced from one record.
///
/// Column order is the record's own field-arrival order after filtering
/// and flattening, not the whitelist's declared order.
#[derive(Debug, Clone, Default)]
pub struct NormalizedRow {
    columns: Vec<(String, Value)>,
}

impl NormalizedRow {
    pub fn from_pairs(columns: Vec<(String, Value)>) -> Self {
        NormalizedRow { columns }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }
}

/// Filter a record to its table's whitelist, then flatten the remaining
/// nested objects into compound column names.
///
/// Flattening walks an explicit key-path stack rather than recursing, so
/// depth is bounded only by the input. A nested object whose compound name
/// matches a JSON-literal pattern is kept whole for the encoder; arrays
/// are never flattened.
pub fn normalize(record: &Map<String, Value>, schema: &TableSchema) -> Result<NormalizedRow, SeedError> {
    let retained = record.iter().filter(|(field, _)| schema.whitelist.accepts(field));

    // Depth-first over (compound name, value) work items; children are
    // pushed in reverse so output order matches source order.
    let mut stack: Vec<(String, &Value)> = Vec::new();
    for (field, value) in retained.collect::<Vec<_>>().into_iter().rev() {
        stack.push((field.clone(), value));
    }

    let mut columns = Vec::new();
    while let Some((name, value)) = stack.pop() {
        match value {
            Value::Object(child) if !is_json_literal_field(&name) => {
                for (ck, cv) in child.iter().rev() {
                    stack.push((format!("{name}{FLATTEN_SEPARATOR}{ck}"), cv));
                }
            }
            _ => columns.push((name, value.clone())),
        }
    }

    if columns.is_empty() {
        return Err(SeedError::EmptyRecord {
            table: schema.table.to_string(),
        });
    }

    Ok(NormalizedRow::from_pairs(columns))
}
