use serde::Serialize;

use crate::sqlgen::encode::sql_literal;
use crate::sqlgen::normalize::NormalizedRow;

/// One generated statement and the table it targets.
#[derive(Debug, Clone, Serialize)]
pub struct SqlStatement {
    pub table: String,
    pub text: String,
}

/// Render a normalized row as an `INSERT INTO ... VALUES (...);` statement.
pub fn insert_statement(table: &str, row: &NormalizedRow) -> SqlStatement {
    let columns: Vec<&str> = row.iter().map(|(c, _)| c).collect();
    let values: Vec<String> = row.iter().map(|(_, v)| sql_literal(v)).collect();

    SqlStatement {
        table: table.to_string(),
        text: format!(
            "INSERT INTO {} ({}) VALUES ({});",
            table,
            columns.join(", "),
            values.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_columns_and_literals_in_row_order() {
        let row = NormalizedRow::from_pairs(vec![
            ("id".to_string(), json!(1)),
            ("name".to_string(), json!("Fire")),
            ("color".to_string(), json!("red")),
        ]);
        let stmt = insert_statement("types", &row);

        assert_eq!(stmt.table, "types");
        assert_eq!(
            stmt.text,
            "INSERT INTO types (id, name, color) VALUES (1, 'Fire', 'red');"
        );
    }
}
