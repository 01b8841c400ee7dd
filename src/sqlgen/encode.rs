use serde_json::Value;

/// Encode a JSON value as SQL literal text.
///
/// Nulls become `NULL`, booleans `TRUE`/`FALSE`, numbers plain decimal
/// text, strings single-quoted with embedded quotes doubled and literal
/// newlines replaced by an escaped `\n`. Objects and arrays are serialized
/// compactly (keys in encountered order) and then quoted like strings.
///
/// Encoding is deterministic: the same value always produces the same
/// literal.
pub fn sql_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Object(_) | Value::Array(_) => quote(&value.to_string()),
    }
}

fn quote(text: &str) -> String {
    let escaped = text.replace('\'', "''").replace('\n', "\\n");
    format!("'{escaped}'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars() {
        assert_eq!(sql_literal(&Value::Null), "NULL");
        assert_eq!(sql_literal(&json!(true)), "TRUE");
        assert_eq!(sql_literal(&json!(false)), "FALSE");
        assert_eq!(sql_literal(&json!(42)), "42");
        assert_eq!(sql_literal(&json!(-7)), "-7");
        assert_eq!(sql_literal(&json!(1.5)), "1.5");
        assert_eq!(sql_literal(&json!("red")), "'red'");
    }

    #[test]
    fn quotes_are_doubled_and_newlines_escaped() {
        assert_eq!(sql_literal(&json!("it's")), "'it''s'");
        assert_eq!(sql_literal(&json!("a\nb")), "'a\\nb'");
    }

    #[test]
    fn objects_keep_key_order_and_are_quoted() {
        let value = json!({"front_default": "url", "back_default": null});
        assert_eq!(
            sql_literal(&value),
            r#"'{"front_default":"url","back_default":null}'"#
        );
    }

    #[test]
    fn arrays_become_json_literals() {
        assert_eq!(sql_literal(&json!([1, 2, 3])), "'[1,2,3]'");
    }

    #[test]
    fn quotes_inside_nested_values_are_escaped() {
        let value = json!({"name": "O'Hara"});
        assert_eq!(sql_literal(&value), r#"'{"name":"O''Hara"}'"#);
    }

    #[test]
    fn non_ascii_text_passes_through() {
        assert_eq!(sql_literal(&json!("Água")), "'Água'");
        assert_eq!(sql_literal(&json!({"t": "Dragão"})), r#"'{"t":"Dragão"}'"#);
    }
}
