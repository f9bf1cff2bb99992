use serde_json::Value;

/// Render a field value as a table cell. Arrays (linked records, multi
/// selects) are joined with `", "`.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_cells() {
        assert_eq!(cell_text(&json!(null)), "");
        assert_eq!(cell_text(&json!("Ana")), "Ana");
        assert_eq!(cell_text(&json!(true)), "true");
        assert_eq!(cell_text(&json!(12)), "12");
        assert_eq!(cell_text(&json!(["recA", "recB"])), "recA, recB");
    }
}
