//! `${NAME}` interpolation over parsed YAML.
//!
//! Tokens are replaced in both keys and values. A scalar that consists of a
//! single token is re-read as YAML after substitution so `port: ${PORT}`
//! still deserializes as a number. Unset variables resolve to their own name,
//! matching how the migration configs have always behaved.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_yaml::value::{Mapping, TaggedValue, Value};
use tracing::warn;

static ENV_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(\w+)\}").expect("env token pattern is valid"));

/// Look up a variable in the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Replace every `${NAME}` token in `text`.
pub fn interpolate_str<F>(text: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_TOKEN
        .replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            lookup(name).unwrap_or_else(|| {
                warn!(variable = name, "environment variable not set, using its name");
                name.to_string()
            })
        })
        .into_owned()
}

/// Recursively interpolate a YAML document.
pub fn interpolate_value<F>(value: Value, lookup: &F) -> Value
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        Value::String(text) => interpolate_scalar(&text, lookup),
        Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(|item| interpolate_value(item, lookup))
                .collect(),
        ),
        Value::Mapping(map) => {
            let mut out = Mapping::new();
            for (key, item) in map {
                out.insert(interpolate_value(key, lookup), interpolate_value(item, lookup));
            }
            Value::Mapping(out)
        }
        Value::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            Value::Tagged(Box::new(TaggedValue {
                tag,
                value: interpolate_value(value, lookup),
            }))
        }
        other => other,
    }
}

fn interpolate_scalar<F>(text: &str, lookup: &F) -> Value
where
    F: Fn(&str) -> Option<String>,
{
    if !ENV_TOKEN.is_match(text) {
        return Value::String(text.to_string());
    }
    let replaced = interpolate_str(text, lookup);
    if is_single_token(text) {
        // Only plain scalars are re-typed; a variable holding YAML structure
        // stays a string.
        if let Ok(parsed) = serde_yaml::from_str::<Value>(&replaced)
            && matches!(parsed, Value::Bool(_) | Value::Number(_))
        {
            return parsed;
        }
    }
    Value::String(replaced)
}

fn is_single_token(text: &str) -> bool {
    ENV_TOKEN
        .find(text.trim())
        .is_some_and(|found| found.as_str() == text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "HOST" => Some("db.local".to_string()),
            "PORT" => Some("5432".to_string()),
            "KEY" => Some("token".to_string()),
            _ => None,
        }
    }

    #[test]
    fn replaces_tokens_inside_text() {
        assert_eq!(
            interpolate_str("postgres://${HOST}:${PORT}/db", &lookup),
            "postgres://db.local:5432/db"
        );
    }

    #[test]
    fn unset_variable_resolves_to_name() {
        assert_eq!(interpolate_str("/var/${LOG_PATH}", &lookup), "/var/LOG_PATH");
    }

    #[test]
    fn single_token_scalar_is_retyped() {
        let value = interpolate_value(Value::String("${PORT}".to_string()), &lookup);
        assert_eq!(value, Value::Number(5432.into()));
    }

    #[test]
    fn keys_are_interpolated() {
        let doc: Value = serde_yaml::from_str("${KEY}: ${HOST}").unwrap();
        let value = interpolate_value(doc, &lookup);
        let expected: Value = serde_yaml::from_str("token: db.local").unwrap();
        assert_eq!(value, expected);
    }
}
