use crate::path::{lookup, parse_path};
use serde_json::{Map, Value};
use tracing::trace;

/// A `{{ path }}` occurrence inside a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Byte offset of the opening `{{`
    pub start: usize,
    /// Byte offset just past the closing `}}`
    pub end: usize,
    /// Trimmed path between the braces
    pub path: &'a str,
}

/// Every well-formed placeholder in `text`, left to right
pub fn placeholders(text: &str) -> Vec<Placeholder<'_>> {
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find("{{") {
        let start = cursor + offset;
        let Some(close) = text[start + 2..].find("}}") else {
            break;
        };
        let inner_end = start + 2 + close;
        let path = text[start + 2..inner_end].trim();

        if parse_path(path).is_some() {
            found.push(Placeholder {
                start,
                end: inner_end + 2,
                path,
            });
            cursor = inner_end + 2;
        } else {
            // `{{{name}}}`: retry one brace later
            cursor = start + 1;
        }
    }

    found
}

pub fn has_placeholders(text: &str) -> bool {
    !placeholders(text).is_empty()
}

/// Scalar form of a resolved variable; `None` keeps the placeholder visible
fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).ok(),
    }
}

/// Replace every `{{ path }}` in `text` with its value from `variables`.
///
/// Unresolved placeholders stay in the output verbatim so they remain
/// visible to whoever edits the template.
pub fn substitute(text: &str, variables: &Map<String, Value>) -> String {
    let found = placeholders(text);
    if found.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for placeholder in found {
        out.push_str(&text[last..placeholder.start]);
        match lookup(variables, placeholder.path).and_then(stringify) {
            Some(value) => out.push_str(&value),
            None => {
                trace!(path = placeholder.path, "unresolved template variable");
                out.push_str(&text[placeholder.start..placeholder.end]);
            }
        }
        last = placeholder.end;
    }
    out.push_str(&text[last..]);
    out
}

/// Like [`substitute`], but a string that is exactly one placeholder naming
/// an object (or array) variable yields that structured value itself.
pub fn substitute_object(text: &str, variables: &Map<String, Value>) -> Value {
    let found = placeholders(text);
    if let [only] = found.as_slice() {
        if only.start == 0 && only.end == text.len() {
            if let Some(value @ (Value::Object(_) | Value::Array(_))) = lookup(variables, only.path) {
                return value.clone();
            }
        }
    }
    Value::String(substitute(text, variables))
}

/// Apply [`substitute_object`] to every string inside `value`, recursively.
///
/// Object keys are never rewritten.
pub fn deep_substitute(value: &Value, variables: &Map<String, Value>) -> Value {
    match value {
        Value::String(s) => substitute_object(s, variables),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| deep_substitute(item, variables))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), deep_substitute(item, variables)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Paths referenced in `text` that `variables` cannot resolve
pub fn unresolved(text: &str, variables: &Map<String, Value>) -> Vec<String> {
    placeholders(text)
        .into_iter()
        .filter(|p| lookup(variables, p.path).and_then(stringify).is_none())
        .map(|p| p.path.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("variables must be an object"),
        }
    }

    #[test]
    fn test_simple_substitution() {
        let v = vars(json!({ "name": "Sam" }));
        assert_eq!(substitute("Hi {{name}}", &v), "Hi Sam");
        assert_eq!(substitute("Hi {{ name }}!", &v), "Hi Sam!");
    }

    #[test]
    fn test_missing_variable_stays_literal() {
        let v = Map::new();
        assert_eq!(substitute("Hello {{name}}", &v), "Hello {{name}}");
        assert_eq!(substitute("Hello {{ name }}", &v), "Hello {{ name }}");
    }

    #[test]
    fn test_text_without_placeholders_is_unchanged() {
        let v = vars(json!({ "name": "Sam" }));
        for s in ["", "plain", "{ braces }", "{{", "}}", "{{ not a path }}", "a {{}} b"] {
            assert_eq!(substitute(s, &v), s);
        }
    }

    #[test]
    fn test_nested_and_indexed_paths() {
        let v = vars(json!({
            "user": { "first": "Ada", "tags": ["vip", "beta"] },
            "count": 3,
            "active": true
        }));
        assert_eq!(
            substitute("{{user.first}} ({{user.tags[0]}}) x{{count}} {{active}}", &v),
            "Ada (vip) x3 true"
        );
    }

    #[test]
    fn test_triple_braces() {
        let v = vars(json!({ "name": "Sam" }));
        assert_eq!(substitute("{{{name}}}", &v), "{Sam}");
    }

    #[test]
    fn test_null_is_unresolved() {
        let v = vars(json!({ "name": null }));
        assert_eq!(substitute("{{name}}", &v), "{{name}}");
    }

    #[test]
    fn test_substitute_object_returns_whole_object() {
        let v = vars(json!({ "product": { "sku": 42, "title": "Lamp" } }));

        assert_eq!(
            substitute_object("{{product}}", &v),
            json!({ "sku": 42, "title": "Lamp" })
        );
        assert_eq!(
            substitute_object("Item: {{product.title}}", &v),
            json!("Item: Lamp")
        );
        // embedded objects are serialized, not spliced
        assert_eq!(
            substitute_object("x {{product}}", &v),
            json!(r#"x {"sku":42,"title":"Lamp"}"#)
        );
        assert_eq!(substitute_object("{{missing}}", &v), json!("{{missing}}"));
    }

    #[test]
    fn test_deep_substitute_walks_nested_props() {
        let v = vars(json!({
            "user": { "name": "Sam" },
            "items": [{ "title": "A" }]
        }));
        let props = json!({
            "greeting": "Hi {{user.name}}",
            "list": "{{items}}",
            "nested": { "deep": ["{{user.name}}", 7] },
            "{{user.name}}": "keys stay"
        });

        assert_eq!(
            deep_substitute(&props, &v),
            json!({
                "greeting": "Hi Sam",
                "list": [{ "title": "A" }],
                "nested": { "deep": ["Sam", 7] },
                "{{user.name}}": "keys stay"
            })
        );
    }

    #[test]
    fn test_unresolved_lists_missing_paths() {
        let v = vars(json!({ "name": "Sam" }));
        assert_eq!(
            unresolved("{{name}} {{order.id}} {{coupon}}", &v),
            vec!["order.id".to_string(), "coupon".to_string()]
        );
    }
}
