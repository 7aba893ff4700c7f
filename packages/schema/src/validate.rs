//! # Document Validation
//!
//! Checks arbitrary JSON against the document schema before it is turned into
//! typed values. Every failure is collected with its field path; nothing is
//! repaired or coerced.
//!
//! Structure (containers, discriminators, ids) is checked by walking the
//! `Value`; variant props are checked by deserializing them into their typed
//! structs so the props definitions stay the single source of truth.

use crate::blocks::{BlockKind, ButtonProps, DividerProps, HeadingProps, ImageProps, TextProps};
use crate::document::{Document, SCHEMA_VERSION};
use crate::error::{FieldError, IssueCode, ValidationErrors};
use crate::style::{Align, Spacing, Theme, VerticalAlign};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

/// Validate `input` and build the typed document
pub fn validate(input: &Value) -> Result<Document, ValidationErrors> {
    let mut validator = Validator::default();
    validator.check_document(input);

    if !validator.errors.is_empty() {
        debug!(errors = validator.errors.len(), "document rejected");
        return Err(ValidationErrors {
            errors: validator.errors,
        });
    }

    serde_json::from_value(input.clone()).map_err(|e| ValidationErrors {
        errors: vec![FieldError::new("", IssueCode::InvalidValue, e.to_string())],
    })
}

#[derive(Default)]
struct Validator {
    path: Vec<PathSegment>,
    errors: Vec<FieldError>,
    seen_ids: HashSet<String>,
}

enum PathSegment {
    Key(String),
    Index(usize),
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Validator {
    fn current_path(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                PathSegment::Index(index) => {
                    out.push_str(&format!("[{}]", index));
                }
            }
        }
        out
    }

    fn report(&mut self, code: IssueCode, message: impl Into<String>) {
        let path = self.current_path();
        self.errors.push(FieldError::new(path, code, message));
    }

    fn with_key<R>(&mut self, key: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(PathSegment::Key(key.to_string()));
        let result = f(self);
        self.path.pop();
        result
    }

    fn with_index<R>(&mut self, index: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(PathSegment::Index(index));
        let result = f(self);
        self.path.pop();
        result
    }

    fn expect_object<'v>(&mut self, value: &'v Value) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.report(
                    IssueCode::InvalidType,
                    format!("expected object, received {}", type_name(other)),
                );
                None
            }
        }
    }

    /// Required field that must be present on `obj`
    fn required<'v>(&mut self, obj: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
        match obj.get(key) {
            Some(value) => Some(value),
            None => {
                self.with_key(key, |v| v.report(IssueCode::MissingField, "required"));
                None
            }
        }
    }

    fn required_string<'v>(&mut self, obj: &'v Map<String, Value>, key: &str) -> Option<&'v str> {
        let value = self.required(obj, key)?;
        match value {
            Value::String(s) => Some(s),
            other => {
                self.with_key(key, |v| {
                    v.report(
                        IssueCode::InvalidType,
                        format!("expected string, received {}", type_name(other)),
                    )
                });
                None
            }
        }
    }

    fn required_array<'v>(&mut self, obj: &'v Map<String, Value>, key: &str) -> Option<&'v Vec<Value>> {
        let value = self.required(obj, key)?;
        match value {
            Value::Array(items) => Some(items),
            other => {
                self.with_key(key, |v| {
                    v.report(
                        IssueCode::InvalidType,
                        format!("expected array, received {}", type_name(other)),
                    )
                });
                None
            }
        }
    }

    /// Optional field checked by deserializing it into `T`
    fn optional_typed<T: DeserializeOwned>(&mut self, obj: &Map<String, Value>, key: &str) {
        if let Some(value) = obj.get(key) {
            if let Err(e) = serde_json::from_value::<T>(value.clone()) {
                self.with_key(key, |v| v.report(IssueCode::InvalidType, e.to_string()));
            }
        }
    }

    /// `T` deserialized from `value`, reporting at the current path on failure
    fn typed<T: DeserializeOwned>(&mut self, value: &Value) {
        if let Err(e) = serde_json::from_value::<T>(value.clone()) {
            let message = e.to_string();
            let code = if message.starts_with("missing field") {
                IssueCode::MissingField
            } else {
                IssueCode::InvalidType
            };
            self.report(code, message);
        }
    }

    fn check_id(&mut self, obj: &Map<String, Value>) {
        if let Some(id) = self.required_string(obj, "id") {
            if id.is_empty() {
                self.with_key("id", |v| v.report(IssueCode::InvalidValue, "id must not be empty"));
            } else if !self.seen_ids.insert(id.to_string()) {
                self.with_key("id", |v| {
                    v.report(IssueCode::DuplicateId, format!("duplicate id \"{}\"", id))
                });
            }
        }
    }

    fn check_tag(&mut self, obj: &Map<String, Value>, expected: &str) {
        if let Some(tag) = self.required_string(obj, "type") {
            if tag != expected {
                self.with_key("type", |v| {
                    v.report(
                        IssueCode::InvalidValue,
                        format!("expected \"{}\", received \"{}\"", expected, tag),
                    )
                });
            }
        }
    }

    fn check_flags(&mut self, obj: &Map<String, Value>) {
        self.optional_typed::<bool>(obj, "locked");
        self.optional_typed::<bool>(obj, "hidden");
    }

    fn check_presentation(&mut self, obj: &Map<String, Value>) {
        self.optional_typed::<String>(obj, "backgroundColor");
        self.optional_typed::<String>(obj, "className");
        self.optional_typed::<Spacing>(obj, "padding");
        self.optional_typed::<Spacing>(obj, "margin");
        self.optional_typed::<Align>(obj, "align");
    }

    fn check_document(&mut self, input: &Value) {
        let Some(root) = self.expect_object(input) else {
            return;
        };

        if let Some(version) = self.required(root, "version") {
            match version.as_u64() {
                Some(v) if v == SCHEMA_VERSION as u64 => {}
                Some(v) => self.with_key("version", |s| {
                    s.report(
                        IssueCode::UnsupportedVersion,
                        format!("unsupported schema version {}, expected {}", v, SCHEMA_VERSION),
                    )
                }),
                None => self.with_key("version", |s| {
                    s.report(
                        IssueCode::InvalidType,
                        format!("expected integer, received {}", type_name(version)),
                    )
                }),
            }
        }

        if let Some(meta) = self.required(root, "meta") {
            self.with_key("meta", |v| v.check_meta(meta));
        }

        if let Some(variables) = root.get("variables") {
            self.with_key("variables", |v| v.check_variables(variables));
        }

        self.optional_typed::<Theme>(root, "theme");

        if let Some(sections) = self.required_array(root, "sections") {
            self.with_key("sections", |v| {
                for (i, section) in sections.iter().enumerate() {
                    v.with_index(i, |v| v.check_section(section));
                }
            });
        }
    }

    fn check_meta(&mut self, meta: &Value) {
        let Some(obj) = self.expect_object(meta) else {
            return;
        };
        self.required_string(obj, "title");
        self.optional_typed::<String>(obj, "description");
        self.optional_typed::<Vec<String>>(obj, "tags");
    }

    fn check_variables(&mut self, variables: &Value) {
        let Some(obj) = self.expect_object(variables) else {
            return;
        };
        for (key, value) in obj {
            if !matches!(value, Value::String(_) | Value::Object(_)) {
                self.with_key(key, |v| {
                    v.report(
                        IssueCode::InvalidType,
                        format!("expected string or object, received {}", type_name(value)),
                    )
                });
            }
        }
    }

    fn check_section(&mut self, section: &Value) {
        let Some(obj) = self.expect_object(section) else {
            return;
        };
        self.check_id(obj);
        self.check_tag(obj, "section");
        self.check_flags(obj);
        self.check_presentation(obj);

        if let Some(rows) = self.required_array(obj, "rows") {
            self.with_key("rows", |v| {
                for (i, row) in rows.iter().enumerate() {
                    v.with_index(i, |v| v.check_row(row));
                }
            });
        }
    }

    fn check_row(&mut self, row: &Value) {
        let Some(obj) = self.expect_object(row) else {
            return;
        };
        self.check_id(obj);
        self.check_tag(obj, "row");
        self.check_flags(obj);
        self.check_presentation(obj);
        self.optional_typed::<u32>(obj, "gutter");

        if let Some(columns) = self.required_array(obj, "columns") {
            self.with_key("columns", |v| {
                for (i, column) in columns.iter().enumerate() {
                    v.with_index(i, |v| v.check_column(column));
                }
            });
        }
    }

    fn check_column(&mut self, column: &Value) {
        let Some(obj) = self.expect_object(column) else {
            return;
        };
        self.check_id(obj);
        self.check_tag(obj, "column");
        self.check_flags(obj);
        self.check_presentation(obj);
        self.optional_typed::<String>(obj, "width");
        self.optional_typed::<VerticalAlign>(obj, "verticalAlign");

        if let Some(blocks) = self.required_array(obj, "blocks") {
            self.with_key("blocks", |v| {
                for (i, block) in blocks.iter().enumerate() {
                    v.with_index(i, |v| v.check_block(block));
                }
            });
        }
    }

    fn check_block(&mut self, block: &Value) {
        let Some(obj) = self.expect_object(block) else {
            return;
        };
        self.check_id(obj);
        self.check_flags(obj);

        let kind = match self.required_string(obj, "type") {
            Some(tag) => match BlockKind::from_tag(tag) {
                Some(kind) => Some(kind),
                None => {
                    self.with_key("type", |v| {
                        v.report(
                            IssueCode::UnknownBlockType,
                            format!("unknown block type \"{}\"", tag),
                        )
                    });
                    None
                }
            },
            None => None,
        };

        let Some(props) = self.required(obj, "props") else {
            return;
        };
        let Some(kind) = kind else {
            return;
        };

        self.with_key("props", |v| {
            if v.expect_object(props).is_none() {
                return;
            }
            match kind {
                BlockKind::Button => v.typed::<ButtonProps>(props),
                BlockKind::Text => v.typed::<TextProps>(props),
                BlockKind::Heading => v.typed::<HeadingProps>(props),
                BlockKind::Divider => v.typed::<DividerProps>(props),
                BlockKind::Image => v.typed::<ImageProps>(props),
                BlockKind::Custom => v.check_custom_props(props),
            }
        });
    }

    /// Only the envelope is checked; the inner `props` bag is owned by the registry
    fn check_custom_props(&mut self, props: &Value) {
        let Some(obj) = props.as_object() else {
            return;
        };
        if let Some(name) = self.required_string(obj, "componentName") {
            if name.is_empty() {
                self.with_key("componentName", |v| {
                    v.report(IssueCode::InvalidValue, "componentName must not be empty")
                });
            }
        }
        if let Some(inner) = obj.get("props") {
            self.with_key("props", |v| {
                v.expect_object(inner);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "version": 1,
            "meta": { "title": "Welcome" },
            "sections": [{
                "id": "s1",
                "type": "section",
                "rows": [{
                    "id": "r1",
                    "type": "row",
                    "columns": [{
                        "id": "c1",
                        "type": "column",
                        "blocks": [{
                            "id": "b1",
                            "type": "text",
                            "props": { "content": "Hi {{name}}" }
                        }]
                    }]
                }]
            }]
        })
    }

    #[test]
    fn test_accepts_minimal_document() {
        let doc = validate(&minimal()).expect("document should validate");
        assert_eq!(doc.meta.title, "Welcome");
        assert_eq!(doc.sections[0].rows[0].columns[0].blocks.len(), 1);
    }

    #[test]
    fn test_reports_path_of_bad_block_type() {
        let mut input = minimal();
        input["sections"][0]["rows"][0]["columns"][0]["blocks"][0]["type"] = json!("video");

        let errors = validate(&input).unwrap_err();
        let error = errors
            .at("sections[0].rows[0].columns[0].blocks[0].type")
            .expect("error at block type");
        assert_eq!(error.code, IssueCode::UnknownBlockType);
    }

    #[test]
    fn test_requires_meta_title() {
        let mut input = minimal();
        input["meta"] = json!({});

        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.at("meta.title").unwrap().code, IssueCode::MissingField);
    }

    #[test]
    fn test_requires_block_props() {
        let mut input = minimal();
        input["sections"][0]["rows"][0]["columns"][0]["blocks"][0]
            .as_object_mut()
            .unwrap()
            .remove("props");

        let errors = validate(&input).unwrap_err();
        assert!(errors
            .at("sections[0].rows[0].columns[0].blocks[0].props")
            .is_some());
    }

    #[test]
    fn test_does_not_coerce_types() {
        let mut input = minimal();
        input["sections"][0]["rows"][0]["columns"][0]["blocks"][0]["props"]["fontSize"] =
            json!("16");

        let errors = validate(&input).unwrap_err();
        assert_eq!(
            errors
                .at("sections[0].rows[0].columns[0].blocks[0].props")
                .unwrap()
                .code,
            IssueCode::InvalidType
        );
    }

    #[test]
    fn test_rejects_mismatched_container_tag() {
        let mut input = minimal();
        input["sections"][0]["rows"][0]["type"] = json!("column");

        let errors = validate(&input).unwrap_err();
        assert!(errors.at("sections[0].rows[0].type").is_some());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut input = minimal();
        input["sections"][0]["rows"][0]["columns"][0]["blocks"][0]["id"] = json!("c1");

        let errors = validate(&input).unwrap_err();
        let error = errors
            .at("sections[0].rows[0].columns[0].blocks[0].id")
            .unwrap();
        assert_eq!(error.code, IssueCode::DuplicateId);
    }

    #[test]
    fn test_rejects_other_versions() {
        let mut input = minimal();
        input["version"] = json!(2);

        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.at("version").unwrap().code, IssueCode::UnsupportedVersion);
    }

    #[test]
    fn test_collects_multiple_errors() {
        let input = json!({
            "version": "1",
            "meta": {},
            "sections": [{ "id": "s1", "type": "section" }]
        });

        let errors = validate(&input).unwrap_err();
        assert!(errors.len() >= 3);
        assert!(errors.at("version").is_some());
        assert!(errors.at("meta.title").is_some());
        assert!(errors.at("sections[0].rows").is_some());
    }

    #[test]
    fn test_tolerates_unknown_fields() {
        let mut input = minimal();
        input["editorState"] = json!({ "zoom": 2 });
        input["sections"][0]["rows"][0]["columns"][0]["blocks"][0]["props"]["data-foo"] =
            json!("bar");

        assert!(validate(&input).is_ok());
    }
}
