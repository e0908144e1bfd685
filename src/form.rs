//! Forms assembled from field configs
//!
//! A form is a column of labeled inputs built through a [`FieldRegistry`],
//! plus a submit button driven by an [`AsyncControl`]. Raw input text is
//! parsed by field type as it arrives; validation runs on submit and
//! blocks the handler, writing messages next to the offending fields.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use serde_json::{Map, Number, Value};

use crate::async_control::{AsyncControl, AsyncStateSink};
use crate::components::Component;
use crate::dom::{classes, Document, NodeId};
use crate::error::FieldError;
use crate::fields::{FieldConfig, FieldRegistry};

const REQUIRED: &str = "Required";
const NOT_A_NUMBER: &str = "Must be a number";
const INVALID_JSON: &str = "Invalid JSON";

#[derive(Debug)]
struct FormField {
    key: String,
    field_type: String,
    required: bool,
    input: NodeId,
    error: NodeId,
    /// Value owned by a mounted component rather than the form
    component: bool,
}

/// Result of [`FormState::submit`]
#[derive(Debug)]
pub enum SubmitOutcome<F> {
    /// Validation failed; field key → message
    Blocked(BTreeMap<String, String>),
    /// A previous submission is still outstanding
    Busy,
    /// The handler was called; await to completion
    Started(F),
}

impl<F> SubmitOutcome<F> {
    pub fn is_started(&self) -> bool {
        matches!(self, SubmitOutcome::Started(_))
    }
}

/// Mounted form: parsed values, inline errors and submit state
#[derive(Debug)]
pub struct FormState {
    root: NodeId,
    fields: Vec<FormField>,
    values: Map<String, Value>,
    parse_errors: BTreeMap<String, String>,
    errors: BTreeMap<String, String>,
    status: NodeId,
    submit_button: NodeId,
    control: AsyncControl,
}

impl FormState {
    /// Build the form tree (detached) from `fields`
    ///
    /// Components created by field renderers (e.g. `item_list`) are handed
    /// back keyed by field key. On failure nothing built so far survives.
    pub fn build(
        doc: &mut Document,
        registry: &FieldRegistry,
        fields: &[FieldConfig],
        submit_label: &str,
    ) -> Result<(Self, Vec<(String, Component)>), FieldError> {
        let root = doc.element("form", &[classes::FORM]);
        let mut form = FormState {
            root,
            fields: Vec::with_capacity(fields.len()),
            values: Map::new(),
            parse_errors: BTreeMap::new(),
            errors: BTreeMap::new(),
            status: root,
            submit_button: root,
            control: AsyncControl::new(),
        };
        let mut components = Vec::new();

        for (index, config) in fields.iter().enumerate() {
            let key = config.key(index);
            let rendered = match registry.create(doc, config, &key) {
                Ok(rendered) => rendered,
                Err(e) => {
                    doc.remove(root);
                    return Err(e);
                }
            };

            let row = doc.element("div", &[classes::FIELD_ROW]);
            let label = doc.text_element("label", &[classes::FIELD_LABEL], config.display_label(&key));
            let error = doc.element("div", &[classes::FIELD_ERROR]);
            for child in [label, rendered.input, error] {
                doc.append_child(row, child)?;
            }
            doc.append_child(root, row)?;
            if config.required {
                doc.set_attr(rendered.input, "required", "true");
            }

            let component = rendered.component.is_some();
            if let Some(component) = rendered.component {
                components.push((key.clone(), component));
            }
            form.fields.push(FormField {
                key: key.clone(),
                field_type: config.field_type.clone(),
                required: config.required,
                input: rendered.input,
                error,
                component,
            });
            if !component {
                let raw = doc.attr(rendered.input, "value").unwrap_or_default().to_string();
                form.store_parsed(&key, &config.field_type, &raw);
            }
        }

        form.status = doc.element("div", &[classes::FORM_STATUS]);
        form.submit_button = doc.text_element("button", &[classes::BUTTON], submit_label);
        doc.set_attr(form.submit_button, "type", "submit");
        doc.append_child(root, form.status)?;
        doc.append_child(root, form.submit_button)?;
        Ok((form, components))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn submit_button(&self) -> NodeId {
        self.submit_button
    }

    pub fn control(&self) -> &AsyncControl {
        &self.control
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn input_node(&self, key: &str) -> Option<NodeId> {
        self.field(key).map(|f| f.input)
    }

    fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Feed raw text typed into field `key`; false if there is no such field
    pub fn input(&mut self, doc: &mut Document, key: &str, raw: &str) -> bool {
        let Some(field) = self.field(key).filter(|f| !f.component) else {
            return false;
        };
        let (input, field_type) = (field.input, field.field_type.clone());
        doc.set_attr(input, "value", raw);
        self.store_parsed(key, &field_type, raw);
        if !self.parse_errors.contains_key(key) {
            self.errors.remove(key);
        }
        self.render_errors(doc);
        true
    }

    /// Overwrite several values at once (e.g. editing an existing record)
    pub fn set_values(&mut self, doc: &mut Document, values: &Map<String, Value>) {
        for (key, value) in values {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other if self.field(key).is_some_and(|f| f.field_type == "json") => {
                    serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string())
                }
                other => other.to_string(),
            };
            self.input(doc, key, &text);
        }
    }

    fn store_parsed(&mut self, key: &str, field_type: &str, raw: &str) {
        match parse_value(field_type, raw) {
            Ok(value) => {
                self.parse_errors.remove(key);
                self.values.insert(key.to_string(), value);
            }
            Err(message) => {
                self.parse_errors.insert(key.to_string(), message.to_string());
                self.values.remove(key);
            }
        }
    }

    /// Recompute errors and write them inline; true when the form is valid
    pub fn validate(&mut self, doc: &mut Document) -> bool {
        self.errors.clear();
        for field in self.fields.iter().filter(|f| !f.component) {
            if let Some(message) = self.parse_errors.get(&field.key) {
                self.errors.insert(field.key.clone(), message.clone());
            } else if field.required && is_blank(self.values.get(&field.key)) {
                self.errors.insert(field.key.clone(), REQUIRED.to_string());
            }
        }
        self.render_errors(doc);
        self.errors.is_empty()
    }

    fn render_errors(&self, doc: &mut Document) {
        for field in &self.fields {
            let message = self.errors.get(&field.key).map(String::as_str).unwrap_or("");
            doc.set_text(field.error, message);
            doc.toggle_class(field.input, "is-invalid", !message.is_empty());
        }
    }

    /// Validate, then hand the values to `handler` unless busy
    ///
    /// The submit button stays disabled until the returned future
    /// completes or is dropped.
    pub fn submit<F, Fut>(
        &mut self,
        doc: &mut Document,
        handler: F,
    ) -> SubmitOutcome<impl Future<Output = Fut::Output>>
    where
        F: FnOnce(Map<String, Value>) -> Fut,
        Fut: Future,
    {
        if self.control.is_busy() {
            return SubmitOutcome::Busy;
        }
        if !self.validate(doc) {
            tracing::debug!(target: "form", errors = self.errors.len(), "submit blocked");
            return SubmitOutcome::Blocked(self.errors.clone());
        }
        let values = self.values.clone();
        match self.control.invoke(move || handler(values)) {
            Some(pending) => {
                self.sync(doc);
                SubmitOutcome::Started(pending)
            }
            None => SubmitOutcome::Busy,
        }
    }

    /// Reflect busy state into the submit button
    pub fn sync(&self, doc: &mut Document) {
        doc.set_disabled(self.submit_button, self.control.is_busy());
    }

    pub fn set_status(&self, doc: &mut Document, status: Option<&str>) {
        doc.set_text(self.status, status.unwrap_or(""));
        doc.toggle_class(self.status, "is-error", false);
    }

    pub fn status(&self, doc: &Document) -> Option<String> {
        doc.text(self.status)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Parse raw input text according to the field type
fn parse_value(field_type: &str, raw: &str) -> Result<Value, &'static str> {
    match field_type {
        "number" => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(Value::Null);
            }
            if let Ok(int) = trimmed.parse::<i64>() {
                return Ok(Value::from(int));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or(NOT_A_NUMBER)
        }
        "toggle" => Ok(Value::Bool(raw == "true")),
        "json" => {
            if raw.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(raw).map_err(|_| INVALID_JSON)
        }
        _ => Ok(Value::String(raw.to_string())),
    }
}

/// A form paired with its document, for [`crate::async_control::with_async_state`]
pub struct FormSubmit<'a> {
    pub form: &'a mut FormState,
    pub doc: &'a mut Document,
}

impl<T, E: fmt::Display> AsyncStateSink<T, E> for FormSubmit<'_> {
    fn set_loading(&mut self, loading: bool) {
        if loading {
            self.form.set_status(self.doc, Some("Saving..."));
        }
        self.form.sync(self.doc);
    }

    fn set_data(&mut self, _data: &T) {
        self.form.set_status(self.doc, None);
    }

    fn set_error(&mut self, error: &E) {
        self.form.set_status(self.doc, Some(&error.to_string()));
        self.doc.toggle_class(self.form.status, "is-error", true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::async_control::with_async_state;
    use futures::executor::block_on;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    fn fields(value: Value) -> Vec<FieldConfig> {
        serde_json::from_value(value).unwrap()
    }

    fn build(doc: &mut Document, value: Value) -> FormState {
        let registry = FieldRegistry::with_builtins();
        FormState::build(doc, &registry, &fields(value), "Save").unwrap().0
    }

    #[test]
    fn test_required_field_blocks_submit_with_inline_message() {
        let mut doc = Document::new();
        let mut form = build(
            &mut doc,
            json!([{"type": "text", "id": "name", "required": true}]),
        );
        let called = Rc::new(Cell::new(false));

        let flag = called.clone();
        let outcome = form.submit(&mut doc, move |_| {
            flag.set(true);
            async {}
        });

        match outcome {
            SubmitOutcome::Blocked(errors) => assert_eq!(errors["name"], "Required"),
            other => panic!("expected Blocked, got {:?}", other.is_started()),
        }
        assert!(!called.get());
        let error_node = doc.descendants_with_class(form.root(), classes::FIELD_ERROR)[0];
        assert_eq!(doc.text(error_node), Some("Required"));
    }

    #[test]
    fn test_values_parse_by_field_type() {
        let mut doc = Document::new();
        let mut form = build(
            &mut doc,
            json!([
                {"type": "number", "id": "age"},
                {"type": "toggle", "id": "admin"},
                {"type": "json", "id": "meta"},
                {"type": "text", "name": "Display Name"}
            ]),
        );

        form.input(&mut doc, "age", "42");
        form.input(&mut doc, "admin", "true");
        form.input(&mut doc, "meta", r#"{"a": 1}"#);
        form.input(&mut doc, "display_name", "Ada");

        assert_eq!(form.value("age"), Some(&json!(42)));
        assert_eq!(form.value("admin"), Some(&json!(true)));
        assert_eq!(form.value("meta"), Some(&json!({"a": 1})));
        assert_eq!(form.value("display_name"), Some(&json!("Ada")));
    }

    #[test]
    fn test_malformed_input_reported_and_cleared() {
        let mut doc = Document::new();
        let mut form = build(&mut doc, json!([{"type": "json", "id": "meta"}]));

        form.input(&mut doc, "meta", "{not json");
        assert!(!form.validate(&mut doc));
        assert_eq!(form.errors()["meta"], "Invalid JSON");

        form.input(&mut doc, "meta", "[1, 2]");
        assert!(form.validate(&mut doc));
        assert_eq!(form.value("meta"), Some(&json!([1, 2])));
    }

    #[test]
    fn test_submit_disables_button_until_done() {
        let mut doc = Document::new();
        let mut form = build(&mut doc, json!([{"type": "text", "id": "name"}]));
        form.input(&mut doc, "name", "x");

        let received = Rc::new(std::cell::RefCell::new(Map::new()));
        let sink = received.clone();
        let outcome = form.submit(&mut doc, move |values| {
            *sink.borrow_mut() = values;
            async { Ok::<_, String>(()) }
        });
        let SubmitOutcome::Started(pending) = outcome else {
            panic!("submit should start");
        };
        assert!(doc.is_disabled(form.submit_button()));
        assert!(matches!(
            form.submit(&mut doc, |_| async {}),
            SubmitOutcome::Busy
        ));

        let result = block_on(with_async_state(
            &mut FormSubmit {
                form: &mut form,
                doc: &mut doc,
            },
            pending,
        ));
        assert!(result.is_ok());
        assert!(!doc.is_disabled(form.submit_button()));
        assert_eq!(received.borrow()["name"], json!("x"));
    }

    #[test]
    fn test_failed_submit_shows_status_and_returns_error() {
        let mut doc = Document::new();
        let mut form = build(&mut doc, json!([{"type": "text", "id": "name"}]));
        let SubmitOutcome::Started(pending) =
            form.submit(&mut doc, |_| async { Err::<(), _>("server said no".to_string()) })
        else {
            panic!("submit should start");
        };

        let result = block_on(with_async_state(
            &mut FormSubmit {
                form: &mut form,
                doc: &mut doc,
            },
            pending,
        ));
        assert_eq!(result, Err("server said no".to_string()));
        assert_eq!(form.status(&doc).as_deref(), Some("server said no"));
        assert!(!form.control().is_busy());
    }

    #[test]
    fn test_unknown_field_type_leaves_nothing_behind() {
        let mut doc = Document::new();
        let before = doc.len();
        let registry = FieldRegistry::with_builtins();
        let err = FormState::build(
            &mut doc,
            &registry,
            &fields(json!([{"type": "text", "id": "a"}, {"type": "slider", "id": "b"}])),
            "Save",
        )
        .unwrap_err();

        assert!(matches!(err, FieldError::UnknownFieldType(_)));
        assert_eq!(doc.len(), before);
    }
}
