//! The schema model base: closed, declaratively described records.
//!
//! A schema declares its fields once in a static [`FieldSpec`] table and reads
//! them through a [`Record`]. The record rejects undeclared keys, coerces each
//! field to its declared type, and collects every failure with its dotted
//! path instead of stopping at the first one. Field metadata feeds
//! [`describe`] and is never consulted for validation.

use crate::error::{ErrorKind, ValidationError};
use crate::registry::Variant;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Declaration of a single schema field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    /// Default value as written in documentation, for optional fields.
    pub default: Option<&'static str>,
    pub description: &'static str,
    pub examples: &'static [&'static str],
}

impl FieldSpec {
    pub const fn required(name: &'static str, description: &'static str) -> Self {
        FieldSpec {
            name,
            required: true,
            default: None,
            description,
            examples: &[],
        }
    }

    pub const fn optional(
        name: &'static str,
        default: &'static str,
        description: &'static str,
    ) -> Self {
        FieldSpec {
            name,
            required: false,
            default: Some(default),
            description,
            examples: &[],
        }
    }

    pub const fn examples(self, examples: &'static [&'static str]) -> Self {
        FieldSpec { examples, ..self }
    }
}

/// A structured record validated field by field.
pub trait Schema: Sized {
    const NAME: &'static str;
    const DESCRIPTION: &'static str = "";
    const FIELDS: &'static [FieldSpec];

    /// Read every declared field from `record`.
    ///
    /// Implementations read all fields before combining them so that sibling
    /// errors are all reported.
    fn from_record(record: &mut Record<'_>) -> Option<Self>;

    /// Validate `value` as this schema, appending errors rooted at `path`.
    ///
    /// Returns `None` whenever at least one error was recorded for this value.
    fn validate(value: &Value, path: &str, errors: &mut Vec<ValidationError>) -> Option<Self> {
        let before = errors.len();
        let parsed = {
            let mut record = Record::open(value, path, Self::FIELDS, errors)?;
            Self::from_record(&mut record)
        };
        if errors.len() > before { None } else { parsed }
    }
}

/// Append `field` to a dotted path.
pub fn join_path(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}

/// Append a list index to a path.
pub fn index_path(path: &str, index: usize) -> String {
    format!("{}[{}]", path, index)
}

/// Short description of a value's shape, for type errors.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// Coerce a raw value to `T` through serde, recording a type error on failure.
///
/// A scalar that does not deserialize as written is retried once in its
/// [`relaxed`] form, so `"50"` reads as a number and `5` as a string. The
/// reported error is always the one for the value as written.
pub fn coerce<T: DeserializeOwned>(
    value: &Value,
    path: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<T> {
    let err = match serde_json::from_value(value.clone()) {
        Ok(v) => return Some(v),
        Err(e) => e,
    };
    if let Some(Ok(v)) = relaxed(value).map(serde_json::from_value::<T>) {
        return Some(v);
    }
    errors.push(ValidationError::new(ErrorKind::Type, path, err.to_string()));
    None
}

/// The other scalar spelling of `value`: numeric strings become numbers,
/// numbers and booleans become strings. Anything else has none.
fn relaxed(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<i64>() {
                Some(Value::from(n))
            } else if let Ok(n) = s.parse::<u64>() {
                Some(Value::from(n))
            } else {
                s.parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
            }
        }
        Value::Number(n) => Some(Value::String(n.to_string())),
        Value::Bool(b) => Some(Value::String(b.to_string())),
        _ => None,
    }
}

/// Field reader over one mapping of a document.
pub struct Record<'a> {
    fields: &'a Map<String, Value>,
    path: &'a str,
    errors: &'a mut Vec<ValidationError>,
}

impl<'a> Record<'a> {
    /// Open `value` as a record declaring `specs`.
    ///
    /// Fails with a type error when `value` is not a mapping. Undeclared keys
    /// are reported as unknown fields but do not prevent reading the rest.
    pub fn open(
        value: &'a Value,
        path: &'a str,
        specs: &'static [FieldSpec],
        errors: &'a mut Vec<ValidationError>,
    ) -> Option<Self> {
        let Some(fields) = value.as_object() else {
            errors.push(ValidationError::new(
                ErrorKind::Type,
                path,
                format!("expected a mapping, got {}", value_kind(value)),
            ));
            return None;
        };

        for key in fields.keys() {
            if !specs.iter().any(|spec| spec.name == key) {
                errors.push(ValidationError::new(
                    ErrorKind::UnknownField,
                    join_path(path, key),
                    "extra fields not permitted",
                ));
            }
        }

        Some(Record {
            fields,
            path,
            errors,
        })
    }

    /// Path of a field of this record.
    pub fn path(&self, name: &str) -> String {
        join_path(self.path, name)
    }

    /// The raw value of a field, if present.
    pub fn raw(&self, name: &str) -> Option<&'a Value> {
        self.fields.get(name)
    }

    pub fn error(&mut self, kind: ErrorKind, path: String, message: impl Into<String>) {
        self.errors.push(ValidationError::new(kind, path, message));
    }

    fn missing(&mut self, name: &str) {
        let path = self.path(name);
        self.error(ErrorKind::Missing, path, "field required");
    }

    pub fn required<T: DeserializeOwned>(&mut self, name: &str) -> Option<T> {
        match self.raw(name) {
            Some(value) => coerce(value, &self.path(name), self.errors),
            None => {
                self.missing(name);
                None
            }
        }
    }

    pub fn optional<T: DeserializeOwned>(&mut self, name: &str, default: T) -> Option<T> {
        match self.raw(name) {
            Some(value) => coerce(value, &self.path(name), self.errors),
            None => Some(default),
        }
    }

    /// Nested schema stored under a required field.
    pub fn schema<S: Schema>(&mut self, name: &str) -> Option<S> {
        match self.raw(name) {
            Some(value) => S::validate(value, &self.path(name), self.errors),
            None => {
                self.missing(name);
                None
            }
        }
    }

    /// List field whose items are validated one by one with `item`.
    ///
    /// An absent optional list reads as empty. Item paths carry their index.
    pub fn list_with<T>(
        &mut self,
        name: &str,
        required: bool,
        mut item: impl FnMut(&Value, &str, &mut Vec<ValidationError>) -> Option<T>,
    ) -> Option<Vec<T>> {
        let path = self.path(name);
        let Some(value) = self.raw(name) else {
            if required {
                self.missing(name);
                return None;
            }
            return Some(Vec::new());
        };
        let Some(elements) = value.as_array() else {
            let message = format!("expected a list, got {}", value_kind(value));
            self.error(ErrorKind::Type, path, message);
            return None;
        };

        let before = self.errors.len();
        let mut out = Vec::with_capacity(elements.len());
        for (i, element) in elements.iter().enumerate() {
            if let Some(v) = item(element, &index_path(&path, i), &mut *self.errors) {
                out.push(v);
            }
        }
        (self.errors.len() == before).then_some(out)
    }

    /// Optional list of serde-coercible items.
    pub fn list<T: DeserializeOwned>(&mut self, name: &str) -> Option<Vec<T>> {
        self.list_with(name, false, coerce::<T>)
    }

    /// List of nested schemas.
    pub fn schema_list<S: Schema>(&mut self, name: &str, required: bool) -> Option<Vec<S>> {
        self.list_with(name, required, S::validate)
    }

    /// Enforce a minimum length on an already-read list.
    pub fn min_items<T>(&mut self, name: &str, items: Option<Vec<T>>, min: usize) -> Option<Vec<T>> {
        let items = items?;
        if items.len() < min {
            let path = self.path(name);
            let message = format!(
                "ensure this list has at least {} item{}",
                min,
                if min == 1 { "" } else { "s" }
            );
            self.error(ErrorKind::Cardinality, path, message);
            return None;
        }
        Some(items)
    }

    /// Enforce a constraint on an already-read value, as a type error.
    pub fn check<T>(
        &mut self,
        name: &str,
        value: Option<T>,
        valid: impl FnOnce(&T) -> bool,
        message: &str,
    ) -> Option<T> {
        let value = value?;
        if valid(&value) {
            Some(value)
        } else {
            let path = self.path(name);
            self.error(ErrorKind::Type, path, message);
            None
        }
    }

    /// Resolve a discriminator field against the registry of `V`.
    pub fn discriminator<V: Variant>(&mut self, name: &str) -> Option<V> {
        let path = self.path(name);
        let Some(value) = self.raw(name) else {
            self.missing(name);
            return None;
        };
        let Some(tag) = value.as_str() else {
            let message = format!("{} must be a string, got {}", V::REGISTRY, value_kind(value));
            self.error(ErrorKind::Type, path, message);
            return None;
        };
        match V::from_tag(tag) {
            Ok(variant) => Some(variant),
            Err(e) => {
                self.error(ErrorKind::Discriminator, path, e.to_string());
                None
            }
        }
    }

    /// Validate the payload stored under `name` against the schema selected by
    /// an already-resolved discriminator.
    ///
    /// An absent or null payload reads as an empty mapping. Every error raised
    /// inside the payload is reported as a dependent-payload error that names
    /// the selecting tag.
    pub fn dependent<V: Variant>(&mut self, variant: V, name: &str) -> Option<V::Payload> {
        let path = self.path(name);
        let empty = Value::Object(Map::new());
        let value = match self.raw(name) {
            None | Some(Value::Null) => &empty,
            Some(value) => value,
        };

        let mut payload_errors = Vec::new();
        let payload = variant.resolve(value, &path, &mut payload_errors);
        self.errors
            .extend(payload_errors.into_iter().map(|e| ValidationError {
                kind: ErrorKind::DependentPayload,
                message: format!("{} '{}': {}", V::REGISTRY, variant.tag(), e.message),
                path: e.path,
            }));
        payload
    }
}

/// Render the field reference of a schema as markdown.
pub fn describe<S: Schema>() -> String {
    let mut out = format!("## {}\n\n", S::NAME);
    if !S::DESCRIPTION.is_empty() {
        out.push_str(S::DESCRIPTION);
        out.push_str("\n\n");
    }
    if S::FIELDS.is_empty() {
        out.push_str("This schema has no fields.\n");
        return out;
    }

    out.push_str("| Field | Required | Default | Description |\n");
    out.push_str("|-------|----------|---------|-------------|\n");
    for field in S::FIELDS {
        out.push_str(&format!(
            "| `{}` | {} | {} | {} |\n",
            field.name,
            if field.required { "yes" } else { "no" },
            field.default.map(|d| format!("`{}`", d)).unwrap_or_default(),
            field.description
        ));
    }

    let with_examples: Vec<_> = S::FIELDS.iter().filter(|f| !f.examples.is_empty()).collect();
    if !with_examples.is_empty() {
        out.push_str("\nExamples:\n\n");
        for field in with_examples {
            out.push_str(&format!("- `{}`: {}\n", field.name, field.examples.join(", ")));
        }
    }
    out
}
