//! Payload schema validation.
//!
//! A resource declares a [`Schema`]: a typed list of fields its records
//! may carry. Validation walks the declared fields in order and produces
//! ordered [`ErrorDetail`]s, one per failing field, decoupled from any
//! JSON parser's exception text.
//!
//! The `id` and `last_modified` fields are never part of a schema: they
//! are server-assigned and client-supplied values are discarded before
//! validation (see the create/replace handlers).

use serde_json::Value;

use crate::error::{ErrorDetail, Location};

/// The JSON type a declared field must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// A JSON string.
    String,
    /// A JSON integer.
    Integer,
    /// Any JSON number.
    Number,
    /// A JSON boolean.
    Boolean,
    /// A JSON object.
    Object,
    /// A JSON array.
    Array,
}

impl FieldType {
    /// The type with its indefinite article, for error descriptions.
    fn indefinite(self) -> &'static str {
        match self {
            FieldType::String => "a string",
            FieldType::Integer => "an integer",
            FieldType::Number => "a number",
            FieldType::Boolean => "a boolean",
            FieldType::Object => "an object",
            FieldType::Array => "an array",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Object => value.is_object(),
            FieldType::Array => value.is_array(),
        }
    }
}

/// One declared record field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// The field name.
    pub name: String,
    /// The JSON type the field must hold.
    pub field_type: FieldType,
    /// Whether the field must be present on create/replace.
    pub required: bool,
}

/// A typed field list describing the records of a resource.
///
/// Unknown fields pass through untouched; only declared fields are
/// checked. Fields are validated in declaration order so that error
/// details come out in a stable, left-to-right order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// An empty schema accepting any object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an optional field.
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            field_type,
            required: false,
        });
        self
    }

    /// Declares a required field.
    pub fn required(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            field_type,
            required: true,
        });
        self
    }

    /// Validates a full record payload (create/replace semantics):
    /// required fields must be present, declared fields must hold the
    /// declared type.
    pub fn validate(&self, data: &Value) -> Vec<ErrorDetail> {
        self.check(data, true)
    }

    /// Validates a partial payload (modify semantics): only provided
    /// fields are checked, absence is fine.
    pub fn validate_partial(&self, data: &Value) -> Vec<ErrorDetail> {
        self.check(data, false)
    }

    fn check(&self, data: &Value, require: bool) -> Vec<ErrorDetail> {
        let mut details = Vec::new();
        for spec in &self.fields {
            match data.get(&spec.name) {
                None | Some(Value::Null) => {
                    if require && spec.required {
                        details.push(ErrorDetail::named(
                            Location::Body,
                            format!("data.{}", spec.name),
                            format!("{} is missing", spec.name),
                        ));
                    }
                }
                Some(value) => {
                    if !spec.field_type.matches(value) {
                        details.push(ErrorDetail::named(
                            Location::Body,
                            format!("data.{}", spec.name),
                            format!(
                                "{} is not {}",
                                value_repr(value),
                                spec.field_type.indefinite()
                            ),
                        ));
                    }
                }
            }
        }
        details
    }
}

/// A failing value as it appears in error descriptions: strings
/// unquoted, everything else in its JSON form.
fn value_repr(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
