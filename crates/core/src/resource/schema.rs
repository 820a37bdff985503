use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::validation::{is_email, ValidationErrors};

/// Keys the store owns; stripped from bodies instead of rejected so clients
/// can send back what they fetched.
pub const RESERVED_KEYS: [&str; 3] = ["id", "createdAt", "updatedAt"];

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Number,
    /// Non-negative whole number.
    Integer,
    Boolean,
    TextList,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: false,
        }
    }

    fn check(&self, value: &Value) -> Result<(), &'static str> {
        match self.ty {
            FieldType::Text => match value.as_str() {
                Some(text) if self.required && text.trim().is_empty() => Err("must not be empty"),
                Some(_) => Ok(()),
                None => Err("must be a string"),
            },
            FieldType::Number => match value {
                Value::Number(_) => Ok(()),
                _ => Err("must be a number"),
            },
            FieldType::Integer => match value.as_u64() {
                Some(_) => Ok(()),
                None => Err("must be a non-negative integer"),
            },
            FieldType::Boolean => match value {
                Value::Bool(_) => Ok(()),
                _ => Err("must be a boolean"),
            },
            FieldType::TextList => match value.as_array() {
                Some(items) if !items.iter().all(Value::is_string) => {
                    Err("must be an array of strings")
                }
                Some(items) if self.required && items.is_empty() => Err("must not be empty"),
                Some(_) => Ok(()),
                None => Err("must be an array of strings"),
            },
            FieldType::Date => match value.as_str() {
                Some(text) if NaiveDate::parse_from_str(text, DATE_FORMAT).is_ok() => Ok(()),
                _ => Err("must be a date formatted YYYY-MM-DD"),
            },
            FieldType::Email => match value.as_str() {
                Some(text) if is_email(text) => Ok(()),
                _ => Err("must be a valid email address"),
            },
        }
    }
}

/// The field list of one resource family.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    fields: &'static [FieldSpec],
}

impl Schema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate a full body for creation: required fields must be present.
    pub fn validate_create(&self, body: &Value) -> Result<Map<String, Value>, ValidationErrors> {
        self.validate(body, true)
    }

    /// Validate a partial body for update: only supplied fields are checked.
    pub fn validate_patch(&self, body: &Value) -> Result<Map<String, Value>, ValidationErrors> {
        self.validate(body, false)
    }

    fn validate(
        &self,
        body: &Value,
        require_all: bool,
    ) -> Result<Map<String, Value>, ValidationErrors> {
        let Some(object) = body.as_object() else {
            return Err(ValidationErrors::single("body", "must be a JSON object"));
        };

        let mut errors = ValidationErrors::new();
        let mut accepted = Map::with_capacity(object.len());

        for (key, value) in object {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            let Some(spec) = self.field(key) else {
                errors.push(key.as_str(), "is not a known field");
                continue;
            };
            if value.is_null() {
                if spec.required {
                    errors.push(spec.name, "is required");
                } else {
                    accepted.insert(key.clone(), Value::Null);
                }
                continue;
            }
            match spec.check(value) {
                Ok(()) => {
                    accepted.insert(key.clone(), value.clone());
                }
                Err(message) => errors.push(spec.name, message),
            }
        }

        if require_all {
            for spec in self.fields.iter().filter(|f| f.required) {
                if !object.contains_key(spec.name) {
                    errors.push(spec.name, "is required");
                }
            }
        }

        errors.into_result(accepted)
    }
}
