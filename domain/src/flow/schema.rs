//! Typed schemas for flow inputs and outputs.
//!
//! A [`Schema`] describes a JSON object. [`Schema::validate`] reports the
//! first offending field by path (`history[1].role`, `bedrooms`, or `$`
//! for the root value).

use serde_json::{Map, Value};
use thiserror::Error;

/// A value failed schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field `{field}`: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn root(message: impl Into<String>) -> Self {
        Self::new("$", message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Array(Box<FieldType>),
    Object(Schema),
}

impl FieldType {
    pub fn array_of(item: FieldType) -> Self {
        FieldType::Array(Box::new(item))
    }

    fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array(_) => "array",
            FieldType::Object(_) => "object",
        }
    }

    fn check(&self, path: &str, value: &Value, required: bool) -> Result<(), ValidationError> {
        let mismatch = || ValidationError::new(path, format!("expected {}", self.type_name()));
        match self {
            FieldType::String => {
                let s = value.as_str().ok_or_else(mismatch)?;
                if required && s.trim().is_empty() {
                    return Err(ValidationError::new(path, "must not be empty"));
                }
                Ok(())
            }
            FieldType::Integer => {
                if value.is_i64() || value.is_u64() {
                    Ok(())
                } else {
                    Err(mismatch())
                }
            }
            FieldType::Number => value.is_number().then_some(()).ok_or_else(mismatch),
            FieldType::Boolean => value.is_boolean().then_some(()).ok_or_else(mismatch),
            FieldType::Array(item) => {
                let items = value.as_array().ok_or_else(mismatch)?;
                for (i, v) in items.iter().enumerate() {
                    item.check(&format!("{}[{}]", path, i), v, true)?;
                }
                Ok(())
            }
            FieldType::Object(schema) => {
                let map = value.as_object().ok_or_else(mismatch)?;
                schema.check_object(Some(path), map)
            }
        }
    }

    fn json_schema(&self, description: Option<&str>) -> Value {
        let mut out = match self {
            FieldType::Array(item) => serde_json::json!({
                "type": "array",
                "items": item.json_schema(None),
            }),
            FieldType::Object(schema) => schema.to_json_schema(),
            scalar => serde_json::json!({ "type": scalar.type_name() }),
        };
        if let (Some(desc), Some(obj)) = (description, out.as_object_mut()) {
            obj.insert("description".to_string(), Value::String(desc.to_string()));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    pub description: String,
}

/// Shape of a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: &str, field_type: FieldType, description: &str) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            field_type,
            required: true,
            description: description.to_string(),
        });
        self
    }

    pub fn optional(mut self, name: &str, field_type: FieldType, description: &str) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            field_type,
            required: false,
            description: description.to_string(),
        });
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate a JSON value against this schema.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let map = value
            .as_object()
            .ok_or_else(|| ValidationError::root("expected an object"))?;
        self.check_object(None, map)
    }

    fn check_object(&self, prefix: Option<&str>, map: &Map<String, Value>) -> Result<(), ValidationError> {
        let path_of = |name: &str| match prefix {
            Some(p) => format!("{}.{}", p, name),
            None => name.to_string(),
        };

        for field in &self.fields {
            let path = path_of(&field.name);
            match map.get(&field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(ValidationError::new(path, "is required"));
                }
                None | Some(Value::Null) => {}
                Some(value) => field.field_type.check(&path, value, field.required)?,
            }
        }

        if let Some(unknown) = map.keys().find(|k| self.field(k).is_none()) {
            return Err(ValidationError::new(path_of(unknown), "unexpected field"));
        }

        Ok(())
    }

    /// JSON schema (OpenAPI subset) describing this object.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &self.fields {
            properties.insert(
                field.name.clone(),
                field.field_type.json_schema(Some(&field.description)),
            );
            if field.required {
                required.push(Value::String(field.name.clone()));
            }
        }
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}
