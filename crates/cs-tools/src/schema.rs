//! Tool parameter schemas
//!
//! Every tool declares its parameters as a [`ParameterSchema`]. Raw JSON
//! arguments (from the model or an HTTP body) are validated once at the
//! registry boundary into [`Parameters`], a map of [`ParamValue`]s, so tool
//! bodies never inspect untyped JSON.

use cs_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Primitive type of a declared parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamKind {
    fn json_type(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
        }
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub required: bool,
    pub description: String,
}

/// Ordered list of declared parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    params: Vec<ParamSpec>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(self, name: &str, kind: ParamKind, description: &str) -> Self {
        self.with(name, kind, true, description)
    }

    pub fn optional(self, name: &str, kind: ParamKind, description: &str) -> Self {
        self.with(name, kind, false, description)
    }

    fn with(mut self, name: &str, kind: ParamKind, required: bool, description: &str) -> Self {
        self.params.retain(|p| p.name != name);
        self.params.push(ParamSpec {
            name: name.to_string(),
            kind,
            required,
            description: description.to_string(),
        });
        self
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// JSON Schema object advertised to the model
    pub fn to_json(&self) -> Value {
        let mut properties = Map::new();
        for spec in &self.params {
            properties.insert(
                spec.name.clone(),
                json!({
                    "type": spec.kind.json_type(),
                    "description": spec.description,
                }),
            );
        }
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Validate raw arguments. `null` is treated as an empty object and
    /// undeclared fields are ignored.
    pub fn validate(&self, args: &Value) -> Result<Parameters> {
        let empty = Map::new();
        let object = match args {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(Error::invalid_argument(format!(
                    "expected an object of arguments, got {}",
                    other
                )))
            }
        };

        let mut values = BTreeMap::new();
        for spec in &self.params {
            match object.get(&spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        return Err(Error::missing_parameter(&spec.name));
                    }
                }
                Some(raw) => {
                    let value = ParamValue::coerce(spec.kind, raw).ok_or_else(|| {
                        Error::invalid_argument(format!(
                            "'{}' must be a {}, got {}",
                            spec.name,
                            spec.kind.json_type(),
                            raw
                        ))
                    })?;
                    if spec.required && value.is_blank() {
                        return Err(Error::missing_parameter(&spec.name));
                    }
                    values.insert(spec.name.clone(), value);
                }
            }
        }

        Ok(Parameters(values))
    }
}

/// A validated argument value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ParamValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
}

impl ParamValue {
    fn coerce(kind: ParamKind, raw: &Value) -> Option<Self> {
        match (kind, raw) {
            (ParamKind::String, Value::String(s)) => Some(ParamValue::String(s.trim().to_string())),
            (ParamKind::String, Value::Number(n)) => Some(ParamValue::String(n.to_string())),
            (ParamKind::Integer, Value::Number(n)) => n.as_i64().map(ParamValue::Integer),
            (ParamKind::Integer, Value::String(s)) => s.trim().parse().ok().map(ParamValue::Integer),
            (ParamKind::Number, Value::Number(n)) => n.as_f64().map(ParamValue::Number),
            (ParamKind::Number, Value::String(s)) => s.trim().parse().ok().map(ParamValue::Number),
            (ParamKind::Boolean, Value::Bool(b)) => Some(ParamValue::Boolean(*b)),
            (ParamKind::Boolean, Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" => Some(ParamValue::Boolean(true)),
                "false" | "no" => Some(ParamValue::Boolean(false)),
                _ => None,
            },
            _ => None,
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, ParamValue::String(s) if s.is_empty())
    }

    pub fn to_json(&self) -> Value {
        match self {
            ParamValue::String(s) => Value::String(s.clone()),
            ParamValue::Integer(i) => json!(i),
            ParamValue::Number(n) => json!(n),
            ParamValue::Boolean(b) => Value::Bool(*b),
        }
    }
}

/// Validated arguments for one tool call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters(BTreeMap<String, ParamValue>);

impl Parameters {
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(ParamValue::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.0.get(name) {
            Some(ParamValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn get_u32(&self, name: &str) -> Option<u32> {
        self.get_i64(name).and_then(|i| u32::try_from(i).ok())
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.0.get(name) {
            Some(ParamValue::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Plain JSON view, used for `ToolCall` records
    pub fn to_json_map(&self) -> BTreeMap<String, Value> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking_schema() -> ParameterSchema {
        ParameterSchema::new()
            .required("date", ParamKind::String, "Date")
            .required("time", ParamKind::String, "Start time")
            .optional("court", ParamKind::Integer, "Court number")
    }

    #[test]
    fn test_schema_json() {
        let schema = booking_schema().to_json();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["court"]["type"], "integer");
        assert_eq!(schema["required"], json!(["date", "time"]));
    }

    #[test]
    fn test_validate_coerces_numeric_strings() {
        let params = booking_schema()
            .validate(&json!({"date": "20 Oct 26", "time": "18:00", "court": "3"}))
            .unwrap();
        assert_eq!(params.get_u32("court"), Some(3));
        assert_eq!(params.get_str("time"), Some("18:00"));
    }

    #[test]
    fn test_validate_ignores_unknown_fields() {
        let params = booking_schema()
            .validate(&json!({"date": "20 Oct 26", "time": "18:00", "colour": "red"}))
            .unwrap();
        assert!(params.get("colour").is_none());
        assert_eq!(params.to_json_map().len(), 2);
    }

    #[test]
    fn test_validate_missing_required() {
        let err = booking_schema()
            .validate(&json!({"date": "20 Oct 26"}))
            .unwrap_err();
        assert!(matches!(err, Error::MissingParameter(ref name) if name == "time"));

        let err = booking_schema()
            .validate(&json!({"date": "20 Oct 26", "time": "  "}))
            .unwrap_err();
        assert!(matches!(err, Error::MissingParameter(_)));
    }

    #[test]
    fn test_validate_wrong_type() {
        let err = booking_schema()
            .validate(&json!({"date": "20 Oct 26", "time": "18:00", "court": "two"}))
            .unwrap_err();
        assert!(err.to_string().contains("'court' must be a integer"));
    }

    #[test]
    fn test_validate_null_and_non_object() {
        let schema = ParameterSchema::new().optional("date", ParamKind::String, "Date");
        assert!(schema.validate(&Value::Null).unwrap().is_empty());
        assert!(schema.validate(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_redeclaring_a_parameter_replaces_it() {
        let schema = ParameterSchema::new()
            .optional("box", ParamKind::String, "Box")
            .optional("box", ParamKind::Integer, "Box number");
        assert_eq!(schema.params().len(), 1);
        assert_eq!(schema.params()[0].kind, ParamKind::Integer);
    }
}
