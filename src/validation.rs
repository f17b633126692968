//! Payload validation
//!
//! Turns an untyped JSON value into a typed payload, collecting an error for
//! every offending field instead of stopping at the first one. Field paths use
//! dotted keys and bracketed indices, e.g. `exercises[0].sets[1].reps`.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub const MSG_REQUIRED: &str = "field required";
pub const MSG_STRING: &str = "must be a string";
pub const MSG_NUMBER: &str = "must be a number";
pub const MSG_INTEGER: &str = "must be an integer";
pub const MSG_INTEGER_RANGE: &str = "must fit in a 32-bit integer";
pub const MSG_LIST: &str = "must be a list";
pub const MSG_OBJECT: &str = "must be an object";

/// Path reported for errors on the payload itself.
pub const ROOT_FIELD: &str = "body";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[error("{}", join_errors(.0))]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Errors reported for one field path.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> {
        self.0.iter().filter(move |e| e.field == field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.for_field(field).next().is_some()
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }
}

/// A payload that can be built from a decoded JSON value.
pub trait FromPayload: Sized {
    /// Read `value` located at `path`, recording failures in `validator`.
    /// Returns `None` whenever anything under `path` failed.
    fn read(validator: &mut Validator, path: &str, value: &Value) -> Option<Self>;

    fn from_payload(payload: &Value) -> Result<Self, ValidationErrors> {
        let mut validator = Validator::default();
        let parsed = Self::read(&mut validator, "", payload);
        validator.finish(parsed)
    }
}

/// Implements `TryFrom<serde_json::Value>` through `FromPayload`, so a type
/// marked `#[serde(try_from = "serde_json::Value")]` cannot be deserialized
/// without passing its payload rules.
macro_rules! payload_try_from_value {
    ($($ty:ty),+ $(,)?) => {$(
        impl TryFrom<serde_json::Value> for $ty {
            type Error = $crate::validation::ValidationErrors;

            fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
                <$ty as $crate::validation::FromPayload>::from_payload(&value)
            }
        }
    )+};
}
pub(crate) use payload_try_from_value;

pub fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

pub fn index_path(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn reject(&mut self, path: &str, message: impl Into<String>) {
        let field = if path.is_empty() {
            ROOT_FIELD.to_string()
        } else {
            path.to_string()
        };
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn object<'v>(&mut self, path: &str, value: &'v Value) -> Option<&'v Map<String, Value>> {
        match value.as_object() {
            Some(obj) => Some(obj),
            None => {
                self.reject(path, MSG_OBJECT);
                None
            }
        }
    }

    fn required<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Option<(String, &'v Value)> {
        let field = child_path(path, key);
        match obj.get(key) {
            Some(value) => Some((field, value)),
            None => {
                self.reject(&field, MSG_REQUIRED);
                None
            }
        }
    }

    pub fn string(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<String> {
        let (field, value) = self.required(obj, path, key)?;
        match value {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.reject(&field, MSG_STRING);
                None
            }
        }
    }

    pub fn float(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<f64> {
        let (field, value) = self.required(obj, path, key)?;
        self.float_value(&field, value)
    }

    /// Absent and `null` both read as `None`.
    pub fn nullable_float(
        &mut self,
        obj: &Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Option<Option<f64>> {
        match obj.get(key) {
            None | Some(Value::Null) => Some(None),
            Some(value) => self.float_value(&child_path(path, key), value).map(Some),
        }
    }

    pub fn integer(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<i32> {
        let (field, value) = self.required(obj, path, key)?;
        self.integer_value(&field, value)
    }

    /// Absent and `null` both read as `None`.
    pub fn nullable_integer(
        &mut self,
        obj: &Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Option<Option<i32>> {
        match obj.get(key) {
            None | Some(Value::Null) => Some(None),
            Some(value) => self.integer_value(&child_path(path, key), value).map(Some),
        }
    }

    /// Reads every element even after a failure so all element errors are reported.
    pub fn list<T: FromPayload>(
        &mut self,
        obj: &Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Option<Vec<T>> {
        let (field, value) = self.required(obj, path, key)?;
        let Some(items) = value.as_array() else {
            self.reject(&field, MSG_LIST);
            return None;
        };

        let mut parsed = Vec::with_capacity(items.len());
        let mut ok = true;
        for (index, item) in items.iter().enumerate() {
            match T::read(self, &index_path(&field, index), item) {
                Some(value) if ok => parsed.push(value),
                Some(_) => {}
                None => ok = false,
            }
        }
        ok.then_some(parsed)
    }

    fn float_value(&mut self, field: &str, value: &Value) -> Option<f64> {
        match value.as_f64() {
            Some(n) => Some(n),
            None => {
                self.reject(field, MSG_NUMBER);
                None
            }
        }
    }

    fn integer_value(&mut self, field: &str, value: &Value) -> Option<i32> {
        let in_range = match value {
            Value::Number(number) => match number.as_i64() {
                Some(n) => i32::try_from(n).ok(),
                // 5.0 is accepted as 5
                None => match number.as_f64() {
                    Some(f) if f.fract() == 0.0 => {
                        (f >= i32::MIN as f64 && f <= i32::MAX as f64).then_some(f as i32)
                    }
                    _ => {
                        self.reject(field, MSG_INTEGER);
                        return None;
                    }
                },
            },
            _ => {
                self.reject(field, MSG_INTEGER);
                return None;
            }
        };

        if in_range.is_none() {
            self.reject(field, MSG_INTEGER_RANGE);
        }
        in_range
    }

    pub fn finish<T>(self, value: Option<T>) -> Result<T, ValidationErrors> {
        match value {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(ValidationErrors(self.errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Pair {
        name: String,
        count: i32,
    }

    impl FromPayload for Pair {
        fn read(v: &mut Validator, path: &str, value: &Value) -> Option<Self> {
            let obj = v.object(path, value)?;
            let name = v.string(obj, path, "name");
            let count = v.integer(obj, path, "count");
            Some(Self {
                name: name?,
                count: count?,
            })
        }
    }

    #[test]
    fn test_child_and_index_paths() {
        assert_eq!(child_path("", "name"), "name");
        assert_eq!(child_path("exercises[0]", "sets"), "exercises[0].sets");
        assert_eq!(index_path("sets", 2), "sets[2]");
    }

    #[test]
    fn test_valid_payload() {
        let pair = Pair::from_payload(&json!({"name": "squat", "count": 3})).unwrap();
        assert_eq!(pair.name, "squat");
        assert_eq!(pair.count, 3);
    }

    #[test]
    fn test_reports_every_failing_field() {
        let errors = Pair::from_payload(&json!({"count": "three"}))
            .err()
            .unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.for_field("name").next().unwrap().message, MSG_REQUIRED);
        assert_eq!(errors.for_field("count").next().unwrap().message, MSG_INTEGER);
    }

    #[test]
    fn test_non_object_is_reported_on_root() {
        let errors = Pair::from_payload(&json!([1, 2])).err().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors.has_field(ROOT_FIELD));
    }

    #[test]
    fn test_integer_accepts_whole_floats() {
        let pair = Pair::from_payload(&json!({"name": "x", "count": 5.0})).unwrap();
        assert_eq!(pair.count, 5);
    }

    #[test]
    fn test_integer_rejects_fractions_and_overflow() {
        let errors = Pair::from_payload(&json!({"name": "x", "count": 2.5}))
            .err()
            .unwrap();
        assert_eq!(errors.for_field("count").next().unwrap().message, MSG_INTEGER);

        let errors = Pair::from_payload(&json!({"name": "x", "count": 1_i64 << 40}))
            .err()
            .unwrap();
        assert_eq!(
            errors.for_field("count").next().unwrap().message,
            MSG_INTEGER_RANGE
        );
    }

    #[test]
    fn test_bool_is_not_a_number() {
        let mut v = Validator::default();
        let obj = json!({"w": true});
        let result = v.float(obj.as_object().unwrap(), "", "w");
        assert!(result.is_none());
        let errors = v.finish::<()>(None).err().unwrap();
        assert_eq!(errors.for_field("w").next().unwrap().message, MSG_NUMBER);
    }

    #[test]
    fn test_display_joins_errors() {
        let errors = Pair::from_payload(&json!({})).err().unwrap();
        assert_eq!(
            errors.to_string(),
            "name: field required; count: field required"
        );
    }
}
