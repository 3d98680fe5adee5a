//! Argument validation used at every public constructor and setter boundary.
//!
//! Every check is pure and synchronous. Callers run all checks for an
//! operation before mutating anything, so a failed check never leaves an
//! object half-updated.
//!
//! Most structural invariants are carried by the type system (unsigned sizes,
//! closed enums, non-`Option` fields). The runtime checks here cover what the
//! types cannot: empty strings, numeric ranges on values read from a driver,
//! and JSON payloads crossing the external boundary.

use std::fmt::Debug;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{EyesError, Result};

/// Fails if `param` equals the sentinel `value`.
pub fn not_equal<T: PartialEq + Debug>(param: &T, value: &T, param_name: &str) -> Result<()> {
    if param == value {
        return Err(EyesError::illegal_argument(format!(
            "{param_name} === {value:?}"
        )));
    }
    Ok(())
}

/// Fails if `param` contains anything other than ASCII letters and digits.
pub fn alphanumeric(param: &str, param_name: &str) -> Result<()> {
    if param.is_empty() || !param.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(EyesError::illegal_argument(format!(
            "{param_name} is not alphanumeric"
        )));
    }
    Ok(())
}

pub fn not_null<T>(param: Option<&T>, param_name: &str) -> Result<()> {
    if param.is_none() {
        return Err(EyesError::illegal_argument(format!(
            "{param_name} is null or undefined"
        )));
    }
    Ok(())
}

pub fn is_null<T>(param: Option<&T>, param_name: &str) -> Result<()> {
    if param.is_some() {
        return Err(EyesError::illegal_argument(format!(
            "{param_name} is not null or undefined"
        )));
    }
    Ok(())
}

pub fn not_null_or_empty(param: Option<&str>, param_name: &str) -> Result<()> {
    match param {
        Some(value) if !value.is_empty() => Ok(()),
        _ => Err(EyesError::illegal_argument(format!(
            "{param_name} is null or empty"
        ))),
    }
}

pub fn greater_than_or_equal_to_zero(param: f64, param_name: &str, is_integer: bool) -> Result<()> {
    if is_integer {
        self::is_integer(param, param_name)?;
    }
    if param.is_nan() || param < 0.0 {
        return Err(EyesError::illegal_argument(format!("{param_name} < 0")));
    }
    Ok(())
}

pub fn greater_than_zero(param: f64, param_name: &str, is_integer: bool) -> Result<()> {
    if is_integer {
        self::is_integer(param, param_name)?;
    }
    if param.is_nan() || param <= 0.0 {
        return Err(EyesError::illegal_argument(format!("{param_name} < 1")));
    }
    Ok(())
}

pub fn not_zero(param: f64, param_name: &str, is_integer: bool) -> Result<()> {
    if is_integer {
        self::is_integer(param, param_name)?;
    }
    if param == 0.0 {
        return Err(EyesError::illegal_argument(format!("{param_name} === 0")));
    }
    Ok(())
}

pub fn is_integer(param: f64, param_name: &str) -> Result<()> {
    if !param.is_finite() || param.fract() != 0.0 {
        return Err(EyesError::illegal_argument(format!(
            "{param_name} is not integer"
        )));
    }
    Ok(())
}

pub fn is_string(param: &Value, param_name: &str) -> Result<()> {
    if !param.is_string() {
        return Err(EyesError::illegal_type(format!(
            "{param_name} `{param}` is not a string"
        )));
    }
    Ok(())
}

pub fn is_base64(param: &str, param_name: &str) -> Result<()> {
    if param.is_empty() || STANDARD.decode(param).is_err() {
        return Err(EyesError::illegal_type(format!(
            "{param_name} is not a base64 string"
        )));
    }
    Ok(())
}

/// Accepts raw image bytes arriving as JSON: either an array of byte values
/// or the `{"type": "Buffer", "data": [...]}` shape of a serialized buffer.
pub fn is_buffer(param: &Value, param_name: &str) -> Result<Vec<u8>> {
    let items = match param {
        Value::Array(items) => Some(items),
        Value::Object(map) if map.get("type").and_then(Value::as_str) == Some("Buffer") => {
            map.get("data").and_then(Value::as_array)
        }
        _ => None,
    };

    items
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_u64().and_then(|byte| u8::try_from(byte).ok()))
                .collect::<Option<Vec<u8>>>()
        })
        .ok_or_else(|| EyesError::illegal_type(format!("{param_name} is not a buffer")))
}

pub fn is_valid_state(is_valid: bool, message: &str) -> Result<()> {
    if !is_valid {
        return Err(EyesError::illegal_state(message));
    }
    Ok(())
}

/// Capability check for JSON crossing the boundary: succeeds only if the value
/// has the shape of `T`, and hands back the typed value.
pub fn is_valid_type<T: DeserializeOwned>(param: &Value, type_name: &str) -> Result<T> {
    serde_json::from_value(param.clone())
        .map_err(|e| EyesError::illegal_type(format!("{param} is not instance of {type_name}: {e}")))
}

/// Parses a boundary string into a member of a closed enum.
pub fn is_valid_enum_value<E: FromStr>(value: &str, enum_name: &str) -> Result<E> {
    value
        .parse::<E>()
        .map_err(|_| EyesError::illegal_type(format!("{value} is not member of {enum_name}")))
}

pub fn has_properties(object: &Value, properties: &[&str], param_name: &str) -> Result<()> {
    let map = object.as_object().ok_or_else(|| {
        EyesError::illegal_argument(format!("{param_name} is not an object"))
    })?;

    for property in properties {
        if !map.contains_key(*property) {
            return Err(EyesError::illegal_argument(format!(
                "{param_name} don't have '{property}' property"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CoordinatesType;
    use serde::Deserialize;
    use serde_json::json;

    fn is_illegal_argument(result: Result<()>) -> bool {
        matches!(result, Err(EyesError::IllegalArgument(_)))
    }

    #[test]
    fn not_null_or_empty_rejects_missing_and_empty() {
        assert!(is_illegal_argument(not_null_or_empty(None, "agentId")));
        assert!(is_illegal_argument(not_null_or_empty(Some(""), "agentId")));
        assert!(not_null_or_empty(Some("agent"), "agentId").is_ok());
    }

    #[test]
    fn error_message_names_the_parameter() {
        let err = not_null_or_empty(None, "scenarioIdOrName").unwrap_err();
        assert_eq!(
            err.to_string(),
            "IllegalArgument: scenarioIdOrName is null or empty"
        );
    }

    #[test]
    fn null_checks() {
        assert!(not_null(Some(&1), "value").is_ok());
        assert!(is_illegal_argument(not_null::<i32>(None, "value")));
        assert!(is_null::<i32>(None, "value").is_ok());
        assert!(is_illegal_argument(is_null(Some(&1), "value")));
    }

    #[test]
    fn not_equal_rejects_sentinel() {
        assert!(is_illegal_argument(not_equal(&"", &"", "name")));
        assert!(not_equal(&3, &0, "count").is_ok());
    }

    #[test]
    fn alphanumeric_rejects_punctuation() {
        assert!(alphanumeric("abcXYZ019", "apiKey").is_ok());
        assert!(is_illegal_argument(alphanumeric("abc-123", "apiKey")));
        assert!(is_illegal_argument(alphanumeric("with space", "apiKey")));
        assert!(is_illegal_argument(alphanumeric("", "apiKey")));
    }

    #[test]
    fn numeric_sign_checks() {
        assert!(greater_than_or_equal_to_zero(0.0, "width", true).is_ok());
        assert!(is_illegal_argument(greater_than_or_equal_to_zero(
            -1.0, "width", true
        )));
        assert!(is_illegal_argument(greater_than_or_equal_to_zero(
            1.5, "width", true
        )));
        assert!(greater_than_or_equal_to_zero(1.5, "width", false).is_ok());

        assert!(greater_than_zero(1.0, "height", true).is_ok());
        assert!(is_illegal_argument(greater_than_zero(0.0, "height", true)));
        assert!(is_illegal_argument(greater_than_zero(f64::NAN, "height", false)));

        assert!(not_zero(-3.0, "scale", true).is_ok());
        assert!(is_illegal_argument(not_zero(0.0, "scale", false)));
    }

    #[test]
    fn is_integer_rejects_fractions_and_non_finite() {
        assert!(is_integer(42.0, "n").is_ok());
        assert!(is_illegal_argument(is_integer(0.1, "n")));
        assert!(is_illegal_argument(is_integer(f64::INFINITY, "n")));
    }

    #[test]
    fn type_checks_report_illegal_type() {
        assert!(is_string(&json!("x"), "value").is_ok());
        assert!(matches!(
            is_string(&json!(3), "value"),
            Err(EyesError::IllegalType(_))
        ));
        assert!(is_base64("aGVsbG8=", "screenshot").is_ok());
        assert!(matches!(
            is_base64("not base64!!", "screenshot"),
            Err(EyesError::IllegalType(_))
        ));
        assert!(matches!(
            is_base64("", "screenshot"),
            Err(EyesError::IllegalType(_))
        ));
    }

    #[test]
    fn enum_membership_is_checked_at_the_boundary() {
        let parsed: CoordinatesType =
            is_valid_enum_value("CONTEXT_RELATIVE", "CoordinatesType").expect("member");
        assert_eq!(parsed, CoordinatesType::ContextRelative);

        let err = is_valid_enum_value::<CoordinatesType>("SIDEWAYS", "CoordinatesType")
            .unwrap_err();
        assert!(matches!(err, EyesError::IllegalType(_)));
        assert!(err.to_string().contains("SIDEWAYS is not member of CoordinatesType"));
    }

    #[test]
    fn valid_type_returns_typed_value() {
        #[derive(Debug, Deserialize)]
        struct Rect {
            x: f64,
            width: f64,
        }

        let rect: Rect = is_valid_type(&json!({"x": 1.0, "width": 2.0}), "Rect").expect("rect");
        assert_eq!(rect.x, 1.0);
        assert_eq!(rect.width, 2.0);

        let err = is_valid_type::<Rect>(&json!("rect"), "Rect").unwrap_err();
        assert!(matches!(err, EyesError::IllegalType(_)));
    }

    #[test]
    fn has_properties_lists_missing_property() {
        let value = json!({"x": 1, "y": 2});
        assert!(has_properties(&value, &["x", "y"], "location").is_ok());

        let err = has_properties(&value, &["x", "width"], "location").unwrap_err();
        assert!(err.to_string().contains("'width'"));

        assert!(is_illegal_argument(has_properties(
            &json!([1, 2]),
            &["x"],
            "location"
        )));
    }

    #[test]
    fn buffers_accept_byte_arrays_only() {
        assert_eq!(is_buffer(&json!([137, 80, 78, 71]), "image").unwrap(), b"\x89PNG");
        assert_eq!(
            is_buffer(&json!({"type": "Buffer", "data": [0, 255]}), "image").unwrap(),
            vec![0, 255]
        );
        assert!(is_buffer(&json!([]), "image").unwrap().is_empty());

        for bad in [
            json!("iVBORw0KGgo="),
            json!([1, 256]),
            json!([1, -1]),
            json!([1.5]),
            json!({"type": "Blob", "data": [1]}),
            json!({"data": [1]}),
            json!(null),
        ] {
            let err = is_buffer(&bad, "image").unwrap_err();
            assert!(matches!(err, EyesError::IllegalType(_)), "{bad}");
            assert!(err.to_string().contains("image is not a buffer"));
        }
    }

    #[test]
    fn invalid_state_maps_to_illegal_state() {
        assert!(is_valid_state(true, "ok").is_ok());
        assert!(matches!(
            is_valid_state(false, "Eyes not open"),
            Err(EyesError::IllegalState(_))
        ));
    }
}
