// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bidirectional conversion between property maps and the wire's
//! structured-value representation (`serde_json::Value`).
//!
//! The codec is numeric-lossy on purpose: every number, integer or
//! float, travels as a JSON floating point number, so
//! `decode(encode(m)) == m` holds only for maps whose numbers are
//! already floats. Integer inputs come back as `Float`. This
//! normalization is part of the wire contract and is kept for
//! compatibility rather than fixed.

use serde_json::{Map, Number, Value};

use strata_core::{PropertyMap, PropertyValue, StrataError};

/// Encode a property map into the wire value form.
///
/// Fails with [`StrataError::Encode`] on values the wire format cannot
/// express (non-finite floats).
pub fn encode_properties(properties: &PropertyMap) -> Result<Value, StrataError> {
    let mut out = Map::with_capacity(properties.len());
    for (key, value) in properties {
        out.insert(key.clone(), encode_value(value)?);
    }
    Ok(Value::Object(out))
}

fn encode_number(raw: f64) -> Result<Value, StrataError> {
    Number::from_f64(raw)
        .map(Value::Number)
        .ok_or_else(|| StrataError::Encode(format!("number '{raw}' is not representable")))
}

fn encode_value(value: &PropertyValue) -> Result<Value, StrataError> {
    match value {
        PropertyValue::String(s) => Ok(Value::String(s.clone())),
        PropertyValue::Integer(i) => encode_number(*i as f64),
        PropertyValue::Float(f) => encode_number(*f),
        PropertyValue::Bool(b) => Ok(Value::Bool(*b)),
        PropertyValue::Map(m) => encode_properties(m),
        PropertyValue::Sequence(seq) => Ok(Value::Array(
            seq.iter()
                .map(encode_value)
                .collect::<Result<Vec<_>, _>>()?,
        )),
    }
}

/// Decode a wire value back into a property map.
///
/// The top-level value must be an object; `null` anywhere in the
/// structure is malformed. Fails with [`StrataError::Decode`].
pub fn decode_properties(value: &Value) -> Result<PropertyMap, StrataError> {
    let Value::Object(entries) = value else {
        return Err(StrataError::Decode(format!(
            "expected an object, got {value}"
        )));
    };
    let mut out = PropertyMap::new();
    for (key, value) in entries {
        out.insert(key.clone(), decode_value(value)?);
    }
    Ok(out)
}

fn decode_value(value: &Value) -> Result<PropertyValue, StrataError> {
    match value {
        Value::Null => Err(StrataError::Decode(
            "null is not a valid property value".to_string(),
        )),
        Value::Bool(b) => Ok(PropertyValue::Bool(*b)),
        Value::Number(n) => n
            .as_f64()
            .map(PropertyValue::Float)
            .ok_or_else(|| StrataError::Decode(format!("number '{n}' is out of range"))),
        Value::String(s) => Ok(PropertyValue::String(s.clone())),
        Value::Array(seq) => Ok(PropertyValue::Sequence(
            seq.iter()
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()?,
        )),
        Value::Object(_) => Ok(PropertyValue::Map(decode_properties(value)?)),
    }
}
