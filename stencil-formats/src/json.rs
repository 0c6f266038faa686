// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! JSON backend over `serde_json::Value`.
//!
//! Keyed-first: writes into an object require a key (an unkeyed scalar
//! write into an object is a shape error), writes into an array always
//! append and ignore the key. Attaching a keyed container with `None`
//! into an object merges its entries inline. Map entries become object
//! members, which forces keys through a string representation; scalar
//! reads accept that representation back, so maps with scalar keys
//! round-trip.

use serde_json::{Map, Number, Value};
use stencil_core::error::Error;
use stencil_core::{DecodeEntryFn, DecodeFn, Decoder, EncodeFn, Encoder};

/// The backend driving `serde_json::Value` trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn attach(key: Option<&str>, value: Value, target: &mut Value) -> Result<(), Error> {
    match target {
        Value::Array(items) => {
            items.push(value);
            Ok(())
        }
        Value::Object(members) => match key {
            Some(key) => {
                members.insert(key.to_owned(), value);
                Ok(())
            }
            None => Err(Error::shape(format!(
                "cannot write an unkeyed {} into a JSON object",
                kind(&value)
            ))),
        },
        other => Err(Error::shape(format!(
            "cannot write into a JSON {}",
            kind(other)
        ))),
    }
}

fn float_number(value: f64) -> Result<Value, Error> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| Error::shape("JSON cannot represent a non-finite float"))
}

/// Renders a key container's single element as a JSON member name.
fn member_name(key: Value) -> Result<String, Error> {
    match key {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(Error::shape(format!(
            "JSON map keys must encode as scalars, got {}",
            kind(&other)
        ))),
    }
}

impl JsonCodec {
    fn scalar<'a>(&self, key: Option<&str>, source: &'a Value) -> Result<&'a Value, Error> {
        match key {
            None => Ok(source),
            Some(key) => match source {
                Value::Object(members) => members
                    .get(key)
                    .ok_or_else(|| Error::missing_key(key.to_owned())),
                other => Err(Error::shape(format!(
                    "cannot read `{key}` out of a JSON {}",
                    kind(other)
                ))),
            },
        }
    }
}

impl Encoder<Value> for JsonCodec {
    fn create_root(&self) -> Value {
        Value::Object(Map::new())
    }

    fn create_collection(&self, _target: &Value) -> Result<Value, Error> {
        Ok(Value::Array(Vec::new()))
    }

    fn create_map(&self, _target: &Value) -> Result<Value, Error> {
        Ok(Value::Object(Map::new()))
    }

    fn write(&self, key: Option<&str>, value: Value, target: &mut Value) -> Result<(), Error> {
        match (key, &mut *target) {
            (None, Value::Object(members)) => match value {
                Value::Object(sub) => {
                    members.extend(sub);
                    Ok(())
                }
                other => Err(Error::shape(format!(
                    "cannot merge a JSON {} inline into an object",
                    kind(&other)
                ))),
            },
            _ => attach(key, value, target),
        }
    }

    fn write_bool(&self, key: Option<&str>, value: bool, target: &mut Value) -> Result<(), Error> {
        attach(key, Value::Bool(value), target)
    }

    fn write_i8(&self, key: Option<&str>, value: i8, target: &mut Value) -> Result<(), Error> {
        attach(key, Value::Number(value.into()), target)
    }

    fn write_i16(&self, key: Option<&str>, value: i16, target: &mut Value) -> Result<(), Error> {
        attach(key, Value::Number(value.into()), target)
    }

    fn write_i32(&self, key: Option<&str>, value: i32, target: &mut Value) -> Result<(), Error> {
        attach(key, Value::Number(value.into()), target)
    }

    fn write_i64(&self, key: Option<&str>, value: i64, target: &mut Value) -> Result<(), Error> {
        attach(key, Value::Number(value.into()), target)
    }

    fn write_f32(&self, key: Option<&str>, value: f32, target: &mut Value) -> Result<(), Error> {
        attach(key, float_number(f64::from(value))?, target)
    }

    fn write_f64(&self, key: Option<&str>, value: f64, target: &mut Value) -> Result<(), Error> {
        attach(key, float_number(value)?, target)
    }

    fn write_char(&self, key: Option<&str>, value: char, target: &mut Value) -> Result<(), Error> {
        attach(key, Value::String(value.to_string()), target)
    }

    fn write_str(&self, key: Option<&str>, value: &str, target: &mut Value) -> Result<(), Error> {
        attach(key, Value::String(value.to_owned()), target)
    }

    fn write_collection(
        &self,
        key: Option<&str>,
        len: usize,
        encode_element: EncodeFn<'_, Value>,
        target: &mut Value,
    ) -> Result<(), Error> {
        let mut items = Value::Array(Vec::with_capacity(len));
        for _ in 0..len {
            encode_element(&mut items)?;
        }
        self.write(key, items, target)
    }

    fn write_map(
        &self,
        key: Option<&str>,
        len: usize,
        encode_key: EncodeFn<'_, Value>,
        encode_value: EncodeFn<'_, Value>,
        target: &mut Value,
    ) -> Result<(), Error> {
        let mut members = Map::new();
        for _ in 0..len {
            // Entry keys and values encode into single-slot arrays so
            // positional child writes land somewhere inspectable.
            let mut key_slot = Value::Array(Vec::with_capacity(1));
            encode_key(&mut key_slot)?;
            let Value::Array(mut key_items) = key_slot else {
                unreachable!()
            };
            let entry_key = key_items
                .pop()
                .ok_or_else(|| Error::contract("map key encoder produced no value"))?;

            let mut value_slot = Value::Array(Vec::with_capacity(1));
            encode_value(&mut value_slot)?;
            let Value::Array(mut value_items) = value_slot else {
                unreachable!()
            };
            let entry_value = value_items
                .pop()
                .ok_or_else(|| Error::contract("map value encoder produced no value"))?;

            members.insert(member_name(entry_key)?, entry_value);
        }
        self.write(key, Value::Object(members), target)
    }
}

impl Decoder<Value> for JsonCodec {
    fn read(&self, key: Option<&str>, source: &Value) -> Result<Value, Error> {
        match key {
            None => Ok(source.clone()),
            Some(key) => match source {
                Value::Object(members) => members
                    .get(key)
                    .cloned()
                    .ok_or_else(|| Error::missing_key(key.to_owned())),
                other => Err(Error::shape(format!(
                    "cannot read `{key}` out of a JSON {}",
                    kind(other)
                ))),
            },
        }
    }

    fn read_bool(&self, key: Option<&str>, source: &Value) -> Result<bool, Error> {
        match self.scalar(key, source)? {
            Value::Bool(flag) => Ok(*flag),
            Value::String(text) => text
                .parse()
                .map_err(|_| Error::shape(format!("`{text}` is not a boolean"))),
            other => Err(Error::shape(format!(
                "expected a boolean, got a JSON {}",
                kind(other)
            ))),
        }
    }

    fn read_i8(&self, key: Option<&str>, source: &Value) -> Result<i8, Error> {
        self.read_integer(key, source)
    }

    fn read_i16(&self, key: Option<&str>, source: &Value) -> Result<i16, Error> {
        self.read_integer(key, source)
    }

    fn read_i32(&self, key: Option<&str>, source: &Value) -> Result<i32, Error> {
        self.read_integer(key, source)
    }

    fn read_i64(&self, key: Option<&str>, source: &Value) -> Result<i64, Error> {
        self.read_integer(key, source)
    }

    fn read_f32(&self, key: Option<&str>, source: &Value) -> Result<f32, Error> {
        Ok(self.read_float(key, source)? as f32)
    }

    fn read_f64(&self, key: Option<&str>, source: &Value) -> Result<f64, Error> {
        self.read_float(key, source)
    }

    fn read_char(&self, key: Option<&str>, source: &Value) -> Result<char, Error> {
        match self.scalar(key, source)? {
            Value::String(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Ok(ch),
                    _ => Err(Error::shape(format!("`{text}` is not a single character"))),
                }
            }
            other => Err(Error::shape(format!(
                "expected a character, got a JSON {}",
                kind(other)
            ))),
        }
    }

    fn read_string(&self, key: Option<&str>, source: &Value) -> Result<String, Error> {
        match self.scalar(key, source)? {
            Value::String(text) => Ok(text.clone()),
            Value::Number(number) => Ok(number.to_string()),
            Value::Bool(flag) => Ok(flag.to_string()),
            other => Err(Error::shape(format!(
                "expected a string, got a JSON {}",
                kind(other)
            ))),
        }
    }

    fn read_collection(
        &self,
        key: Option<&str>,
        source: &Value,
        decode_element: DecodeFn<'_, Value>,
    ) -> Result<(), Error> {
        match self.scalar(key, source)? {
            Value::Array(items) => {
                for item in items {
                    decode_element(item)?;
                }
                Ok(())
            }
            other => Err(Error::shape(format!(
                "expected an array, got a JSON {}",
                kind(other)
            ))),
        }
    }

    fn read_map(
        &self,
        key: Option<&str>,
        source: &Value,
        decode_entry: DecodeEntryFn<'_, Value>,
    ) -> Result<(), Error> {
        match self.scalar(key, source)? {
            Value::Object(members) => {
                for (member_key, member_value) in members {
                    let entry_key = Value::String(member_key.clone());
                    decode_entry(&entry_key, member_value)?;
                }
                Ok(())
            }
            other => Err(Error::shape(format!(
                "expected an object, got a JSON {}",
                kind(other)
            ))),
        }
    }
}

impl JsonCodec {
    fn read_integer<T: TryFrom<i64> + std::str::FromStr>(
        &self,
        key: Option<&str>,
        source: &Value,
    ) -> Result<T, Error> {
        match self.scalar(key, source)? {
            Value::Number(number) => number
                .as_i64()
                .and_then(|wide| T::try_from(wide).ok())
                .ok_or_else(|| Error::shape(format!("{number} is out of range"))),
            Value::String(text) => text
                .parse()
                .map_err(|_| Error::shape(format!("`{text}` is not an integer"))),
            other => Err(Error::shape(format!(
                "expected an integer, got a JSON {}",
                kind(other)
            ))),
        }
    }

    fn read_float(&self, key: Option<&str>, source: &Value) -> Result<f64, Error> {
        match self.scalar(key, source)? {
            Value::Number(number) => number
                .as_f64()
                .ok_or_else(|| Error::shape(format!("{number} is not a float"))),
            Value::String(text) => text
                .parse()
                .map_err(|_| Error::shape(format!("`{text}` is not a float"))),
            other => Err(Error::shape(format!(
                "expected a float, got a JSON {}",
                kind(other)
            ))),
        }
    }
}
