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

//! Tag-tree backend.
//!
//! An NBT-style representation: typed scalar tags, lists and string-keyed
//! compounds. Addressing follows the same keyed-first rules as the JSON
//! backend. The tag vocabulary has no boolean or character, so booleans
//! are stored as bytes and characters as ints.

use std::collections::BTreeMap;

use stencil_core::error::Error;
use stencil_core::{DecodeEntryFn, DecodeFn, Decoder, EncodeFn, Encoder};

/// One node of a tag tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Text(String),
    List(Vec<Tag>),
    Compound(BTreeMap<String, Tag>),
}

impl Tag {
    pub fn compound() -> Tag {
        Tag::Compound(BTreeMap::new())
    }

    fn kind(&self) -> &'static str {
        match self {
            Tag::Byte(_) => "byte",
            Tag::Short(_) => "short",
            Tag::Int(_) => "int",
            Tag::Long(_) => "long",
            Tag::Float(_) => "float",
            Tag::Double(_) => "double",
            Tag::Text(_) => "text",
            Tag::List(_) => "list",
            Tag::Compound(_) => "compound",
        }
    }
}

fn attach(key: Option<&str>, value: Tag, target: &mut Tag) -> Result<(), Error> {
    match target {
        Tag::List(items) => {
            items.push(value);
            Ok(())
        }
        Tag::Compound(members) => match key {
            Some(key) => {
                members.insert(key.to_owned(), value);
                Ok(())
            }
            None => Err(Error::shape(format!(
                "cannot write an unkeyed {} tag into a compound",
                value.kind()
            ))),
        },
        other => Err(Error::shape(format!(
            "cannot write into a {} tag",
            other.kind()
        ))),
    }
}

fn member_name(key: Tag) -> Result<String, Error> {
    match key {
        Tag::Text(text) => Ok(text),
        Tag::Byte(n) => Ok(n.to_string()),
        Tag::Short(n) => Ok(n.to_string()),
        Tag::Int(n) => Ok(n.to_string()),
        Tag::Long(n) => Ok(n.to_string()),
        Tag::Float(n) => Ok(n.to_string()),
        Tag::Double(n) => Ok(n.to_string()),
        other => Err(Error::shape(format!(
            "map keys must encode as scalar tags, got {}",
            other.kind()
        ))),
    }
}

/// The backend driving [`Tag`] trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagCodec;

impl TagCodec {
    fn scalar<'a>(&self, key: Option<&str>, source: &'a Tag) -> Result<&'a Tag, Error> {
        match key {
            None => Ok(source),
            Some(key) => match source {
                Tag::Compound(members) => members
                    .get(key)
                    .ok_or_else(|| Error::missing_key(key.to_owned())),
                other => Err(Error::shape(format!(
                    "cannot read `{key}` out of a {} tag",
                    other.kind()
                ))),
            },
        }
    }

    fn read_integer<T>(&self, key: Option<&str>, source: &Tag) -> Result<T, Error>
    where
        T: TryFrom<i64> + std::str::FromStr,
    {
        let widened = match self.scalar(key, source)? {
            Tag::Byte(n) => i64::from(*n),
            Tag::Short(n) => i64::from(*n),
            Tag::Int(n) => i64::from(*n),
            Tag::Long(n) => *n,
            Tag::Text(text) => {
                return text
                    .parse()
                    .map_err(|_| Error::shape(format!("`{text}` is not an integer")))
            }
            other => {
                return Err(Error::shape(format!(
                    "expected an integer tag, got {}",
                    other.kind()
                )))
            }
        };
        T::try_from(widened).map_err(|_| Error::shape(format!("{widened} is out of range")))
    }
}

impl Encoder<Tag> for TagCodec {
    fn create_root(&self) -> Tag {
        Tag::compound()
    }

    fn create_collection(&self, _target: &Tag) -> Result<Tag, Error> {
        Ok(Tag::List(Vec::new()))
    }

    fn create_map(&self, _target: &Tag) -> Result<Tag, Error> {
        Ok(Tag::compound())
    }

    fn write(&self, key: Option<&str>, value: Tag, target: &mut Tag) -> Result<(), Error> {
        match (key, &mut *target) {
            (None, Tag::Compound(members)) => match value {
                Tag::Compound(sub) => {
                    members.extend(sub);
                    Ok(())
                }
                other => Err(Error::shape(format!(
                    "cannot merge a {} tag inline into a compound",
                    other.kind()
                ))),
            },
            _ => attach(key, value, target),
        }
    }

    fn write_bool(&self, key: Option<&str>, value: bool, target: &mut Tag) -> Result<(), Error> {
        attach(key, Tag::Byte(i8::from(value)), target)
    }

    fn write_i8(&self, key: Option<&str>, value: i8, target: &mut Tag) -> Result<(), Error> {
        attach(key, Tag::Byte(value), target)
    }

    fn write_i16(&self, key: Option<&str>, value: i16, target: &mut Tag) -> Result<(), Error> {
        attach(key, Tag::Short(value), target)
    }

    fn write_i32(&self, key: Option<&str>, value: i32, target: &mut Tag) -> Result<(), Error> {
        attach(key, Tag::Int(value), target)
    }

    fn write_i64(&self, key: Option<&str>, value: i64, target: &mut Tag) -> Result<(), Error> {
        attach(key, Tag::Long(value), target)
    }

    fn write_f32(&self, key: Option<&str>, value: f32, target: &mut Tag) -> Result<(), Error> {
        attach(key, Tag::Float(value), target)
    }

    fn write_f64(&self, key: Option<&str>, value: f64, target: &mut Tag) -> Result<(), Error> {
        attach(key, Tag::Double(value), target)
    }

    fn write_char(&self, key: Option<&str>, value: char, target: &mut Tag) -> Result<(), Error> {
        attach(key, Tag::Int(value as i32), target)
    }

    fn write_str(&self, key: Option<&str>, value: &str, target: &mut Tag) -> Result<(), Error> {
        attach(key, Tag::Text(value.to_owned()), target)
    }

    fn write_collection(
        &self,
        key: Option<&str>,
        len: usize,
        encode_element: EncodeFn<'_, Tag>,
        target: &mut Tag,
    ) -> Result<(), Error> {
        let mut items = Tag::List(Vec::with_capacity(len));
        for _ in 0..len {
            encode_element(&mut items)?;
        }
        self.write(key, items, target)
    }

    fn write_map(
        &self,
        key: Option<&str>,
        len: usize,
        encode_key: EncodeFn<'_, Tag>,
        encode_value: EncodeFn<'_, Tag>,
        target: &mut Tag,
    ) -> Result<(), Error> {
        let mut members = BTreeMap::new();
        for _ in 0..len {
            let mut key_slot = Tag::List(Vec::with_capacity(1));
            encode_key(&mut key_slot)?;
            let Tag::List(mut key_items) = key_slot else {
                unreachable!()
            };
            let entry_key = key_items
                .pop()
                .ok_or_else(|| Error::contract("map key encoder produced no value"))?;

            let mut value_slot = Tag::List(Vec::with_capacity(1));
            encode_value(&mut value_slot)?;
            let Tag::List(mut value_items) = value_slot else {
                unreachable!()
            };
            let entry_value = value_items
                .pop()
                .ok_or_else(|| Error::contract("map value encoder produced no value"))?;

            members.insert(member_name(entry_key)?, entry_value);
        }
        self.write(key, Tag::Compound(members), target)
    }
}

impl Decoder<Tag> for TagCodec {
    fn read(&self, key: Option<&str>, source: &Tag) -> Result<Tag, Error> {
        self.scalar(key, source).cloned()
    }

    fn read_bool(&self, key: Option<&str>, source: &Tag) -> Result<bool, Error> {
        match self.scalar(key, source)? {
            Tag::Byte(n) => Ok(*n != 0),
            Tag::Text(text) => text
                .parse()
                .map_err(|_| Error::shape(format!("`{text}` is not a boolean"))),
            other => Err(Error::shape(format!(
                "expected a byte tag, got {}",
                other.kind()
            ))),
        }
    }

    fn read_i8(&self, key: Option<&str>, source: &Tag) -> Result<i8, Error> {
        self.read_integer(key, source)
    }

    fn read_i16(&self, key: Option<&str>, source: &Tag) -> Result<i16, Error> {
        self.read_integer(key, source)
    }

    fn read_i32(&self, key: Option<&str>, source: &Tag) -> Result<i32, Error> {
        self.read_integer(key, source)
    }

    fn read_i64(&self, key: Option<&str>, source: &Tag) -> Result<i64, Error> {
        self.read_integer(key, source)
    }

    fn read_f32(&self, key: Option<&str>, source: &Tag) -> Result<f32, Error> {
        match self.scalar(key, source)? {
            Tag::Float(n) => Ok(*n),
            Tag::Double(n) => Ok(*n as f32),
            Tag::Text(text) => text
                .parse()
                .map_err(|_| Error::shape(format!("`{text}` is not a float"))),
            other => Err(Error::shape(format!(
                "expected a float tag, got {}",
                other.kind()
            ))),
        }
    }

    fn read_f64(&self, key: Option<&str>, source: &Tag) -> Result<f64, Error> {
        match self.scalar(key, source)? {
            Tag::Double(n) => Ok(*n),
            Tag::Float(n) => Ok(f64::from(*n)),
            Tag::Text(text) => text
                .parse()
                .map_err(|_| Error::shape(format!("`{text}` is not a float"))),
            other => Err(Error::shape(format!(
                "expected a double tag, got {}",
                other.kind()
            ))),
        }
    }

    fn read_char(&self, key: Option<&str>, source: &Tag) -> Result<char, Error> {
        let code: i32 = self.read_integer(key, source)?;
        u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| Error::shape(format!("invalid char code point {code}")))
    }

    fn read_string(&self, key: Option<&str>, source: &Tag) -> Result<String, Error> {
        match self.scalar(key, source)? {
            Tag::Text(text) => Ok(text.clone()),
            Tag::Byte(n) => Ok(n.to_string()),
            Tag::Short(n) => Ok(n.to_string()),
            Tag::Int(n) => Ok(n.to_string()),
            Tag::Long(n) => Ok(n.to_string()),
            Tag::Float(n) => Ok(n.to_string()),
            Tag::Double(n) => Ok(n.to_string()),
            other => Err(Error::shape(format!(
                "expected a text tag, got {}",
                other.kind()
            ))),
        }
    }

    fn read_collection(
        &self,
        key: Option<&str>,
        source: &Tag,
        decode_element: DecodeFn<'_, Tag>,
    ) -> Result<(), Error> {
        match self.scalar(key, source)? {
            Tag::List(items) => {
                for item in items {
                    decode_element(item)?;
                }
                Ok(())
            }
            other => Err(Error::shape(format!(
                "expected a list tag, got {}",
                other.kind()
            ))),
        }
    }

    fn read_map(
        &self,
        key: Option<&str>,
        source: &Tag,
        decode_entry: DecodeEntryFn<'_, Tag>,
    ) -> Result<(), Error> {
        match self.scalar(key, source)? {
            Tag::Compound(members) => {
                for (member_key, member_value) in members {
                    let entry_key = Tag::Text(member_key.clone());
                    decode_entry(&entry_key, member_value)?;
                }
                Ok(())
            }
            other => Err(Error::shape(format!(
                "expected a compound tag, got {}",
                other.kind()
            ))),
        }
    }
}
