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

//! Runtime-polymorphic containers.
//!
//! These nodes carry values whose element type is only known at run time,
//! as `Box<dyn Any>`. They write self-describing output: a keyed envelope
//! holding an `Exists` flag, the registry tag of the element type, and the
//! payload. The element schema is resolved by sampling the first element's
//! run-time type on encode, and by resolving the stream tag on decode;
//! elements are assumed homogeneous.
//!
//! Identity failures never abort the surrounding decode. An unregistered
//! element type encodes as `Exists = false`; an unresolvable tag or a
//! payload that fails mid-way decodes as empty/absent.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::sync::Arc;

use crate::codec::{Decoder, Encoder};
use crate::describe::Describe;
use crate::erased::{Erase, ErasedDecoder, ErasedEncoder, ErasedValue};
use crate::error::Error;
use crate::node::Blueprint;
use crate::registry::{Registry, RegistryEntry};

const EXISTS_KEY: &str = "Exists";
const TYPE_KEY: &str = "Type";
const KEY_TYPE_KEY: &str = "KeyType";
const VALUE_TYPE_KEY: &str = "ValueType";
const ITEMS_KEY: &str = "Items";
const ENTRIES_KEY: &str = "Entries";
const VALUE_KEY: &str = "Value";

/// A sequence of values of one run-time element type.
#[derive(Default)]
pub struct AnyList(pub Vec<Box<dyn Any>>);

/// Key/value entries of one run-time key type and one run-time value
/// type, kept as an entry list since `dyn Any` keys cannot hash.
#[derive(Default)]
pub struct AnyMap(pub Vec<(Box<dyn Any>, Box<dyn Any>)>);

/// An optional value of some run-time type.
#[derive(Default)]
pub struct AnyOptional(pub Option<Box<dyn Any>>);

impl AnyList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The elements downcast to `T`, or `None` if any element has a
    /// different run-time type.
    pub fn downcast<T: 'static>(&self) -> Option<Vec<&T>> {
        self.0.iter().map(|item| item.downcast_ref::<T>()).collect()
    }
}

/// Schema node for [`AnyList`].
pub struct GenericListNode {
    registry: Arc<Registry>,
}

impl GenericListNode {
    pub fn new(registry: Arc<Registry>) -> Self {
        GenericListNode { registry }
    }

    fn sample_entry(&self, value: &AnyList) -> Option<Arc<RegistryEntry>> {
        let first = value.0.first()?;
        self.registry.entry_for_value(first.as_ref())
    }
}

impl Blueprint for GenericListNode {
    type Value = AnyList;

    fn encode_with<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        key: Option<&str>,
        value: &AnyList,
        target: &mut F,
    ) -> Result<(), Error> {
        let erased = Erase::new(encoder);
        let mut envelope = ErasedValue::new(encoder.create_map(target)?);
        match self.sample_entry(value) {
            None => erased.write_bool(Some(EXISTS_KEY), false, &mut envelope)?,
            Some(entry) => {
                erased.write_bool(Some(EXISTS_KEY), true, &mut envelope)?;
                erased.write_str(Some(TYPE_KEY), entry.tag(), &mut envelope)?;
                let mut items = value.0.iter();
                erased.write_collection(
                    Some(ITEMS_KEY),
                    value.0.len(),
                    &mut |container| {
                        let item = items.next().ok_or_else(|| {
                            Error::contract("backend visited more elements than announced")
                        })?;
                        entry.encode_any(&erased, None, item.as_ref(), container)
                    },
                    &mut envelope,
                )?;
            }
        }
        encoder.write(key, envelope.take::<F>()?, target)
    }

    fn decode_with<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        key: Option<&str>,
        source: &F,
    ) -> Result<AnyList, Error> {
        let erased = Erase::new(decoder);
        let envelope = ErasedValue::new(decoder.read(key, source)?);
        if !erased.read_bool(Some(EXISTS_KEY), &envelope)? {
            return Ok(AnyList::default());
        }
        let Ok(tag) = erased.read_string(Some(TYPE_KEY), &envelope) else {
            return Ok(AnyList::default());
        };
        let Some(entry) = self.registry.entry_by_tag(&tag) else {
            return Ok(AnyList::default());
        };
        let mut items = Vec::new();
        let outcome = erased.read_collection(Some(ITEMS_KEY), &envelope, &mut |element| {
            items.push(entry.decode_any(&erased, None, element)?);
            Ok(())
        });
        if outcome.is_err() {
            items.clear();
        }
        Ok(AnyList(items))
    }
}

/// Schema node for [`AnyMap`].
pub struct GenericMapNode {
    registry: Arc<Registry>,
}

impl GenericMapNode {
    pub fn new(registry: Arc<Registry>) -> Self {
        GenericMapNode { registry }
    }

    fn sample_entries(
        &self,
        value: &AnyMap,
    ) -> Option<(Arc<RegistryEntry>, Arc<RegistryEntry>)> {
        let (first_key, first_value) = value.0.first()?;
        let key_entry = self.registry.entry_for_value(first_key.as_ref())?;
        let value_entry = self.registry.entry_for_value(first_value.as_ref())?;
        Some((key_entry, value_entry))
    }
}

impl Blueprint for GenericMapNode {
    type Value = AnyMap;

    fn encode_with<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        key: Option<&str>,
        value: &AnyMap,
        target: &mut F,
    ) -> Result<(), Error> {
        let erased = Erase::new(encoder);
        let mut envelope = ErasedValue::new(encoder.create_map(target)?);
        match self.sample_entries(value) {
            None => erased.write_bool(Some(EXISTS_KEY), false, &mut envelope)?,
            Some((key_entry, value_entry)) => {
                erased.write_bool(Some(EXISTS_KEY), true, &mut envelope)?;
                erased.write_str(Some(KEY_TYPE_KEY), key_entry.tag(), &mut envelope)?;
                erased.write_str(Some(VALUE_TYPE_KEY), value_entry.tag(), &mut envelope)?;
                let entries = RefCell::new(value.0.iter());
                let pending = Cell::new(None::<&Box<dyn Any>>);
                erased.write_map(
                    Some(ENTRIES_KEY),
                    value.0.len(),
                    &mut |container| {
                        let (entry_key, entry_value) =
                            entries.borrow_mut().next().ok_or_else(|| {
                                Error::contract("backend visited more entries than announced")
                            })?;
                        pending.set(Some(entry_value));
                        key_entry.encode_any(&erased, None, entry_key.as_ref(), container)
                    },
                    &mut |container| {
                        let entry_value = pending.take().ok_or_else(|| {
                            Error::contract("map value visited before its key")
                        })?;
                        value_entry.encode_any(&erased, None, entry_value.as_ref(), container)
                    },
                    &mut envelope,
                )?;
            }
        }
        encoder.write(key, envelope.take::<F>()?, target)
    }

    fn decode_with<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        key: Option<&str>,
        source: &F,
    ) -> Result<AnyMap, Error> {
        let erased = Erase::new(decoder);
        let envelope = ErasedValue::new(decoder.read(key, source)?);
        if !erased.read_bool(Some(EXISTS_KEY), &envelope)? {
            return Ok(AnyMap::default());
        }
        let (Ok(key_tag), Ok(value_tag)) = (
            erased.read_string(Some(KEY_TYPE_KEY), &envelope),
            erased.read_string(Some(VALUE_TYPE_KEY), &envelope),
        ) else {
            return Ok(AnyMap::default());
        };
        let (Some(key_entry), Some(value_entry)) = (
            self.registry.entry_by_tag(&key_tag),
            self.registry.entry_by_tag(&value_tag),
        ) else {
            return Ok(AnyMap::default());
        };
        let mut entries = Vec::new();
        let outcome = erased.read_map(Some(ENTRIES_KEY), &envelope, &mut |entry_key, entry_value| {
            let decoded_key = key_entry.decode_any(&erased, None, entry_key)?;
            let decoded_value = value_entry.decode_any(&erased, None, entry_value)?;
            entries.push((decoded_key, decoded_value));
            Ok(())
        });
        if outcome.is_err() {
            entries.clear();
        }
        Ok(AnyMap(entries))
    }
}

/// Schema node for [`AnyOptional`].
pub struct GenericOptionalNode {
    registry: Arc<Registry>,
}

impl GenericOptionalNode {
    pub fn new(registry: Arc<Registry>) -> Self {
        GenericOptionalNode { registry }
    }
}

impl Blueprint for GenericOptionalNode {
    type Value = AnyOptional;

    fn encode_with<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        key: Option<&str>,
        value: &AnyOptional,
        target: &mut F,
    ) -> Result<(), Error> {
        let erased = Erase::new(encoder);
        let mut envelope = ErasedValue::new(encoder.create_map(target)?);
        let entry = value
            .0
            .as_ref()
            .and_then(|inner| self.registry.entry_for_value(inner.as_ref()));
        match (value.0.as_ref(), entry) {
            (Some(inner), Some(entry)) => {
                erased.write_bool(Some(EXISTS_KEY), true, &mut envelope)?;
                erased.write_str(Some(TYPE_KEY), entry.tag(), &mut envelope)?;
                entry.encode_any(&erased, Some(VALUE_KEY), inner.as_ref(), &mut envelope)?;
            }
            _ => erased.write_bool(Some(EXISTS_KEY), false, &mut envelope)?,
        }
        encoder.write(key, envelope.take::<F>()?, target)
    }

    fn decode_with<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        key: Option<&str>,
        source: &F,
    ) -> Result<AnyOptional, Error> {
        let erased = Erase::new(decoder);
        let envelope = ErasedValue::new(decoder.read(key, source)?);
        if !erased.read_bool(Some(EXISTS_KEY), &envelope)? {
            return Ok(AnyOptional::default());
        }
        let Ok(tag) = erased.read_string(Some(TYPE_KEY), &envelope) else {
            return Ok(AnyOptional::default());
        };
        let Some(entry) = self.registry.entry_by_tag(&tag) else {
            return Ok(AnyOptional::default());
        };
        Ok(AnyOptional(
            entry.decode_any(&erased, Some(VALUE_KEY), &envelope).ok(),
        ))
    }
}

impl Describe for AnyList {
    type Node = GenericListNode;

    fn describe() -> GenericListNode {
        GenericListNode::new(Registry::global())
    }
}

impl Describe for AnyMap {
    type Node = GenericMapNode;

    fn describe() -> GenericMapNode {
        GenericMapNode::new(Registry::global())
    }
}

impl Describe for AnyOptional {
    type Node = GenericOptionalNode;

    fn describe() -> GenericOptionalNode {
        GenericOptionalNode::new(Registry::global())
    }
}
