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

//! Keyed-aggregate nodes over a key node and a value node.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::codec::{Decoder, Encoder};
use crate::error::Error;
use crate::node::Blueprint;

fn encode_entries<'a, F, E, K, V, I>(
    key_node: &K,
    value_node: &V,
    encoder: &E,
    key: Option<&str>,
    len: usize,
    entries: I,
    target: &mut F,
) -> Result<(), Error>
where
    F: Clone + 'static,
    E: Encoder<F>,
    K: Blueprint,
    V: Blueprint,
    K::Value: 'a,
    V::Value: 'a,
    I: IntoIterator<Item = (&'a K::Value, &'a V::Value)>,
{
    let entries = RefCell::new(entries.into_iter());
    // The value for the entry whose key was just written; the backend
    // calls the key callback and the value callback strictly in pairs.
    let pending = Cell::new(None::<&'a V::Value>);
    encoder.write_map(
        key,
        len,
        &mut |container| {
            let (entry_key, entry_value) = entries
                .borrow_mut()
                .next()
                .ok_or_else(|| Error::contract("backend visited more entries than announced"))?;
            pending.set(Some(entry_value));
            key_node.encode_with(encoder, None, entry_key, container)
        },
        &mut |container| {
            let entry_value = pending
                .take()
                .ok_or_else(|| Error::contract("map value visited before its key"))?;
            value_node.encode_with(encoder, None, entry_value, container)
        },
        target,
    )
}

/// Schema node for `HashMap<K, V>`.
pub struct MapNode<K, V> {
    key_node: K,
    value_node: V,
}

impl<K, V> MapNode<K, V> {
    pub fn new(key_node: K, value_node: V) -> Self {
        MapNode {
            key_node,
            value_node,
        }
    }
}

impl<K: Blueprint, V: Blueprint> Blueprint for MapNode<K, V>
where
    K::Value: Eq + Hash,
{
    type Value = HashMap<K::Value, V::Value>;

    fn encode_with<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        key: Option<&str>,
        value: &HashMap<K::Value, V::Value>,
        target: &mut F,
    ) -> Result<(), Error> {
        encode_entries(
            &self.key_node,
            &self.value_node,
            encoder,
            key,
            value.len(),
            value,
            target,
        )
    }

    fn decode_with<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        key: Option<&str>,
        source: &F,
    ) -> Result<HashMap<K::Value, V::Value>, Error> {
        let mut out = HashMap::new();
        decoder.read_map(key, source, &mut |entry_key, entry_value| {
            let decoded_key = self.key_node.decode_with(decoder, None, entry_key)?;
            let decoded_value = self.value_node.decode_with(decoder, None, entry_value)?;
            out.insert(decoded_key, decoded_value);
            Ok(())
        })?;
        Ok(out)
    }
}

/// Schema node for `BTreeMap<K, V>`. Entries encode in key order.
pub struct SortedMapNode<K, V> {
    key_node: K,
    value_node: V,
}

impl<K, V> SortedMapNode<K, V> {
    pub fn new(key_node: K, value_node: V) -> Self {
        SortedMapNode {
            key_node,
            value_node,
        }
    }
}

impl<K: Blueprint, V: Blueprint> Blueprint for SortedMapNode<K, V>
where
    K::Value: Ord,
{
    type Value = BTreeMap<K::Value, V::Value>;

    fn encode_with<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        key: Option<&str>,
        value: &BTreeMap<K::Value, V::Value>,
        target: &mut F,
    ) -> Result<(), Error> {
        encode_entries(
            &self.key_node,
            &self.value_node,
            encoder,
            key,
            value.len(),
            value,
            target,
        )
    }

    fn decode_with<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        key: Option<&str>,
        source: &F,
    ) -> Result<BTreeMap<K::Value, V::Value>, Error> {
        let mut out = BTreeMap::new();
        decoder.read_map(key, source, &mut |entry_key, entry_value| {
            let decoded_key = self.key_node.decode_with(decoder, None, entry_key)?;
            let decoded_value = self.value_node.decode_with(decoder, None, entry_value)?;
            out.insert(decoded_key, decoded_value);
            Ok(())
        })?;
        Ok(out)
    }
}
