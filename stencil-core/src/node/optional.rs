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

//! Presence-tracked nodes.
//!
//! Both nodes here record presence as an explicit boolean flag written
//! next to the value, under a key derived from the value key (see
//! [`metadata_key`]). Positional backends rely on the flag to know whether
//! value bytes follow; keyed backends get a collision-free sidecar entry.

use crate::codec::{metadata_key, Decoder, Encoder};
use crate::error::Error;
use crate::node::Blueprint;

fn presence_key(key: Option<&str>) -> String {
    format!("{}Flag", metadata_key(key))
}

/// Schema node for `Option<T>`.
///
/// Decoding reads the flag first; a `false` flag short-circuits to `None`
/// without touching the value slot. When the flag is `true` but the value
/// itself fails to decode, the failure is treated as schema drift and
/// masked to `None` rather than propagated.
pub struct OptionalNode<N> {
    node: N,
}

impl<N> OptionalNode<N> {
    pub fn new(node: N) -> Self {
        OptionalNode { node }
    }
}

impl<N: Blueprint> Blueprint for OptionalNode<N> {
    type Value = Option<N::Value>;

    fn encode_with<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        key: Option<&str>,
        value: &Option<N::Value>,
        target: &mut F,
    ) -> Result<(), Error> {
        let flag_key = presence_key(key);
        match value {
            Some(inner) => {
                encoder.write_bool(Some(&flag_key), true, target)?;
                self.node.encode_with(encoder, key, inner, target)
            }
            None => encoder.write_bool(Some(&flag_key), false, target),
        }
    }

    fn decode_with<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        key: Option<&str>,
        source: &F,
    ) -> Result<Option<N::Value>, Error> {
        let flag_key = presence_key(key);
        if !decoder.read_bool(Some(&flag_key), source)? {
            return Ok(None);
        }
        Ok(self.node.decode_with(decoder, key, source).ok())
    }
}

/// Presence-tracked node that keeps the value type flat.
///
/// Instead of wrapping in `Option`, absence is represented in memory by
/// `Value::default()`. Encoding a default value writes only a `false`
/// flag; decoding an absent or undecodable value yields the default.
pub struct NullableNode<N> {
    node: N,
}

impl<N> NullableNode<N> {
    pub fn new(node: N) -> Self {
        NullableNode { node }
    }
}

impl<N: Blueprint> Blueprint for NullableNode<N>
where
    N::Value: Default + PartialEq,
{
    type Value = N::Value;

    fn encode_with<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        key: Option<&str>,
        value: &N::Value,
        target: &mut F,
    ) -> Result<(), Error> {
        let flag_key = presence_key(key);
        if *value == N::Value::default() {
            return encoder.write_bool(Some(&flag_key), false, target);
        }
        encoder.write_bool(Some(&flag_key), true, target)?;
        self.node.encode_with(encoder, key, value, target)
    }

    fn decode_with<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        key: Option<&str>,
        source: &F,
    ) -> Result<N::Value, Error> {
        let flag_key = presence_key(key);
        if !decoder.read_bool(Some(&flag_key), source)? {
            return Ok(N::Value::default());
        }
        Ok(self
            .node
            .decode_with(decoder, key, source)
            .unwrap_or_default())
    }
}
