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

//! Schema nodes.
//!
//! A node is a bidirectional description of one value shape: it knows how
//! to encode a `Value` through any [`Encoder`] and how to decode one back
//! through any [`Decoder`]. Nodes compose structurally, so a schema is a
//! tree of nodes mirroring the value it describes.

mod compound;
mod dynamic;
mod field;
mod lazy;
mod list;
mod map;
mod optional;
mod pair;
mod primitive;
mod wrap;

pub use compound::*;
pub use dynamic::{
    AnyList, AnyMap, AnyOptional, GenericListNode, GenericMapNode, GenericOptionalNode,
};
pub use field::Field;
pub use lazy::LazyNode;
pub use list::{ArrayNode, ListNode, QueueNode, SetNode};
pub use map::{MapNode, SortedMapNode};
pub use optional::{NullableNode, OptionalNode};
pub use pair::PairNode;
pub use primitive::{
    BoolNode, CharNode, F32Node, F64Node, I16Node, I32Node, I64Node, I8Node, StringNode,
};
pub use wrap::{Keyed, Mapped};

use std::borrow::Cow;

use crate::codec::{Decoder, Encoder};
use crate::error::Error;

/// A bidirectional schema node for values of type [`Blueprint::Value`].
///
/// `encode_with` and `decode_with` take the key the node should address
/// its value under; parents pass their choice down, and key-overriding
/// wrappers ([`Keyed`]) replace it. The plain [`Blueprint::encode`] and
/// [`Blueprint::decode`] helpers run a node against a fresh root value.
pub trait Blueprint {
    /// The in-memory type this node describes.
    type Value;

    /// The key this node insists on, if any. Wrappers produced by
    /// [`Blueprint::keyed`] return `Some`; everything else inherits the
    /// key its parent supplies.
    fn key(&self) -> Option<&str> {
        None
    }

    /// Encodes `value` into `target` under `key`.
    fn encode_with<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        key: Option<&str>,
        value: &Self::Value,
        target: &mut F,
    ) -> Result<(), Error>;

    /// Decodes a value addressed by `key` out of `source`.
    fn decode_with<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        key: Option<&str>,
        source: &F,
    ) -> Result<Self::Value, Error>;

    /// Encodes `value` into a fresh root produced by the backend.
    fn encode<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        value: &Self::Value,
    ) -> Result<F, Error> {
        let mut root = encoder.create_root();
        self.encode_with(encoder, None, value, &mut root)?;
        Ok(root)
    }

    /// Decodes a value from the root of `source`.
    fn decode<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        source: &F,
    ) -> Result<Self::Value, Error> {
        self.decode_with(decoder, None, source)
    }

    /// Pins this node to a fixed key. The wrapper's key wins over whatever
    /// key a parent supplies.
    fn keyed(self, key: impl Into<Cow<'static, str>>) -> Keyed<Self>
    where
        Self: Sized,
    {
        Keyed::new(key, self)
    }

    /// Adapts this node to carry values of another type `U`, given a pair
    /// of conversions. `decode_map` runs after decoding, `encode_map`
    /// before encoding.
    fn xmap<U, Dm, Em>(self, decode_map: Dm, encode_map: Em) -> Mapped<Self, U, Dm, Em>
    where
        Self: Sized,
        Dm: Fn(Self::Value) -> U,
        Em: Fn(&U) -> Self::Value,
    {
        Mapped::new(self, decode_map, encode_map)
    }

    /// Lifts this node to a `Vec` of its values.
    fn list(self) -> ListNode<Self>
    where
        Self: Sized,
    {
        ListNode::new(self)
    }

    /// Lifts this node to a `HashSet` of its values.
    fn set(self) -> SetNode<Self>
    where
        Self: Sized,
    {
        SetNode::new(self)
    }

    /// Lifts this node to a `VecDeque` of its values.
    fn queue(self) -> QueueNode<Self>
    where
        Self: Sized,
    {
        QueueNode::new(self)
    }

    /// Lifts this node to a fixed-length array of its values. Decoding
    /// fails with a shape error when the stream holds a different length.
    fn array<const LEN: usize>(self) -> ArrayNode<Self, LEN>
    where
        Self: Sized,
    {
        ArrayNode::new(self)
    }

    /// Lifts this node to an `Option`, tracked by an explicit presence
    /// flag in the output.
    fn optional(self) -> OptionalNode<Self>
    where
        Self: Sized,
    {
        OptionalNode::new(self)
    }

    /// Like [`Blueprint::optional`], but keeps the value type flat and
    /// uses `Value::default()` as the absent sentinel.
    fn nullable(self) -> NullableNode<Self>
    where
        Self: Sized,
    {
        NullableNode::new(self)
    }

    /// Pairs this node with another into a two-slot compound.
    fn pair_with<B: Blueprint>(self, second: B) -> PairNode<Self, B>
    where
        Self: Sized,
    {
        PairNode::new(self, second)
    }
}
