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

//! Factory functions for building schemas by hand.
//!
//! The scalar factories follow the wire vocabulary (`byte` for `i8`,
//! `short` for `i16`, and so on). Everything composes through the fluent
//! methods on [`Blueprint`] or through the aggregate factories here:
//!
//! ```
//! use stencil_core::schema;
//! use stencil_core::Blueprint;
//!
//! let scores = schema::map(schema::string(), schema::int()).keyed("scores");
//! ```

use std::borrow::Cow;

use crate::node::{
    ArrayNode, Blueprint, BoolNode, CharNode, F32Node, F64Node, Field, I16Node, I32Node, I64Node,
    I8Node, ListNode, MapNode, NullableNode, OptionalNode, PairNode, QueueNode, SetNode,
    SortedMapNode, StringNode,
};

pub use crate::node::{
    compound1, compound10, compound11, compound12, compound2, compound3, compound4, compound5,
    compound6, compound7, compound8, compound9, group1, group10, group11, group12, group2, group3,
    group4, group5, group6, group7, group8, group9,
};

pub fn boolean() -> BoolNode {
    BoolNode
}

pub fn byte() -> I8Node {
    I8Node
}

pub fn short() -> I16Node {
    I16Node
}

pub fn int() -> I32Node {
    I32Node
}

pub fn long() -> I64Node {
    I64Node
}

pub fn float() -> F32Node {
    F32Node
}

pub fn double() -> F64Node {
    F64Node
}

pub fn character() -> CharNode {
    CharNode
}

pub fn string() -> StringNode {
    StringNode
}

pub fn list<N: Blueprint>(element: N) -> ListNode<N> {
    ListNode::new(element)
}

pub fn set<N: Blueprint>(element: N) -> SetNode<N> {
    SetNode::new(element)
}

pub fn queue<N: Blueprint>(element: N) -> QueueNode<N> {
    QueueNode::new(element)
}

pub fn array<const LEN: usize, N: Blueprint>(element: N) -> ArrayNode<N, LEN> {
    ArrayNode::new(element)
}

pub fn map<K: Blueprint, V: Blueprint>(key: K, value: V) -> MapNode<K, V> {
    MapNode::new(key, value)
}

pub fn sorted_map<K: Blueprint, V: Blueprint>(key: K, value: V) -> SortedMapNode<K, V> {
    SortedMapNode::new(key, value)
}

pub fn pair<A: Blueprint, B: Blueprint>(first: A, second: B) -> PairNode<A, B> {
    PairNode::new(first, second)
}

pub fn optional<N: Blueprint>(node: N) -> OptionalNode<N> {
    OptionalNode::new(node)
}

pub fn nullable<N: Blueprint>(node: N) -> NullableNode<N> {
    NullableNode::new(node)
}

/// A keyed compound field bound to owner type `O` through a getter.
pub fn field<O, N: Blueprint>(
    key: impl Into<Cow<'static, str>>,
    node: N,
    get: impl Fn(&O) -> N::Value + Send + Sync + 'static,
) -> Field<O, N> {
    Field::new(key, node, get)
}

/// A compound field with no key of its own.
pub fn positional_field<O, N: Blueprint>(
    node: N,
    get: impl Fn(&O) -> N::Value + Send + Sync + 'static,
) -> Field<O, N> {
    Field::positional(node, get)
}
