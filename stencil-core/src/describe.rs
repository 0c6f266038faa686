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

//! Schema derivation.
//!
//! [`Describe`] ties a value type to its canonical schema node. The derive
//! macro implements it for user structs; this module covers the primitive
//! types and the standard containers, so any nesting of those works out of
//! the box.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::hash::Hash;

use crate::node::{
    ArrayNode, Blueprint, BoolNode, CharNode, F32Node, F64Node, I16Node, I32Node, I64Node, I8Node,
    LazyNode, ListNode, MapNode, OptionalNode, PairNode, QueueNode, SetNode, SortedMapNode,
    StringNode,
};

/// Types with a canonical, derivable schema.
pub trait Describe: Sized + 'static {
    /// The schema node type describing `Self`.
    type Node: Blueprint<Value = Self> + Send + Sync + 'static;

    /// Builds the canonical schema for `Self`.
    fn describe() -> Self::Node;
}

macro_rules! describe_primitive {
    ($($ty:ty => $node:ident),+ $(,)?) => {
        $(
            impl Describe for $ty {
                type Node = $node;

                fn describe() -> $node {
                    $node
                }
            }
        )+
    };
}

describe_primitive!(
    bool => BoolNode,
    i8 => I8Node,
    i16 => I16Node,
    i32 => I32Node,
    i64 => I64Node,
    f32 => F32Node,
    f64 => F64Node,
    char => CharNode,
    String => StringNode,
);

impl<T: Describe> Describe for Vec<T> {
    type Node = ListNode<LazyNode<T>>;

    fn describe() -> Self::Node {
        ListNode::new(LazyNode::new())
    }
}

impl<T: Describe + Eq + Hash> Describe for HashSet<T> {
    type Node = SetNode<LazyNode<T>>;

    fn describe() -> Self::Node {
        SetNode::new(LazyNode::new())
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    type Node = QueueNode<LazyNode<T>>;

    fn describe() -> Self::Node {
        QueueNode::new(LazyNode::new())
    }
}

impl<T: Describe, const LEN: usize> Describe for [T; LEN] {
    type Node = ArrayNode<LazyNode<T>, LEN>;

    fn describe() -> Self::Node {
        ArrayNode::new(LazyNode::new())
    }
}

impl<K: Describe + Eq + Hash, V: Describe> Describe for HashMap<K, V> {
    type Node = MapNode<LazyNode<K>, LazyNode<V>>;

    fn describe() -> Self::Node {
        MapNode::new(LazyNode::new(), LazyNode::new())
    }
}

impl<K: Describe + Ord, V: Describe> Describe for BTreeMap<K, V> {
    type Node = SortedMapNode<LazyNode<K>, LazyNode<V>>;

    fn describe() -> Self::Node {
        SortedMapNode::new(LazyNode::new(), LazyNode::new())
    }
}

impl<T: Describe> Describe for Option<T> {
    type Node = OptionalNode<LazyNode<T>>;

    fn describe() -> Self::Node {
        OptionalNode::new(LazyNode::new())
    }
}

impl<A: Describe, B: Describe> Describe for (A, B) {
    type Node = PairNode<LazyNode<A>, LazyNode<B>>;

    fn describe() -> Self::Node {
        PairNode::new(LazyNode::new(), LazyNode::new())
    }
}
