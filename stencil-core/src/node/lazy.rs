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

use std::sync::OnceLock;

use crate::codec::{Decoder, Encoder};
use crate::describe::Describe;
use crate::error::Error;
use crate::node::Blueprint;

/// Defers building `T`'s schema until the node is first exercised.
///
/// Derived schemas place a `LazyNode` at every field position. This keeps
/// recursive types (a tree node holding child tree nodes) from recursing
/// endlessly at construction time: building the compound is cheap, and
/// each field's own schema materializes on first encode or decode.
pub struct LazyNode<T: Describe> {
    cell: OnceLock<Box<T::Node>>,
}

impl<T: Describe> LazyNode<T> {
    pub fn new() -> Self {
        LazyNode {
            cell: OnceLock::new(),
        }
    }

    fn node(&self) -> &T::Node {
        self.cell.get_or_init(|| Box::new(T::describe()))
    }
}

impl<T: Describe> Default for LazyNode<T> {
    fn default() -> Self {
        LazyNode::new()
    }
}

impl<T: Describe> Blueprint for LazyNode<T> {
    type Value = T;

    fn key(&self) -> Option<&str> {
        self.node().key()
    }

    fn encode_with<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        key: Option<&str>,
        value: &T,
        target: &mut F,
    ) -> Result<(), Error> {
        self.node().encode_with(encoder, key, value, target)
    }

    fn decode_with<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        key: Option<&str>,
        source: &F,
    ) -> Result<T, Error> {
        self.node().decode_with(decoder, key, source)
    }
}
