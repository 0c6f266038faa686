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

use std::borrow::Cow;

use crate::codec::{Decoder, Encoder};
use crate::error::Error;
use crate::node::Blueprint;

/// One field slot of a compound: a child node plus the accessors that bind
/// it to an owner type `O`.
///
/// The getter extracts the field value for encoding. The optional setter
/// writes a decoded value back into an existing owner (used by
/// `decode_into`), and the optional guard can veto that write-back per
/// owner.
pub struct Field<O, N: Blueprint> {
    key: Option<Cow<'static, str>>,
    node: N,
    get: Box<dyn Fn(&O) -> N::Value + Send + Sync>,
    set: Option<Box<dyn Fn(&mut O, &N::Value) + Send + Sync>>,
    guard: Option<Box<dyn Fn(&O) -> bool + Send + Sync>>,
}

impl<O, N: Blueprint> Field<O, N> {
    /// A field addressed by `key` in the compound's container.
    pub fn new(
        key: impl Into<Cow<'static, str>>,
        node: N,
        get: impl Fn(&O) -> N::Value + Send + Sync + 'static,
    ) -> Self {
        Field {
            key: Some(key.into()),
            node,
            get: Box::new(get),
            set: None,
            guard: None,
        }
    }

    /// A field with no key of its own; it inherits positional addressing
    /// (or the key pinned by its node).
    pub fn positional(node: N, get: impl Fn(&O) -> N::Value + Send + Sync + 'static) -> Self {
        Field {
            key: None,
            node,
            get: Box::new(get),
            set: None,
            guard: None,
        }
    }

    /// Attaches a setter, enabling write-back through `decode_into`.
    pub fn with_setter(mut self, set: impl Fn(&mut O, &N::Value) + Send + Sync + 'static) -> Self {
        self.set = Some(Box::new(set));
        self
    }

    /// Attaches a guard; when it returns `false` for an owner, write-back
    /// skips this field.
    pub fn guarded(mut self, guard: impl Fn(&O) -> bool + Send + Sync + 'static) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub(crate) fn encode_from<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        owner: &O,
        target: &mut F,
    ) -> Result<(), Error> {
        let value = (self.get)(owner);
        self.node.encode_with(encoder, self.key.as_deref(), &value, target)
    }

    pub(crate) fn decode_value<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        source: &F,
    ) -> Result<N::Value, Error> {
        self.node.decode_with(decoder, self.key.as_deref(), source)
    }

    pub(crate) fn apply(&self, owner: &mut O, value: &N::Value) {
        if self.guard.as_ref().is_some_and(|guard| !guard(owner)) {
            return;
        }
        if let Some(set) = &self.set {
            set(owner, value);
        }
    }
}
