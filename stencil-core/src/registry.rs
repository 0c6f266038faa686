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

//! The schema registry.
//!
//! Maps value types to their derived schemas and to stable string tags
//! used as run-time type identity in streams. The registry is monotonic:
//! entries are never evicted or replaced, so a schema handle obtained once
//! stays valid for the process lifetime. Concurrent lookups of an
//! unregistered type may race to derive the schema; the first entry wins
//! and duplicates are discarded.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::describe::Describe;
use crate::erased::{ErasedDecoder, ErasedDecoderRef, ErasedEncoder, ErasedEncoderRef, ErasedValue};
use crate::error::Error;
use crate::node::Blueprint;

type EncodeAnyFn = Box<
    dyn Fn(&dyn ErasedEncoder, Option<&str>, &dyn Any, &mut ErasedValue) -> Result<(), Error>
        + Send
        + Sync,
>;
type DecodeAnyFn = Box<
    dyn Fn(&dyn ErasedDecoder, Option<&str>, &ErasedValue) -> Result<Box<dyn Any>, Error>
        + Send
        + Sync,
>;

/// One registered type: its tag, its schema, and type-erased entry points
/// for encoding and decoding values only known as `dyn Any`.
pub struct RegistryEntry {
    tag: Cow<'static, str>,
    type_id: TypeId,
    node: Arc<dyn Any + Send + Sync>,
    encode: EncodeAnyFn,
    decode: DecodeAnyFn,
}

impl RegistryEntry {
    fn for_type<T: Describe>(tag: Cow<'static, str>) -> RegistryEntry {
        let node = Arc::new(T::describe());
        let encode_node = Arc::clone(&node);
        let decode_node = Arc::clone(&node);
        RegistryEntry {
            tag,
            type_id: TypeId::of::<T>(),
            node,
            encode: Box::new(move |encoder, key, value, target| {
                let value = value.downcast_ref::<T>().ok_or_else(|| {
                    Error::type_identity("value does not match its registered type")
                })?;
                encode_node.encode_with(&ErasedEncoderRef(encoder), key, value, target)
            }),
            decode: Box::new(move |decoder, key, source| {
                let value = decode_node.decode_with(&ErasedDecoderRef(decoder), key, source)?;
                Ok(Box::new(value) as Box<dyn Any>)
            }),
        }
    }

    /// The stream tag identifying this type.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub(crate) fn encode_any(
        &self,
        encoder: &dyn ErasedEncoder,
        key: Option<&str>,
        value: &dyn Any,
        target: &mut ErasedValue,
    ) -> Result<(), Error> {
        (self.encode)(encoder, key, value, target)
    }

    pub(crate) fn decode_any(
        &self,
        decoder: &dyn ErasedDecoder,
        key: Option<&str>,
        source: &ErasedValue,
    ) -> Result<Box<dyn Any>, Error> {
        (self.decode)(decoder, key, source)
    }
}

/// Thread-safe type-to-schema registry.
pub struct Registry {
    by_type: RwLock<HashMap<TypeId, Arc<RegistryEntry>>>,
    by_tag: RwLock<HashMap<String, Arc<RegistryEntry>>>,
}

impl Registry {
    /// Creates a registry pre-seeded with the primitive types under their
    /// conventional tags.
    pub fn new() -> Registry {
        let registry = Registry {
            by_type: RwLock::new(HashMap::new()),
            by_tag: RwLock::new(HashMap::new()),
        };
        registry.register::<bool>("bool");
        registry.register::<i8>("i8");
        registry.register::<i16>("i16");
        registry.register::<i32>("i32");
        registry.register::<i64>("i64");
        registry.register::<f32>("f32");
        registry.register::<f64>("f64");
        registry.register::<char>("char");
        registry.register::<String>("string");
        registry
    }

    /// The process-wide registry used by derived generic containers.
    pub fn global() -> Arc<Registry> {
        static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Registry::new())))
    }

    /// Registers `T` under an explicit tag and returns its entry.
    ///
    /// If `T` is already registered, the existing entry is kept and
    /// returned; the new tag is ignored.
    pub fn register<T: Describe>(&self, tag: impl Into<Cow<'static, str>>) -> Arc<RegistryEntry> {
        // Derive outside the lock; a racing duplicate is dropped below.
        let candidate = Arc::new(RegistryEntry::for_type::<T>(tag.into()));
        let entry = {
            let mut by_type = self.by_type.write().expect("registry lock poisoned");
            Arc::clone(
                by_type
                    .entry(TypeId::of::<T>())
                    .or_insert_with(|| Arc::clone(&candidate)),
            )
        };
        let mut by_tag = self.by_tag.write().expect("registry lock poisoned");
        by_tag
            .entry(entry.tag.clone().into_owned())
            .or_insert_with(|| Arc::clone(&entry));
        entry
    }

    /// Looks up `T`'s entry, deriving and registering it under
    /// `std::any::type_name::<T>()` on first use.
    pub fn entry_of<T: Describe>(&self) -> Arc<RegistryEntry> {
        {
            let by_type = self.by_type.read().expect("registry lock poisoned");
            if let Some(entry) = by_type.get(&TypeId::of::<T>()) {
                return Arc::clone(entry);
            }
        }
        self.register::<T>(std::any::type_name::<T>())
    }

    /// The canonical schema for `T`, shared across all callers.
    pub fn of<T: Describe>(&self) -> Arc<T::Node> {
        self.entry_of::<T>()
            .node
            .clone()
            .downcast::<T::Node>()
            .unwrap_or_else(|_| panic!("registry entry holds a foreign node type"))
    }

    /// Resolves the entry for a value's run-time type, if registered.
    pub fn entry_for_value(&self, value: &dyn Any) -> Option<Arc<RegistryEntry>> {
        let by_type = self.by_type.read().expect("registry lock poisoned");
        by_type.get(&value.type_id()).cloned()
    }

    /// Resolves a stream tag back to its entry, if registered.
    pub fn entry_by_tag(&self, tag: &str) -> Option<Arc<RegistryEntry>> {
        let by_tag = self.by_tag.read().expect("registry lock poisoned");
        by_tag.get(tag).cloned()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}
