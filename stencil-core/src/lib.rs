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

//! Core combinator engine for Stencil, a format-agnostic bidirectional
//! serialization framework.
//!
//! A schema is a tree of [`Blueprint`] nodes describing one value shape.
//! The same tree drives both directions against any format backend
//! implementing the [`Encoder`]/[`Decoder`] capability contract, so one
//! schema serializes a value to bytes, JSON or tag trees alike.
//!
//! Schemas come from three places:
//!
//! - hand-built composition via [`schema`] factories and the fluent
//!   methods on [`Blueprint`];
//! - derivation via [`Describe`] (the `stencil-derive` crate implements
//!   it for user structs);
//! - the [`Registry`], which caches one canonical schema per type and
//!   maps run-time types to stream tags for the polymorphic containers
//!   in [`node`].

mod codec;
mod describe;
mod erased;
pub mod error;
pub mod node;
mod registry;
pub mod schema;

pub use codec::{metadata_key, DecodeEntryFn, DecodeFn, Decoder, EncodeFn, Encoder};
pub use describe::Describe;
pub use error::Error;
pub use node::Blueprint;
pub use registry::{Registry, RegistryEntry};
