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

//! # Stencil
//!
//! Stencil is a format-agnostic bidirectional serialization framework.
//! One schema, built once, both encodes values to and decodes them from
//! any format backend: a compact byte stream, a JSON tree, a tag tree.
//!
//! A schema is a tree of [`Blueprint`] nodes. Build it by hand with the
//! [`schema`] factories, or derive it:
//!
//! ```rust
//! use stencil::{Blueprint, Describe};
//! use stencil_formats::JsonCodec;
//!
//! #[derive(Describe, Clone, Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let schema = Point::describe();
//! let json = schema.encode(&JsonCodec, &Point { x: 3, y: 4 }).unwrap();
//! let back = schema.decode(&JsonCodec, &json).unwrap();
//! assert_eq!(back, Point { x: 3, y: 4 });
//! ```
//!
//! The same `schema` value runs unmodified against the packet and tag
//! backends in `stencil-formats`, or against any [`Encoder`]/[`Decoder`]
//! pair you implement yourself.

pub use stencil_core::{
    error, metadata_key, node, schema, Blueprint, DecodeEntryFn, DecodeFn, Decoder, Describe,
    EncodeFn, Encoder, Error, Registry, RegistryEntry,
};
pub use stencil_derive::Describe;
