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

//! Derive macros for Stencil.
//!
//! `#[derive(Describe)]` implements `stencil_core::Describe` for a struct
//! with named fields, producing a compound schema with one keyed field
//! per struct field.
//!
//! Field attributes:
//!
//! - `#[stencil(skip)]`: the field is neither written nor read; decoding
//!   fills it with `Default::default()`.
//! - `#[stencil(rename = "Key")]`: use `Key` instead of the field name as
//!   the wire key.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod describe;

#[proc_macro_derive(Describe, attributes(stencil))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    describe::expand(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
