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

//! The capability contract between schema nodes and format backends.
//!
//! A backend picks a representation type `F` (a byte buffer handle, a JSON
//! tree, a tag tree) and implements [`Encoder<F>`] and [`Decoder<F>`] over
//! it. Schema nodes drive the backend exclusively through these traits and
//! never inspect `F` themselves, so the same schema serializes to every
//! backend.
//!
//! Every operation takes an optional key. `Some(key)` addresses a named
//! entry in a keyed container; `None` means positional access (append on
//! write, next-in-sequence on read). A keyed-only backend is free to reject
//! unkeyed container writes with a shape error, and a positional backend is
//! free to ignore keys entirely.

use crate::error::Error;

/// Callback a backend invokes once per element (or per entry slot) while
/// writing a collection or map. The backend supplies the container the
/// element must be written into.
pub type EncodeFn<'a, F> = &'a mut dyn FnMut(&mut F) -> Result<(), Error>;

/// Callback a backend invokes once per element while reading a collection.
pub type DecodeFn<'a, F> = &'a mut dyn FnMut(&F) -> Result<(), Error>;

/// Callback a backend invokes once per entry while reading a map, with the
/// key representation first and the value representation second.
pub type DecodeEntryFn<'a, F> = &'a mut dyn FnMut(&F, &F) -> Result<(), Error>;

/// Write half of a format backend over representation `F`.
pub trait Encoder<F> {
    /// Creates a fresh top-level value to encode into.
    fn create_root(&self) -> F;

    /// Creates a fresh sequence container, given the value it will
    /// eventually be attached to. Backends with a single flat
    /// representation may return a handle to `target` itself.
    fn create_collection(&self, target: &F) -> Result<F, Error>;

    /// Creates a fresh keyed container. Same attachment contract as
    /// [`Encoder::create_collection`].
    fn create_map(&self, target: &F) -> Result<F, Error>;

    /// Attaches a previously built value to `target` under `key`.
    ///
    /// With `key == None` and a keyed `target`, backends merge the entries
    /// of `value` directly into `target` (inline flattening). Backends
    /// whose containers share one underlying buffer treat this as a no-op.
    fn write(&self, key: Option<&str>, value: F, target: &mut F) -> Result<(), Error>;

    fn write_bool(&self, key: Option<&str>, value: bool, target: &mut F) -> Result<(), Error>;
    fn write_i8(&self, key: Option<&str>, value: i8, target: &mut F) -> Result<(), Error>;
    fn write_i16(&self, key: Option<&str>, value: i16, target: &mut F) -> Result<(), Error>;
    fn write_i32(&self, key: Option<&str>, value: i32, target: &mut F) -> Result<(), Error>;
    fn write_i64(&self, key: Option<&str>, value: i64, target: &mut F) -> Result<(), Error>;
    fn write_f32(&self, key: Option<&str>, value: f32, target: &mut F) -> Result<(), Error>;
    fn write_f64(&self, key: Option<&str>, value: f64, target: &mut F) -> Result<(), Error>;
    fn write_char(&self, key: Option<&str>, value: char, target: &mut F) -> Result<(), Error>;
    fn write_str(&self, key: Option<&str>, value: &str, target: &mut F) -> Result<(), Error>;

    /// Writes a sequence of `len` elements under `key`. The backend calls
    /// `encode_element` exactly `len` times, each time passing the
    /// container the next element must be encoded into, and attaches the
    /// finished sequence to `target`.
    fn write_collection(
        &self,
        key: Option<&str>,
        len: usize,
        encode_element: EncodeFn<'_, F>,
        target: &mut F,
    ) -> Result<(), Error>;

    /// Writes `len` key/value entries under `key`. For each entry the
    /// backend calls `encode_key` and then `encode_value`, in that order.
    fn write_map(
        &self,
        key: Option<&str>,
        len: usize,
        encode_key: EncodeFn<'_, F>,
        encode_value: EncodeFn<'_, F>,
        target: &mut F,
    ) -> Result<(), Error>;
}

/// Read half of a format backend over representation `F`.
pub trait Decoder<F> {
    /// Resolves `key` against `source` and returns the addressed value.
    /// `None` returns (a handle to) `source` itself.
    fn read(&self, key: Option<&str>, source: &F) -> Result<F, Error>;

    fn read_bool(&self, key: Option<&str>, source: &F) -> Result<bool, Error>;
    fn read_i8(&self, key: Option<&str>, source: &F) -> Result<i8, Error>;
    fn read_i16(&self, key: Option<&str>, source: &F) -> Result<i16, Error>;
    fn read_i32(&self, key: Option<&str>, source: &F) -> Result<i32, Error>;
    fn read_i64(&self, key: Option<&str>, source: &F) -> Result<i64, Error>;
    fn read_f32(&self, key: Option<&str>, source: &F) -> Result<f32, Error>;
    fn read_f64(&self, key: Option<&str>, source: &F) -> Result<f64, Error>;
    fn read_char(&self, key: Option<&str>, source: &F) -> Result<char, Error>;
    fn read_string(&self, key: Option<&str>, source: &F) -> Result<String, Error>;

    /// Reads the sequence stored under `key`, invoking `decode_element`
    /// once per element in order.
    fn read_collection(
        &self,
        key: Option<&str>,
        source: &F,
        decode_element: DecodeFn<'_, F>,
    ) -> Result<(), Error>;

    /// Reads the keyed container stored under `key`, invoking
    /// `decode_entry` once per entry.
    fn read_map(
        &self,
        key: Option<&str>,
        source: &F,
        decode_entry: DecodeEntryFn<'_, F>,
    ) -> Result<(), Error>;
}

/// Derives the metadata key paired with a value key. Presence flags and
/// similar bookkeeping live under this key so they never collide with the
/// value itself.
pub fn metadata_key(key: Option<&str>) -> String {
    match key {
        None => "MetaData".to_owned(),
        Some(key) => format!("{key}$MetaData"),
    }
}
