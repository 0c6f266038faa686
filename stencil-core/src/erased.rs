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

//! Representation erasure.
//!
//! The registry stores one encode and one decode function per registered
//! type, usable with any backend. That requires object-safe backend
//! traits, which the generic [`Encoder`]/[`Decoder`] contract is not
//! (the representation `F` varies per backend). This module closes the
//! gap with a boxed representation ([`ErasedValue`]), object-safe mirror
//! traits ([`ErasedEncoder`]/[`ErasedDecoder`]), and two bridges:
//!
//! - [`Erase`] wraps a typed backend so erased callers (registry vtable
//!   entries, generic containers) can drive it;
//! - [`ErasedEncoderRef`]/[`ErasedDecoderRef`] wrap an erased backend so
//!   typed nodes can run against it with `F = ErasedValue`.
//!
//! A round trip through both bridges is how a statically typed schema
//! node encodes a `dyn Any` value it only meets at run time.

use std::any::Any;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::mem;
use std::rc::Rc;

use crate::codec::{DecodeEntryFn, DecodeFn, Decoder, EncodeFn, Encoder};
use crate::error::Error;

/// A backend representation with its type boxed away.
///
/// Cloning is shallow; clones observe each other's mutations, matching
/// the handle semantics backends with shared buffers already rely on.
#[derive(Clone)]
pub(crate) struct ErasedValue {
    inner: Rc<RefCell<Box<dyn Any>>>,
}

impl ErasedValue {
    pub(crate) fn new<F: 'static>(value: F) -> Self {
        ErasedValue {
            inner: Rc::new(RefCell::new(Box::new(value))),
        }
    }

    /// Moves the representation back out. Fails when the box holds a
    /// different representation than the caller expects.
    pub(crate) fn take<F: 'static>(&self) -> Result<F, Error> {
        let boxed = mem::replace(&mut *self.inner.borrow_mut(), Box::new(()));
        boxed
            .downcast::<F>()
            .map(|value| *value)
            .map_err(|_| Error::contract("erased value does not hold the expected representation"))
    }

    fn with<F: 'static, R>(&self, f: impl FnOnce(&F) -> R) -> Result<R, Error> {
        let guard = self.inner.borrow();
        let value = guard
            .downcast_ref::<F>()
            .ok_or_else(|| Error::contract("erased value does not hold the expected representation"))?;
        Ok(f(value))
    }

    fn with_mut<F: 'static, R>(&self, f: impl FnOnce(&mut F) -> R) -> Result<R, Error> {
        let mut guard = self.inner.borrow_mut();
        let value = guard
            .downcast_mut::<F>()
            .ok_or_else(|| Error::contract("erased value does not hold the expected representation"))?;
        Ok(f(value))
    }
}

/// Object-safe mirror of [`Encoder`] over [`ErasedValue`].
pub(crate) trait ErasedEncoder {
    fn create_root(&self) -> ErasedValue;
    fn create_collection(&self, target: &ErasedValue) -> Result<ErasedValue, Error>;
    fn create_map(&self, target: &ErasedValue) -> Result<ErasedValue, Error>;
    fn write(&self, key: Option<&str>, value: ErasedValue, target: &mut ErasedValue)
        -> Result<(), Error>;
    fn write_bool(&self, key: Option<&str>, value: bool, target: &mut ErasedValue)
        -> Result<(), Error>;
    fn write_i8(&self, key: Option<&str>, value: i8, target: &mut ErasedValue)
        -> Result<(), Error>;
    fn write_i16(&self, key: Option<&str>, value: i16, target: &mut ErasedValue)
        -> Result<(), Error>;
    fn write_i32(&self, key: Option<&str>, value: i32, target: &mut ErasedValue)
        -> Result<(), Error>;
    fn write_i64(&self, key: Option<&str>, value: i64, target: &mut ErasedValue)
        -> Result<(), Error>;
    fn write_f32(&self, key: Option<&str>, value: f32, target: &mut ErasedValue)
        -> Result<(), Error>;
    fn write_f64(&self, key: Option<&str>, value: f64, target: &mut ErasedValue)
        -> Result<(), Error>;
    fn write_char(&self, key: Option<&str>, value: char, target: &mut ErasedValue)
        -> Result<(), Error>;
    fn write_str(&self, key: Option<&str>, value: &str, target: &mut ErasedValue)
        -> Result<(), Error>;
    fn write_collection(
        &self,
        key: Option<&str>,
        len: usize,
        encode_element: EncodeFn<'_, ErasedValue>,
        target: &mut ErasedValue,
    ) -> Result<(), Error>;
    fn write_map(
        &self,
        key: Option<&str>,
        len: usize,
        encode_key: EncodeFn<'_, ErasedValue>,
        encode_value: EncodeFn<'_, ErasedValue>,
        target: &mut ErasedValue,
    ) -> Result<(), Error>;
}

/// Object-safe mirror of [`Decoder`] over [`ErasedValue`].
pub(crate) trait ErasedDecoder {
    fn read(&self, key: Option<&str>, source: &ErasedValue) -> Result<ErasedValue, Error>;
    fn read_bool(&self, key: Option<&str>, source: &ErasedValue) -> Result<bool, Error>;
    fn read_i8(&self, key: Option<&str>, source: &ErasedValue) -> Result<i8, Error>;
    fn read_i16(&self, key: Option<&str>, source: &ErasedValue) -> Result<i16, Error>;
    fn read_i32(&self, key: Option<&str>, source: &ErasedValue) -> Result<i32, Error>;
    fn read_i64(&self, key: Option<&str>, source: &ErasedValue) -> Result<i64, Error>;
    fn read_f32(&self, key: Option<&str>, source: &ErasedValue) -> Result<f32, Error>;
    fn read_f64(&self, key: Option<&str>, source: &ErasedValue) -> Result<f64, Error>;
    fn read_char(&self, key: Option<&str>, source: &ErasedValue) -> Result<char, Error>;
    fn read_string(&self, key: Option<&str>, source: &ErasedValue) -> Result<String, Error>;
    fn read_collection(
        &self,
        key: Option<&str>,
        source: &ErasedValue,
        decode_element: DecodeFn<'_, ErasedValue>,
    ) -> Result<(), Error>;
    fn read_map(
        &self,
        key: Option<&str>,
        source: &ErasedValue,
        decode_entry: DecodeEntryFn<'_, ErasedValue>,
    ) -> Result<(), Error>;
}

/// Bridges a typed backend into the erased traits.
pub(crate) struct Erase<'a, F, C> {
    inner: &'a C,
    _format: PhantomData<fn() -> F>,
}

impl<'a, F, C> Erase<'a, F, C> {
    pub(crate) fn new(inner: &'a C) -> Self {
        Erase {
            inner,
            _format: PhantomData,
        }
    }
}

macro_rules! erase_write_scalar {
    ($($name:ident: $ty:ty),+ $(,)?) => {
        $(
            fn $name(
                &self,
                key: Option<&str>,
                value: $ty,
                target: &mut ErasedValue,
            ) -> Result<(), Error> {
                target.with_mut(|f: &mut F| self.inner.$name(key, value, f))?
            }
        )+
    };
}

impl<F: Clone + 'static, C: Encoder<F>> ErasedEncoder for Erase<'_, F, C> {
    fn create_root(&self) -> ErasedValue {
        ErasedValue::new(self.inner.create_root())
    }

    fn create_collection(&self, target: &ErasedValue) -> Result<ErasedValue, Error> {
        let collection = target.with(|f: &F| self.inner.create_collection(f))??;
        Ok(ErasedValue::new(collection))
    }

    fn create_map(&self, target: &ErasedValue) -> Result<ErasedValue, Error> {
        let map = target.with(|f: &F| self.inner.create_map(f))??;
        Ok(ErasedValue::new(map))
    }

    fn write(
        &self,
        key: Option<&str>,
        value: ErasedValue,
        target: &mut ErasedValue,
    ) -> Result<(), Error> {
        let value = value.take::<F>()?;
        target.with_mut(|f: &mut F| self.inner.write(key, value, f))?
    }

    erase_write_scalar!(
        write_bool: bool,
        write_i8: i8,
        write_i16: i16,
        write_i32: i32,
        write_i64: i64,
        write_f32: f32,
        write_f64: f64,
        write_char: char,
    );

    fn write_str(
        &self,
        key: Option<&str>,
        value: &str,
        target: &mut ErasedValue,
    ) -> Result<(), Error> {
        target.with_mut(|f: &mut F| self.inner.write_str(key, value, f))?
    }

    fn write_collection(
        &self,
        key: Option<&str>,
        len: usize,
        encode_element: EncodeFn<'_, ErasedValue>,
        target: &mut ErasedValue,
    ) -> Result<(), Error> {
        target.with_mut(|f: &mut F| {
            self.inner.write_collection(
                key,
                len,
                &mut |element: &mut F| {
                    // Hand the element container to the erased caller by
                    // moving it into a fresh box, then move it back.
                    let taken = mem::replace(element, self.inner.create_root());
                    let mut erased = ErasedValue::new(taken);
                    let result = encode_element(&mut erased);
                    *element = erased.take::<F>()?;
                    result
                },
                f,
            )
        })?
    }

    fn write_map(
        &self,
        key: Option<&str>,
        len: usize,
        encode_key: EncodeFn<'_, ErasedValue>,
        encode_value: EncodeFn<'_, ErasedValue>,
        target: &mut ErasedValue,
    ) -> Result<(), Error> {
        target.with_mut(|f: &mut F| {
            self.inner.write_map(
                key,
                len,
                &mut |container: &mut F| {
                    let taken = mem::replace(container, self.inner.create_root());
                    let mut erased = ErasedValue::new(taken);
                    let result = encode_key(&mut erased);
                    *container = erased.take::<F>()?;
                    result
                },
                &mut |container: &mut F| {
                    let taken = mem::replace(container, self.inner.create_root());
                    let mut erased = ErasedValue::new(taken);
                    let result = encode_value(&mut erased);
                    *container = erased.take::<F>()?;
                    result
                },
                f,
            )
        })?
    }
}

macro_rules! erase_read_scalar {
    ($($name:ident: $ty:ty),+ $(,)?) => {
        $(
            fn $name(&self, key: Option<&str>, source: &ErasedValue) -> Result<$ty, Error> {
                source.with(|f: &F| self.inner.$name(key, f))?
            }
        )+
    };
}

impl<F: Clone + 'static, C: Decoder<F>> ErasedDecoder for Erase<'_, F, C> {
    fn read(&self, key: Option<&str>, source: &ErasedValue) -> Result<ErasedValue, Error> {
        let value = source.with(|f: &F| self.inner.read(key, f))??;
        Ok(ErasedValue::new(value))
    }

    erase_read_scalar!(
        read_bool: bool,
        read_i8: i8,
        read_i16: i16,
        read_i32: i32,
        read_i64: i64,
        read_f32: f32,
        read_f64: f64,
        read_char: char,
        read_string: String,
    );

    fn read_collection(
        &self,
        key: Option<&str>,
        source: &ErasedValue,
        decode_element: DecodeFn<'_, ErasedValue>,
    ) -> Result<(), Error> {
        source.with(|f: &F| {
            self.inner.read_collection(key, f, &mut |element: &F| {
                let erased = ErasedValue::new(element.clone());
                decode_element(&erased)
            })
        })?
    }

    fn read_map(
        &self,
        key: Option<&str>,
        source: &ErasedValue,
        decode_entry: DecodeEntryFn<'_, ErasedValue>,
    ) -> Result<(), Error> {
        source.with(|f: &F| {
            self.inner
                .read_map(key, f, &mut |entry_key: &F, entry_value: &F| {
                    let erased_key = ErasedValue::new(entry_key.clone());
                    let erased_value = ErasedValue::new(entry_value.clone());
                    decode_entry(&erased_key, &erased_value)
                })
        })?
    }
}

/// Runs typed nodes against an erased encoder.
pub(crate) struct ErasedEncoderRef<'a>(pub(crate) &'a dyn ErasedEncoder);

impl Encoder<ErasedValue> for ErasedEncoderRef<'_> {
    fn create_root(&self) -> ErasedValue {
        self.0.create_root()
    }

    fn create_collection(&self, target: &ErasedValue) -> Result<ErasedValue, Error> {
        self.0.create_collection(target)
    }

    fn create_map(&self, target: &ErasedValue) -> Result<ErasedValue, Error> {
        self.0.create_map(target)
    }

    fn write(
        &self,
        key: Option<&str>,
        value: ErasedValue,
        target: &mut ErasedValue,
    ) -> Result<(), Error> {
        self.0.write(key, value, target)
    }

    fn write_bool(&self, key: Option<&str>, value: bool, target: &mut ErasedValue) -> Result<(), Error> {
        self.0.write_bool(key, value, target)
    }

    fn write_i8(&self, key: Option<&str>, value: i8, target: &mut ErasedValue) -> Result<(), Error> {
        self.0.write_i8(key, value, target)
    }

    fn write_i16(&self, key: Option<&str>, value: i16, target: &mut ErasedValue) -> Result<(), Error> {
        self.0.write_i16(key, value, target)
    }

    fn write_i32(&self, key: Option<&str>, value: i32, target: &mut ErasedValue) -> Result<(), Error> {
        self.0.write_i32(key, value, target)
    }

    fn write_i64(&self, key: Option<&str>, value: i64, target: &mut ErasedValue) -> Result<(), Error> {
        self.0.write_i64(key, value, target)
    }

    fn write_f32(&self, key: Option<&str>, value: f32, target: &mut ErasedValue) -> Result<(), Error> {
        self.0.write_f32(key, value, target)
    }

    fn write_f64(&self, key: Option<&str>, value: f64, target: &mut ErasedValue) -> Result<(), Error> {
        self.0.write_f64(key, value, target)
    }

    fn write_char(&self, key: Option<&str>, value: char, target: &mut ErasedValue) -> Result<(), Error> {
        self.0.write_char(key, value, target)
    }

    fn write_str(&self, key: Option<&str>, value: &str, target: &mut ErasedValue) -> Result<(), Error> {
        self.0.write_str(key, value, target)
    }

    fn write_collection(
        &self,
        key: Option<&str>,
        len: usize,
        encode_element: EncodeFn<'_, ErasedValue>,
        target: &mut ErasedValue,
    ) -> Result<(), Error> {
        self.0.write_collection(key, len, encode_element, target)
    }

    fn write_map(
        &self,
        key: Option<&str>,
        len: usize,
        encode_key: EncodeFn<'_, ErasedValue>,
        encode_value: EncodeFn<'_, ErasedValue>,
        target: &mut ErasedValue,
    ) -> Result<(), Error> {
        self.0.write_map(key, len, encode_key, encode_value, target)
    }
}

/// Runs typed nodes against an erased decoder.
pub(crate) struct ErasedDecoderRef<'a>(pub(crate) &'a dyn ErasedDecoder);

impl Decoder<ErasedValue> for ErasedDecoderRef<'_> {
    fn read(&self, key: Option<&str>, source: &ErasedValue) -> Result<ErasedValue, Error> {
        self.0.read(key, source)
    }

    fn read_bool(&self, key: Option<&str>, source: &ErasedValue) -> Result<bool, Error> {
        self.0.read_bool(key, source)
    }

    fn read_i8(&self, key: Option<&str>, source: &ErasedValue) -> Result<i8, Error> {
        self.0.read_i8(key, source)
    }

    fn read_i16(&self, key: Option<&str>, source: &ErasedValue) -> Result<i16, Error> {
        self.0.read_i16(key, source)
    }

    fn read_i32(&self, key: Option<&str>, source: &ErasedValue) -> Result<i32, Error> {
        self.0.read_i32(key, source)
    }

    fn read_i64(&self, key: Option<&str>, source: &ErasedValue) -> Result<i64, Error> {
        self.0.read_i64(key, source)
    }

    fn read_f32(&self, key: Option<&str>, source: &ErasedValue) -> Result<f32, Error> {
        self.0.read_f32(key, source)
    }

    fn read_f64(&self, key: Option<&str>, source: &ErasedValue) -> Result<f64, Error> {
        self.0.read_f64(key, source)
    }

    fn read_char(&self, key: Option<&str>, source: &ErasedValue) -> Result<char, Error> {
        self.0.read_char(key, source)
    }

    fn read_string(&self, key: Option<&str>, source: &ErasedValue) -> Result<String, Error> {
        self.0.read_string(key, source)
    }

    fn read_collection(
        &self,
        key: Option<&str>,
        source: &ErasedValue,
        decode_element: DecodeFn<'_, ErasedValue>,
    ) -> Result<(), Error> {
        self.0.read_collection(key, source, decode_element)
    }

    fn read_map(
        &self,
        key: Option<&str>,
        source: &ErasedValue,
        decode_entry: DecodeEntryFn<'_, ErasedValue>,
    ) -> Result<(), Error> {
        self.0.read_map(key, source, decode_entry)
    }
}
