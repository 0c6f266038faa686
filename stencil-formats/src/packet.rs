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

//! Flat binary backend.
//!
//! Purely positional: keys are ignored, values land in write order and
//! must be read back in the same order. Scalars are little-endian;
//! strings, collections and maps are length-prefixed with a varuint32.
//! Sub-containers are handles onto the parent buffer, so attachment
//! ([`Encoder::write`]) is a no-op.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use byteorder::{ByteOrder, LittleEndian};
use stencil_core::error::Error;
use stencil_core::{ensure, DecodeEntryFn, DecodeFn, Decoder, EncodeFn, Encoder};

/// A byte buffer with a shared read cursor.
///
/// Clones are handles onto the same buffer and cursor, which is what
/// makes positional sub-containers work: every handle appends to and
/// reads from one underlying stream.
#[derive(Clone, Default)]
pub struct Packet {
    bytes: Rc<RefCell<Vec<u8>>>,
    cursor: Rc<Cell<usize>>,
}

impl Packet {
    pub fn new() -> Packet {
        Packet::default()
    }

    /// Wraps existing bytes for decoding, with the cursor at the start.
    pub fn from_bytes(bytes: Vec<u8>) -> Packet {
        Packet {
            bytes: Rc::new(RefCell::new(bytes)),
            cursor: Rc::new(Cell::new(0)),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.bytes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.borrow().is_empty()
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.bytes.borrow().len().saturating_sub(self.cursor.get())
    }

    fn push(&self, data: &[u8]) {
        self.bytes.borrow_mut().extend_from_slice(data);
    }

    fn pull<const LEN: usize>(&self) -> Result<[u8; LEN], Error> {
        let mut out = [0u8; LEN];
        self.pull_into(&mut out)?;
        Ok(out)
    }

    fn pull_into(&self, out: &mut [u8]) -> Result<(), Error> {
        let bytes = self.bytes.borrow();
        let start = self.cursor.get();
        let end = start
            .checked_add(out.len())
            .filter(|end| *end <= bytes.len())
            .ok_or_else(|| {
                Error::shape(format!(
                    "packet underrun: need {} bytes at offset {start}, have {}",
                    out.len(),
                    bytes.len()
                ))
            })?;
        out.copy_from_slice(&bytes[start..end]);
        self.cursor.set(end);
        Ok(())
    }

    fn push_varuint32(&self, mut value: u32) {
        while value >= 0x80 {
            self.push(&[(value as u8 & 0x7f) | 0x80]);
            value >>= 7;
        }
        self.push(&[value as u8]);
    }

    fn pull_varuint32(&self) -> Result<u32, Error> {
        let mut value = 0u32;
        let mut shift = 0;
        loop {
            let [byte] = self.pull::<1>()?;
            value |= u32::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
            ensure!(shift < 35, Error::shape("varuint32 runs past five bytes"));
        }
    }
}

/// The backend driving [`Packet`] buffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PacketCodec;

macro_rules! packet_scalar {
    ($write:ident, $read:ident, $ty:ty, $size:expr, $put:ident, $get:ident) => {
        fn $write(&self, _key: Option<&str>, value: $ty, target: &mut Packet) -> Result<(), Error> {
            let mut buf = [0u8; $size];
            LittleEndian::$put(&mut buf, value);
            target.push(&buf);
            Ok(())
        }
    };
    (@read $read:ident, $ty:ty, $size:expr, $get:ident) => {
        fn $read(&self, _key: Option<&str>, source: &Packet) -> Result<$ty, Error> {
            let buf = source.pull::<$size>()?;
            Ok(LittleEndian::$get(&buf))
        }
    };
}

impl Encoder<Packet> for PacketCodec {
    fn create_root(&self) -> Packet {
        Packet::new()
    }

    fn create_collection(&self, target: &Packet) -> Result<Packet, Error> {
        Ok(target.clone())
    }

    fn create_map(&self, target: &Packet) -> Result<Packet, Error> {
        Ok(target.clone())
    }

    fn write(&self, _key: Option<&str>, value: Packet, target: &mut Packet) -> Result<(), Error> {
        // Sub-containers share the parent buffer; appending a foreign
        // packet splices its bytes in.
        if !Rc::ptr_eq(&value.bytes, &target.bytes) {
            let foreign = value.bytes.borrow();
            target.push(&foreign);
        }
        Ok(())
    }

    fn write_bool(&self, _key: Option<&str>, value: bool, target: &mut Packet) -> Result<(), Error> {
        target.push(&[u8::from(value)]);
        Ok(())
    }

    fn write_i8(&self, _key: Option<&str>, value: i8, target: &mut Packet) -> Result<(), Error> {
        target.push(&[value as u8]);
        Ok(())
    }

    packet_scalar!(write_i16, read_i16, i16, 2, write_i16, read_i16);
    packet_scalar!(write_i32, read_i32, i32, 4, write_i32, read_i32);
    packet_scalar!(write_i64, read_i64, i64, 8, write_i64, read_i64);
    packet_scalar!(write_f32, read_f32, f32, 4, write_f32, read_f32);
    packet_scalar!(write_f64, read_f64, f64, 8, write_f64, read_f64);

    fn write_char(&self, _key: Option<&str>, value: char, target: &mut Packet) -> Result<(), Error> {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, value as u32);
        target.push(&buf);
        Ok(())
    }

    fn write_str(&self, _key: Option<&str>, value: &str, target: &mut Packet) -> Result<(), Error> {
        let bytes = value.as_bytes();
        let len = u32::try_from(bytes.len())
            .map_err(|_| Error::shape("string longer than u32::MAX bytes"))?;
        target.push_varuint32(len);
        target.push(bytes);
        Ok(())
    }

    fn write_collection(
        &self,
        _key: Option<&str>,
        len: usize,
        encode_element: EncodeFn<'_, Packet>,
        target: &mut Packet,
    ) -> Result<(), Error> {
        let count =
            u32::try_from(len).map_err(|_| Error::shape("collection longer than u32::MAX"))?;
        target.push_varuint32(count);
        for _ in 0..len {
            encode_element(target)?;
        }
        Ok(())
    }

    fn write_map(
        &self,
        _key: Option<&str>,
        len: usize,
        encode_key: EncodeFn<'_, Packet>,
        encode_value: EncodeFn<'_, Packet>,
        target: &mut Packet,
    ) -> Result<(), Error> {
        let count = u32::try_from(len).map_err(|_| Error::shape("map longer than u32::MAX"))?;
        target.push_varuint32(count);
        for _ in 0..len {
            encode_key(target)?;
            encode_value(target)?;
        }
        Ok(())
    }
}

impl Decoder<Packet> for PacketCodec {
    fn read(&self, _key: Option<&str>, source: &Packet) -> Result<Packet, Error> {
        Ok(source.clone())
    }

    fn read_bool(&self, _key: Option<&str>, source: &Packet) -> Result<bool, Error> {
        let [byte] = source.pull::<1>()?;
        Ok(byte != 0)
    }

    fn read_i8(&self, _key: Option<&str>, source: &Packet) -> Result<i8, Error> {
        let [byte] = source.pull::<1>()?;
        Ok(byte as i8)
    }

    packet_scalar!(@read read_i16, i16, 2, read_i16);
    packet_scalar!(@read read_i32, i32, 4, read_i32);
    packet_scalar!(@read read_i64, i64, 8, read_i64);
    packet_scalar!(@read read_f32, f32, 4, read_f32);
    packet_scalar!(@read read_f64, f64, 8, read_f64);

    fn read_char(&self, _key: Option<&str>, source: &Packet) -> Result<char, Error> {
        let buf = source.pull::<4>()?;
        let code = LittleEndian::read_u32(&buf);
        char::from_u32(code)
            .ok_or_else(|| Error::shape(format!("invalid char code point {code:#x}")))
    }

    fn read_string(&self, _key: Option<&str>, source: &Packet) -> Result<String, Error> {
        let len = source.pull_varuint32()? as usize;
        let mut bytes = vec![0u8; len];
        source.pull_into(&mut bytes)?;
        String::from_utf8(bytes).map_err(|err| Error::shape(format!("invalid utf-8 string: {err}")))
    }

    fn read_collection(
        &self,
        _key: Option<&str>,
        source: &Packet,
        decode_element: DecodeFn<'_, Packet>,
    ) -> Result<(), Error> {
        let len = source.pull_varuint32()?;
        for _ in 0..len {
            decode_element(source)?;
        }
        Ok(())
    }

    fn read_map(
        &self,
        _key: Option<&str>,
        source: &Packet,
        decode_entry: DecodeEntryFn<'_, Packet>,
    ) -> Result<(), Error> {
        let len = source.pull_varuint32()?;
        for _ in 0..len {
            decode_entry(source, source)?;
        }
        Ok(())
    }
}
