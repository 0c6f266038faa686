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

//! Leaf nodes for the primitive value types.

use crate::codec::{Decoder, Encoder};
use crate::error::Error;
use crate::node::Blueprint;

macro_rules! primitive_node {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $write:ident, $read:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl Blueprint for $name {
            type Value = $ty;

            fn encode_with<F: Clone + 'static, E: Encoder<F>>(
                &self,
                encoder: &E,
                key: Option<&str>,
                value: &$ty,
                target: &mut F,
            ) -> Result<(), Error> {
                encoder.$write(key, *value, target)
            }

            fn decode_with<F: Clone + 'static, D: Decoder<F>>(
                &self,
                decoder: &D,
                key: Option<&str>,
                source: &F,
            ) -> Result<$ty, Error> {
                decoder.$read(key, source)
            }
        }
    };
}

primitive_node!(
    /// Schema node for `bool`.
    BoolNode, bool, write_bool, read_bool
);
primitive_node!(
    /// Schema node for `i8`.
    I8Node, i8, write_i8, read_i8
);
primitive_node!(
    /// Schema node for `i16`.
    I16Node, i16, write_i16, read_i16
);
primitive_node!(
    /// Schema node for `i32`.
    I32Node, i32, write_i32, read_i32
);
primitive_node!(
    /// Schema node for `i64`.
    I64Node, i64, write_i64, read_i64
);
primitive_node!(
    /// Schema node for `f32`.
    F32Node, f32, write_f32, read_f32
);
primitive_node!(
    /// Schema node for `f64`.
    F64Node, f64, write_f64, read_f64
);
primitive_node!(
    /// Schema node for `char`.
    CharNode, char, write_char, read_char
);

/// Schema node for `String`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringNode;

impl Blueprint for StringNode {
    type Value = String;

    fn encode_with<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        key: Option<&str>,
        value: &String,
        target: &mut F,
    ) -> Result<(), Error> {
        encoder.write_str(key, value, target)
    }

    fn decode_with<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        key: Option<&str>,
        source: &F,
    ) -> Result<String, Error> {
        decoder.read_string(key, source)
    }
}
