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

use crate::codec::{Decoder, Encoder};
use crate::error::Error;
use crate::node::Blueprint;

const FIRST_SLOT: &str = "First";
const SECOND_SLOT: &str = "Second";

/// Schema node for a two-element tuple `(A, B)`.
///
/// The elements live in a dedicated keyed container under the fixed slot
/// names `First` and `Second`, so a pair nests anywhere a single value
/// can.
pub struct PairNode<A, B> {
    first: A,
    second: B,
}

impl<A, B> PairNode<A, B> {
    pub fn new(first: A, second: B) -> Self {
        PairNode { first, second }
    }
}

impl<A: Blueprint, B: Blueprint> Blueprint for PairNode<A, B> {
    type Value = (A::Value, B::Value);

    fn encode_with<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        key: Option<&str>,
        value: &(A::Value, B::Value),
        target: &mut F,
    ) -> Result<(), Error> {
        let mut slots = encoder.create_map(target)?;
        self.first
            .encode_with(encoder, Some(FIRST_SLOT), &value.0, &mut slots)?;
        self.second
            .encode_with(encoder, Some(SECOND_SLOT), &value.1, &mut slots)?;
        encoder.write(key, slots, target)
    }

    fn decode_with<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        key: Option<&str>,
        source: &F,
    ) -> Result<(A::Value, B::Value), Error> {
        let slots = decoder.read(key, source)?;
        let first = self.first.decode_with(decoder, Some(FIRST_SLOT), &slots)?;
        let second = self.second.decode_with(decoder, Some(SECOND_SLOT), &slots)?;
        Ok((first, second))
    }
}
