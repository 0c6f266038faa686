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

//! Homogeneous sequence nodes over a single element node.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

use crate::codec::{Decoder, Encoder};
use crate::error::Error;
use crate::node::Blueprint;

fn encode_sequence<'a, F, E, N, I>(
    element: &N,
    encoder: &E,
    key: Option<&str>,
    len: usize,
    items: I,
    target: &mut F,
) -> Result<(), Error>
where
    F: Clone + 'static,
    E: Encoder<F>,
    N: Blueprint,
    N::Value: 'a,
    I: IntoIterator<Item = &'a N::Value>,
{
    let mut items = items.into_iter();
    encoder.write_collection(
        key,
        len,
        &mut |container| {
            let item = items
                .next()
                .ok_or_else(|| Error::contract("backend visited more elements than announced"))?;
            element.encode_with(encoder, None, item, container)
        },
        target,
    )
}

/// Schema node for `Vec<T>`.
pub struct ListNode<N> {
    element: N,
}

impl<N> ListNode<N> {
    pub fn new(element: N) -> Self {
        ListNode { element }
    }
}

impl<N: Blueprint> Blueprint for ListNode<N> {
    type Value = Vec<N::Value>;

    fn encode_with<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        key: Option<&str>,
        value: &Vec<N::Value>,
        target: &mut F,
    ) -> Result<(), Error> {
        encode_sequence(&self.element, encoder, key, value.len(), value, target)
    }

    fn decode_with<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        key: Option<&str>,
        source: &F,
    ) -> Result<Vec<N::Value>, Error> {
        let mut out = Vec::new();
        decoder.read_collection(key, source, &mut |element| {
            out.push(self.element.decode_with(decoder, None, element)?);
            Ok(())
        })?;
        Ok(out)
    }
}

/// Schema node for `HashSet<T>`. Duplicate elements in the stream collapse
/// on decode.
pub struct SetNode<N> {
    element: N,
}

impl<N> SetNode<N> {
    pub fn new(element: N) -> Self {
        SetNode { element }
    }
}

impl<N: Blueprint> Blueprint for SetNode<N>
where
    N::Value: Eq + Hash,
{
    type Value = HashSet<N::Value>;

    fn encode_with<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        key: Option<&str>,
        value: &HashSet<N::Value>,
        target: &mut F,
    ) -> Result<(), Error> {
        encode_sequence(&self.element, encoder, key, value.len(), value, target)
    }

    fn decode_with<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        key: Option<&str>,
        source: &F,
    ) -> Result<HashSet<N::Value>, Error> {
        let mut out = HashSet::new();
        decoder.read_collection(key, source, &mut |element| {
            out.insert(self.element.decode_with(decoder, None, element)?);
            Ok(())
        })?;
        Ok(out)
    }
}

/// Schema node for `VecDeque<T>`.
pub struct QueueNode<N> {
    element: N,
}

impl<N> QueueNode<N> {
    pub fn new(element: N) -> Self {
        QueueNode { element }
    }
}

impl<N: Blueprint> Blueprint for QueueNode<N> {
    type Value = VecDeque<N::Value>;

    fn encode_with<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        key: Option<&str>,
        value: &VecDeque<N::Value>,
        target: &mut F,
    ) -> Result<(), Error> {
        encode_sequence(&self.element, encoder, key, value.len(), value, target)
    }

    fn decode_with<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        key: Option<&str>,
        source: &F,
    ) -> Result<VecDeque<N::Value>, Error> {
        let mut out = VecDeque::new();
        decoder.read_collection(key, source, &mut |element| {
            out.push_back(self.element.decode_with(decoder, None, element)?);
            Ok(())
        })?;
        Ok(out)
    }
}

/// Schema node for `[T; LEN]`. Decoding a stream with a different element
/// count is a shape error.
pub struct ArrayNode<N, const LEN: usize> {
    element: N,
}

impl<N, const LEN: usize> ArrayNode<N, LEN> {
    pub fn new(element: N) -> Self {
        ArrayNode { element }
    }
}

impl<N: Blueprint, const LEN: usize> Blueprint for ArrayNode<N, LEN> {
    type Value = [N::Value; LEN];

    fn encode_with<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        key: Option<&str>,
        value: &[N::Value; LEN],
        target: &mut F,
    ) -> Result<(), Error> {
        encode_sequence(&self.element, encoder, key, LEN, value, target)
    }

    fn decode_with<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        key: Option<&str>,
        source: &F,
    ) -> Result<[N::Value; LEN], Error> {
        let mut out = Vec::with_capacity(LEN);
        decoder.read_collection(key, source, &mut |element| {
            out.push(self.element.decode_with(decoder, None, element)?);
            Ok(())
        })?;
        let found = out.len();
        out.try_into()
            .map_err(|_| Error::shape(format!("expected {LEN} array elements, found {found}")))
    }
}
