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

//! Wrapper nodes: key pinning and value adaptation.

use std::borrow::Cow;
use std::marker::PhantomData;

use crate::codec::{Decoder, Encoder};
use crate::error::Error;
use crate::node::Blueprint;

/// Pins an inner node to a fixed key, overriding whatever key the parent
/// supplies. Built with [`Blueprint::keyed`].
pub struct Keyed<N> {
    key: Cow<'static, str>,
    node: N,
}

impl<N> Keyed<N> {
    pub fn new(key: impl Into<Cow<'static, str>>, node: N) -> Self {
        Keyed {
            key: key.into(),
            node,
        }
    }
}

impl<N: Blueprint> Blueprint for Keyed<N> {
    type Value = N::Value;

    fn key(&self) -> Option<&str> {
        Some(&self.key)
    }

    fn encode_with<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        _key: Option<&str>,
        value: &N::Value,
        target: &mut F,
    ) -> Result<(), Error> {
        self.node.encode_with(encoder, Some(&self.key), value, target)
    }

    fn decode_with<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        _key: Option<&str>,
        source: &F,
    ) -> Result<N::Value, Error> {
        self.node.decode_with(decoder, Some(&self.key), source)
    }
}

/// Adapts an inner node carrying `N::Value` into one carrying `U` through
/// a pair of conversions. Built with [`Blueprint::xmap`].
pub struct Mapped<N, U, Dm, Em> {
    node: N,
    decode_map: Dm,
    encode_map: Em,
    _value: PhantomData<fn() -> U>,
}

impl<N, U, Dm, Em> Mapped<N, U, Dm, Em> {
    pub fn new(node: N, decode_map: Dm, encode_map: Em) -> Self {
        Mapped {
            node,
            decode_map,
            encode_map,
            _value: PhantomData,
        }
    }
}

impl<N, U, Dm, Em> Blueprint for Mapped<N, U, Dm, Em>
where
    N: Blueprint,
    Dm: Fn(N::Value) -> U,
    Em: Fn(&U) -> N::Value,
{
    type Value = U;

    fn key(&self) -> Option<&str> {
        self.node.key()
    }

    fn encode_with<F: Clone + 'static, E: Encoder<F>>(
        &self,
        encoder: &E,
        key: Option<&str>,
        value: &U,
        target: &mut F,
    ) -> Result<(), Error> {
        let inner = (self.encode_map)(value);
        self.node.encode_with(encoder, key, &inner, target)
    }

    fn decode_with<F: Clone + 'static, D: Decoder<F>>(
        &self,
        decoder: &D,
        key: Option<&str>,
        source: &F,
    ) -> Result<U, Error> {
        let inner = self.node.decode_with(decoder, key, source)?;
        Ok((self.decode_map)(inner))
    }
}
