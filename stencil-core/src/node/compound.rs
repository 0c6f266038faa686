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

//! Fixed-arity product nodes.
//!
//! A `CompoundN` describes a record of N fields: encoding builds a fresh
//! keyed container, writes every field into it through its [`Field`]
//! accessors, and attaches the container to the target. Decoding resolves
//! the container, decodes every field in declaration order and combines
//! the results into the record type through the combiner function.
//!
//! Arities 1 through 12 are provided, mirroring what schema derivation
//! supports.

use crate::codec::{Decoder, Encoder};
use crate::error::Error;
use crate::node::{Blueprint, Field};

macro_rules! compound_node {
    (
        $(#[$doc:meta])*
        $name:ident, $factory:ident, $group:ident,
        $($node_ty:ident / $value:ident / $idx:tt),+
    ) => {
        $(#[$doc])*
        pub struct $name<R, $($node_ty: Blueprint),+> {
            fields: ($(Field<R, $node_ty>,)+),
            combine: Box<dyn Fn($($node_ty::Value),+) -> R + Send + Sync>,
        }

        impl<R, $($node_ty: Blueprint),+> $name<R, $($node_ty),+> {
            pub fn new(
                fields: ($(Field<R, $node_ty>,)+),
                combine: impl Fn($($node_ty::Value),+) -> R + Send + Sync + 'static,
            ) -> Self {
                $name {
                    fields,
                    combine: Box::new(combine),
                }
            }

            /// Decodes every field and writes each value back into
            /// `owner` through the field setters, skipping fields whose
            /// guard rejects the owner or that have no setter.
            pub fn decode_into<F: Clone + 'static, D: Decoder<F>>(
                &self,
                decoder: &D,
                key: Option<&str>,
                source: &F,
                owner: &mut R,
            ) -> Result<(), Error> {
                let group = decoder.read(key, source)?;
                $(
                    let $value = self.fields.$idx.decode_value(decoder, &group)?;
                    self.fields.$idx.apply(owner, &$value);
                )+
                Ok(())
            }
        }

        impl<R, $($node_ty: Blueprint),+> Blueprint for $name<R, $($node_ty),+> {
            type Value = R;

            fn encode_with<F: Clone + 'static, E: Encoder<F>>(
                &self,
                encoder: &E,
                key: Option<&str>,
                value: &R,
                target: &mut F,
            ) -> Result<(), Error> {
                let mut group = encoder.create_map(target)?;
                $(self.fields.$idx.encode_from(encoder, value, &mut group)?;)+
                encoder.write(key, group, target)
            }

            fn decode_with<F: Clone + 'static, D: Decoder<F>>(
                &self,
                decoder: &D,
                key: Option<&str>,
                source: &F,
            ) -> Result<R, Error> {
                let group = decoder.read(key, source)?;
                $(let $value = self.fields.$idx.decode_value(decoder, &group)?;)+
                Ok((self.combine)($($value),+))
            }
        }

        /// Builds a compound from its fields and a combiner.
        pub fn $factory<R, $($node_ty: Blueprint),+>(
            $($value: Field<R, $node_ty>,)+
            combine: impl Fn($($node_ty::Value),+) -> R + Send + Sync + 'static,
        ) -> $name<R, $($node_ty),+> {
            $name::new(($($value,)+), combine)
        }

        /// Builds a compound with a no-op combiner, for owners that are
        /// populated through field setters (`decode_into`) rather than
        /// constructed. Plain decoding yields `O::default()` with no
        /// field applied.
        pub fn $group<O: Default + 'static, $($node_ty: Blueprint),+>(
            $($value: Field<O, $node_ty>,)+
        ) -> $name<O, $($node_ty),+> {
            $name::new(($($value,)+), |$($value),+| {
                $(let _ = $value;)+
                O::default()
            })
        }
    };
}

compound_node!(
    /// Product node over one field.
    Compound1, compound1, group1,
    N1 / v1 / 0
);
compound_node!(
    /// Product node over two fields.
    Compound2, compound2, group2,
    N1 / v1 / 0, N2 / v2 / 1
);
compound_node!(
    /// Product node over three fields.
    Compound3, compound3, group3,
    N1 / v1 / 0, N2 / v2 / 1, N3 / v3 / 2
);
compound_node!(
    /// Product node over four fields.
    Compound4, compound4, group4,
    N1 / v1 / 0, N2 / v2 / 1, N3 / v3 / 2, N4 / v4 / 3
);
compound_node!(
    /// Product node over five fields.
    Compound5, compound5, group5,
    N1 / v1 / 0, N2 / v2 / 1, N3 / v3 / 2, N4 / v4 / 3, N5 / v5 / 4
);
compound_node!(
    /// Product node over six fields.
    Compound6, compound6, group6,
    N1 / v1 / 0, N2 / v2 / 1, N3 / v3 / 2, N4 / v4 / 3, N5 / v5 / 4, N6 / v6 / 5
);
compound_node!(
    /// Product node over seven fields.
    Compound7, compound7, group7,
    N1 / v1 / 0, N2 / v2 / 1, N3 / v3 / 2, N4 / v4 / 3, N5 / v5 / 4, N6 / v6 / 5, N7 / v7 / 6
);
compound_node!(
    /// Product node over eight fields.
    Compound8, compound8, group8,
    N1 / v1 / 0, N2 / v2 / 1, N3 / v3 / 2, N4 / v4 / 3, N5 / v5 / 4, N6 / v6 / 5, N7 / v7 / 6,
    N8 / v8 / 7
);
compound_node!(
    /// Product node over nine fields.
    Compound9, compound9, group9,
    N1 / v1 / 0, N2 / v2 / 1, N3 / v3 / 2, N4 / v4 / 3, N5 / v5 / 4, N6 / v6 / 5, N7 / v7 / 6,
    N8 / v8 / 7, N9 / v9 / 8
);
compound_node!(
    /// Product node over ten fields.
    Compound10, compound10, group10,
    N1 / v1 / 0, N2 / v2 / 1, N3 / v3 / 2, N4 / v4 / 3, N5 / v5 / 4, N6 / v6 / 5, N7 / v7 / 6,
    N8 / v8 / 7, N9 / v9 / 8, N10 / v10 / 9
);
compound_node!(
    /// Product node over eleven fields.
    Compound11, compound11, group11,
    N1 / v1 / 0, N2 / v2 / 1, N3 / v3 / 2, N4 / v4 / 3, N5 / v5 / 4, N6 / v6 / 5, N7 / v7 / 6,
    N8 / v8 / 7, N9 / v9 / 8, N10 / v10 / 9, N11 / v11 / 10
);
compound_node!(
    /// Product node over twelve fields.
    Compound12, compound12, group12,
    N1 / v1 / 0, N2 / v2 / 1, N3 / v3 / 2, N4 / v4 / 3, N5 / v5 / 4, N6 / v6 / 5, N7 / v7 / 6,
    N8 / v8 / 7, N9 / v9 / 8, N10 / v10 / 9, N11 / v11 / 10, N12 / v12 / 11
);
