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

//! Error handling for encode/decode operations.
//!
//! Errors fall into three families with different recovery contracts:
//!
//! - **Shape errors** ([`Error::Shape`], [`Error::MissingKey`]): a backend
//!   could not satisfy an addressing request (unkeyed write into a
//!   keyed-only container, absent key, malformed representation). These
//!   propagate unmodified to the caller and are the only hard failures.
//! - **Derivation errors** ([`Error::Derivation`]): a schema could not be
//!   produced for a field or element. Callers recover locally by skipping
//!   the field or degrading the container.
//! - **Type-identity errors** ([`Error::TypeIdentity`]): a stream-supplied
//!   type tag could not be resolved, or a sampled runtime type has no
//!   registered schema. Containers degrade to empty/absent.
//!
//! [`Error::Contract`] marks protocol violations between a node and a
//! backend (for example a collection writer visiting more elements than it
//! announced) and is treated like a shape error.

use std::borrow::Cow;

use thiserror::Error;

/// Set `STENCIL_PANIC_ON_ERROR=1` at compile time to panic at the exact
/// location an error is created, with a full backtrace.
pub const PANIC_ON_ERROR: bool = option_env!("STENCIL_PANIC_ON_ERROR").is_some();

/// Error type for all encode/decode operations.
///
/// Prefer the static constructor functions ([`Error::shape`],
/// [`Error::missing_key`], [`Error::derivation`], [`Error::type_identity`],
/// [`Error::contract`]) over constructing variants directly; they accept
/// anything convertible into a `Cow<'static, str>` and honor the
/// `STENCIL_PANIC_ON_ERROR` debug switch.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The backend could not satisfy an addressing or representation
    /// request. Never recovered locally.
    #[error("{0}")]
    Shape(Cow<'static, str>),

    /// A keyed read found no entry under the requested key.
    #[error("missing key `{0}`")]
    MissingKey(Cow<'static, str>),

    /// No usable schema could be derived for a field or element.
    #[error("{0}")]
    Derivation(Cow<'static, str>),

    /// A run-time type tag could not be resolved to a registered schema.
    #[error("{0}")]
    TypeIdentity(Cow<'static, str>),

    /// A node and a backend disagreed about the read/write protocol.
    #[error("{0}")]
    Contract(Cow<'static, str>),
}

macro_rules! constructor {
    ($(#[$doc:meta])* $name:ident, $variant:ident) => {
        $(#[$doc])*
        #[inline(always)]
        #[cold]
        #[track_caller]
        pub fn $name<S: Into<Cow<'static, str>>>(message: S) -> Self {
            let err = Error::$variant(message.into());
            if PANIC_ON_ERROR {
                panic!("STENCIL_PANIC_ON_ERROR: {}", err);
            }
            err
        }
    };
}

impl Error {
    constructor!(
        /// Creates a new [`Error::Shape`].
        shape,
        Shape
    );
    constructor!(
        /// Creates a new [`Error::MissingKey`].
        missing_key,
        MissingKey
    );
    constructor!(
        /// Creates a new [`Error::Derivation`].
        derivation,
        Derivation
    );
    constructor!(
        /// Creates a new [`Error::TypeIdentity`].
        type_identity,
        TypeIdentity
    );
    constructor!(
        /// Creates a new [`Error::Contract`].
        contract,
        Contract
    );
}

/// Ensures a condition holds; otherwise returns the given [`enum@Error`].
///
/// # Examples
/// ```
/// use stencil_core::ensure;
/// use stencil_core::Error;
///
/// fn check(n: usize) -> Result<(), Error> {
///     ensure!(n < 16, Error::shape("value out of range"));
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

/// Returns early with the given [`enum@Error`].
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($err)
    };
}
