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

//! Format backends for Stencil schemas.
//!
//! Three reference backends ship here:
//!
//! - [`packet`]: a flat positional byte buffer (little-endian scalars,
//!   varuint length prefixes);
//! - [`json`]: `serde_json::Value` trees;
//! - [`tag`]: NBT-style typed tag trees.
//!
//! Any schema runs unchanged against all three; only the output shape
//! differs.

pub mod json;
pub mod packet;
pub mod tag;

pub use json::JsonCodec;
pub use packet::{Packet, PacketCodec};
pub use tag::{Tag, TagCodec};
