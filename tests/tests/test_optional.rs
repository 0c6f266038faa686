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

use serde_json::json;
use stencil_core::{schema, Blueprint};
use stencil_formats::{JsonCodec, Packet, PacketCodec};

#[test]
fn present_value_writes_flag_and_value() {
    let node = schema::optional(schema::int()).keyed("hp");
    let encoded = node.encode(&JsonCodec, &Some(20)).unwrap();
    assert_eq!(encoded, json!({"hp$MetaDataFlag": true, "hp": 20}));
    assert_eq!(node.decode(&JsonCodec, &encoded).unwrap(), Some(20));
}

#[test]
fn absent_value_writes_only_the_flag() {
    let node = schema::optional(schema::int()).keyed("hp");
    let encoded = node.encode(&JsonCodec, &None).unwrap();
    assert_eq!(encoded, json!({"hp$MetaDataFlag": false}));
    assert_eq!(node.decode(&JsonCodec, &encoded).unwrap(), None);
}

#[test]
fn optionals_round_trip_positionally() {
    let node = schema::optional(schema::string());
    for value in [Some("here".to_owned()), None] {
        let packet = node.encode(&PacketCodec, &value).unwrap();
        let replay = Packet::from_bytes(packet.to_bytes());
        assert_eq!(node.decode(&PacketCodec, &replay).unwrap(), value);
    }
}

#[test]
fn undecodable_present_value_masks_to_absent() {
    let node = schema::optional(schema::int()).keyed("hp");
    // Flag says present, but the value slot holds garbage.
    let drifted = json!({"hp$MetaDataFlag": true, "hp": [1, 2]});
    assert_eq!(node.decode(&JsonCodec, &drifted).unwrap(), None);
}

#[test]
fn nullable_uses_the_default_as_sentinel() {
    let node = schema::nullable(schema::int()).keyed("bonus");

    let absent = node.encode(&JsonCodec, &0).unwrap();
    assert_eq!(absent, json!({"bonus$MetaDataFlag": false}));
    assert_eq!(node.decode(&JsonCodec, &absent).unwrap(), 0);

    let present = node.encode(&JsonCodec, &12).unwrap();
    assert_eq!(present, json!({"bonus$MetaDataFlag": true, "bonus": 12}));
    assert_eq!(node.decode(&JsonCodec, &present).unwrap(), 12);
}

#[test]
fn unkeyed_optional_uses_the_bare_metadata_key() {
    // Inside a packet the key is ignored anyway; against JSON an unkeyed
    // optional writes its flag under the derived bare key.
    let node = schema::optional(schema::list(schema::int()));
    let encoded = node.encode(&JsonCodec, &None).unwrap();
    assert_eq!(encoded, json!({"MetaDataFlag": false}));
}

#[test]
fn nested_optionals_stack_their_flags_positionally() {
    let node = schema::optional(schema::optional(schema::int()));
    for value in [Some(Some(1)), Some(None), None] {
        let packet = node.encode(&PacketCodec, &value).unwrap();
        let replay = Packet::from_bytes(packet.to_bytes());
        assert_eq!(node.decode(&PacketCodec, &replay).unwrap(), value);
    }
}
