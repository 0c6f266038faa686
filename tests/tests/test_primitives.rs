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
use stencil_formats::{JsonCodec, Packet, PacketCodec, TagCodec};

#[test]
fn keyed_scalars_round_trip_through_json() {
    let node = schema::long().keyed("stamp");
    let encoded = node.encode(&JsonCodec, &1_234_567_890_123i64).unwrap();
    assert_eq!(encoded, json!({"stamp": 1_234_567_890_123i64}));
    assert_eq!(node.decode(&JsonCodec, &encoded).unwrap(), 1_234_567_890_123);
}

#[test]
fn keyed_scalars_round_trip_through_tags() {
    let node = schema::double().keyed("ratio");
    let encoded = node.encode(&TagCodec, &0.25).unwrap();
    assert_eq!(node.decode(&TagCodec, &encoded).unwrap(), 0.25);
}

#[test]
fn scalars_round_trip_through_packets() {
    let node = schema::short();
    let encoded = node.encode(&PacketCodec, &-321i16).unwrap();
    let replay = Packet::from_bytes(encoded.to_bytes());
    assert_eq!(node.decode(&PacketCodec, &replay).unwrap(), -321);
}

#[test]
fn integer_boundaries_round_trip() {
    let codec = PacketCodec;

    let byte = schema::byte();
    let short = schema::short();
    let int = schema::int();
    let long = schema::long();

    for value in [i8::MIN, -1, 0, i8::MAX] {
        let packet = byte.encode(&codec, &value).unwrap();
        let replay = Packet::from_bytes(packet.to_bytes());
        assert_eq!(byte.decode(&codec, &replay).unwrap(), value);
    }
    for value in [i16::MIN, i16::MAX] {
        let packet = short.encode(&codec, &value).unwrap();
        let replay = Packet::from_bytes(packet.to_bytes());
        assert_eq!(short.decode(&codec, &replay).unwrap(), value);
    }
    for value in [i32::MIN, i32::MAX] {
        let packet = int.encode(&codec, &value).unwrap();
        let replay = Packet::from_bytes(packet.to_bytes());
        assert_eq!(int.decode(&codec, &replay).unwrap(), value);
    }
    for value in [i64::MIN, i64::MAX] {
        let packet = long.encode(&codec, &value).unwrap();
        let replay = Packet::from_bytes(packet.to_bytes());
        assert_eq!(long.decode(&codec, &replay).unwrap(), value);

        let keyed = long.keyed("n");
        let json_value = keyed.encode(&JsonCodec, &value).unwrap();
        assert_eq!(keyed.decode(&JsonCodec, &json_value).unwrap(), value);
    }
}

#[test]
fn empty_string_round_trips() {
    let node = schema::string().keyed("name");
    let value = String::new();

    let json_value = node.encode(&JsonCodec, &value).unwrap();
    assert_eq!(node.decode(&JsonCodec, &json_value).unwrap(), value);

    let tag_value = node.encode(&TagCodec, &value).unwrap();
    assert_eq!(node.decode(&TagCodec, &tag_value).unwrap(), value);

    let positional = schema::string();
    let packet = positional.encode(&PacketCodec, &value).unwrap();
    let replay = Packet::from_bytes(packet.to_bytes());
    assert_eq!(positional.decode(&PacketCodec, &replay).unwrap(), value);
}

#[test]
fn non_finite_floats_round_trip_where_representable() {
    // Packets and tags carry raw IEEE floats; only JSON rejects them.
    let node = schema::double();
    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, f64::MIN, f64::MAX] {
        let packet = node.encode(&PacketCodec, &value).unwrap();
        let replay = Packet::from_bytes(packet.to_bytes());
        let back = node.decode(&PacketCodec, &replay).unwrap();
        assert!(back == value || (back.is_nan() && value.is_nan()));
    }

    let keyed = node.keyed("x");
    let tag_value = keyed.encode(&TagCodec, &f64::INFINITY).unwrap();
    assert_eq!(keyed.decode(&TagCodec, &tag_value).unwrap(), f64::INFINITY);
    assert!(keyed
        .decode(&TagCodec, &keyed.encode(&TagCodec, &f64::NAN).unwrap())
        .unwrap()
        .is_nan());

    assert!(keyed.encode(&JsonCodec, &f64::NAN).is_err());
}

#[test]
fn wrapper_key_wins_over_parent_key() {
    // The compound hands the field key down; the pinned key overrides it.
    #[derive(Clone, Debug, PartialEq)]
    struct Wrapper {
        value: i32,
    }

    let node = schema::compound1(
        schema::field("outer", schema::int().keyed("inner"), |w: &Wrapper| w.value),
        |value| Wrapper { value },
    );
    let encoded = node.encode(&JsonCodec, &Wrapper { value: 9 }).unwrap();
    assert_eq!(encoded, json!({"inner": 9}));
    assert_eq!(
        node.decode(&JsonCodec, &encoded).unwrap(),
        Wrapper { value: 9 }
    );
}

#[test]
fn xmap_adapts_the_carried_type() {
    let node = schema::long()
        .xmap(
            |millis| std::time::Duration::from_millis(millis as u64),
            |duration: &std::time::Duration| duration.as_millis() as i64,
        )
        .keyed("elapsed");

    let encoded = node
        .encode(&JsonCodec, &std::time::Duration::from_millis(1500))
        .unwrap();
    assert_eq!(encoded, json!({"elapsed": 1500}));
    assert_eq!(
        node.decode(&JsonCodec, &encoded).unwrap(),
        std::time::Duration::from_millis(1500)
    );
}

#[test]
fn char_round_trips_everywhere() {
    let node = schema::character().keyed("initial");
    let json_value = node.encode(&JsonCodec, &'λ').unwrap();
    assert_eq!(json_value, json!({"initial": "λ"}));
    assert_eq!(node.decode(&JsonCodec, &json_value).unwrap(), 'λ');

    let tag_value = node.encode(&TagCodec, &'λ').unwrap();
    assert_eq!(node.decode(&TagCodec, &tag_value).unwrap(), 'λ');

    let positional = schema::character();
    let packet = positional.encode(&PacketCodec, &'λ').unwrap();
    let replay = Packet::from_bytes(packet.to_bytes());
    assert_eq!(positional.decode(&PacketCodec, &replay).unwrap(), 'λ');
}

#[test]
fn same_schema_drives_every_backend() {
    let node = schema::string().keyed("name");
    let value = "mir".to_owned();

    let json_value = node.encode(&JsonCodec, &value).unwrap();
    assert_eq!(node.decode(&JsonCodec, &json_value).unwrap(), value);

    let tag_value = node.encode(&TagCodec, &value).unwrap();
    assert_eq!(node.decode(&TagCodec, &tag_value).unwrap(), value);

    let packet = node.encode(&PacketCodec, &value).unwrap();
    let replay = Packet::from_bytes(packet.to_bytes());
    assert_eq!(node.decode(&PacketCodec, &replay).unwrap(), value);
}
