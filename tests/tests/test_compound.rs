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
use stencil_core::{schema, Blueprint, Error};
use stencil_formats::{JsonCodec, Packet, PacketCodec, TagCodec};

#[derive(Clone, Debug, PartialEq, Default)]
struct Profile {
    name: String,
    level: i32,
    mutable: bool,
}

fn profile_schema() -> impl Blueprint<Value = Profile> {
    schema::compound3(
        schema::field("name", schema::string(), |p: &Profile| p.name.clone()),
        schema::field("level", schema::int(), |p: &Profile| p.level),
        schema::field("mutable", schema::boolean(), |p: &Profile| p.mutable),
        |name, level, mutable| Profile {
            name,
            level,
            mutable,
        },
    )
}

#[test]
fn compound_fields_land_under_their_keys() {
    let node = profile_schema();
    let value = Profile {
        name: "kael".to_owned(),
        level: 7,
        mutable: true,
    };
    let encoded = node.encode(&JsonCodec, &value).unwrap();
    assert_eq!(
        encoded,
        json!({"name": "kael", "level": 7, "mutable": true})
    );
    assert_eq!(node.decode(&JsonCodec, &encoded).unwrap(), value);
}

#[test]
fn keyed_compound_nests_instead_of_merging() {
    let node = schema::compound2(
        schema::field("x", schema::int(), |p: &(i32, i32)| p.0),
        schema::field("y", schema::int(), |p: &(i32, i32)| p.1),
        |x, y| (x, y),
    )
    .keyed("position");

    let encoded = node.encode(&JsonCodec, &(3, 4)).unwrap();
    assert_eq!(encoded, json!({"position": {"x": 3, "y": 4}}));
    assert_eq!(node.decode(&JsonCodec, &encoded).unwrap(), (3, 4));
}

#[test]
fn compounds_round_trip_positionally_in_field_order() {
    let node = profile_schema();
    let value = Profile {
        name: "ryn".to_owned(),
        level: 12,
        mutable: false,
    };
    let packet = node.encode(&PacketCodec, &value).unwrap();
    let replay = Packet::from_bytes(packet.to_bytes());
    assert_eq!(node.decode(&PacketCodec, &replay).unwrap(), value);
}

#[test]
fn compound_lists_encode_inline_elements() {
    let node = schema::list(schema::compound2(
        schema::field("x", schema::int(), |p: &(i32, i32)| p.0),
        schema::field("y", schema::int(), |p: &(i32, i32)| p.1),
        |x, y| (x, y),
    ))
    .keyed("path");

    let value = vec![(0, 0), (1, 2)];
    let encoded = node.encode(&JsonCodec, &value).unwrap();
    assert_eq!(
        encoded,
        json!({"path": [{"x": 0, "y": 0}, {"x": 1, "y": 2}]})
    );
    assert_eq!(node.decode(&JsonCodec, &encoded).unwrap(), value);
}

#[test]
fn missing_field_is_a_hard_error() {
    let node = profile_schema();
    let drifted = json!({"name": "kael", "mutable": true});
    assert!(matches!(
        node.decode(&JsonCodec, &drifted),
        Err(Error::MissingKey(_))
    ));
}

#[test]
fn decode_into_applies_setters_and_honors_guards() {
    let node = schema::compound2(
        schema::field("name", schema::string(), |p: &Profile| p.name.clone())
            .with_setter(|p, name| p.name = name.clone()),
        schema::field("level", schema::int(), |p: &Profile| p.level)
            .with_setter(|p, level| p.level = *level)
            .guarded(|p: &Profile| p.mutable),
        |name, level| Profile {
            name,
            level,
            mutable: false,
        },
    );

    let source = json!({"name": "renamed", "level": 99});

    let mut locked = Profile {
        mutable: false,
        ..Profile::default()
    };
    node.decode_into(&JsonCodec, None, &source, &mut locked)
        .unwrap();
    assert_eq!(locked.name, "renamed");
    assert_eq!(locked.level, 0);

    let mut unlocked = Profile {
        mutable: true,
        ..Profile::default()
    };
    node.decode_into(&JsonCodec, None, &source, &mut unlocked)
        .unwrap();
    assert_eq!(unlocked.level, 99);
}

#[test]
fn group_compounds_write_without_a_combiner() {
    let node = schema::group2(
        schema::field("width", schema::int(), |p: &Profile| p.level)
            .with_setter(|p, width| p.level = *width),
        schema::field("tag", schema::string(), |p: &Profile| p.name.clone())
            .with_setter(|p, tag| p.name = tag.clone()),
    );

    let value = Profile {
        name: "box".to_owned(),
        level: 4,
        mutable: false,
    };
    let encoded = node.encode(&JsonCodec, &value).unwrap();
    assert_eq!(encoded, json!({"width": 4, "tag": "box"}));

    // Plain decode yields the default; decode_into populates an owner.
    assert_eq!(node.decode(&JsonCodec, &encoded).unwrap(), Profile::default());
    let mut owner = Profile::default();
    node.decode_into(&JsonCodec, None, &encoded, &mut owner)
        .unwrap();
    assert_eq!(owner.level, 4);
    assert_eq!(owner.name, "box");
}

#[test]
fn twelve_field_compounds_are_supported() {
    let node = schema::compound12(
        schema::field("f1", schema::int(), |v: &[i32; 12]| v[0]),
        schema::field("f2", schema::int(), |v: &[i32; 12]| v[1]),
        schema::field("f3", schema::int(), |v: &[i32; 12]| v[2]),
        schema::field("f4", schema::int(), |v: &[i32; 12]| v[3]),
        schema::field("f5", schema::int(), |v: &[i32; 12]| v[4]),
        schema::field("f6", schema::int(), |v: &[i32; 12]| v[5]),
        schema::field("f7", schema::int(), |v: &[i32; 12]| v[6]),
        schema::field("f8", schema::int(), |v: &[i32; 12]| v[7]),
        schema::field("f9", schema::int(), |v: &[i32; 12]| v[8]),
        schema::field("f10", schema::int(), |v: &[i32; 12]| v[9]),
        schema::field("f11", schema::int(), |v: &[i32; 12]| v[10]),
        schema::field("f12", schema::int(), |v: &[i32; 12]| v[11]),
        |a, b, c, d, e, f, g, h, i, j, k, l| [a, b, c, d, e, f, g, h, i, j, k, l],
    );

    let value = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
    let encoded = node.encode(&TagCodec, &value).unwrap();
    assert_eq!(node.decode(&TagCodec, &encoded).unwrap(), value);
}
