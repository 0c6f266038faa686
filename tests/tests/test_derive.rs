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

use std::collections::HashMap;

use serde_json::json;
use stencil_core::{Blueprint, Describe};
use stencil_derive::Describe;
use stencil_formats::{JsonCodec, Packet, PacketCodec, TagCodec};

#[derive(Describe, Clone, Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn derived_point_uses_field_names_as_keys() {
    let schema = Point::describe();
    let encoded = schema.encode(&JsonCodec, &Point { x: 3, y: 4 }).unwrap();
    assert_eq!(encoded, json!({"x": 3, "y": 4}));
    assert_eq!(
        schema.decode(&JsonCodec, &encoded).unwrap(),
        Point { x: 3, y: 4 }
    );
}

#[test]
fn derived_point_round_trips_through_every_backend() {
    let schema = Point::describe();
    let value = Point { x: -1, y: 2 };

    let tag_value = schema.encode(&TagCodec, &value).unwrap();
    assert_eq!(schema.decode(&TagCodec, &tag_value).unwrap(), value);

    let packet = schema.encode(&PacketCodec, &value).unwrap();
    assert_eq!(packet.to_bytes().len(), 8);
    let replay = Packet::from_bytes(packet.to_bytes());
    assert_eq!(schema.decode(&PacketCodec, &replay).unwrap(), value);
}

#[derive(Describe, Clone, Debug, PartialEq)]
struct Player {
    name: String,
    #[stencil(rename = "hitpoints")]
    hp: i32,
    position: Point,
    inventory: Vec<String>,
    #[stencil(skip)]
    session: i64,
}

#[test]
fn rename_and_skip_attributes_shape_the_output() {
    let schema = Player::describe();
    let value = Player {
        name: "kael".to_owned(),
        hp: 20,
        position: Point { x: 1, y: 2 },
        inventory: vec!["sword".to_owned()],
        session: 777,
    };

    let encoded = schema.encode(&JsonCodec, &value).unwrap();
    assert_eq!(
        encoded,
        json!({
            "name": "kael",
            "hitpoints": 20,
            "position": {"x": 1, "y": 2},
            "inventory": ["sword"],
        })
    );

    let decoded = schema.decode(&JsonCodec, &encoded).unwrap();
    // The skipped field falls back to its default.
    assert_eq!(decoded.session, 0);
    assert_eq!(decoded.hp, value.hp);
    assert_eq!(decoded.position, value.position);
}

#[derive(Describe, Clone, Debug, PartialEq)]
struct Settings {
    labels: HashMap<String, String>,
    motd: Option<String>,
    ratio: (i32, i32),
}

#[test]
fn derived_containers_compose() {
    let schema = Settings::describe();
    let mut labels = HashMap::new();
    labels.insert("lang".to_owned(), "en".to_owned());
    let value = Settings {
        labels,
        motd: Some("welcome".to_owned()),
        ratio: (16, 9),
    };

    let encoded = schema.encode(&JsonCodec, &value).unwrap();
    assert_eq!(
        encoded,
        json!({
            "labels": {"lang": "en"},
            "motd$MetaDataFlag": true,
            "motd": "welcome",
            "ratio": {"First": 16, "Second": 9},
        })
    );
    assert_eq!(schema.decode(&JsonCodec, &encoded).unwrap(), value);
}

#[derive(Describe, Clone, Debug, PartialEq)]
struct Tree {
    value: i32,
    children: Vec<Tree>,
}

#[test]
fn recursive_types_derive_through_lazy_nodes() {
    let schema = Tree::describe();
    let value = Tree {
        value: 1,
        children: vec![
            Tree {
                value: 2,
                children: Vec::new(),
            },
            Tree {
                value: 3,
                children: vec![Tree {
                    value: 4,
                    children: Vec::new(),
                }],
            },
        ],
    };

    let encoded = schema.encode(&JsonCodec, &value).unwrap();
    assert_eq!(schema.decode(&JsonCodec, &encoded).unwrap(), value);

    let packet = schema.encode(&PacketCodec, &value).unwrap();
    let replay = Packet::from_bytes(packet.to_bytes());
    assert_eq!(schema.decode(&PacketCodec, &replay).unwrap(), value);
}

#[test]
fn facade_reexports_are_usable() {
    // The facade crate exposes the trait and the derive under one name.
    #[derive(stencil::Describe, Clone, Debug, PartialEq)]
    struct Pixel {
        r: i8,
        g: i8,
        b: i8,
    }

    let schema = <Pixel as stencil::Describe>::describe();
    let value = Pixel { r: 1, g: 2, b: 3 };
    let encoded = schema.encode(&JsonCodec, &value).unwrap();
    assert_eq!(schema.decode(&JsonCodec, &encoded).unwrap(), value);
}
