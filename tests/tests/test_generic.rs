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

use std::any::Any;

use serde_json::json;
use stencil_core::node::{AnyList, AnyMap, AnyOptional};
use stencil_core::{Blueprint, Describe, Registry};
use stencil_derive::Describe;
use stencil_formats::{JsonCodec, Packet, PacketCodec};

#[derive(Describe, Clone, Debug, PartialEq)]
struct Badge {
    label: String,
    stars: i32,
}

#[test]
fn any_list_writes_self_describing_output() {
    let schema = AnyList::describe();
    let value = AnyList(vec![
        Box::new(5i32) as Box<dyn Any>,
        Box::new(7i32) as Box<dyn Any>,
    ]);

    let encoded = schema.encode(&JsonCodec, &value).unwrap();
    assert_eq!(
        encoded,
        json!({"Exists": true, "Type": "i32", "Items": [5, 7]})
    );

    let decoded = schema.decode(&JsonCodec, &encoded).unwrap();
    assert_eq!(decoded.downcast::<i32>().unwrap(), vec![&5, &7]);
}

#[test]
fn any_list_round_trips_through_packets() {
    let schema = AnyList::describe();
    let value = AnyList(vec![
        Box::new("a".to_owned()) as Box<dyn Any>,
        Box::new("b".to_owned()) as Box<dyn Any>,
    ]);

    let packet = schema.encode(&PacketCodec, &value).unwrap();
    let replay = Packet::from_bytes(packet.to_bytes());
    let decoded = schema.decode(&PacketCodec, &replay).unwrap();
    assert_eq!(
        decoded.downcast::<String>().unwrap(),
        vec![&"a".to_owned(), &"b".to_owned()]
    );
}

#[test]
fn empty_any_list_writes_an_absence_marker() {
    let schema = AnyList::describe();
    let encoded = schema.encode(&JsonCodec, &AnyList::default()).unwrap();
    assert_eq!(encoded, json!({"Exists": false}));
    assert!(schema.decode(&JsonCodec, &encoded).unwrap().is_empty());
}

#[test]
fn unregistered_element_type_degrades_to_absent() {
    struct Opaque;
    let schema = AnyList::describe();
    let value = AnyList(vec![Box::new(Opaque) as Box<dyn Any>]);
    let encoded = schema.encode(&JsonCodec, &value).unwrap();
    assert_eq!(encoded, json!({"Exists": false}));
}

#[test]
fn unresolvable_tag_degrades_to_empty_on_decode() {
    let schema = AnyList::describe();
    let drifted = json!({"Exists": true, "Type": "no-such-tag", "Items": [1]});
    assert!(schema.decode(&JsonCodec, &drifted).unwrap().is_empty());
}

#[test]
fn registered_structs_flow_through_any_list() {
    Registry::global().register::<Badge>("badge");

    let schema = AnyList::describe();
    let value = AnyList(vec![Box::new(Badge {
        label: "pioneer".to_owned(),
        stars: 3,
    }) as Box<dyn Any>]);

    let encoded = schema.encode(&JsonCodec, &value).unwrap();
    assert_eq!(
        encoded,
        json!({
            "Exists": true,
            "Type": "badge",
            "Items": [{"label": "pioneer", "stars": 3}],
        })
    );

    let decoded = schema.decode(&JsonCodec, &encoded).unwrap();
    let badges = decoded.downcast::<Badge>().unwrap();
    assert_eq!(badges[0].label, "pioneer");
    assert_eq!(badges[0].stars, 3);
}

#[test]
fn any_map_tracks_key_and_value_types() {
    let schema = AnyMap::describe();
    let value = AnyMap(vec![
        (
            Box::new("speed".to_owned()) as Box<dyn Any>,
            Box::new(10i32) as Box<dyn Any>,
        ),
        (
            Box::new("jump".to_owned()) as Box<dyn Any>,
            Box::new(4i32) as Box<dyn Any>,
        ),
    ]);

    let encoded = schema.encode(&JsonCodec, &value).unwrap();
    assert_eq!(
        encoded,
        json!({
            "Exists": true,
            "KeyType": "string",
            "ValueType": "i32",
            "Entries": {"speed": 10, "jump": 4},
        })
    );

    let decoded = schema.decode(&JsonCodec, &encoded).unwrap();
    assert_eq!(decoded.0.len(), 2);
    for (key, val) in &decoded.0 {
        let key = key.downcast_ref::<String>().unwrap();
        let val = val.downcast_ref::<i32>().unwrap();
        match key.as_str() {
            "speed" => assert_eq!(*val, 10),
            "jump" => assert_eq!(*val, 4),
            other => panic!("unexpected key {other}"),
        }
    }
}

#[test]
fn empty_any_map_degrades_cleanly() {
    let schema = AnyMap::describe();
    let encoded = schema.encode(&JsonCodec, &AnyMap::default()).unwrap();
    assert_eq!(encoded, json!({"Exists": false}));
    assert!(schema.decode(&JsonCodec, &encoded).unwrap().0.is_empty());
}

#[test]
fn any_optional_carries_its_type_tag() {
    let schema = AnyOptional::describe();
    let value = AnyOptional(Some(Box::new(99i64) as Box<dyn Any>));

    let encoded = schema.encode(&JsonCodec, &value).unwrap();
    assert_eq!(
        encoded,
        json!({"Exists": true, "Type": "i64", "Value": 99})
    );

    let decoded = schema.decode(&JsonCodec, &encoded).unwrap();
    assert_eq!(*decoded.0.unwrap().downcast_ref::<i64>().unwrap(), 99);
}

#[test]
fn absent_any_optional_round_trips() {
    let schema = AnyOptional::describe();
    let encoded = schema.encode(&JsonCodec, &AnyOptional::default()).unwrap();
    assert_eq!(encoded, json!({"Exists": false}));
    assert!(schema.decode(&JsonCodec, &encoded).unwrap().0.is_none());
}

#[test]
fn mismatched_later_elements_fail_the_encode() {
    // Identity is sampled from the first element; a later element of a
    // different type cannot be encoded with that schema.
    let schema = AnyList::describe();
    let value = AnyList(vec![
        Box::new(1i32) as Box<dyn Any>,
        Box::new("surprise".to_owned()) as Box<dyn Any>,
    ]);
    assert!(schema.encode(&JsonCodec, &value).is_err());
}
