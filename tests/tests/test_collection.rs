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

use std::collections::{HashSet, VecDeque};

use serde_json::json;
use stencil_core::{schema, Blueprint, Error};
use stencil_formats::{JsonCodec, Packet, PacketCodec, TagCodec};

#[test]
fn lists_encode_as_json_arrays() {
    let node = schema::list(schema::int()).keyed("scores");
    let encoded = node.encode(&JsonCodec, &vec![3, 1, 4]).unwrap();
    assert_eq!(encoded, json!({"scores": [3, 1, 4]}));
    assert_eq!(node.decode(&JsonCodec, &encoded).unwrap(), vec![3, 1, 4]);
}

#[test]
fn lists_round_trip_through_packets() {
    let node = schema::list(schema::string());
    let value = vec!["a".to_owned(), "bc".to_owned(), "def".to_owned()];
    let packet = node.encode(&PacketCodec, &value).unwrap();
    let replay = Packet::from_bytes(packet.to_bytes());
    assert_eq!(node.decode(&PacketCodec, &replay).unwrap(), value);
}

#[test]
fn empty_list_stays_empty() {
    let node = schema::list(schema::double()).keyed("empty");
    let encoded = node.encode(&TagCodec, &Vec::new()).unwrap();
    assert!(node.decode(&TagCodec, &encoded).unwrap().is_empty());
}

#[test]
fn sets_round_trip_and_collapse_duplicates() {
    let node = schema::set(schema::int()).keyed("ids");
    let value: HashSet<i32> = [5, 7, 11].into_iter().collect();
    let encoded = node.encode(&JsonCodec, &value).unwrap();
    assert_eq!(node.decode(&JsonCodec, &encoded).unwrap(), value);

    // Duplicates in the stream collapse on decode.
    let drifted = json!({"ids": [5, 5, 7]});
    let decoded = node.decode(&JsonCodec, &drifted).unwrap();
    assert_eq!(decoded, [5, 7].into_iter().collect());
}

#[test]
fn queues_preserve_order() {
    let node = schema::queue(schema::short()).keyed("turns");
    let value: VecDeque<i16> = [1, 2, 3].into_iter().collect();
    let encoded = node.encode(&JsonCodec, &value).unwrap();
    assert_eq!(node.decode(&JsonCodec, &encoded).unwrap(), value);
}

#[test]
fn arrays_enforce_their_length() {
    let node = schema::array::<3, _>(schema::int()).keyed("rgb");
    let encoded = node.encode(&JsonCodec, &[255, 128, 0]).unwrap();
    assert_eq!(encoded, json!({"rgb": [255, 128, 0]}));
    assert_eq!(node.decode(&JsonCodec, &encoded).unwrap(), [255, 128, 0]);

    let short = json!({"rgb": [255, 128]});
    assert!(matches!(
        node.decode(&JsonCodec, &short),
        Err(Error::Shape(_))
    ));
}

#[test]
fn nested_lists_nest_containers() {
    let node = schema::list(schema::list(schema::int())).keyed("grid");
    let value = vec![vec![1, 2], vec![], vec![3]];
    let encoded = node.encode(&JsonCodec, &value).unwrap();
    assert_eq!(encoded, json!({"grid": [[1, 2], [], [3]]}));
    assert_eq!(node.decode(&JsonCodec, &encoded).unwrap(), value);
}

#[test]
fn unkeyed_collection_into_json_root_is_a_shape_error() {
    let node = schema::list(schema::int());
    assert!(matches!(
        node.encode(&JsonCodec, &vec![1]),
        Err(Error::Shape(_))
    ));
}
