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

use std::sync::Arc;

use stencil_core::{Blueprint, Registry};
use stencil_derive::Describe;
use stencil_formats::{JsonCodec, Packet, PacketCodec};

#[derive(Describe, Clone, Debug, PartialEq)]
struct Waypoint {
    name: String,
    x: f64,
    y: f64,
}

#[test]
fn registry_schemas_are_shared_and_usable() {
    let registry = Registry::new();
    let schema = registry.of::<Waypoint>();
    let again = registry.of::<Waypoint>();
    assert!(Arc::ptr_eq(&schema, &again));

    let value = Waypoint {
        name: "spawn".to_owned(),
        x: 0.5,
        y: -1.5,
    };
    let encoded = schema.encode(&JsonCodec, &value).unwrap();
    assert_eq!(schema.decode(&JsonCodec, &encoded).unwrap(), value);
}

#[test]
fn lazily_derived_entries_get_the_type_name_tag() {
    let registry = Registry::new();
    let entry = registry.entry_of::<Waypoint>();
    assert_eq!(entry.tag(), std::any::type_name::<Waypoint>());
}

#[test]
fn explicit_registration_controls_the_tag() {
    let registry = Registry::new();
    registry.register::<Waypoint>("waypoint");
    assert_eq!(registry.entry_of::<Waypoint>().tag(), "waypoint");
    assert!(registry.entry_by_tag("waypoint").is_some());
    assert!(registry.entry_by_tag("no-such-tag").is_none());
}

#[test]
fn seeded_primitives_resolve_by_value() {
    let registry = Registry::new();
    let value: Box<dyn std::any::Any> = Box::new(42i32);
    let entry = registry.entry_for_value(value.as_ref()).unwrap();
    assert_eq!(entry.tag(), "i32");
}

#[test]
fn registry_schema_drives_the_packet_backend_too() {
    let registry = Registry::new();
    let schema = registry.of::<Vec<i64>>();
    let value = vec![1i64, 2, 3];
    let packet = schema.encode(&PacketCodec, &value).unwrap();
    let replay = Packet::from_bytes(packet.to_bytes());
    assert_eq!(schema.decode(&PacketCodec, &replay).unwrap(), value);
}
