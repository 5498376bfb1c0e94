// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;
use yare::parameterized;

#[test]
fn generated_ids_draw_from_one_shared_counter() {
    let ids = SequentialIdGen::new("ev");
    let clone = ids.clone();

    assert_eq!(EventId::generate(&ids), EventId::new("ev-1"));
    assert_eq!(JobId::generate(&clone), JobId::new("ev-2"));
    assert_eq!(ScheduleId::generate(&ids).as_str(), "ev-3");
    assert_eq!(ids.issued(), 3);
    assert_eq!(clone.issued(), 3);
}

#[test]
fn uuid_event_ids_do_not_repeat() {
    let a = EventId::generate(&UuidIdGen);
    let b = EventId::generate(&UuidIdGen);
    assert_ne!(a, b);
    assert!(uuid::Uuid::parse_str(a.as_str()).is_ok());
}

#[test]
fn resource_keyed_maps_accept_str_lookups() {
    let mut load: HashMap<ResourceId, u32> = HashMap::new();
    load.insert(ResourceId::from("pump_1"), 2);

    assert_eq!(load.get("pump_1"), Some(&2));
    assert_eq!(load.get("valve_1"), None);
}

#[test]
fn signal_tokens_round_trip_as_plain_strings() {
    let token = SignalToken::from("valve-open");
    let json = serde_json::to_string(&token).unwrap();
    assert_eq!(json, "\"valve-open\"");
    assert_eq!(serde_json::from_str::<SignalToken>(&json).unwrap(), token);
}

#[parameterized(
    event = { NodeId::from(EventId::new("x")), "event x" },
    job = { NodeId::from(JobId::new("x")), "job x" },
)]
fn node_ids_name_their_kind(id: NodeId, shown: &str) {
    assert_eq!(id.to_string(), shown);
    assert_eq!(id.as_str(), "x");
}

#[test]
fn node_ids_of_different_kinds_are_distinct_keys() {
    assert_ne!(NodeId::from(EventId::new("x")), NodeId::from(JobId::new("x")));
}
