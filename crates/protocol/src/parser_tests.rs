// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::catalog::ParamRange;
use labq_core::{ArgKind, ArgValue, FakeClock, Mode, SequentialIdGen, Timestamp};
use std::time::Duration;
use yare::parameterized;

const SAMPLE_CATALOG: &str = r#"
[resource.pump.action.pump]
[[resource.pump.action.pump.param]]
name = "flow_rate"
type = "float"
min = 0.0
max = 10.0
step = 0.5

[[resource.pump.action.pump.param]]
name = "direction"
type = "str"
options = ["forward", "reverse"]
required = false

[resource.pump.action.stop]

[resource.valve.action.switch]
[[resource.valve.action.switch.param]]
name = "port"
type = ["int", "str"]
"#;

const PRIME_PROTOCOL: &str = r#"
name = "prime"
mode = "sequence"

[[step]]
resource = "pump"
action = "pump"
duration = "10s"
args = { flow_rate = 1.0 }

[[step]]
resource = "pump"
action = "stop"
"#;

#[test]
fn parses_catalog_actions_and_params() {
    let catalog = parse_catalog(SAMPLE_CATALOG).unwrap();
    assert_eq!(catalog.len(), 2);

    let pump = catalog.resource("pump").unwrap();
    assert_eq!(pump.action_names(), vec!["pump", "stop"]);

    let action = pump.action("pump").unwrap();
    let flow = action.param("flow_rate").unwrap();
    assert_eq!(flow.types, vec![ArgKind::Float]);
    assert!(flow.required);
    assert_eq!(
        flow.range,
        Some(ParamRange::Numeric {
            min: 0.0,
            max: 10.0,
            step: Some(0.5)
        })
    );

    let direction = action.param("direction").unwrap();
    assert!(!direction.required);
    assert_eq!(
        direction.range,
        Some(ParamRange::Options(vec![
            ArgValue::from("forward"),
            ArgValue::from("reverse")
        ]))
    );

    let port = catalog
        .resource("valve")
        .unwrap()
        .action("switch")
        .unwrap()
        .param("port")
        .unwrap();
    assert_eq!(port.types, vec![ArgKind::Int, ArgKind::Str]);
}

#[parameterized(
    min_without_max = { "min = 0" },
    step_without_range = { "step = 1" },
    range_and_options = { "min = 0\nmax = 1\noptions = [0, 1]" },
    inverted_range = { "min = 5\nmax = 1" },
    zero_step = { "min = 0\nmax = 1\nstep = 0" },
    empty_options = { "options = []" },
)]
fn rejects_malformed_param_ranges(fields: &str) {
    let content = format!(
        "[resource.r.action.a]\n[[resource.r.action.a.param]]\nname = \"p\"\n{}\n",
        fields
    );
    assert!(matches!(
        parse_catalog(&content),
        Err(ParseError::InvalidFormat(_))
    ));
}

#[test]
fn rejects_duplicate_param_names() {
    let content = r#"
[resource.r.action.a]
[[resource.r.action.a.param]]
name = "p"
[[resource.r.action.a.param]]
name = "p"
"#;
    assert!(matches!(
        parse_catalog(content),
        Err(ParseError::InvalidFormat(msg)) if msg.contains("declared twice")
    ));
}

#[test]
fn rejects_unknown_param_keys() {
    let content = r#"
[resource.r.action.a]
[[resource.r.action.a.param]]
name = "p"
maximum = 3
"#;
    assert!(matches!(parse_catalog(content), Err(ParseError::Toml(_))));
}

#[test]
fn parses_sequence_protocol() {
    let job = parse_protocol_with(PRIME_PROTOCOL, &SequentialIdGen::new("n")).unwrap();
    assert_eq!(job.name(), "prime");
    assert_eq!(job.mode(), Mode::Sequence);
    assert_eq!(job.len(), 2);

    let events: Vec<_> = job.events().collect();
    assert_eq!(events[0].action(), "pump");
    assert_eq!(events[0].estimated_duration(), Some(Duration::from_secs(10)));
    assert_eq!(events[0].args()["flow_rate"], ArgValue::Float(1.0));
    assert_eq!(events[1].action(), "stop");
    assert_eq!(events[1].estimated_duration(), None);
}

#[test]
fn parsed_protocol_resolves_times() {
    let t0: Timestamp = "2030-01-01T00:00:00Z".parse().unwrap();
    let clock = FakeClock::at(t0);

    let mut job = parse_protocol(PRIME_PROTOCOL).unwrap();
    job.set_time_start(t0, &clock).unwrap();
    job.resolve_times().unwrap();

    let events: Vec<_> = job.events().collect();
    assert_eq!(events[1].time_start().unwrap(), t0 + Duration::from_secs(10));
}

#[test]
fn parses_nested_jobs_with_delays() {
    let content = r#"
name = "mix"
mode = "concurrent"
delay = "2s"

[[step]]
name = "left"
delay = "500ms"

[[step.step]]
resource = "pump_a"
action = "pump"
duration = "5s"

[[step]]
resource = "pump_b"
action = "pump"
"#;
    let job = parse_protocol(content).unwrap();
    assert_eq!(job.mode(), Mode::Concurrent);
    assert_eq!(job.delay(), Duration::from_secs(2));

    let children = job.children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].name(), Some("left"));
    assert_eq!(children[0].mode(), Some(Mode::Sequence));
    assert_eq!(children[0].delay(), Duration::from_millis(500));
    assert_eq!(children[0].len(), 1);
    assert!(children[1].is_event());
}

#[test]
fn unnamed_nested_jobs_are_named_by_location() {
    let content = r#"
name = "outer"

[[step]]
mode = "concurrent"

[[step.step]]
resource = "light"
action = "on"
"#;
    let job = parse_protocol(content).unwrap();
    assert_eq!(job.children()[0].name(), Some("step[0]"));
}

#[test]
fn parses_every_trigger_form() {
    let content = r#"
name = "triggers"

[[step]]
resource = "a"
action = "x"
trigger = "now"

[[step]]
resource = "a"
action = "x"
trigger = { after = "5s" }

[[step]]
resource = "a"
action = "x"
trigger = { at = "2030-01-01T00:00:00Z" }

[[step]]
resource = "a"
action = "x"
signal = "a-done"

[[step]]
resource = "b"
action = "y"
trigger = { signal = "a-done" }

[[step]]
resource = "b"
action = "y"
trigger = { all = ["now", { after = "1s" }] }

[[step]]
resource = "b"
action = "y"
trigger = { any = [{ signal = "a-done" }, { after = "1m" }] }
"#;
    let job = parse_protocol(content).unwrap();
    let triggers: Vec<Trigger> = job.events().map(|e| e.trigger().clone()).collect();
    let at: Timestamp = "2030-01-01T00:00:00Z".parse().unwrap();

    assert_eq!(triggers[0], Trigger::Now);
    assert_eq!(triggers[1], Trigger::after(Duration::from_secs(5)));
    assert_eq!(triggers[2], Trigger::at(at));
    assert_eq!(triggers[3], Trigger::Now);
    assert_eq!(triggers[4], Trigger::signal("a-done"));
    assert_eq!(
        triggers[5],
        Trigger::And(vec![Trigger::Now, Trigger::after(Duration::from_secs(1))])
    );
    assert_eq!(
        triggers[6],
        Trigger::Or(vec![
            Trigger::signal("a-done"),
            Trigger::after(Duration::from_secs(60))
        ])
    );

    let events: Vec<_> = job.events().collect();
    assert_eq!(
        events[3].completion_signal().map(|s| s.as_str()),
        Some("a-done")
    );
}

#[parameterized(
    unknown_keyword = { r#"trigger = "later""# },
    two_keys = { r#"trigger = { after = "1s", signal = "x" }"# },
    no_keys = { r#"trigger = {}"# },
)]
fn rejects_bad_triggers(trigger: &str) {
    let content = format!(
        "name = \"t\"\n[[step]]\nresource = \"a\"\naction = \"x\"\n{}\n",
        trigger
    );
    assert!(matches!(
        parse_protocol(&content),
        Err(ParseError::InvalidFormat(_))
    ));
}

#[test]
fn root_name_is_required() {
    assert!(matches!(
        parse_protocol("mode = \"sequence\""),
        Err(ParseError::MissingField(field)) if field == "name"
    ));
}

#[test]
fn event_step_requires_action() {
    let content = "name = \"t\"\n[[step]]\nresource = \"pump\"\n";
    assert!(matches!(
        parse_protocol(content),
        Err(ParseError::MissingField(field)) if field == "step[0].action"
    ));
}

#[parameterized(
    action_on_job = { "name = \"t\"\n[[step]]\naction = \"x\"\n" },
    steps_on_event = { "name = \"t\"\n[[step]]\nresource = \"a\"\naction = \"x\"\n[[step.step]]\nresource = \"b\"\naction = \"y\"\n" },
    root_as_event = { "name = \"t\"\nresource = \"a\"\naction = \"x\"\n" },
)]
fn rejects_mixed_step_shapes(content: &str) {
    assert!(matches!(
        parse_protocol(content),
        Err(ParseError::InvalidFormat(_))
    ));
}

#[test]
fn bad_durations_are_toml_errors() {
    let content = "name = \"t\"\n[[step]]\nresource = \"a\"\naction = \"x\"\nduration = \"soon\"\n";
    assert!(matches!(parse_protocol(content), Err(ParseError::Toml(_))));
}

#[parameterized(
    native = { "2030-01-01T00:00:00Z" },
    quoted = { "\"2030-01-01T00:00:00Z\"" },
    native_offset = { "2030-01-01T01:00:00+01:00" },
    fractional = { "2030-01-01T00:00:00.000Z" },
)]
fn absolute_trigger_accepts_datetime_forms(value: &str) {
    let content = format!(
        "name = \"timed\"\n\n[[step]]\nresource = \"a\"\naction = \"x\"\ntrigger = {{ at = {} }}\n",
        value
    );
    let job = parse_protocol(&content).unwrap();
    let expected: Timestamp = "2030-01-01T00:00:00Z".parse().unwrap();

    let trigger = job.events().next().unwrap().trigger().clone();
    assert_eq!(trigger, Trigger::at(expected));
}

#[parameterized(
    local_datetime = { "2030-01-01T00:00:00" },
    bare_date = { "2030-01-01" },
    garbage = { "\"tomorrow\"" },
)]
fn absolute_trigger_needs_an_offset(value: &str) {
    let content = format!(
        "name = \"timed\"\n\n[[step]]\nresource = \"a\"\naction = \"x\"\ntrigger = {{ at = {} }}\n",
        value
    );
    let err = parse_protocol(&content).unwrap_err();
    assert!(
        matches!(&err, ParseError::InvalidFormat(msg) if msg.contains("step[0].trigger.at")),
        "{}",
        err
    );
}
