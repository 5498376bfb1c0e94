// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use labq_core::{Event, FakeClock};
use labq_protocol::{ActionSpec, Capability};

fn t0() -> Timestamp {
    "2030-01-01T08:00:00Z".parse().unwrap()
}

fn catalog() -> Catalog {
    Catalog::new().with_resource(
        "light",
        Capability::new()
            .with_action(ActionSpec::new("on"))
            .with_action(ActionSpec::new("off")),
    )
}

fn blink(clock: &FakeClock, offset_secs: u64) -> Job {
    let mut job = Job::sequence("blink");
    job.extend([
        Event::new("light", "on").with_duration(Duration::from_secs(1)),
        Event::new("light", "off"),
    ])
    .unwrap();
    job.set_time_start(shift(t0(), Duration::from_secs(offset_secs)), clock)
        .unwrap();
    job
}

#[test]
fn valid_job_is_queued() {
    let catalog = catalog();
    let clock = FakeClock::at(t0());
    let mut submitter = Submitter::new(Validator::new(&catalog), MemoryQueue::new(), clock.clone());

    let job = blink(&clock, 5);
    let job_id = job.id().clone();
    let result = submitter.submit(job).unwrap();

    assert!(result.success, "{}", result);
    assert!(result.validation_success);
    assert_eq!(result.job_id, job_id);
    assert_eq!(result.position_in_queue, Some(0));
    assert_eq!(result.length_of_queue, Some(1));

    let queue = submitter.into_sink();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.jobs()[0].start, shift(t0(), Duration::from_secs(5)));
    assert!(queue.jobs()[0].job.events().all(|e| e.is_resolved()));
}

#[test]
fn invalid_job_never_reaches_the_sink() {
    let catalog = catalog();
    let clock = FakeClock::at(t0());
    let mut submitter = Submitter::new(Validator::new(&catalog), MemoryQueue::new(), clock.clone());

    let mut job = Job::sequence("bad");
    job.add(Event::new("light", "strobe")).unwrap();
    job.set_time_start(t0(), &clock).unwrap();

    let result = submitter.submit(job).unwrap();

    assert!(!result.success);
    assert!(!result.validation_success);
    assert_eq!(result.position_in_queue, None);
    assert!(submitter.sink().is_empty());
}

#[test]
fn queue_orders_by_start_time() {
    let catalog = catalog();
    let clock = FakeClock::at(t0());
    let mut submitter = Submitter::new(Validator::new(&catalog), MemoryQueue::new(), clock.clone());

    let late = submitter.submit(blink(&clock, 60)).unwrap();
    let early = submitter.submit(blink(&clock, 10)).unwrap();
    let tied = submitter.submit(blink(&clock, 60)).unwrap();

    assert_eq!(late.position_in_queue, Some(0));
    assert_eq!(early.position_in_queue, Some(0));
    assert_eq!(early.length_of_queue, Some(2));
    assert_eq!(tied.position_in_queue, Some(2));

    let mut queue = submitter.into_sink();
    let first = queue.pop().unwrap();
    assert_eq!(first.start, shift(t0(), Duration::from_secs(10)));
    assert_eq!(queue.len(), 2);
}

#[test]
fn full_queue_rejects_in_the_result() {
    let catalog = catalog();
    let clock = FakeClock::at(t0());
    let mut submitter = Submitter::new(
        Validator::new(&catalog),
        MemoryQueue::with_capacity(1),
        clock.clone(),
    );

    assert!(submitter.submit(blink(&clock, 1)).unwrap().success);
    let result = submitter.submit(blink(&clock, 2)).unwrap();

    assert!(!result.success);
    assert!(result.validation_success);
    assert_eq!(
        result.errors,
        vec![SubmitError::Rejected {
            reason: "queue is full (1 jobs)".to_string()
        }]
    );
}

#[test]
fn unstarted_job_is_fatal() {
    let catalog = catalog();
    let mut submitter =
        Submitter::new(Validator::new(&catalog), MemoryQueue::new(), FakeClock::at(t0()));

    let mut job = Job::sequence("later");
    job.add(Event::new("light", "on")).unwrap();

    assert!(matches!(
        submitter.submit(job),
        Err(SubmitterError::Time(TimeError::Unresolved { .. }))
    ));
}

#[test]
fn start_that_passed_before_submission_is_fatal() {
    let catalog = catalog();
    let clock = FakeClock::at(t0());
    let mut submitter = Submitter::new(Validator::new(&catalog), MemoryQueue::new(), clock.clone());

    let job = blink(&clock, 1);
    clock.advance(Duration::from_secs(2));

    assert!(matches!(
        submitter.submit(job),
        Err(SubmitterError::Structure(StructuralError::StartInPast { .. }))
    ));
}

#[test]
fn tolerance_from_config_admits_slightly_late_starts() {
    let catalog = catalog();
    let clock = FakeClock::at(t0());
    let config = EngineConfig {
        start_tolerance: Duration::from_secs(5),
        ..EngineConfig::default()
    };
    let mut submitter =
        Submitter::from_config(&catalog, &config, MemoryQueue::new(), clock.clone());

    let job = blink(&clock, 1);
    clock.advance(Duration::from_secs(3));

    assert!(submitter.submit(job).unwrap().success);
}

struct Refusing;

impl SubmitSink for Refusing {
    fn submit(&mut self, _job: Job, _start: Timestamp) -> Result<Ack, SinkError> {
        Err(SinkError::Rejected("maintenance window".to_string()))
    }
}

#[test]
fn custom_sink_rejection_is_reported() {
    let catalog = catalog();
    let clock = FakeClock::at(t0());
    let mut submitter = Submitter::new(Validator::new(&catalog), Refusing, clock.clone());

    let result = submitter.submit(blink(&clock, 1)).unwrap();

    assert!(!result.success);
    assert!(result.to_string().contains("maintenance window"));
}
