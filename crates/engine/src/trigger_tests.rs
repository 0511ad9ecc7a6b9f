// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ccnet_core::{CollectingValidationLog, FakeClock};

fn trigger(seconds: u64) -> (FakeClock, IntervalTrigger) {
    let clock = FakeClock::new();
    let trigger = IntervalTrigger::new(Duration::from_secs(seconds), Arc::new(clock.clone()));
    (clock, trigger)
}

#[test]
fn does_not_fire_before_initialise() {
    let (clock, trigger) = trigger(10);
    clock.advance(Duration::from_secs(60));
    assert!(trigger.check("core").is_none());
}

#[test]
fn fires_once_the_period_elapses() {
    let (clock, trigger) = trigger(10);
    trigger.initialise();

    clock.advance(Duration::from_secs(9));
    assert!(trigger.check("core").is_none());

    clock.advance(Duration::from_secs(1));
    let request = trigger.check("core").unwrap();
    assert_eq!(request.source_trigger(), "interval");
    assert_eq!(request.context().item(), "core");
}

#[test]
fn stays_quiet_until_reset() {
    let (clock, trigger) = trigger(10);
    trigger.initialise();
    clock.advance(Duration::from_secs(10));
    assert!(trigger.check("core").is_some());
    assert!(trigger.check("core").is_none());

    trigger.reset();
    clock.advance(Duration::from_secs(10));
    assert!(trigger.check("core").is_some());
}

#[test]
fn clean_up_disarms() {
    let (clock, trigger) = trigger(10);
    trigger.initialise();
    trigger.clean_up();
    clock.advance(Duration::from_secs(10));
    assert!(trigger.check("core").is_none());
    assert!(trigger.next_fire().is_none());
}

#[test]
fn zero_period_is_a_validation_error() {
    let (_, trigger) = trigger(0);
    let mut log = CollectingValidationLog::new();
    trigger.validate(&mut log);
    assert_eq!(log.number_of_errors(), 1);
    assert_eq!(
        log.entries()[0].message(),
        "The interval trigger requires a period greater than zero"
    );
}
