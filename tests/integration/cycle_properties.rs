//! Behaviour of a poll cycle and the loop around it, seen from outside.

use crate::common::{homeworks, FakeApi, FakeNotifier};
use homework_watch::poll_loop::StopReason;
use homework_watch::{
    CycleError, CycleOutcome, Credentials, FieldError, LoopState, PollCycle, PollLoop, StatusCode,
    StructuralError,
};
use serde_json::json;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

const APPROVED_TEXT: &str = "Изменился статус проверки работы \"Project 1\". \
                             Работа проверена: ревьюеру всё понравилось. Ура!";

fn state(last: Option<StatusCode>) -> LoopState {
    LoopState {
        last_notified_status: last,
        last_poll_timestamp: 1_000,
    }
}

fn credentials() -> Credentials {
    Credentials {
        practicum_token: "practicum".into(),
        telegram_token: "telegram".into(),
        telegram_chat_id: "100".into(),
    }
}

#[test]
fn test_approved_after_reviewing_sends_template() {
    let api = FakeApi::always(json!({"homeworks": [{"name": "Project 1", "status": "approved"}]}));
    let notifier = FakeNotifier::default();
    let cycle = PollCycle::new(&api, &notifier, "100");

    let outcome = cycle
        .run_once(&state(Some(StatusCode::Reviewing)), 2_000)
        .expect("cycle should succeed");

    match outcome {
        CycleOutcome::Notified { status, next } => {
            assert_eq!(status, StatusCode::Approved);
            assert_eq!(next.last_notified_status, Some(StatusCode::Approved));
            assert_eq!(next.last_poll_timestamp, 2_000);
        }
        other => panic!("expected Notified, got {other:?}"),
    }
    assert_eq!(
        notifier.sent.borrow().as_slice(),
        &[("100".to_string(), APPROVED_TEXT.to_string())]
    );
}

#[test]
fn test_empty_homeworks_is_no_change_regardless_of_state() {
    let notifier = FakeNotifier::default();

    for last in [None, Some(StatusCode::Approved), Some(StatusCode::Rejected)] {
        let api = FakeApi::always(json!({"homeworks": []}));
        let cycle = PollCycle::new(&api, &notifier, "100");
        assert_eq!(
            cycle.run_once(&state(last), 2_000).unwrap(),
            CycleOutcome::NoChange
        );
    }
    assert!(notifier.sent.borrow().is_empty());
}

#[test]
fn test_repeated_status_notifies_once() {
    for status in StatusCode::all() {
        let api = FakeApi::always(homeworks(json!([{"homework_name": "hw", "status": status.as_str()}])));
        let notifier = FakeNotifier::default();
        let cycle = PollCycle::new(&api, &notifier, "100");

        assert_eq!(
            cycle.run_once(&state(Some(*status)), 2_000).unwrap(),
            CycleOutcome::NoChange
        );
        assert!(notifier.sent.borrow().is_empty());
    }
}

#[test]
fn test_every_known_transition_notifies_exactly_once() {
    for from in StatusCode::all() {
        for to in StatusCode::all().iter().filter(|to| *to != from) {
            let api = FakeApi::always(homeworks(json!([{"homework_name": "hw", "status": to.as_str()}])));
            let notifier = FakeNotifier::default();
            let cycle = PollCycle::new(&api, &notifier, "100");

            let outcome = cycle.run_once(&state(Some(*from)), 2_000).unwrap();

            assert!(matches!(outcome, CycleOutcome::Notified { status, .. } if status == *to));
            assert_eq!(
                notifier.texts(),
                vec![format!(
                    "Изменился статус проверки работы \"hw\". {}",
                    to.verdict()
                )]
            );
        }
    }
}

#[test]
fn test_unknown_status_is_an_error_without_notify() {
    for last in [None, Some(StatusCode::Reviewing)] {
        let api = FakeApi::always(homeworks(json!([{"homework_name": "hw", "status": "on_review"}])));
        let notifier = FakeNotifier::default();
        let cycle = PollCycle::new(&api, &notifier, "100");

        let err = cycle.run_once(&state(last), 2_000).unwrap_err();
        assert!(matches!(
            err,
            CycleError::Field(FieldError::UnrecognizedStatus(ref s)) if s == "on_review"
        ));
        assert!(notifier.sent.borrow().is_empty());
    }
}

#[test]
fn test_missing_homeworks_key_is_structural() {
    let api = FakeApi::always(json!({}));
    let notifier = FakeNotifier::default();
    let cycle = PollCycle::new(&api, &notifier, "100");

    let err = cycle.run_once(&state(None), 2_000).unwrap_err();
    assert!(matches!(
        err,
        CycleError::Structural(StructuralError::MissingWorkItems)
    ));
}

#[test]
fn test_delivery_failure_retries_next_cycle() {
    let api = FakeApi::new(vec![
        Ok(homeworks(json!([{"homework_name": "hw", "status": "approved"}]))),
        Ok(homeworks(json!([{"homework_name": "hw", "status": "approved"}]))),
    ]);
    let notifier = FakeNotifier::failing();
    let mut poll_loop = PollLoop::new(
        PollCycle::new(&api, &notifier, "100"),
        Duration::ZERO,
        Some(1_000),
        Arc::new(AtomicBool::new(false)),
    )
    .with_max_cycles(Some(2));

    assert_eq!(poll_loop.run(&credentials()), StopReason::CycleLimit);
    assert_eq!(notifier.sent.borrow().len(), 2);
    assert_eq!(poll_loop.state(), &LoopState::new(1_000));
    assert_eq!(poll_loop.stats().delivery_failures, 2);
}

#[test]
fn test_loop_passes_notification_time_as_next_from_date() {
    fn clock() -> i64 {
        5_000
    }

    let api = FakeApi::new(vec![
        Ok(homeworks(json!([{"homework_name": "hw", "status": "reviewing"}]))),
        Ok(homeworks(json!([]))),
    ]);
    let notifier = FakeNotifier::default();
    let mut poll_loop = PollLoop::new(
        PollCycle::new(&api, &notifier, "100"),
        Duration::ZERO,
        Some(1_000),
        Arc::new(AtomicBool::new(false)),
    )
    .with_max_cycles(Some(2))
    .with_clock(clock);

    poll_loop.run(&credentials());

    assert_eq!(api.from_dates.borrow().as_slice(), &[1_000, 5_000]);
}

#[test]
fn test_incomplete_credentials_never_poll() {
    let api = FakeApi::always(homeworks(json!([{"homework_name": "hw", "status": "approved"}])));
    let notifier = FakeNotifier::default();
    let mut poll_loop = PollLoop::new(
        PollCycle::new(&api, &notifier, "100"),
        Duration::ZERO,
        Some(1_000),
        Arc::new(AtomicBool::new(false)),
    );

    let creds = Credentials {
        telegram_chat_id: String::new(),
        ..credentials()
    };
    assert_eq!(poll_loop.run(&creds), StopReason::MissingCredentials);
    assert!(api.from_dates.borrow().is_empty());
}
