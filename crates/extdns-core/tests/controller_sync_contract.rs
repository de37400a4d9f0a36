//! Contract Test: Controller Synchronization
//!
//! This test verifies one source → plan → provider cycle.
//!
//! Constraints verified:
//! - The first cycle creates every desired record
//! - A second cycle with unchanged input applies nothing
//! - Source failures surface as retrieval errors and nothing is applied
//! - Provider failures surface as provider errors
//! - Dry-run plans but never applies
//!
//! If this test fails, the controller no longer keeps zones in sync.

mod common;

use common::*;
use extdns_core::{Controller, ControllerEvent, DnsProvider};

#[tokio::test]
async fn first_cycle_creates_second_is_noop() {
    let source = StaticSource::new(vec![
        ep("foo.example.com", "1.2.3.4"),
        ep("bar.example.com", "lb.example.com"),
    ]);
    let provider = RecordingProvider::new("example.com");

    let (controller, mut events) = Controller::new(
        Box::new(source.clone()),
        Box::new(provider.clone()),
        minimal_config("example.com"),
    )
    .expect("controller construction succeeds");

    let changes = controller.run_once().await.unwrap();
    assert_eq!(changes.create.len(), 2);
    assert_eq!(provider.apply_call_count(), 1);
    assert_eq!(
        events.recv().await,
        Some(ControllerEvent::SyncSucceeded {
            created: 2,
            updated: 0,
            deleted: 0
        })
    );

    let changes = controller.run_once().await.unwrap();
    assert!(changes.is_empty());
    assert_eq!(provider.apply_call_count(), 1, "no-op cycle must not apply");
    assert_eq!(events.recv().await, Some(ControllerEvent::NoChanges));

    assert_eq!(source.call_count(), 2);
}

#[tokio::test]
async fn source_changes_are_followed() {
    let source = StaticSource::new(vec![ep("foo.example.com", "1.2.3.4")]);
    let provider = RecordingProvider::new("example.com");

    let (controller, _events) = Controller::new(
        Box::new(source.clone()),
        Box::new(provider.clone()),
        minimal_config("example.com"),
    )
    .expect("controller construction succeeds");

    controller.run_once().await.unwrap();

    source.set(vec![ep("bar.example.com", "5.6.7.8")]);
    let changes = controller.run_once().await.unwrap();
    assert_eq!(changes.create, vec![ep("bar.example.com", "5.6.7.8")]);
    assert_eq!(changes.delete, vec![ep("foo.example.com", "1.2.3.4")]);

    let records = provider.records("example.com").await.unwrap();
    assert_eq!(records, vec![ep("bar.example.com", "5.6.7.8")]);
}

#[tokio::test]
async fn source_failure_applies_nothing() {
    let provider = RecordingProvider::new("example.com");

    let (controller, mut events) = Controller::new(
        Box::new(FailingSource),
        Box::new(provider.clone()),
        minimal_config("example.com"),
    )
    .expect("controller construction succeeds");

    let err = controller.run_once().await.unwrap_err();
    assert!(err.is_retrieval(), "unexpected error kind: {:?}", err);
    assert_eq!(provider.apply_call_count(), 0);
    assert!(matches!(
        events.recv().await,
        Some(ControllerEvent::SyncFailed { .. })
    ));
}

#[tokio::test]
async fn provider_failure_is_reported() {
    let source = StaticSource::new(vec![ep("foo.example.com", "1.2.3.4")]);
    let provider = RecordingProvider::new("example.com");
    provider.fail_apply(true);

    let (controller, _events) = Controller::new(
        Box::new(source),
        Box::new(provider.clone()),
        minimal_config("example.com"),
    )
    .expect("controller construction succeeds");

    let err = controller.run_once().await.unwrap_err();
    assert!(err.is_provider(), "unexpected error kind: {:?}", err);
    assert_eq!(provider.apply_call_count(), 1);

    // Next cycle re-reads and tries again from scratch
    provider.fail_apply(false);
    let changes = controller.run_once().await.unwrap();
    assert_eq!(changes.create.len(), 1);
    assert_eq!(provider.inner().records("example.com").await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_zone_is_provider_error() {
    let source = StaticSource::new(vec![ep("foo.example.com", "1.2.3.4")]);
    let provider = RecordingProvider::new("example.org");

    let (controller, _events) = Controller::new(
        Box::new(source),
        Box::new(provider.clone()),
        minimal_config("example.com"),
    )
    .expect("controller construction succeeds");

    let err = controller.run_once().await.unwrap_err();
    assert!(err.is_provider());
    assert_eq!(provider.apply_call_count(), 0);
}

#[tokio::test]
async fn dry_run_never_applies() {
    let source = StaticSource::new(vec![ep("foo.example.com", "1.2.3.4")]);
    let provider = RecordingProvider::new("example.com");

    let mut config = minimal_config("example.com");
    config.controller.dry_run = true;

    let (controller, mut events) =
        Controller::new(Box::new(source), Box::new(provider.clone()), config)
            .expect("controller construction succeeds");

    let changes = controller.run_once().await.unwrap();
    assert_eq!(changes.create.len(), 1);
    assert_eq!(provider.apply_call_count(), 0);
    assert_eq!(
        events.recv().await,
        Some(ControllerEvent::DryRun {
            created: 1,
            updated: 0,
            deleted: 0
        })
    );
    assert!(provider.records("example.com").await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_config_is_rejected() {
    let source = StaticSource::new(Vec::new());
    let provider = RecordingProvider::new("example.com");

    let result = Controller::new(
        Box::new(source),
        Box::new(provider),
        minimal_config(""),
    );
    assert!(result.is_err());
}
