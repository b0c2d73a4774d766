//! Audit event emission
//!
//! Every mutation emits exactly one event, and a broken sink never fails
//! the mutation that triggered it.

mod common;

use common::{create_request, FailingAuditSink, Harness};
use medq_core::application::lifecycle::{self, UpdateStatusRequest};
use medq_core::application::{registration, transfer};
use medq_core::domain::{AuditAction, QueueStatus};
use medq_core::port::QueueRepository;

#[tokio::test]
async fn test_each_mutation_emits_one_event() {
    let h = Harness::new().await;

    let mut req = create_request(1);
    req.doctor_id = Some(7);
    let entry = h.create_entry(req).await.unwrap();

    lifecycle::update_status(
        h.repo.as_ref(),
        h.directory.as_ref(),
        h.audit.as_ref(),
        h.time_provider.as_ref(),
        &h.settings,
        &entry.id,
        UpdateStatusRequest {
            status: QueueStatus::Attending,
            medical_record_id: None,
        },
    )
    .await
    .unwrap();

    transfer::execute(
        h.repo.as_ref(),
        h.repo.as_ref(),
        h.directory.as_ref(),
        h.audit.as_ref(),
        h.id_provider.as_ref(),
        h.time_provider.as_ref(),
        &h.settings,
        &entry.id,
        transfer::TransferRequest {
            to_doctor_id: Some(9),
            to_department_id: None,
            reason: None,
            transferred_by: 100,
        },
    )
    .await
    .unwrap();

    lifecycle::delete_entry(
        h.repo.as_ref(),
        h.directory.as_ref(),
        h.audit.as_ref(),
        &h.settings,
        &entry.id,
    )
    .await
    .unwrap();

    let events = h.audit.events().await;
    let actions: Vec<AuditAction> = events.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::Created,
            AuditAction::StatusChanged,
            AuditAction::Transferred,
            AuditAction::Deleted,
        ]
    );

    for event in &events {
        assert_eq!(event.entity_type, "queue_entry");
        assert_eq!(event.entity_id, entry.id);
    }

    // Created carries the new state, Deleted the final prior state
    let created = &events[0];
    assert!(created.before.is_none());
    assert_eq!(created.after.as_ref().unwrap()["queue_number"], 1);

    let status_changed = &events[1];
    assert_eq!(status_changed.before.as_ref().unwrap()["status"], "waiting");
    assert_eq!(status_changed.after.as_ref().unwrap()["status"], "attending");

    let deleted = &events[3];
    assert_eq!(deleted.before.as_ref().unwrap()["status"], "attending");
    assert_eq!(deleted.before.as_ref().unwrap()["doctor_id"], 9);
    assert!(deleted.after.is_none());
}

#[tokio::test]
async fn test_failed_reads_emit_nothing() {
    let h = Harness::new().await;

    let mut bad = create_request(1);
    bad.reason_for_visit = String::new();
    h.create_entry(bad).await.unwrap_err();

    h.create_entry(create_request(999)).await.unwrap_err();

    assert!(h.audit.events().await.is_empty());
}

#[tokio::test]
async fn test_broken_sink_does_not_fail_the_mutation() {
    let h = Harness::new().await;
    let failing = FailingAuditSink;

    let entry = registration::create::execute(
        h.repo.as_ref(),
        h.repo.as_ref(),
        h.directory.as_ref(),
        &failing,
        h.id_provider.as_ref(),
        h.time_provider.as_ref(),
        &h.settings,
        create_request(1),
    )
    .await
    .unwrap();

    lifecycle::update_status(
        h.repo.as_ref(),
        h.directory.as_ref(),
        &failing,
        h.time_provider.as_ref(),
        &h.settings,
        &entry.id,
        UpdateStatusRequest {
            status: QueueStatus::Attending,
            medical_record_id: None,
        },
    )
    .await
    .unwrap();

    let stored = h.repo.find_by_id(&entry.id).await.unwrap().unwrap();
    assert_eq!(stored.status, QueueStatus::Attending);
}
