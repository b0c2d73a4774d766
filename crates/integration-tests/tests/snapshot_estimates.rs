//! Snapshot ordering and wait estimates
//!
//! Estimates are recomputed after every mutation, so the values asserted
//! here come straight out of the stored rows.

mod common;

use common::{create_request, date, Harness};
use medq_core::application::lifecycle::{self, UpdateStatusRequest};
use medq_core::application::snapshot;
use medq_core::domain::{Priority, QueueStatus};
use medq_core::port::QueueRepository;

async fn set_status(h: &Harness, id: &str, status: QueueStatus) {
    lifecycle::update_status(
        h.repo.as_ref(),
        h.directory.as_ref(),
        h.audit.as_ref(),
        h.time_provider.as_ref(),
        &h.settings,
        &id.to_string(),
        UpdateStatusRequest {
            status,
            medical_record_id: None,
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_priority_patient_served_before_earlier_regular() {
    let h = Harness::new().await;

    // A regular (#1), B senior (#2), C regular (#3)
    let a = h.create_entry(create_request(1)).await.unwrap();
    let mut req = create_request(2);
    req.priority = Priority::Senior;
    let b = h.create_entry(req).await.unwrap();
    let c = h.create_entry(create_request(3)).await.unwrap();

    let snap = snapshot::execute(h.repo.as_ref(), date(2024, 1, 10))
        .await
        .unwrap();

    let ids: Vec<&str> = snap.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec![b.id.as_str(), a.id.as_str(), c.id.as_str()]);

    assert_eq!(snap.counts.waiting, 3);
    assert_eq!(snap.counts.attending, 0);

    // Estimates follow the same order: 0, 15, 30 at the default rate
    assert_eq!(snap.entries[0].estimated_wait_minutes, Some(0));
    assert_eq!(snap.entries[1].estimated_wait_minutes, Some(15));
    assert_eq!(snap.entries[2].estimated_wait_minutes, Some(30));
}

#[tokio::test]
async fn test_estimates_shrink_as_the_queue_moves() {
    let h = Harness::new().await;

    let first = h.create_entry(create_request(1)).await.unwrap();
    let second = h.create_entry(create_request(2)).await.unwrap();

    let stored = h.repo.find_by_id(&second.id).await.unwrap().unwrap();
    assert_eq!(stored.estimated_wait_minutes, Some(15));

    set_status(&h, &first.id, QueueStatus::Attending).await;

    // The entry being seen no longer carries an estimate of its own
    let stored = h.repo.find_by_id(&first.id).await.unwrap().unwrap();
    assert_eq!(stored.estimated_wait_minutes, None);

    set_status(&h, &first.id, QueueStatus::Attended).await;

    // Nobody ahead anymore
    let stored = h.repo.find_by_id(&second.id).await.unwrap().unwrap();
    assert_eq!(stored.estimated_wait_minutes, Some(0));
}

#[tokio::test]
async fn test_terminal_entries_have_no_estimate() {
    let h = Harness::new().await;

    let entry = h.create_entry(create_request(1)).await.unwrap();
    assert_eq!(
        h.repo
            .find_by_id(&entry.id)
            .await
            .unwrap()
            .unwrap()
            .estimated_wait_minutes,
        Some(0)
    );

    set_status(&h, &entry.id, QueueStatus::NoShow).await;

    let stored = h.repo.find_by_id(&entry.id).await.unwrap().unwrap();
    assert_eq!(stored.estimated_wait_minutes, None);
}

#[tokio::test]
async fn test_doctor_average_feeds_the_estimate() {
    let h = Harness::new().await;

    // First in line sits with Dr. Ong (20 min average)
    let mut req = create_request(1);
    req.doctor_id = Some(9);
    h.create_entry(req).await.unwrap();

    let second = h.create_entry(create_request(2)).await.unwrap();

    let stored = h.repo.find_by_id(&second.id).await.unwrap().unwrap();
    assert_eq!(stored.estimated_wait_minutes, Some(20));
}

#[tokio::test]
async fn test_snapshot_of_empty_date() {
    let h = Harness::new().await;

    let snap = snapshot::execute(h.repo.as_ref(), date(2024, 3, 1))
        .await
        .unwrap();

    assert!(snap.entries.is_empty());
    assert_eq!(snap.counts.waiting, 0);
    assert_eq!(snap.counts.no_show, 0);
}

#[tokio::test]
async fn test_snapshot_counts_track_statuses() {
    let h = Harness::new().await;

    let a = h.create_entry(create_request(1)).await.unwrap();
    let b = h.create_entry(create_request(2)).await.unwrap();
    h.create_entry(create_request(3)).await.unwrap();

    set_status(&h, &a.id, QueueStatus::Attending).await;
    set_status(&h, &b.id, QueueStatus::NoShow).await;

    let snap = snapshot::execute(h.repo.as_ref(), date(2024, 1, 10))
        .await
        .unwrap();

    assert_eq!(snap.counts.waiting, 1);
    assert_eq!(snap.counts.attending, 1);
    assert_eq!(snap.counts.attended, 0);
    assert_eq!(snap.counts.no_show, 1);
}
