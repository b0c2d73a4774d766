//! Status lifecycle against real storage
//!
//! The conditional update keyed on the prior status is what keeps two staff
//! from racing the same entry; that only shows up with a real database.

mod common;

use common::{create_request, Harness};
use medq_core::application::lifecycle::{self, UpdateStatusRequest};
use medq_core::domain::{DomainError, QueueStatus};
use medq_core::error::AppError;
use medq_core::port::QueueRepository;

fn to(status: QueueStatus) -> UpdateStatusRequest {
    UpdateStatusRequest {
        status,
        medical_record_id: None,
    }
}

async fn apply(h: &Harness, id: &str, req: UpdateStatusRequest) -> medq_core::error::Result<medq_core::domain::QueueEntry> {
    lifecycle::update_status(
        h.repo.as_ref(),
        h.directory.as_ref(),
        h.audit.as_ref(),
        h.time_provider.as_ref(),
        &h.settings,
        &id.to_string(),
        req,
    )
    .await
}

#[tokio::test]
async fn test_full_lifecycle_persists_timestamps() {
    let h = Harness::new().await;
    let entry = h.create_entry(create_request(1)).await.unwrap();

    let attending = apply(&h, &entry.id, to(QueueStatus::Attending)).await.unwrap();
    assert_eq!(attending.status, QueueStatus::Attending);
    assert!(attending.called_at.is_some());

    let attended = apply(
        &h,
        &entry.id,
        UpdateStatusRequest {
            status: QueueStatus::Attended,
            medical_record_id: Some(501),
        },
    )
    .await
    .unwrap();
    assert_eq!(attended.status, QueueStatus::Attended);
    assert_eq!(attended.medical_record_id, Some(501));
    assert!(attended.served_at.unwrap() >= attended.called_at.unwrap());

    // Stored row matches the returned view
    let stored = h.repo.find_by_id(&entry.id).await.unwrap().unwrap();
    assert_eq!(stored.status, QueueStatus::Attended);
    assert_eq!(stored.served_at, attended.served_at);
}

#[tokio::test]
async fn test_skipping_attending_is_rejected() {
    let h = Harness::new().await;
    let entry = h.create_entry(create_request(1)).await.unwrap();

    let err = apply(&h, &entry.id, to(QueueStatus::Attended)).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::InvalidTransition { .. })
    ));

    // Entry untouched
    let stored = h.repo.find_by_id(&entry.id).await.unwrap().unwrap();
    assert_eq!(stored.status, QueueStatus::Waiting);
}

#[tokio::test]
async fn test_no_show_from_waiting_and_terminal_freeze() {
    let h = Harness::new().await;
    let entry = h.create_entry(create_request(1)).await.unwrap();

    let gone = apply(&h, &entry.id, to(QueueStatus::NoShow)).await.unwrap();
    assert_eq!(gone.status, QueueStatus::NoShow);
    assert!(gone.called_at.is_none());

    // Terminal: nothing moves it again
    let err = apply(&h, &entry.id, to(QueueStatus::Attending)).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn test_concurrent_call_has_exactly_one_winner() {
    let h = std::sync::Arc::new(Harness::new().await);
    let entry = h.create_entry(create_request(1)).await.unwrap();

    let h1 = h.clone();
    let h2 = h.clone();
    let id1 = entry.id.clone();
    let id2 = entry.id.clone();

    let (a, b) = tokio::join!(
        tokio::spawn(async move { apply(h1.as_ref(), &id1, to(QueueStatus::Attending)).await }),
        tokio::spawn(async move { apply(h2.as_ref(), &id2, to(QueueStatus::Attending)).await }),
    );
    let results = [a.unwrap(), b.unwrap()];

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one caller may move the entry");

    let loser = results.iter().find(|r| r.is_err()).unwrap();
    assert!(matches!(
        loser.as_ref().unwrap_err(),
        AppError::Domain(DomainError::InvalidTransition { .. })
    ));

    let stored = h.repo.find_by_id(&entry.id).await.unwrap().unwrap();
    assert_eq!(stored.status, QueueStatus::Attending);
}

#[tokio::test]
async fn test_update_unknown_entry_is_not_found() {
    let h = Harness::new().await;
    let err = apply(&h, "no-such-entry", to(QueueStatus::Attending)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_removes_entry() {
    let h = Harness::new().await;
    let entry = h.create_entry(create_request(1)).await.unwrap();

    lifecycle::delete_entry(
        h.repo.as_ref(),
        h.directory.as_ref(),
        h.audit.as_ref(),
        &h.settings,
        &entry.id,
    )
    .await
    .unwrap();

    assert!(h.repo.find_by_id(&entry.id).await.unwrap().is_none());

    // Second delete: the entry is gone
    let err = lifecycle::delete_entry(
        h.repo.as_ref(),
        h.directory.as_ref(),
        h.audit.as_ref(),
        &h.settings,
        &entry.id,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
