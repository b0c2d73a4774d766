// Wait-Time Estimator
//
// Advisory only: estimates are recomputed opportunistically after mutations
// and nothing may rely on them for ordering correctness.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::application::QueueSettings;
use crate::domain::{DoctorId, QueueEntry, QueueEntryId, QueueStatus};
use crate::port::{DirectoryStore, QueueRepository};

/// Serving order: priority tier first (emergency, then senior/pwd, then
/// regular), queue_number ascending within a tier.
pub fn serving_order(a: &QueueEntry, b: &QueueEntry) -> Ordering {
    a.priority
        .serving_rank()
        .cmp(&b.priority.serving_rank())
        .then(a.queue_number.cmp(&b.queue_number))
}

/// Sort a day's entries into serving order.
pub fn sort_serving_order(entries: &mut [QueueEntry]) {
    entries.sort_by(serving_order);
}

/// Approximate wait in minutes for a waiting entry.
///
/// Counts the entries strictly ahead of `entry` in serving order whose
/// status is waiting or attending, and multiplies by that group's average
/// consultation time (per-doctor average where known, else the facility
/// default). Returns `None` when the entry is not waiting or is absent from
/// the snapshot.
pub fn estimate(
    entry: &QueueEntry,
    snapshot: &[QueueEntry],
    doctor_minutes: &HashMap<DoctorId, i64>,
    default_minutes: i64,
) -> Option<i64> {
    if entry.status != QueueStatus::Waiting {
        return None;
    }
    if !snapshot.iter().any(|e| e.id == entry.id) {
        return None;
    }

    let ahead: Vec<&QueueEntry> = snapshot
        .iter()
        .filter(|other| {
            other.id != entry.id
                && matches!(other.status, QueueStatus::Waiting | QueueStatus::Attending)
                && serving_order(other, entry) == Ordering::Less
        })
        .collect();

    if ahead.is_empty() {
        return Some(0);
    }

    let total: i64 = ahead
        .iter()
        .map(|other| {
            other
                .doctor_id
                .and_then(|d| doctor_minutes.get(&d).copied())
                .unwrap_or(default_minutes)
        })
        .sum();
    let avg = total as f64 / ahead.len() as f64;

    Some((ahead.len() as f64 * avg).round() as i64)
}

/// Recompute and store estimates for every entry of a date.
///
/// Waiting entries get a fresh value; everything else has its stale stored
/// estimate cleared to `None` (a no-show must not keep showing a wait time).
/// Best-effort batch pass run after any mutation of the date's queue; read
/// and write failures are logged and swallowed so the triggering operation
/// is never affected.
pub async fn recompute_for_date(
    repo: &dyn QueueRepository,
    directory: &dyn DirectoryStore,
    settings: &QueueSettings,
    date: NaiveDate,
) {
    let snapshot = match repo.find_by_date(date).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!(%date, error = %e, "wait estimate recompute skipped: snapshot read failed");
            return;
        }
    };

    let doctor_minutes = doctor_minutes_for(directory, &snapshot).await;

    let estimates: Vec<(QueueEntryId, Option<i64>)> = snapshot
        .iter()
        .map(|e| {
            (
                e.id.clone(),
                estimate(
                    e,
                    &snapshot,
                    &doctor_minutes,
                    settings.default_consultation_minutes,
                ),
            )
        })
        .collect();

    if estimates.is_empty() {
        return;
    }

    if let Err(e) = repo.update_wait_estimates(&estimates).await {
        warn!(%date, error = %e, "wait estimate recompute skipped: store failed");
    }
}

/// Per-doctor average consultation minutes for the doctors present in a
/// snapshot. Directory misses just fall back to the facility default.
pub async fn doctor_minutes_for(
    directory: &dyn DirectoryStore,
    snapshot: &[QueueEntry],
) -> HashMap<DoctorId, i64> {
    let mut minutes = HashMap::new();
    for doctor_id in snapshot.iter().filter_map(|e| e.doctor_id) {
        if minutes.contains_key(&doctor_id) {
            continue;
        }
        match directory.find_doctor(doctor_id).await {
            Ok(Some(profile)) => {
                if let Some(avg) = profile.avg_consultation_minutes {
                    minutes.insert(doctor_id, avg);
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(doctor_id, error = %e, "doctor lookup failed during estimate");
            }
        }
    }
    minutes
}
