// Queue Snapshot Use Case
//
// Feeds the "now serving" / "next N" public display and dashboard counters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::application::estimator;
use crate::domain::{QueueEntry, QueueStatus};
use crate::error::Result;
use crate::port::QueueRepository;

/// Aggregate counts by status for one date
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub waiting: i64,
    pub attending: i64,
    pub attended: i64,
    pub no_show: i64,
}

impl StatusCounts {
    pub fn tally(entries: &[QueueEntry]) -> Self {
        let mut counts = StatusCounts::default();
        for entry in entries {
            match entry.status {
                QueueStatus::Waiting => counts.waiting += 1,
                QueueStatus::Attending => counts.attending += 1,
                QueueStatus::Attended => counts.attended += 1,
                QueueStatus::NoShow => counts.no_show += 1,
            }
        }
        counts
    }
}

/// One date's queue in serving order, with aggregate counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub date: NaiveDate,
    pub counts: StatusCounts,
    pub entries: Vec<QueueEntry>,
}

/// Execute snapshot use case.
pub async fn execute(repo: &dyn QueueRepository, date: NaiveDate) -> Result<QueueSnapshot> {
    let mut entries = repo.find_by_date(date).await?;
    estimator::sort_serving_order(&mut entries);
    let counts = StatusCounts::tally(&entries);

    Ok(QueueSnapshot {
        date,
        counts,
        entries,
    })
}
