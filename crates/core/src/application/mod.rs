// Application Layer - Use Cases

pub mod estimator;
pub mod lifecycle;
pub mod registration;
pub mod snapshot;
pub mod transfer;

use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::warn;

use crate::domain::AuditEvent;
use crate::port::AuditSink;

/// Facility-level policy knobs shared by the queue use cases.
#[derive(Debug, Clone, Copy)]
pub struct QueueSettings {
    /// Facility timezone as minutes east of UTC. Calendar-day boundaries
    /// (and therefore numbering resets) follow this offset, not UTC.
    pub utc_offset_minutes: i32,
    /// Fallback consultation length when a doctor has no recorded average.
    pub default_consultation_minutes: i64,
    /// Attempts before a numbering conflict is surfaced as DuplicateNumber.
    pub max_number_retries: u32,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            default_consultation_minutes: 15,
            max_number_retries: 3,
        }
    }
}

impl QueueSettings {
    /// Calendar date of `now_millis` in the facility timezone.
    pub fn facility_date(&self, now_millis: i64) -> NaiveDate {
        // Offsets beyond +/-24h are rejected by chrono; clamp to a day
        let secs = self.utc_offset_minutes.clamp(-1439, 1439) * 60;
        let offset = FixedOffset::east_opt(secs).expect("offset within clamped range");
        DateTime::from_timestamp_millis(now_millis)
            .unwrap_or_default()
            .with_timezone(&offset)
            .date_naive()
    }
}

/// Hand an event to the audit sink without letting sink trouble touch the
/// primary mutation.
pub(crate) async fn emit_audit(sink: &dyn AuditSink, event: AuditEvent) {
    let action = event.action;
    let entity_id = event.entity_id.clone();
    if let Err(e) = sink.emit(event).await {
        warn!(%action, %entity_id, error = %e, "audit sink rejected event, continuing");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facility_date_follows_offset() {
        // 2024-01-10 23:30 UTC
        let now_millis = 1_704_929_400_000;
        let utc = QueueSettings::default();
        assert_eq!(
            utc.facility_date(now_millis),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );

        // UTC+8: already past midnight, next calendar day
        let manila = QueueSettings {
            utc_offset_minutes: 8 * 60,
            ..QueueSettings::default()
        };
        assert_eq!(
            manila.facility_date(now_millis),
            NaiveDate::from_ymd_opt(2024, 1, 11).unwrap()
        );

        // UTC-5: still the same day
        let lima = QueueSettings {
            utc_offset_minutes: -5 * 60,
            ..QueueSettings::default()
        };
        assert_eq!(
            lima.facility_date(now_millis),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
    }
}
