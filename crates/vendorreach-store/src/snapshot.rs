//! JSON snapshots of the whole store, in the [`PlanInputs`] layout.
//!
//! A snapshot can be planned against directly or merged into a database.

use std::path::Path;

use rusqlite::params;
use vendorreach_core::{ReachError, Result};
use vendorreach_planner::PlanInputs;

use crate::db::{self, ReachDb};

/// Row counts written by [`ReachDb::import_snapshot`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub vendors: usize,
    pub sequences: usize,
    pub logs: usize,
    pub settings: usize,
}

/// Read a snapshot file.
pub fn read_snapshot(path: &Path) -> Result<PlanInputs> {
    let content = std::fs::read_to_string(path)?;
    let inputs: PlanInputs = serde_json::from_str(&content)?;
    tracing::debug!(
        "📂 Read snapshot {}: {} vendors, {} logs",
        path.display(),
        inputs.vendors.len(),
        inputs.logs.len()
    );
    Ok(inputs)
}

/// Write a snapshot file, creating parent directories as needed.
pub fn write_snapshot(path: &Path, inputs: &PlanInputs) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(inputs)?;
    std::fs::write(path, json)?;
    Ok(())
}

impl ReachDb {
    /// Everything in the store, inactive sequences included.
    pub fn export_snapshot(&self) -> Result<PlanInputs> {
        Ok(PlanInputs {
            vendors: self.list_vendors()?,
            sequences: self.list_sequences(false)?,
            logs: self.list_logs()?,
            settings: self.settings()?,
        })
    }

    /// Merge a snapshot in one transaction. Vendors, sequences and settings
    /// overwrite by key; log entries already present are left untouched.
    pub fn import_snapshot(&mut self, inputs: &PlanInputs) -> Result<ImportSummary> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| ReachError::Database(format!("Begin transaction: {e}")))?;
        let mut summary = ImportSummary::default();

        for v in &inputs.vendors {
            db::upsert_vendor(&tx, v)?;
            summary.vendors += 1;
        }
        for seq in &inputs.sequences {
            db::upsert_sequence(&tx, seq)?;
            summary.sequences += 1;
        }
        for log in &inputs.logs {
            let n = tx
                .execute(
                    "INSERT OR IGNORE INTO outreach_log
                     (id, vendor_id, channel, action, user_id, created_at, cursor_moved)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)",
                    params![
                        log.id,
                        log.vendor_id,
                        log.channel.as_str(),
                        log.action.as_str(),
                        log.user_id,
                        db::ts(&log.created_at),
                    ],
                )
                .map_err(|e| ReachError::Database(format!("Import log: {e}")))?;
            summary.logs += n;
        }
        for (key, value) in inputs.settings.iter() {
            db::set_setting(&tx, key, value)?;
            summary.settings += 1;
        }

        tx.commit()
            .map_err(|e| ReachError::Database(format!("Commit: {e}")))?;
        tracing::info!(
            "📥 Imported {} vendors, {} sequences, {} logs, {} settings",
            summary.vendors,
            summary.sequences,
            summary.logs,
            summary.settings
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use vendorreach_core::{Channel, LogAction, LogEntry, Settings, Vendor};
    use vendorreach_planner::{SequenceTier, TaskKind};

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap()
    }

    fn populated() -> ReachDb {
        let mut db = ReachDb::open_in_memory().unwrap();
        let mut v = Vendor::new("v1", "Petal Works", at(1, 9));
        v.has_instagram = true;
        v.username = Some("petalworks".into());
        db.upsert_vendor(&v).unwrap();
        db.set_setting("instagram_daily_target", "40").unwrap();
        db.enroll(at(1, 10)).unwrap();
        db.mark_sent("v1", Channel::Instagram, TaskKind::Initial, Some("a1"), at(2, 11))
            .unwrap();
        db
    }

    #[test]
    fn test_export_import_between_stores() {
        let src = populated();
        let snap = src.export_snapshot().unwrap();
        assert_eq!(snap.sequences[0].sequence_type, SequenceTier::C.key());

        let mut dst = ReachDb::open_in_memory().unwrap();
        let summary = dst.import_snapshot(&snap).unwrap();
        assert_eq!(
            summary,
            ImportSummary { vendors: 1, sequences: 1, logs: 1, settings: 1 }
        );
        assert_eq!(dst.export_snapshot().unwrap(), snap);
    }

    #[test]
    fn test_reimport_skips_known_logs() {
        let src = populated();
        let snap = src.export_snapshot().unwrap();
        let mut dst = ReachDb::open_in_memory().unwrap();
        dst.import_snapshot(&snap).unwrap();
        let again = dst.import_snapshot(&snap).unwrap();
        assert_eq!(again.logs, 0);
        assert_eq!(dst.list_logs().unwrap().len(), 1);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("vendorreach-snap-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("snapshot.json");
        let inputs = PlanInputs {
            vendors: vec![Vendor::new("v9", "Frame House", at(3, 8))],
            logs: vec![LogEntry::new("l1", "v9", Channel::Email, LogAction::Sent, at(3, 9))],
            settings: Settings::new().with("days_email_followup", "5"),
            ..Default::default()
        };
        write_snapshot(&path, &inputs).unwrap();
        assert_eq!(read_snapshot(&path).unwrap(), inputs);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_bad_snapshot_is_an_error() {
        let dir = std::env::temp_dir().join(format!("vendorreach-snap-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read_snapshot(&path), Err(ReachError::Json(_))));
        assert!(matches!(read_snapshot(&dir.join("missing.json")), Err(ReachError::Io(_))));
        std::fs::remove_dir_all(&dir).ok();
    }
}
