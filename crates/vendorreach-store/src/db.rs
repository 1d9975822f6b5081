//! SQLite store: vendors, outreach log, sequences and settings.
//!
//! Timestamps are stored as RFC 3339 text, enums as their snake_case names and
//! sequence steps as a JSON array. Rows with unreadable values are loaded with
//! defaults (and a warning) rather than failing the whole read.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};
use vendorreach_core::{
    Channel, LogAction, LogEntry, ReachError, Result, Sequence, SequenceStep, Settings, Vendor,
};
use vendorreach_planner::PlanInputs;

/// SQLite-backed store for all outreach data.
pub struct ReachDb {
    pub(crate) conn: Connection,
}

const VENDOR_SELECT: &str = "SELECT id, full_name, username, phone, email, category, city,
    has_instagram, has_phone, has_email, insta_status, whatsapp_status, email_status,
    insta_contacted_at, whatsapp_contacted_at, email_contacted_at, overall_status,
    created_at, updated_at, responded_at, responded_channel FROM vendors";

const LOG_SELECT: &str =
    "SELECT id, vendor_id, channel, action, created_at, user_id, cursor_moved FROM outreach_log";

const SEQUENCE_SELECT: &str =
    "SELECT id, vendor_id, sequence_type, steps, current_step, started_at, is_active FROM vendor_sequences";

pub(crate) fn ts(t: &DateTime<Utc>) -> String {
    t.to_rfc3339()
}

fn parse_ts(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!("⚠️ Unreadable timestamp '{raw}': {e}");
            None
        }
    }
}

fn parse_opt_ts(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.filter(|s| !s.is_empty()).and_then(|s| parse_ts(&s))
}

fn parse_or_default<T: FromStr + Default>(raw: &str) -> T {
    raw.parse().unwrap_or_else(|_| {
        tracing::warn!("⚠️ Unknown stored value '{raw}', using default");
        T::default()
    })
}

fn row_to_vendor(row: &Row) -> rusqlite::Result<Vendor> {
    let created_raw: String = row.get(17)?;
    Ok(Vendor {
        id: row.get(0)?,
        full_name: row.get(1)?,
        username: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        category: row.get(5)?,
        city: row.get(6)?,
        has_instagram: row.get(7)?,
        has_phone: row.get(8)?,
        has_email: row.get(9)?,
        insta_status: parse_or_default(&row.get::<_, String>(10)?),
        whatsapp_status: parse_or_default(&row.get::<_, String>(11)?),
        email_status: parse_or_default(&row.get::<_, String>(12)?),
        insta_contacted_at: parse_opt_ts(row.get(13)?),
        whatsapp_contacted_at: parse_opt_ts(row.get(14)?),
        email_contacted_at: parse_opt_ts(row.get(15)?),
        overall_status: parse_or_default(&row.get::<_, String>(16)?),
        created_at: parse_ts(&created_raw).unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        updated_at: parse_opt_ts(row.get(18)?),
        responded_at: parse_opt_ts(row.get(19)?),
        responded_channel: row
            .get::<_, Option<String>>(20)?
            .and_then(|c| Channel::from_str(&c).ok()),
    })
}

/// A log row, or `None` when its channel/action can't be read.
fn row_to_log(row: &Row) -> rusqlite::Result<Option<(LogEntry, bool)>> {
    let id: String = row.get(0)?;
    let channel: String = row.get(2)?;
    let action: String = row.get(3)?;
    let created: String = row.get(4)?;
    let (Ok(channel), Ok(action), Some(created_at)) = (
        Channel::from_str(&channel),
        LogAction::from_str(&action),
        parse_ts(&created),
    ) else {
        tracing::warn!("⚠️ Skipping unreadable log row {id}");
        return Ok(None);
    };
    Ok(Some((
        LogEntry {
            id,
            vendor_id: row.get(1)?,
            channel,
            action,
            created_at,
            user_id: row.get(5)?,
        },
        row.get(6)?,
    )))
}

fn row_to_sequence(row: &Row) -> rusqlite::Result<Sequence> {
    let id: String = row.get(0)?;
    let steps_json: String = row.get(3)?;
    let steps: Vec<SequenceStep> = serde_json::from_str(&steps_json).unwrap_or_else(|e| {
        tracing::warn!("⚠️ Sequence {id} has unreadable steps: {e}");
        Vec::new()
    });
    let started: String = row.get(5)?;
    Ok(Sequence {
        id,
        vendor_id: row.get(1)?,
        sequence_type: row.get(2)?,
        steps,
        current_step: row.get::<_, i64>(4)?.max(0) as usize,
        started_at: parse_ts(&started).unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        is_active: row.get(6)?,
    })
}

// ─── Row-level operations (shared with transactions) ─────────

pub(crate) fn upsert_vendor(conn: &Connection, v: &Vendor) -> Result<()> {
    conn.execute(
        "INSERT INTO vendors (id, full_name, username, phone, email, category, city,
            has_instagram, has_phone, has_email, insta_status, whatsapp_status, email_status,
            insta_contacted_at, whatsapp_contacted_at, email_contacted_at, overall_status,
            created_at, updated_at, responded_at, responded_channel)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)
         ON CONFLICT(id) DO UPDATE SET
            full_name=?2, username=?3, phone=?4, email=?5, category=?6, city=?7,
            has_instagram=?8, has_phone=?9, has_email=?10,
            insta_status=?11, whatsapp_status=?12, email_status=?13,
            insta_contacted_at=?14, whatsapp_contacted_at=?15, email_contacted_at=?16,
            overall_status=?17, created_at=?18, updated_at=?19, responded_at=?20, responded_channel=?21",
        params![
            v.id,
            v.full_name,
            v.username,
            v.phone,
            v.email,
            v.category,
            v.city,
            v.has_instagram,
            v.has_phone,
            v.has_email,
            v.insta_status.as_str(),
            v.whatsapp_status.as_str(),
            v.email_status.as_str(),
            v.insta_contacted_at.as_ref().map(ts),
            v.whatsapp_contacted_at.as_ref().map(ts),
            v.email_contacted_at.as_ref().map(ts),
            v.overall_status.as_str(),
            ts(&v.created_at),
            v.updated_at.as_ref().map(ts),
            v.responded_at.as_ref().map(ts),
            v.responded_channel.map(|c| c.as_str()),
        ],
    )
    .map_err(|e| ReachError::Database(format!("Save vendor: {e}")))?;
    Ok(())
}

pub(crate) fn fetch_vendor(conn: &Connection, id: &str) -> Result<Option<Vendor>> {
    match conn.query_row(&format!("{VENDOR_SELECT} WHERE id=?1"), params![id], row_to_vendor) {
        Ok(v) => Ok(Some(v)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(ReachError::Database(format!("Get vendor: {e}"))),
    }
}

/// Like [`fetch_vendor`] but a missing vendor is an error.
pub(crate) fn require_vendor(conn: &Connection, id: &str) -> Result<Vendor> {
    fetch_vendor(conn, id)?.ok_or_else(|| ReachError::NotFound(format!("vendor '{id}'")))
}

pub(crate) fn insert_log(conn: &Connection, log: &LogEntry, cursor_moved: bool) -> Result<()> {
    conn.execute(
        "INSERT INTO outreach_log (id, vendor_id, channel, action, created_at, user_id, cursor_moved)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            log.id,
            log.vendor_id,
            log.channel.as_str(),
            log.action.as_str(),
            ts(&log.created_at),
            log.user_id,
            cursor_moved,
        ],
    )
    .map_err(|e| ReachError::Database(format!("Insert log: {e}")))?;
    Ok(())
}

/// A log entry and whether recording it moved a sequence cursor.
pub(crate) fn fetch_log(conn: &Connection, id: &str) -> Result<Option<(LogEntry, bool)>> {
    match conn.query_row(&format!("{LOG_SELECT} WHERE id=?1"), params![id], row_to_log) {
        Ok(entry) => Ok(entry),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(ReachError::Database(format!("Get log: {e}"))),
    }
}

pub(crate) fn delete_log(conn: &Connection, id: &str) -> Result<()> {
    conn.execute("DELETE FROM outreach_log WHERE id=?1", params![id])
        .map_err(|e| ReachError::Database(format!("Delete log: {e}")))?;
    Ok(())
}

pub(crate) fn upsert_sequence(conn: &Connection, seq: &Sequence) -> Result<()> {
    let steps = serde_json::to_string(&seq.steps)?;
    conn.execute(
        "INSERT INTO vendor_sequences (id, vendor_id, sequence_type, steps, current_step, started_at, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
            vendor_id=?2, sequence_type=?3, steps=?4, current_step=?5, started_at=?6, is_active=?7",
        params![
            seq.id,
            seq.vendor_id,
            seq.sequence_type,
            steps,
            seq.current_step as i64,
            ts(&seq.started_at),
            seq.is_active,
        ],
    )
    .map_err(|e| ReachError::Database(format!("Save sequence: {e}")))?;
    Ok(())
}

/// The vendor's active sequence (latest started if several).
pub(crate) fn fetch_active_sequence(conn: &Connection, vendor_id: &str) -> Result<Option<Sequence>> {
    match conn.query_row(
        &format!("{SEQUENCE_SELECT} WHERE vendor_id=?1 AND is_active=1 ORDER BY started_at DESC LIMIT 1"),
        params![vendor_id],
        row_to_sequence,
    ) {
        Ok(s) => Ok(Some(s)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(ReachError::Database(format!("Get sequence: {e}"))),
    }
}

pub(crate) fn set_cursor(conn: &Connection, seq_id: &str, step: usize) -> Result<()> {
    conn.execute(
        "UPDATE vendor_sequences SET current_step=?1 WHERE id=?2",
        params![step as i64, seq_id],
    )
    .map_err(|e| ReachError::Database(format!("Move cursor: {e}")))?;
    Ok(())
}

pub(crate) fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value=?2, updated_at=?3",
        params![key, value, ts(&Utc::now())],
    )
    .map_err(|e| ReachError::Database(format!("Set setting: {e}")))?;
    Ok(())
}

impl ReachDb {
    /// Open or create the database.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .map_err(|e| ReachError::Database(format!("DB open error: {e}")))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(|e| ReachError::Database(format!("DB pragma error: {e}")))?;

        let db = Self { conn };
        db.migrate()?;
        tracing::debug!("🗄️ Opened outreach DB at {}", path.display());
        Ok(db)
    }

    /// Private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ReachError::Database(format!("DB open error: {e}")))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Run schema migrations.
    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS vendors (
                id TEXT PRIMARY KEY,
                full_name TEXT,
                username TEXT,
                phone TEXT,
                email TEXT,
                category TEXT NOT NULL DEFAULT 'uncategorized',
                city TEXT NOT NULL DEFAULT '',
                has_instagram INTEGER NOT NULL DEFAULT 0,
                has_phone INTEGER NOT NULL DEFAULT 0,
                has_email INTEGER NOT NULL DEFAULT 0,
                insta_status TEXT NOT NULL DEFAULT 'pending',
                whatsapp_status TEXT NOT NULL DEFAULT 'pending',
                email_status TEXT NOT NULL DEFAULT 'pending',
                insta_contacted_at TEXT,
                whatsapp_contacted_at TEXT,
                email_contacted_at TEXT,
                overall_status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL,
                updated_at TEXT,
                responded_at TEXT,
                responded_channel TEXT
            );

            -- Append-only; rows are only removed by revert
            CREATE TABLE IF NOT EXISTS outreach_log (
                id TEXT PRIMARY KEY,
                vendor_id TEXT NOT NULL,
                channel TEXT NOT NULL,
                action TEXT NOT NULL,            -- 'sent', 'followed_up', 'skipped'
                created_at TEXT NOT NULL,
                user_id TEXT,
                cursor_moved INTEGER NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_outreach_log_created ON outreach_log(created_at);

            CREATE TABLE IF NOT EXISTS vendor_sequences (
                id TEXT PRIMARY KEY,
                vendor_id TEXT NOT NULL,
                sequence_type TEXT NOT NULL,     -- 'tier_a' .. 'tier_e'
                steps TEXT NOT NULL,             -- JSON array of {day, channel, type}
                current_step INTEGER NOT NULL DEFAULT 0,
                started_at TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1
            );
            CREATE INDEX IF NOT EXISTS idx_vendor_sequences_vendor ON vendor_sequences(vendor_id);

            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT
            );
         ",
            )
            .map_err(|e| ReachError::Database(format!("Migration: {e}")))?;
        Ok(())
    }

    // ─── Vendors ──────────────────────────────────────────────

    /// Insert or replace a vendor.
    pub fn upsert_vendor(&self, vendor: &Vendor) -> Result<()> {
        upsert_vendor(&self.conn, vendor)
    }

    pub fn get_vendor(&self, id: &str) -> Result<Option<Vendor>> {
        fetch_vendor(&self.conn, id)
    }

    /// All vendors in roster order (oldest upload first).
    pub fn list_vendors(&self) -> Result<Vec<Vendor>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{VENDOR_SELECT} ORDER BY created_at, id"))
            .map_err(|e| ReachError::Database(format!("Prepare: {e}")))?;
        let vendors = stmt
            .query_map([], row_to_vendor)
            .map_err(|e| ReachError::Database(format!("Query: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(vendors)
    }

    // ─── Outreach log ─────────────────────────────────────────

    /// Append a log entry.
    pub fn insert_log(&self, log: &LogEntry) -> Result<()> {
        insert_log(&self.conn, log, false)
    }

    pub fn get_log(&self, id: &str) -> Result<Option<LogEntry>> {
        Ok(fetch_log(&self.conn, id)?.map(|(entry, _)| entry))
    }

    pub fn delete_log(&self, id: &str) -> Result<()> {
        delete_log(&self.conn, id)
    }

    /// Full log, oldest first.
    pub fn list_logs(&self) -> Result<Vec<LogEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LOG_SELECT} ORDER BY created_at, id"))
            .map_err(|e| ReachError::Database(format!("Prepare: {e}")))?;
        let logs = stmt
            .query_map([], row_to_log)
            .map_err(|e| ReachError::Database(format!("Query: {e}")))?
            .filter_map(|r| r.ok().flatten())
            .map(|(entry, _)| entry)
            .collect();
        Ok(logs)
    }

    // ─── Sequences ────────────────────────────────────────────

    pub fn upsert_sequence(&self, seq: &Sequence) -> Result<()> {
        upsert_sequence(&self.conn, seq)
    }

    pub fn active_sequence(&self, vendor_id: &str) -> Result<Option<Sequence>> {
        fetch_active_sequence(&self.conn, vendor_id)
    }

    /// Sequences, optionally only the active ones.
    pub fn list_sequences(&self, active_only: bool) -> Result<Vec<Sequence>> {
        let filter = if active_only { " WHERE is_active=1" } else { "" };
        let mut stmt = self
            .conn
            .prepare(&format!("{SEQUENCE_SELECT}{filter} ORDER BY started_at, id"))
            .map_err(|e| ReachError::Database(format!("Prepare: {e}")))?;
        let seqs = stmt
            .query_map([], row_to_sequence)
            .map_err(|e| ReachError::Database(format!("Query: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(seqs)
    }

    // ─── Settings ─────────────────────────────────────────────

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        set_setting(&self.conn, key, value)
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        match self.conn.query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |row| row.get::<_, String>(0),
        ) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(ReachError::Database(format!("Get setting: {e}"))),
        }
    }

    pub fn settings(&self) -> Result<Settings> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM settings ORDER BY key")
            .map_err(|e| ReachError::Database(format!("Prepare: {e}")))?;
        let settings = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(|e| ReachError::Database(format!("Query: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(settings)
    }

    /// Materialize everything the planner reads.
    pub fn load_inputs(&self) -> Result<PlanInputs> {
        Ok(PlanInputs {
            vendors: self.list_vendors()?,
            sequences: self.list_sequences(true)?,
            logs: self.list_logs()?,
            settings: self.settings()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use vendorreach_core::{ChannelStatus, OverallStatus, StepChannel, StepKind};

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap()
    }

    fn sample_vendor() -> Vendor {
        let mut v = Vendor::new("v1", "Lens & Light", at(1, 9));
        v.username = Some("lensandlight".into());
        v.has_instagram = true;
        v.has_email = true;
        v.email = Some("hello@lens.example".into());
        v.category = "photographer".into();
        v.city = "Jaipur".into();
        v.set_channel_state(Channel::Instagram, ChannelStatus::Sent, Some(at(2, 10)));
        v.overall_status = OverallStatus::InProgress;
        v.responded_channel = Some(Channel::Email);
        v
    }

    #[test]
    fn test_open_and_migrate() {
        let db = ReachDb::open_in_memory().unwrap();
        assert!(db.list_vendors().unwrap().is_empty());
        assert!(db.settings().unwrap().is_empty());
        // Migrations are idempotent.
        db.migrate().unwrap();
    }

    #[test]
    fn test_open_file_db() {
        let dir = std::env::temp_dir().join(format!("vendorreach-db-test-{}", uuid::Uuid::new_v4()));
        let db = ReachDb::open(&dir.join("outreach.db")).unwrap();
        db.upsert_vendor(&sample_vendor()).unwrap();
        drop(db);
        let db = ReachDb::open(&dir.join("outreach.db")).unwrap();
        assert_eq!(db.list_vendors().unwrap().len(), 1);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_vendor_round_trip() {
        let db = ReachDb::open_in_memory().unwrap();
        let v = sample_vendor();
        db.upsert_vendor(&v).unwrap();
        assert_eq!(db.get_vendor("v1").unwrap(), Some(v.clone()));
        assert_eq!(db.get_vendor("missing").unwrap(), None);

        let mut changed = v;
        changed.city = "Udaipur".into();
        db.upsert_vendor(&changed).unwrap();
        let all = db.list_vendors().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].city, "Udaipur");
    }

    #[test]
    fn test_unknown_stored_status_falls_back() {
        let db = ReachDb::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO vendors (id, insta_status, overall_status, created_at)
                 VALUES ('odd', 'bounced', 'ghosted', '2026-03-01T09:00:00+00:00')",
                [],
            )
            .unwrap();
        let v = db.get_vendor("odd").unwrap().unwrap();
        assert_eq!(v.insta_status, ChannelStatus::Pending);
        assert_eq!(v.overall_status, OverallStatus::Pending);
        assert_eq!(v.category, "uncategorized");
    }

    #[test]
    fn test_log_insert_list_delete() {
        let db = ReachDb::open_in_memory().unwrap();
        let a = LogEntry::new("l1", "v1", Channel::Instagram, LogAction::Sent, at(2, 10)).by("a1");
        let b = LogEntry::new("l2", "v1", Channel::Email, LogAction::Skipped, at(3, 10));
        db.insert_log(&b).unwrap();
        db.insert_log(&a).unwrap();
        assert_eq!(db.list_logs().unwrap(), vec![a.clone(), b.clone()]);

        db.delete_log("l1").unwrap();
        assert_eq!(db.get_log("l1").unwrap(), None);
        assert_eq!(db.list_logs().unwrap(), vec![b]);
    }

    #[test]
    fn test_unreadable_log_rows_skipped() {
        let db = ReachDb::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO outreach_log (id, vendor_id, channel, action, created_at)
                 VALUES ('bad', 'v1', 'fax', 'sent', '2026-03-01T09:00:00+00:00')",
                [],
            )
            .unwrap();
        assert!(db.list_logs().unwrap().is_empty());
        assert_eq!(db.get_log("bad").unwrap(), None);
    }

    #[test]
    fn test_sequence_steps_as_json() {
        let db = ReachDb::open_in_memory().unwrap();
        let seq = Sequence {
            id: "s1".into(),
            vendor_id: "v1".into(),
            sequence_type: "tier_c".into(),
            steps: vec![
                SequenceStep::new(0, StepChannel::Instagram, StepKind::Initial),
                SequenceStep::new(5, StepChannel::Instagram, StepKind::Followup),
                SequenceStep::new(12, StepChannel::Exhausted, StepKind::End),
            ],
            current_step: 1,
            started_at: at(1, 9),
            is_active: true,
        };
        db.upsert_sequence(&seq).unwrap();
        assert_eq!(db.active_sequence("v1").unwrap(), Some(seq.clone()));

        let raw: String = db
            .conn
            .query_row("SELECT steps FROM vendor_sequences WHERE id='s1'", [], |r| r.get(0))
            .unwrap();
        assert!(raw.contains(r#""type":"followup""#));

        set_cursor(&db.conn, "s1", 2).unwrap();
        assert_eq!(db.active_sequence("v1").unwrap().unwrap().current_step, 2);

        let mut off = seq;
        off.is_active = false;
        db.upsert_sequence(&off).unwrap();
        assert_eq!(db.active_sequence("v1").unwrap(), None);
        assert!(db.list_sequences(true).unwrap().is_empty());
        assert_eq!(db.list_sequences(false).unwrap().len(), 1);
    }

    #[test]
    fn test_settings_and_load_inputs() {
        let db = ReachDb::open_in_memory().unwrap();
        db.set_setting("email_daily_target", "10").unwrap();
        db.set_setting("email_daily_target", "12").unwrap();
        db.set_setting("a1:insta_account_age", "new").unwrap();
        assert_eq!(db.get_setting("email_daily_target").unwrap().as_deref(), Some("12"));
        assert_eq!(db.get_setting("nope").unwrap(), None);

        db.upsert_vendor(&sample_vendor()).unwrap();
        let inputs = db.load_inputs().unwrap();
        assert_eq!(inputs.vendors.len(), 1);
        assert_eq!(inputs.settings.len(), 2);
        assert_eq!(inputs.settings.get("email_daily_target"), Some("12"));
    }
}
