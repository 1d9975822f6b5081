//! Outreach workflow: the mutations an agent makes while working a plan.
//!
//! Each operation runs in one SQLite transaction, so a vendor's channel
//! status, its log entry and its sequence cursor always move together.
//!
//! ```text
//! mark_sent     status → sent/followed_up, log +1, cursor +1
//! mark_skipped  status → skipped (initials), log +1, cursor per SkipPolicy
//! revert        status back, log −1, cursor −1 if the entry moved it
//! ```

use chrono::{DateTime, Utc};
use rusqlite::Transaction;
use vendorreach_core::{
    Channel, ChannelStatus, LogAction, LogEntry, OverallStatus, ReachError, Result, Sequence,
    SkipPolicy, Vendor,
};
use vendorreach_planner::{SequenceTier, TaskKind};

use crate::db::{self, ReachDb};

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Move the vendor's active sequence cursor forward. Returns whether it moved.
fn advance_cursor(tx: &Transaction<'_>, vendor_id: &str) -> Result<bool> {
    match db::fetch_active_sequence(tx, vendor_id)? {
        Some(seq) if seq.current_step < seq.steps.len() => {
            db::set_cursor(tx, &seq.id, seq.current_step + 1)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn rewind_cursor(tx: &Transaction<'_>, vendor_id: &str) -> Result<()> {
    if let Some(seq) = db::fetch_active_sequence(tx, vendor_id)? {
        if seq.current_step > 0 {
            db::set_cursor(tx, &seq.id, seq.current_step - 1)?;
        }
    }
    Ok(())
}

fn clear_response(v: &mut Vendor) {
    v.responded_at = None;
    v.responded_channel = None;
}

impl ReachDb {
    fn begin(&mut self) -> Result<Transaction<'_>> {
        self.conn
            .transaction()
            .map_err(|e| ReachError::Database(format!("Begin transaction: {e}")))
    }

    /// Load a vendor, apply `f`, stamp `updated_at` and save, all in one transaction.
    fn update_vendor<F>(&mut self, vendor_id: &str, now: DateTime<Utc>, f: F) -> Result<Vendor>
    where
        F: FnOnce(&mut Vendor) -> Result<()>,
    {
        let tx = self.begin()?;
        let mut v = db::require_vendor(&tx, vendor_id)?;
        f(&mut v)?;
        v.updated_at = Some(now);
        db::upsert_vendor(&tx, &v)?;
        tx.commit()
            .map_err(|e| ReachError::Database(format!("Commit: {e}")))?;
        Ok(v)
    }

    /// Give every vendor without an active sequence one for its tier.
    pub fn enroll(&mut self, now: DateTime<Utc>) -> Result<usize> {
        let vendors = self.list_vendors()?;
        let tx = self.begin()?;
        let mut created = 0;
        for v in &vendors {
            if db::fetch_active_sequence(&tx, &v.id)?.is_some() {
                continue;
            }
            let tier = SequenceTier::classify(v.has_instagram, v.has_phone, v.has_email);
            let seq = Sequence {
                id: new_id(),
                vendor_id: v.id.clone(),
                sequence_type: tier.key().to_string(),
                steps: tier.steps().to_vec(),
                current_step: 0,
                started_at: now,
                is_active: true,
            };
            db::upsert_sequence(&tx, &seq)?;
            tracing::debug!("🧭 Enrolled {} on {}", v.id, tier.label());
            created += 1;
        }
        tx.commit()
            .map_err(|e| ReachError::Database(format!("Commit: {e}")))?;
        tracing::info!("🧭 Enrolled {created} vendors");
        Ok(created)
    }

    /// Record a message sent on `channel`.
    pub fn mark_sent(
        &mut self,
        vendor_id: &str,
        channel: Channel,
        kind: TaskKind,
        agent: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<LogEntry> {
        let (status, action) = match kind {
            TaskKind::Initial => (ChannelStatus::Sent, LogAction::Sent),
            TaskKind::Followup => (ChannelStatus::FollowedUp, LogAction::FollowedUp),
        };

        let tx = self.begin()?;
        let mut v = db::require_vendor(&tx, vendor_id)?;
        if !v.has_channel(channel) {
            tracing::warn!("⚠️ {vendor_id} has no {channel} contact on record");
        }
        v.set_channel_state(channel, status, Some(now));
        if v.overall_status == OverallStatus::Pending {
            v.overall_status = OverallStatus::InProgress;
        }
        v.updated_at = Some(now);
        db::upsert_vendor(&tx, &v)?;

        let moved = advance_cursor(&tx, vendor_id)?;
        let mut log = LogEntry::new(&new_id(), vendor_id, channel, action, now);
        if let Some(a) = agent {
            log = log.by(a);
        }
        db::insert_log(&tx, &log, moved)?;
        tx.commit()
            .map_err(|e| ReachError::Database(format!("Commit: {e}")))?;

        tracing::info!("📤 {vendor_id} {action} on {channel}");
        Ok(log)
    }

    /// Record a skip. Skipping an initial marks the channel `skipped`; skipping
    /// a follow-up leaves the sent status alone. Either way the pair is hidden
    /// for the rest of the day.
    pub fn mark_skipped(
        &mut self,
        vendor_id: &str,
        channel: Channel,
        agent: Option<&str>,
        policy: SkipPolicy,
        now: DateTime<Utc>,
    ) -> Result<LogEntry> {
        let tx = self.begin()?;
        let mut v = db::require_vendor(&tx, vendor_id)?;
        if !v.channel_status(channel).is_contacted() {
            v.set_channel_state(channel, ChannelStatus::Skipped, None);
        }
        v.updated_at = Some(now);
        db::upsert_vendor(&tx, &v)?;

        let moved = match policy {
            SkipPolicy::Advance => advance_cursor(&tx, vendor_id)?,
            SkipPolicy::SuppressToday => false,
        };
        let mut log = LogEntry::new(&new_id(), vendor_id, channel, LogAction::Skipped, now);
        if let Some(a) = agent {
            log = log.by(a);
        }
        db::insert_log(&tx, &log, moved)?;
        tx.commit()
            .map_err(|e| ReachError::Database(format!("Commit: {e}")))?;

        tracing::info!("⏭️ {vendor_id} skipped on {channel}");
        Ok(log)
    }

    /// Undo a logged action and put the vendor back in the queue.
    pub fn revert(&mut self, log_id: &str, now: DateTime<Utc>) -> Result<Vendor> {
        let tx = self.begin()?;
        let (log, moved) = db::fetch_log(&tx, log_id)?
            .ok_or_else(|| ReachError::NotFound(format!("log entry '{log_id}'")))?;
        let mut v = db::require_vendor(&tx, &log.vendor_id)?;
        let ch = log.channel;

        match log.action {
            LogAction::FollowedUp => {
                let at = v.contacted_at(ch);
                v.set_channel_state(ch, ChannelStatus::Sent, at);
            }
            LogAction::Sent => v.set_channel_state(ch, ChannelStatus::Pending, None),
            LogAction::Skipped => {
                if v.channel_status(ch) == ChannelStatus::Skipped {
                    v.set_channel_state(ch, ChannelStatus::Pending, None);
                }
            }
        }
        if v.overall_status.is_excluded() {
            v.overall_status = OverallStatus::InProgress;
            clear_response(&mut v);
        }
        v.updated_at = Some(now);
        db::upsert_vendor(&tx, &v)?;
        db::delete_log(&tx, log_id)?;
        if moved {
            rewind_cursor(&tx, &v.id)?;
        }
        tx.commit()
            .map_err(|e| ReachError::Database(format!("Commit: {e}")))?;

        tracing::info!("↩️ Reverted {} ({} on {ch}) for {}", log_id, log.action, v.id);
        Ok(v)
    }

    /// Record a vendor's reply.
    pub fn record_response(
        &mut self,
        vendor_id: &str,
        status: OverallStatus,
        channel: Option<Channel>,
        now: DateTime<Utc>,
    ) -> Result<Vendor> {
        if !status.is_excluded() {
            return Err(ReachError::InvalidInput(format!(
                "'{status}' is not a response status"
            )));
        }
        let v = self.update_vendor(vendor_id, now, |v| {
            v.overall_status = status;
            v.responded_at = Some(now);
            if channel.is_some() {
                v.responded_channel = channel;
            }
            Ok(())
        })?;
        tracing::info!("💬 {vendor_id} responded: {status}");
        Ok(v)
    }

    /// Put a responded vendor back into the outreach flow.
    pub fn undo_response(&mut self, vendor_id: &str, now: DateTime<Utc>) -> Result<Vendor> {
        let v = self.update_vendor(vendor_id, now, |v| {
            v.overall_status = OverallStatus::InProgress;
            clear_response(v);
            Ok(())
        })?;
        tracing::info!("↩️ Response cleared for {vendor_id}");
        Ok(v)
    }

    /// Wipe all outreach state on a vendor. Log and sequence are kept.
    pub fn reset_vendor(&mut self, vendor_id: &str, now: DateTime<Utc>) -> Result<Vendor> {
        let v = self.update_vendor(vendor_id, now, |v| {
            for ch in Channel::ALL {
                v.set_channel_state(ch, ChannelStatus::Pending, None);
            }
            v.overall_status = OverallStatus::Pending;
            clear_response(v);
            Ok(())
        })?;
        tracing::info!("🔄 Reset {vendor_id}");
        Ok(v)
    }

    pub fn mark_invalid(&mut self, vendor_id: &str, now: DateTime<Utc>) -> Result<Vendor> {
        let v = self.update_vendor(vendor_id, now, |v| {
            v.overall_status = OverallStatus::Invalid;
            Ok(())
        })?;
        tracing::info!("🚫 {vendor_id} marked invalid");
        Ok(v)
    }

    pub fn mark_converted(&mut self, vendor_id: &str, now: DateTime<Utc>) -> Result<Vendor> {
        let v = self.update_vendor(vendor_id, now, |v| {
            v.overall_status = OverallStatus::Converted;
            Ok(())
        })?;
        tracing::info!("🎉 {vendor_id} converted");
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use vendorreach_core::Clock;
    use vendorreach_planner::{PlanOptions, build_daily_plan};

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap()
    }

    fn seeded() -> ReachDb {
        let db = ReachDb::open_in_memory().unwrap();
        let mut v = Vendor::new("v1", "Bloom Decor", at(1, 9));
        v.has_instagram = true;
        v.has_phone = true;
        v.has_email = true;
        v.username = Some("bloomdecor".into());
        db.upsert_vendor(&v).unwrap();
        db
    }

    #[test]
    fn test_enroll_once() {
        let mut db = seeded();
        assert_eq!(db.enroll(at(1, 10)).unwrap(), 1);
        assert_eq!(db.enroll(at(1, 11)).unwrap(), 0);
        let seq = db.active_sequence("v1").unwrap().unwrap();
        assert_eq!(seq.sequence_type, "tier_a");
        assert_eq!(seq.current_step, 0);
        assert_eq!(seq.steps.len(), 7);
    }

    #[test]
    fn test_mark_sent_moves_everything() {
        let mut db = seeded();
        db.enroll(at(1, 10)).unwrap();
        let log = db
            .mark_sent("v1", Channel::Instagram, TaskKind::Initial, Some("a1"), at(1, 12))
            .unwrap();
        assert_eq!(log.user_id.as_deref(), Some("a1"));

        let v = db.get_vendor("v1").unwrap().unwrap();
        assert_eq!(v.insta_status, ChannelStatus::Sent);
        assert_eq!(v.insta_contacted_at, Some(at(1, 12)));
        assert_eq!(v.overall_status, OverallStatus::InProgress);
        assert_eq!(v.updated_at, Some(at(1, 12)));
        assert_eq!(db.active_sequence("v1").unwrap().unwrap().current_step, 1);
        assert_eq!(db.list_logs().unwrap(), vec![log]);
    }

    #[test]
    fn test_followup_then_revert() {
        let mut db = seeded();
        db.mark_sent("v1", Channel::WhatsApp, TaskKind::Initial, None, at(1, 12)).unwrap();
        let fu = db
            .mark_sent("v1", Channel::WhatsApp, TaskKind::Followup, None, at(4, 12))
            .unwrap();
        assert_eq!(fu.action, LogAction::FollowedUp);

        let v = db.revert(&fu.id, at(4, 13)).unwrap();
        assert_eq!(v.whatsapp_status, ChannelStatus::Sent);
        assert!(v.whatsapp_contacted_at.is_some());
        assert_eq!(db.list_logs().unwrap().len(), 1);
    }

    #[test]
    fn test_revert_sent_restores_pending_and_cursor() {
        let mut db = seeded();
        db.enroll(at(1, 10)).unwrap();
        let log = db.mark_sent("v1", Channel::Instagram, TaskKind::Initial, None, at(1, 12)).unwrap();
        db.record_response("v1", OverallStatus::Interested, Some(Channel::Instagram), at(2, 9))
            .unwrap();

        let v = db.revert(&log.id, at(2, 10)).unwrap();
        assert_eq!(v.insta_status, ChannelStatus::Pending);
        assert_eq!(v.insta_contacted_at, None);
        assert_eq!(v.overall_status, OverallStatus::InProgress);
        assert_eq!(v.responded_at, None);
        assert_eq!(v.responded_channel, None);
        assert_eq!(db.active_sequence("v1").unwrap().unwrap().current_step, 0);
        assert!(db.list_logs().unwrap().is_empty());
    }

    #[test]
    fn test_skip_policies() {
        let mut db = seeded();
        db.enroll(at(1, 10)).unwrap();
        let skip = db
            .mark_skipped("v1", Channel::Instagram, None, SkipPolicy::SuppressToday, at(1, 12))
            .unwrap();
        assert_eq!(db.active_sequence("v1").unwrap().unwrap().current_step, 0);
        let v = db.get_vendor("v1").unwrap().unwrap();
        assert_eq!(v.insta_status, ChannelStatus::Skipped);
        assert_eq!(v.insta_contacted_at, None);

        // Reverting a skip that didn't move the cursor leaves it alone.
        db.revert(&skip.id, at(1, 13)).unwrap();
        assert_eq!(db.active_sequence("v1").unwrap().unwrap().current_step, 0);
        assert_eq!(db.get_vendor("v1").unwrap().unwrap().insta_status, ChannelStatus::Pending);

        let skip = db
            .mark_skipped("v1", Channel::Instagram, None, SkipPolicy::Advance, at(1, 14))
            .unwrap();
        assert_eq!(db.active_sequence("v1").unwrap().unwrap().current_step, 1);
        db.revert(&skip.id, at(1, 15)).unwrap();
        assert_eq!(db.active_sequence("v1").unwrap().unwrap().current_step, 0);
    }

    #[test]
    fn test_skipping_followup_keeps_sent_state() {
        let mut db = seeded();
        db.mark_sent("v1", Channel::Email, TaskKind::Initial, None, at(1, 12)).unwrap();
        let skip = db
            .mark_skipped("v1", Channel::Email, None, SkipPolicy::SuppressToday, at(5, 12))
            .unwrap();
        let v = db.get_vendor("v1").unwrap().unwrap();
        assert_eq!(v.email_status, ChannelStatus::Sent);
        assert_eq!(v.email_contacted_at, Some(at(1, 12)));

        db.revert(&skip.id, at(5, 13)).unwrap();
        assert_eq!(db.get_vendor("v1").unwrap().unwrap().email_status, ChannelStatus::Sent);
    }

    #[test]
    fn test_skip_hides_vendor_for_the_day() {
        let mut db = seeded();
        db.mark_skipped("v1", Channel::Instagram, None, SkipPolicy::SuppressToday, at(3, 9))
            .unwrap();
        let inputs = db.load_inputs().unwrap();
        let plan = build_daily_plan(&inputs, &PlanOptions::default(), &Clock::utc(at(3, 10)));
        // The pending Instagram initial still gates the later channels.
        assert!(plan.planned_tasks.is_empty());

        let tomorrow = build_daily_plan(&inputs, &PlanOptions::default(), &Clock::utc(at(4, 10)));
        assert_eq!(tomorrow.planned_tasks[0].channel, Channel::Instagram);
    }

    #[test]
    fn test_response_lifecycle() {
        let mut db = seeded();
        let v = db
            .record_response("v1", OverallStatus::MaybeLater, None, at(2, 9))
            .unwrap();
        assert_eq!(v.responded_at, Some(at(2, 9)));
        assert_eq!(v.responded_channel, None);

        let v = db.undo_response("v1", at(2, 10)).unwrap();
        assert_eq!(v.overall_status, OverallStatus::InProgress);
        assert_eq!(v.responded_at, None);

        let err = db.record_response("v1", OverallStatus::InProgress, None, at(2, 11));
        assert!(matches!(err, Err(ReachError::InvalidInput(_))));
    }

    #[test]
    fn test_reset_invalid_converted() {
        let mut db = seeded();
        db.mark_sent("v1", Channel::Instagram, TaskKind::Initial, None, at(1, 12)).unwrap();
        let v = db.reset_vendor("v1", at(2, 9)).unwrap();
        assert_eq!(v.insta_status, ChannelStatus::Pending);
        assert_eq!(v.insta_contacted_at, None);
        assert_eq!(v.overall_status, OverallStatus::Pending);

        assert_eq!(db.mark_invalid("v1", at(2, 10)).unwrap().overall_status, OverallStatus::Invalid);
        let v = db.mark_converted("v1", at(2, 11)).unwrap();
        assert_eq!(v.overall_status, OverallStatus::Converted);
        assert_eq!(v.updated_at, Some(at(2, 11)));
    }

    #[test]
    fn test_unknown_ids() {
        let mut db = seeded();
        assert!(matches!(
            db.mark_sent("ghost", Channel::Email, TaskKind::Initial, None, at(1, 9)),
            Err(ReachError::NotFound(_))
        ));
        assert!(matches!(db.revert("nope", at(1, 9)), Err(ReachError::NotFound(_))));
        assert!(matches!(db.mark_invalid("ghost", at(1, 9)), Err(ReachError::NotFound(_))));
    }
}
