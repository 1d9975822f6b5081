//! Performance snapshots, hot leads and the time-of-day channel hint.
//!
//! Unlike the budget, these look at the whole team's log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vendorreach_core::{Channel, Clock, LogEntry, OverallStatus, Vendor};

/// Sends, replies and signups inside one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub total: u32,
    pub instagram: u32,
    pub whatsapp: u32,
    pub email: u32,
    pub replies: u32,
    pub signups: u32,
}

impl PerformanceSnapshot {
    /// Aggregate everything whose timestamp falls inside `window`.
    pub fn collect(logs: &[LogEntry], vendors: &[Vendor], window: impl Fn(DateTime<Utc>) -> bool) -> Self {
        let mut snap = Self::default();
        for log in logs.iter().filter(|l| l.action.is_send() && window(l.created_at)) {
            snap.total += 1;
            match log.channel {
                Channel::Instagram => snap.instagram += 1,
                Channel::WhatsApp => snap.whatsapp += 1,
                Channel::Email => snap.email += 1,
            }
        }
        snap.replies = vendors
            .iter()
            .filter(|v| v.responded_at.is_some_and(&window))
            .count() as u32;
        snap.signups = vendors
            .iter()
            .filter(|v| v.overall_status == OverallStatus::Converted && v.updated_at.is_some_and(&window))
            .count() as u32;
        snap
    }

    pub fn yesterday(logs: &[LogEntry], vendors: &[Vendor], clock: &Clock) -> Self {
        Self::collect(logs, vendors, |t| clock.is_yesterday(t))
    }

    pub fn this_week(logs: &[LogEntry], vendors: &[Vendor], clock: &Clock) -> Self {
        Self::collect(logs, vendors, |t| clock.is_this_week(t))
    }
}

/// Interested vendors, most recent response first.
pub fn hot_leads(vendors: &[Vendor], limit: usize) -> Vec<Vendor> {
    let mut leads: Vec<&Vendor> = vendors
        .iter()
        .filter(|v| v.overall_status == OverallStatus::Interested)
        .collect();
    // None sorts below any timestamp, so unknown responses land last.
    leads.sort_by(|a, b| b.responded_at.cmp(&a.responded_at));
    leads.into_iter().take(limit).cloned().collect()
}

/// Which channel to work right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRecommendation {
    pub channel: Channel,
    pub label: String,
    pub reason: String,
}

pub fn recommend_for_hour(hour: u32) -> TimeRecommendation {
    let (channel, label, reason) = match hour {
        h if h < 9 => (Channel::Email, "Email", "Business inboxes are checked first thing in the morning"),
        h if h < 13 => (Channel::Instagram, "Instagram", "Peak engagement window — vendors are browsing"),
        h if h < 15 => (Channel::Email, "Email", "Post-lunch email check window"),
        h if h < 18 => (Channel::WhatsApp, "WhatsApp", "Afternoon activity spike on WhatsApp"),
        h if h < 20 => (Channel::Instagram, "Instagram", "Evening browsing peak"),
        _ => (Channel::Email, "Review", "Late — review data and plan for tomorrow"),
    };
    TimeRecommendation {
        channel,
        label: label.into(),
        reason: reason.into(),
    }
}
