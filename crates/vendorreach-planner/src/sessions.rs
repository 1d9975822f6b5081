//! Work sessions: buckets of accepted tasks in the order an agent works them.
//!
//! ```text
//! accepted tasks
//!   ├── overdue follow-ups (all channels, urgent)
//!   ├── follow-ups due today: instagram → whatsapp → email
//!   └── new outreach:         instagram → whatsapp → email
//! ```

use serde::{Deserialize, Serialize};
use vendorreach_core::Channel;

use crate::tasks::{DailyTask, TaskKind};

/// Which bucket a session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Overdue,
    Followup,
    Outreach,
}

/// Session channel; the overdue bucket mixes channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionChannel {
    Instagram,
    WhatsApp,
    Email,
    Mixed,
}

impl From<Channel> for SessionChannel {
    fn from(ch: Channel) -> Self {
        match ch {
            Channel::Instagram => SessionChannel::Instagram,
            Channel::WhatsApp => SessionChannel::WhatsApp,
            Channel::Email => SessionChannel::Email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub label: String,
    pub description: String,
    pub channel: SessionChannel,
    pub session_type: SessionType,
    pub tasks: Vec<DailyTask>,
    pub estimated_minutes: u32,
    pub urgent: bool,
}

/// `ceil(n * tenths / 10)`.
fn minutes(n: usize, tenths: u32) -> u32 {
    (n as u32 * tenths).div_ceil(10)
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Group accepted tasks into sessions. Empty buckets are dropped.
pub fn group_sessions(tasks: &[DailyTask]) -> Vec<Session> {
    let mut sessions = Vec::new();

    let overdue: Vec<DailyTask> = tasks.iter().filter(|t| t.is_overdue_followup()).cloned().collect();
    if !overdue.is_empty() {
        let n = overdue.len();
        sessions.push(Session {
            id: "overdue".into(),
            label: "Overdue Follow-ups".into(),
            description: format!("{n} follow-up{} past due — handle first", plural(n)),
            channel: SessionChannel::Mixed,
            session_type: SessionType::Overdue,
            tasks: overdue,
            estimated_minutes: minutes(n, 5),
            urgent: true,
        });
    }

    for ch in Channel::ALL {
        let due: Vec<DailyTask> = tasks
            .iter()
            .filter(|t| t.kind == TaskKind::Followup && !t.is_overdue && t.channel == ch)
            .cloned()
            .collect();
        if due.is_empty() {
            continue;
        }
        let n = due.len();
        sessions.push(Session {
            id: format!("followup-{ch}"),
            label: format!("{} Follow-ups", ch.label()),
            description: format!("{n} follow-up{} due today", plural(n)),
            channel: ch.into(),
            session_type: SessionType::Followup,
            tasks: due,
            estimated_minutes: minutes(n, 5),
            urgent: false,
        });
    }

    for ch in Channel::ALL {
        let fresh: Vec<DailyTask> = tasks
            .iter()
            .filter(|t| t.kind == TaskKind::Initial && t.channel == ch)
            .cloned()
            .collect();
        if fresh.is_empty() {
            continue;
        }
        let n = fresh.len();
        let tenths = if ch == Channel::Instagram { 5 } else { 4 };
        sessions.push(Session {
            id: format!("outreach-{ch}"),
            label: format!("{} Outreach", ch.label()),
            description: format!("{n} new vendor{} to reach", plural(n)),
            channel: ch.into(),
            session_type: SessionType::Outreach,
            tasks: fresh,
            estimated_minutes: minutes(n, tenths),
            urgent: false,
        });
    }

    sessions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, channel: Channel, kind: TaskKind, overdue: bool) -> DailyTask {
        DailyTask {
            vendor_id: id.into(),
            vendor_name: id.into(),
            category: "uncategorized".into(),
            city: String::new(),
            channel,
            kind,
            priority: 0,
            is_overdue: overdue,
            days_overdue: if overdue { 1 } else { 0 },
            identifier: String::new(),
            sequence_label: "Custom".into(),
            step_number: 1,
            total_steps: 1,
            available_channels: vec![channel],
        }
    }

    #[test]
    fn test_session_order_and_buckets() {
        let tasks = vec![
            task("a", Channel::Email, TaskKind::Initial, false),
            task("b", Channel::WhatsApp, TaskKind::Followup, true),
            task("c", Channel::Instagram, TaskKind::Followup, true),
            task("d", Channel::WhatsApp, TaskKind::Followup, false),
            task("e", Channel::Instagram, TaskKind::Initial, true),
        ];
        let sessions = group_sessions(&tasks);
        let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["overdue", "followup-whatsapp", "outreach-instagram", "outreach-email"]);

        let overdue = &sessions[0];
        assert!(overdue.urgent);
        assert_eq!(overdue.channel, SessionChannel::Mixed);
        assert_eq!(overdue.description, "2 follow-ups past due — handle first");
        assert_eq!(overdue.estimated_minutes, 1);

        assert_eq!(sessions[1].label, "WhatsApp Follow-ups");
        assert_eq!(sessions[1].description, "1 follow-up due today");
        // Overdue initials still go to outreach.
        assert_eq!(sessions[2].tasks[0].vendor_id, "e");
        assert_eq!(sessions[3].description, "1 new vendor to reach");
    }

    #[test]
    fn test_minutes_rounding() {
        let ig: Vec<DailyTask> = (0..3)
            .map(|i| task(&format!("i{i}"), Channel::Instagram, TaskKind::Initial, false))
            .collect();
        let em: Vec<DailyTask> = (0..3)
            .map(|i| task(&format!("e{i}"), Channel::Email, TaskKind::Initial, false))
            .collect();
        let sessions = group_sessions(&[ig, em].concat());
        // ceil(1.5) and ceil(1.2)
        assert_eq!(sessions[0].estimated_minutes, 2);
        assert_eq!(sessions[1].estimated_minutes, 2);
        assert_eq!(minutes(5, 4), 2);
        assert_eq!(minutes(6, 4), 3);
    }

    #[test]
    fn test_no_tasks_no_sessions() {
        assert!(group_sessions(&[]).is_empty());
    }
}
