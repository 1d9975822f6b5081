//! Task definitions: the planner's output unit.

use serde::{Deserialize, Serialize};
use vendorreach_core::Channel;

/// Whether a task opens a channel or chases an earlier message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Initial,
    Followup,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Initial => "initial",
            TaskKind::Followup => "followup",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One vendor/channel action proposed for today. Built fresh on every plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTask {
    pub vendor_id: String,
    pub vendor_name: String,
    pub category: String,
    pub city: String,
    /// Channel to contact the vendor on.
    pub channel: Channel,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub priority: i32,
    pub is_overdue: bool,
    pub days_overdue: i64,
    /// Handle, phone or address for `channel`.
    pub identifier: String,
    pub sequence_label: String,
    /// 1-based position in the sequence.
    pub step_number: usize,
    pub total_steps: usize,
    pub available_channels: Vec<Channel>,
}

impl DailyTask {
    /// Overdue follow-ups go into the urgent bucket.
    pub fn is_overdue_followup(&self) -> bool {
        self.is_overdue && self.kind == TaskKind::Followup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display_honors_width() {
        assert_eq!(format!("[{:<9}]", TaskKind::Initial), "[initial  ]");
        assert_eq!(format!("[{:>9}]", TaskKind::Followup), "[ followup]");
        assert_eq!(format!("[{:<10}]", Channel::Email), "[email     ]");
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TaskKind::Followup).unwrap(), "\"followup\"");
    }
}
