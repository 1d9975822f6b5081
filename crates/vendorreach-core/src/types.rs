//! Data model: vendors, outreach log entries and persisted sequences.
//!
//! Field names follow the stored row layout so the same structs round-trip
//! through SQLite rows and JSON snapshots.

use std::ops::{Index, IndexMut};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ReachError;

/// `as_str` / `Display` / `FromStr` for the stored string form of an enum.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ReachError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant),)+
                    other => Err(ReachError::InvalidInput(format!(
                        "unknown {} '{other}'",
                        stringify!($name)
                    ))),
                }
            }
        }
    };
}

/// Outreach channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Social-media DM: the only rate-limited channel.
    Instagram,
    /// Messaging app, reached through the vendor's phone number.
    WhatsApp,
    Email,
}

str_enum!(Channel {
    Instagram => "instagram",
    WhatsApp => "whatsapp",
    Email => "email",
});

impl Channel {
    /// All channels in display order.
    pub const ALL: [Channel; 3] = [Channel::Instagram, Channel::WhatsApp, Channel::Email];

    /// Human label used in session names.
    pub fn label(&self) -> &'static str {
        match self {
            Channel::Instagram => "Instagram",
            Channel::WhatsApp => "WhatsApp",
            Channel::Email => "Email",
        }
    }
}

/// Per-channel outreach status on a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatus {
    #[default]
    Pending,
    Sent,
    FollowedUp,
    Skipped,
}

str_enum!(ChannelStatus {
    Pending => "pending",
    Sent => "sent",
    FollowedUp => "followed_up",
    Skipped => "skipped",
});

impl ChannelStatus {
    /// The initial message on this channel still has to go out.
    pub fn needs_initial(&self) -> bool {
        matches!(self, ChannelStatus::Pending | ChannelStatus::Skipped)
    }

    /// A message actually went out on this channel.
    pub fn is_contacted(&self) -> bool {
        matches!(self, ChannelStatus::Sent | ChannelStatus::FollowedUp)
    }
}

/// Overall vendor lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    #[default]
    Pending,
    InProgress,
    Interested,
    NotInterested,
    Declined,
    MaybeLater,
    Converted,
    Invalid,
}

str_enum!(OverallStatus {
    Pending => "pending",
    InProgress => "in_progress",
    Interested => "interested",
    NotInterested => "not_interested",
    Declined => "declined",
    MaybeLater => "maybe_later",
    Converted => "converted",
    Invalid => "invalid",
});

impl OverallStatus {
    /// Vendors in these states never appear in a plan.
    pub fn is_excluded(&self) -> bool {
        !matches!(self, OverallStatus::Pending | OverallStatus::InProgress)
    }
}

/// Action recorded in the outreach log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    Sent,
    FollowedUp,
    Skipped,
}

str_enum!(LogAction {
    Sent => "sent",
    FollowedUp => "followed_up",
    Skipped => "skipped",
});

impl LogAction {
    /// Counts against the daily/weekly send volume.
    pub fn is_send(&self) -> bool {
        matches!(self, LogAction::Sent | LogAction::FollowedUp)
    }
}

/// One value per channel. Serializes as `{instagram, whatsapp, email}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerChannel<T> {
    pub instagram: T,
    pub whatsapp: T,
    pub email: T,
}

impl<T> PerChannel<T> {
    pub fn from_fn(mut f: impl FnMut(Channel) -> T) -> Self {
        Self {
            instagram: f(Channel::Instagram),
            whatsapp: f(Channel::WhatsApp),
            email: f(Channel::Email),
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Channel, &T) -> U) -> PerChannel<U> {
        PerChannel::from_fn(|ch| f(ch, &self[ch]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, &T)> {
        Channel::ALL.into_iter().map(move |ch| (ch, &self[ch]))
    }
}

impl<T> Index<Channel> for PerChannel<T> {
    type Output = T;

    fn index(&self, ch: Channel) -> &T {
        match ch {
            Channel::Instagram => &self.instagram,
            Channel::WhatsApp => &self.whatsapp,
            Channel::Email => &self.email,
        }
    }
}

impl<T> IndexMut<Channel> for PerChannel<T> {
    fn index_mut(&mut self, ch: Channel) -> &mut T {
        match ch {
            Channel::Instagram => &mut self.instagram,
            Channel::WhatsApp => &mut self.whatsapp,
            Channel::Email => &mut self.email,
        }
    }
}

fn default_category() -> String {
    "uncategorized".into()
}

/// A vendor contact record.
///
/// Invariant kept by the outreach workflow: a channel's `*_contacted_at` is set
/// exactly when its status is `sent` or `followed_up`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    /// Instagram handle without the leading `@`.
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub has_instagram: bool,
    #[serde(default)]
    pub has_phone: bool,
    #[serde(default)]
    pub has_email: bool,
    #[serde(default)]
    pub insta_status: ChannelStatus,
    #[serde(default)]
    pub whatsapp_status: ChannelStatus,
    #[serde(default)]
    pub email_status: ChannelStatus,
    #[serde(default)]
    pub insta_contacted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub whatsapp_contacted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub email_contacted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub overall_status: OverallStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub responded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub responded_channel: Option<Channel>,
}

impl Vendor {
    /// A pending vendor with no channels and no outreach history.
    pub fn new(id: &str, full_name: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            full_name: Some(full_name.to_string()),
            username: None,
            phone: None,
            email: None,
            category: default_category(),
            city: String::new(),
            has_instagram: false,
            has_phone: false,
            has_email: false,
            insta_status: ChannelStatus::Pending,
            whatsapp_status: ChannelStatus::Pending,
            email_status: ChannelStatus::Pending,
            insta_contacted_at: None,
            whatsapp_contacted_at: None,
            email_contacted_at: None,
            overall_status: OverallStatus::Pending,
            created_at,
            updated_at: None,
            responded_at: None,
            responded_channel: None,
        }
    }

    pub fn has_channel(&self, ch: Channel) -> bool {
        match ch {
            Channel::Instagram => self.has_instagram,
            Channel::WhatsApp => self.has_phone,
            Channel::Email => self.has_email,
        }
    }

    pub fn channel_status(&self, ch: Channel) -> ChannelStatus {
        match ch {
            Channel::Instagram => self.insta_status,
            Channel::WhatsApp => self.whatsapp_status,
            Channel::Email => self.email_status,
        }
    }

    pub fn contacted_at(&self, ch: Channel) -> Option<DateTime<Utc>> {
        match ch {
            Channel::Instagram => self.insta_contacted_at,
            Channel::WhatsApp => self.whatsapp_contacted_at,
            Channel::Email => self.email_contacted_at,
        }
    }

    /// Set a channel's status and contacted-at together.
    pub fn set_channel_state(
        &mut self,
        ch: Channel,
        status: ChannelStatus,
        contacted_at: Option<DateTime<Utc>>,
    ) {
        let (slot_status, slot_at) = match ch {
            Channel::Instagram => (&mut self.insta_status, &mut self.insta_contacted_at),
            Channel::WhatsApp => (&mut self.whatsapp_status, &mut self.whatsapp_contacted_at),
            Channel::Email => (&mut self.email_status, &mut self.email_contacted_at),
        };
        *slot_status = status;
        *slot_at = contacted_at;
    }

    /// Channels this vendor can be reached on, in display order.
    pub fn available_channels(&self) -> Vec<Channel> {
        Channel::ALL
            .into_iter()
            .filter(|ch| self.has_channel(*ch))
            .collect()
    }

    pub fn has_all_channels(&self) -> bool {
        self.has_instagram && self.has_phone && self.has_email
    }

    /// Handle, phone or address for the given channel (empty when unknown).
    pub fn identifier(&self, ch: Channel) -> String {
        match ch {
            Channel::Instagram => self
                .username
                .as_deref()
                .filter(|u| !u.is_empty())
                .map(|u| format!("@{u}"))
                .unwrap_or_default(),
            Channel::WhatsApp => self.phone.clone().unwrap_or_default(),
            Channel::Email => self.email.clone().unwrap_or_default(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown")
    }
}

/// Immutable record of one outreach action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub vendor_id: String,
    pub channel: Channel,
    pub action: LogAction,
    pub created_at: DateTime<Utc>,
    /// Agent who performed the action (absent for legacy/shared entries).
    #[serde(default)]
    pub user_id: Option<String>,
}

impl LogEntry {
    pub fn new(
        id: &str,
        vendor_id: &str,
        channel: Channel,
        action: LogAction,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            vendor_id: vendor_id.to_string(),
            channel,
            action,
            created_at,
            user_id: None,
        }
    }

    /// Attribute this entry to an agent.
    pub fn by(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }
}

/// Target of a sequence step: a channel, or the terminal marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepChannel {
    Instagram,
    WhatsApp,
    Email,
    Exhausted,
}

impl StepChannel {
    /// The real channel, or `None` for the terminal marker.
    pub fn channel(self) -> Option<Channel> {
        match self {
            StepChannel::Instagram => Some(Channel::Instagram),
            StepChannel::WhatsApp => Some(Channel::WhatsApp),
            StepChannel::Email => Some(Channel::Email),
            StepChannel::Exhausted => None,
        }
    }
}

impl From<Channel> for StepChannel {
    fn from(ch: Channel) -> Self {
        match ch {
            Channel::Instagram => StepChannel::Instagram,
            Channel::WhatsApp => StepChannel::WhatsApp,
            Channel::Email => StepChannel::Email,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Initial,
    Followup,
    End,
}

/// One timed step of an outreach sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceStep {
    /// Day offset from the sequence start.
    pub day: i64,
    pub channel: StepChannel,
    #[serde(rename = "type")]
    pub kind: StepKind,
}

impl SequenceStep {
    pub const fn new(day: i64, channel: StepChannel, kind: StepKind) -> Self {
        Self { day, channel, kind }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == StepKind::End || self.channel == StepChannel::Exhausted
    }
}

/// A vendor's persisted sequence: tier, steps and cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub id: String,
    pub vendor_id: String,
    /// Tier key (`tier_a` … `tier_e`); unknown keys are shown as "Custom".
    pub sequence_type: String,
    pub steps: Vec<SequenceStep>,
    /// Index of the next step to perform.
    pub current_step: usize,
    pub started_at: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
