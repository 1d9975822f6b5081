//! Settings: flat key/value configuration with per-agent overrides.
//!
//! Values live in the settings store as strings. A key may be prefixed with an
//! agent id (`"{agent}:{key}"`) to override the global value for that agent.
//! Resolution order: agent-scoped key → global key → compiled default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Channel, PerChannel};

/// Settings the planner reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    InstagramDailyTarget,
    WhatsappDailyTarget,
    EmailDailyTarget,
    DaysInstaFollowup,
    DaysWaFollowup,
    DaysEmailFollowup,
    InstaAccountAge,
    InstaLastActionBlock,
}

impl SettingKey {
    pub fn key(&self) -> &'static str {
        match self {
            Self::InstagramDailyTarget => "instagram_daily_target",
            Self::WhatsappDailyTarget => "whatsapp_daily_target",
            Self::EmailDailyTarget => "email_daily_target",
            Self::DaysInstaFollowup => "days_insta_followup",
            Self::DaysWaFollowup => "days_wa_followup",
            Self::DaysEmailFollowup => "days_email_followup",
            Self::InstaAccountAge => "insta_account_age",
            Self::InstaLastActionBlock => "insta_last_action_block",
        }
    }

    pub fn default_value(&self) -> Option<&'static str> {
        match self {
            Self::InstagramDailyTarget => Some("30"),
            Self::WhatsappDailyTarget => Some("20"),
            Self::EmailDailyTarget => Some("15"),
            Self::DaysInstaFollowup => Some("5"),
            Self::DaysWaFollowup => Some("3"),
            Self::DaysEmailFollowup => Some("4"),
            Self::InstaAccountAge => Some("warm"),
            Self::InstaLastActionBlock => None,
        }
    }

    pub fn daily_target(ch: Channel) -> Self {
        match ch {
            Channel::Instagram => Self::InstagramDailyTarget,
            Channel::WhatsApp => Self::WhatsappDailyTarget,
            Channel::Email => Self::EmailDailyTarget,
        }
    }

    pub fn followup_days(ch: Channel) -> Self {
        match ch {
            Channel::Instagram => Self::DaysInstaFollowup,
            Channel::WhatsApp => Self::DaysWaFollowup,
            Channel::Email => Self::DaysEmailFollowup,
        }
    }
}

/// The settings map handed to the planner. Passed explicitly, never global.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// Builder form of [`Settings::insert`].
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stored value for `key`: agent-scoped first, then global. No default.
    pub fn lookup(&self, key: SettingKey, agent: Option<&str>) -> Option<&str> {
        agent
            .and_then(|a| self.get(&format!("{a}:{}", key.key())))
            .or_else(|| self.get(key.key()))
    }

    /// Stored value, falling back to the compiled default.
    pub fn resolve(&self, key: SettingKey, agent: Option<&str>) -> Option<&str> {
        self.lookup(key, agent).or_else(|| key.default_value())
    }

    /// Numeric setting; unparseable values fall back to the default.
    pub fn resolve_number(&self, key: SettingKey, agent: Option<&str>) -> i64 {
        let fallback = key
            .default_value()
            .and_then(|d| d.parse().ok())
            .unwrap_or(0);
        match self.lookup(key, agent) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("⚠️ Setting '{}' has non-numeric value '{raw}', using {fallback}", key.key());
                fallback
            }),
            None => fallback,
        }
    }

    /// Global daily target for a channel (before safety caps and agent split).
    pub fn daily_target(&self, ch: Channel, agent: Option<&str>) -> u32 {
        self.resolve_number(SettingKey::daily_target(ch), agent).max(0) as u32
    }

    /// Follow-up gap in days per channel.
    pub fn followup_days(&self, agent: Option<&str>) -> PerChannel<i64> {
        PerChannel::from_fn(|ch| self.resolve_number(SettingKey::followup_days(ch), agent))
    }
}

impl FromIterator<(String, String)> for Settings {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
