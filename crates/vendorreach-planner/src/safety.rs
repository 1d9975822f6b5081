//! Instagram safety ceilings.
//!
//! Instagram is the only channel with adaptive limits: the base table depends on
//! the account's age, and both limits are halved for a week after the account
//! last hit an action block.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use vendorreach_core::{Clock, SettingKey, Settings};

/// Days after an action block during which limits stay halved.
const BLOCK_COOLDOWN_DAYS: i64 = 7;

/// Instagram account age tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountAge {
    New,
    #[default]
    Warm,
    Aged,
}

impl AccountAge {
    /// Unknown values map to `Warm`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "new" => Self::New,
            "aged" => Self::Aged,
            "warm" => Self::Warm,
            other => {
                tracing::warn!("⚠️ Unknown account age '{other}', treating as warm");
                Self::Warm
            }
        }
    }

    pub fn base_limits(&self) -> BaseLimits {
        match self {
            Self::New => BaseLimits { daily: 15, weekly: 70, burst: 3, pause_secs: 300 },
            Self::Warm => BaseLimits { daily: 25, weekly: 140, burst: 5, pause_secs: 180 },
            Self::Aged => BaseLimits { daily: 40, weekly: 200, burst: 5, pause_secs: 120 },
        }
    }
}

/// Full limit table row. Burst and pause are informational; the planner only
/// enforces the daily and weekly ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseLimits {
    pub daily: u32,
    pub weekly: u32,
    pub burst: u32,
    pub pause_secs: u32,
}

/// Effective ceilings for today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyLimit {
    pub daily: u32,
    pub weekly: u32,
    /// Limits are halved because of a recent action block.
    pub cooling_down: bool,
}

/// Parse a stored block date: RFC 3339, a bare `YYYY-MM-DD` (UTC midnight),
/// or a naive `YYYY-MM-DDTHH:MM:SS` taken as UTC.
pub fn parse_block_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.and_utc())
}

/// Compute today's Instagram ceilings for an agent (or globally).
pub fn instagram_limit(settings: &Settings, agent: Option<&str>, clock: &Clock) -> SafetyLimit {
    let age = settings
        .resolve(SettingKey::InstaAccountAge, agent)
        .map(AccountAge::parse)
        .unwrap_or_default();
    let base = age.base_limits();

    let blocked_recently = match settings.lookup(SettingKey::InstaLastActionBlock, agent) {
        Some(raw) => match parse_block_date(raw) {
            Some(at) => clock.whole_days_since(at) < BLOCK_COOLDOWN_DAYS,
            None => {
                tracing::warn!("⚠️ Unparseable action block date '{raw}', ignoring");
                false
            }
        },
        None => false,
    };

    if blocked_recently {
        tracing::debug!("🧊 Instagram cooling down after action block: limits halved");
        SafetyLimit {
            daily: base.daily / 2,
            weekly: base.weekly / 2,
            cooling_down: true,
        }
    } else {
        SafetyLimit {
            daily: base.daily,
            weekly: base.weekly,
            cooling_down: false,
        }
    }
}
