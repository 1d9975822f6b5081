//! Per-channel budget: today's sends, weekly volume and the agent's share of
//! each channel's daily target.

use serde::{Deserialize, Serialize};
use vendorreach_core::{Channel, Clock, LogEntry, PerChannel, Settings, Vendor};

use crate::safety::{self, SafetyLimit};

/// Flat daily ceiling for the non-adaptive channels.
pub const FLAT_SAFE_LIMIT: u32 = 50;
pub const WHATSAPP_WEEKLY_CAP: u32 = 300;
pub const EMAIL_WEEKLY_CAP: u32 = 500;

/// Progress and headroom for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelProgress {
    pub done_today: u32,
    /// The agent's share of the channel's daily target.
    pub target: u32,
    pub safe_limit: u32,
    pub remaining: u32,
    pub weekly_done: u32,
    pub weekly_cap: u32,
    pub pct: u32,
    pub safe: bool,
}

/// Sends made today by the planning agent, plus replies received today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DoneToday {
    pub instagram: u32,
    pub whatsapp: u32,
    pub email: u32,
    pub total: u32,
    pub replies: u32,
}

/// Rounded percentage, 0 when the denominator is 0.
pub fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (f64::from(part) / f64::from(whole) * 100.0).round() as u32
}

fn count_per_channel<'a>(logs: impl Iterator<Item = &'a LogEntry>) -> PerChannel<u32> {
    let mut counts = PerChannel::<u32>::default();
    for log in logs {
        counts[log.channel] += 1;
    }
    counts
}

/// Budget state for one agent at plan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Budget {
    pub progress: PerChannel<ChannelProgress>,
    pub done_today: DoneToday,
    pub instagram_safety: SafetyLimit,
}

impl Budget {
    /// Compute budgets from the full log. Today's counts are limited to the
    /// agent's own (and unattributed) entries; weekly counts span every agent.
    pub fn compute(
        vendors: &[Vendor],
        logs: &[LogEntry],
        settings: &Settings,
        agent: Option<&str>,
        agent_count: usize,
        clock: &Clock,
    ) -> Self {
        let agent_count = agent_count.max(1) as u32;

        let mine_today = count_per_channel(logs.iter().filter(|l| {
            l.action.is_send()
                && clock.is_today(l.created_at)
                && match (agent, l.user_id.as_deref()) {
                    (Some(me), Some(who)) => me == who,
                    _ => true,
                }
        }));
        let weekly = count_per_channel(
            logs.iter()
                .filter(|l| l.action.is_send() && clock.is_this_week(l.created_at)),
        );

        let done_today = DoneToday {
            instagram: mine_today.instagram,
            whatsapp: mine_today.whatsapp,
            email: mine_today.email,
            total: mine_today.instagram + mine_today.whatsapp + mine_today.email,
            replies: vendors
                .iter()
                .filter(|v| v.responded_at.is_some_and(|t| clock.is_today(t)))
                .count() as u32,
        };

        let instagram_safety = safety::instagram_limit(settings, agent, clock);

        let progress = PerChannel::from_fn(|ch| {
            let done = mine_today[ch];
            let (effective, safe_limit, weekly_cap, safe) = match ch {
                Channel::Instagram => {
                    let target = settings.daily_target(ch, agent).min(instagram_safety.daily);
                    let weekly_left = instagram_safety.weekly.saturating_sub(weekly[ch]);
                    (
                        target.min(weekly_left),
                        instagram_safety.daily,
                        instagram_safety.weekly,
                        done < instagram_safety.daily,
                    )
                }
                Channel::WhatsApp => (settings.daily_target(ch, agent), FLAT_SAFE_LIMIT, WHATSAPP_WEEKLY_CAP, true),
                Channel::Email => (settings.daily_target(ch, agent), FLAT_SAFE_LIMIT, EMAIL_WEEKLY_CAP, true),
            };
            let target = effective.div_ceil(agent_count);
            ChannelProgress {
                done_today: done,
                target,
                safe_limit,
                remaining: target.saturating_sub(done),
                weekly_done: weekly[ch],
                weekly_cap,
                pct: percent(done, target),
                safe,
            }
        });

        Self {
            progress,
            done_today,
            instagram_safety,
        }
    }

    /// Remaining sends per channel for today.
    pub fn remaining(&self) -> PerChannel<u32> {
        self.progress.map(|_, p| p.remaining)
    }

    /// Shrink each target to what today's queue can actually reach.
    pub fn cap_to_achievable(&mut self, accepted: &PerChannel<u32>) {
        for ch in Channel::ALL {
            let p = &mut self.progress[ch];
            let achievable = p.done_today + accepted[ch];
            if achievable < p.target {
                p.target = achievable;
                p.remaining = accepted[ch];
                p.pct = if achievable > 0 { percent(p.done_today, achievable) } else { 100 };
            }
        }
    }

    /// Sum of all channel targets.
    pub fn total_target(&self) -> u32 {
        self.progress.iter().map(|(_, p)| p.target).sum()
    }
}
