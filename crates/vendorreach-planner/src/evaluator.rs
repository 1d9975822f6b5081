//! Sequence evaluator: one state machine for persisted and derived sequences.
//!
//! A vendor's position in its outreach drip is a `(steps, cursor, channels)`
//! triple. Vendors with a stored sequence carry an explicit cursor; vendors
//! without one get their tier's steps and a cursor derived from per-channel
//! status fields. Both go through [`SequenceState::next_step`].
//!
//! ```text
//! Sequence row ─► steps + Cursor::At ──────┐
//!                                          ├─► next_step() ─► DueStep ─► DailyTask
//! Vendor flags ─► tier steps + Derived ────┘
//! ```

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use vendorreach_core::{
    Channel, ChannelStatus, Clock, LogAction, LogEntry, PerChannel, Sequence, SequenceStep,
    StepKind, Vendor,
};

use crate::catalog::{self, SequenceTier};
use crate::priority::{self, PriorityFactors};
use crate::tasks::{DailyTask, TaskKind};

/// Priority penalty for an alternate-channel task standing in for a blocked step.
pub const FALLBACK_PENALTY: i32 = 5;

/// What the evaluator knows about one channel of one vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelState {
    pub available: bool,
    pub status: ChannelStatus,
    pub contacted_at: Option<DateTime<Utc>>,
    /// A skip was logged for this vendor/channel today.
    pub skipped_today: bool,
}

/// Per-channel state read off a vendor record plus today's skip log.
pub fn channel_states(vendor: &Vendor, skipped_today: &HashSet<(&str, Channel)>) -> PerChannel<ChannelState> {
    PerChannel::from_fn(|ch| ChannelState {
        available: vendor.has_channel(ch),
        status: vendor.channel_status(ch),
        contacted_at: vendor.contacted_at(ch),
        skipped_today: skipped_today.contains(&(vendor.id.as_str(), ch)),
    })
}

/// Where the vendor stands in its steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// Stored cursor and the instant the sequence started.
    At { index: usize, started_at: DateTime<Utc> },
    /// No stored sequence; position is inferred from channel statuses.
    Derived,
}

/// Per-plan inputs shared by every evaluation.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub clock: &'a Clock,
    /// Today's remaining per-channel budget for the planning agent.
    pub remaining: &'a PerChannel<u32>,
    /// Follow-up gap in days, used for derived sequences.
    pub followup_days: &'a PerChannel<i64>,
}

impl StepContext<'_> {
    fn has_budget(&self, ch: Channel) -> bool {
        self.remaining[ch] > 0
    }

    /// `Some((overdue, days_overdue))` when a step due on `due` is actionable today.
    fn due_status(&self, due: NaiveDate) -> Option<(bool, i64)> {
        let today = self.clock.today();
        if due > today {
            return None;
        }
        let days = (today - due).num_days();
        Some((days > 0, days))
    }
}

/// The step a vendor should be worked on today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueStep {
    pub channel: Channel,
    pub kind: TaskKind,
    pub overdue: bool,
    pub days_overdue: i64,
    /// 1-based.
    pub step_number: usize,
    pub total_steps: usize,
    /// Stands in for a due step whose channel is out of budget.
    pub fallback: bool,
}

/// The `(steps, cursor, channels)` triple for one vendor.
#[derive(Debug, Clone)]
pub struct SequenceState<'a> {
    pub label: &'static str,
    pub steps: &'a [SequenceStep],
    pub cursor: Cursor,
    pub channels: PerChannel<ChannelState>,
}

impl<'a> SequenceState<'a> {
    /// State for a vendor with a stored sequence.
    pub fn persisted(seq: &'a Sequence, channels: PerChannel<ChannelState>) -> Self {
        Self {
            label: catalog::label_for_key(&seq.sequence_type),
            steps: &seq.steps,
            cursor: Cursor::At {
                index: seq.current_step,
                started_at: seq.started_at,
            },
            channels,
        }
    }

    /// State simulated from the vendor's tier and channel statuses.
    pub fn derived(tier: SequenceTier, channels: PerChannel<ChannelState>) -> Self {
        Self {
            label: tier.label(),
            steps: tier.steps(),
            cursor: Cursor::Derived,
            channels,
        }
    }

    /// Next due or eligible step today, if any. At most one per vendor.
    pub fn next_step(&self, ctx: &StepContext<'_>) -> Option<DueStep> {
        match self.cursor {
            Cursor::At { index, started_at } => self.at_cursor(index, started_at, ctx),
            Cursor::Derived => self.walk(ctx),
        }
    }

    fn state(&self, ch: Channel) -> &ChannelState {
        &self.channels[ch]
    }

    fn at_cursor(&self, index: usize, started_at: DateTime<Utc>, ctx: &StepContext<'_>) -> Option<DueStep> {
        let step = self.steps.get(index)?;
        let ch = step.channel.channel()?;
        if step.is_terminal() || self.state(ch).skipped_today {
            return None;
        }
        let kind = task_kind(step.kind)?;
        // Can't follow up on a message that never went out.
        if kind == TaskKind::Followup && self.state(ch).status != ChannelStatus::Sent {
            return None;
        }

        let due = ctx.clock.local_date(shift_days(started_at, step.day)?);
        let (overdue, days_overdue) = ctx.due_status(due)?;
        let total_steps = self.steps.iter().filter(|s| !s.is_terminal()).count();

        if ctx.has_budget(ch) {
            return Some(DueStep {
                channel: ch,
                kind,
                overdue,
                days_overdue,
                step_number: index + 1,
                total_steps,
                fallback: false,
            });
        }

        // Out of budget: reach forward for an initial on another open channel.
        for (offset, alt) in self.steps.iter().enumerate().skip(index + 1) {
            if alt.is_terminal() {
                break;
            }
            if alt.kind != StepKind::Initial {
                continue;
            }
            let Some(alt_ch) = alt.channel.channel() else { break };
            let st = self.state(alt_ch);
            if ctx.has_budget(alt_ch) && st.available && st.status == ChannelStatus::Pending {
                return Some(DueStep {
                    channel: alt_ch,
                    kind: TaskKind::Initial,
                    overdue,
                    days_overdue,
                    step_number: offset + 1,
                    total_steps,
                    fallback: true,
                });
            }
        }
        None
    }

    fn walk(&self, ctx: &StepContext<'_>) -> Option<DueStep> {
        let is_active = |s: &SequenceStep| {
            !s.is_terminal() && s.channel.channel().is_some_and(|ch| self.state(ch).available)
        };
        let total_steps = self.steps.iter().filter(|s| is_active(s)).count();

        for (i, step) in self.steps.iter().enumerate() {
            let Some(ch) = step.channel.channel() else { break };
            if step.is_terminal() {
                break;
            }
            let st = self.state(ch);
            if !st.available || st.skipped_today {
                continue;
            }
            let step_number = self.steps[..i].iter().filter(|s| is_active(s)).count() + 1;

            match step.kind {
                StepKind::Initial => {
                    if !st.status.needs_initial() {
                        continue;
                    }
                    let earlier: Vec<(&SequenceStep, Channel)> = self.steps[..i]
                        .iter()
                        .filter(|s| s.kind == StepKind::Initial)
                        .filter_map(|s| s.channel.channel().map(|c| (s, c)))
                        .filter(|(_, c)| self.state(*c).available)
                        .collect();

                    // Earlier initials block unless done or out of budget today.
                    let unblocked = earlier
                        .iter()
                        .all(|(_, c)| !self.state(*c).status.needs_initial() || !ctx.has_budget(*c));
                    if !unblocked || !ctx.has_budget(ch) {
                        continue;
                    }

                    let last_done = earlier
                        .iter()
                        .rev()
                        .find(|(_, c)| !self.state(*c).status.needs_initial());
                    if let Some((prev, prev_ch)) = last_done {
                        if let Some(at) = self.state(*prev_ch).contacted_at {
                            let earliest = step
                                .day
                                .checked_sub(prev.day)
                                .and_then(|gap| shift_days(at, gap));
                            if earliest.is_none_or(|t| t > ctx.clock.now()) {
                                tracing::trace!("⏳ {ch} initial waiting on gap after {prev_ch}");
                                continue;
                            }
                        }
                    }

                    return Some(DueStep {
                        channel: ch,
                        kind: TaskKind::Initial,
                        overdue: false,
                        days_overdue: 0,
                        step_number,
                        total_steps,
                        fallback: false,
                    });
                }
                StepKind::Followup => {
                    let Some(contacted) = st.contacted_at else { continue };
                    if st.status != ChannelStatus::Sent {
                        continue;
                    }
                    let Some(due_at) = shift_days(contacted, ctx.followup_days[ch]) else {
                        continue;
                    };
                    if let Some((overdue, days_overdue)) = ctx.due_status(ctx.clock.local_date(due_at)) {
                        return Some(DueStep {
                            channel: ch,
                            kind: TaskKind::Followup,
                            overdue,
                            days_overdue,
                            step_number,
                            total_steps,
                            fallback: false,
                        });
                    }
                }
                StepKind::End => break,
            }
        }
        None
    }
}

/// `t` moved by `days`, or `None` when that leaves chrono's range.
fn shift_days(t: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(days).and_then(|d| t.checked_add_signed(d))
}

fn task_kind(kind: StepKind) -> Option<TaskKind> {
    match kind {
        StepKind::Initial => Some(TaskKind::Initial),
        StepKind::Followup => Some(TaskKind::Followup),
        StepKind::End => None,
    }
}

/// Vendor/channel pairs with a skip logged today, by any agent.
pub fn skipped_today<'a>(logs: &'a [LogEntry], clock: &Clock) -> HashSet<(&'a str, Channel)> {
    logs.iter()
        .filter(|l| l.action == LogAction::Skipped && clock.is_today(l.created_at))
        .map(|l| (l.vendor_id.as_str(), l.channel))
        .collect()
}

/// Walk every plannable vendor and emit at most one candidate task each, in
/// roster order.
pub fn generate_candidates(
    vendors: &[Vendor],
    sequences: &[Sequence],
    logs: &[LogEntry],
    ctx: &StepContext<'_>,
) -> Vec<DailyTask> {
    // Last active row wins when a vendor has several.
    let mut by_vendor: HashMap<&str, &Sequence> = HashMap::new();
    for seq in sequences.iter().filter(|s| s.is_active) {
        by_vendor.insert(seq.vendor_id.as_str(), seq);
    }
    let skipped = skipped_today(logs, ctx.clock);

    let mut tasks = Vec::new();
    let mut excluded = 0usize;
    for vendor in vendors {
        if vendor.overall_status.is_excluded() {
            excluded += 1;
            continue;
        }
        let channels = channel_states(vendor, &skipped);
        let state = match by_vendor.get(vendor.id.as_str()) {
            Some(seq) => SequenceState::persisted(seq, channels),
            None => SequenceState::derived(
                SequenceTier::classify(vendor.has_instagram, vendor.has_phone, vendor.has_email),
                channels,
            ),
        };
        if let Some(due) = state.next_step(ctx) {
            tasks.push(to_task(vendor, &state, &due, ctx.clock));
        }
    }

    tracing::debug!(
        "🔎 {} candidate tasks from {} vendors ({} excluded by status)",
        tasks.len(),
        vendors.len(),
        excluded
    );
    tasks
}

fn to_task(vendor: &Vendor, state: &SequenceState<'_>, due: &DueStep, clock: &Clock) -> DailyTask {
    let mut priority = priority::score(&PriorityFactors {
        kind: due.kind,
        overdue: due.overdue,
        days_overdue: due.days_overdue,
        category: &vendor.category,
        uploaded_days_ago: clock.whole_days_since(vendor.created_at),
        has_all_channels: vendor.has_all_channels(),
    });
    if due.fallback {
        priority -= FALLBACK_PENALTY;
    }

    DailyTask {
        vendor_id: vendor.id.clone(),
        vendor_name: vendor.display_name().to_string(),
        category: vendor.category.clone(),
        city: vendor.city.clone(),
        channel: due.channel,
        kind: due.kind,
        priority,
        is_overdue: due.overdue,
        days_overdue: due.days_overdue,
        identifier: vendor.identifier(due.channel),
        sequence_label: state.label.to_string(),
        step_number: due.step_number,
        total_steps: due.total_steps,
        available_channels: vendor.available_channels(),
    }
}
