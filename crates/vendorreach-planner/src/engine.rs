//! Planning engine: turns the roster, history and settings into today's plan.
//!
//! Pure and synchronous: identical inputs and the same [`Clock`] always yield
//! the same plan.

use serde::{Deserialize, Serialize};
use vendorreach_core::{Clock, LogEntry, PerChannel, Sequence, Settings, Vendor};

use crate::budget::{self, Budget, ChannelProgress, DoneToday};
use crate::evaluator::{self, StepContext};
use crate::partition::{self, Partition};
use crate::performance::{self, PerformanceSnapshot, TimeRecommendation};
use crate::sessions::{self, Session};
use crate::tasks::DailyTask;

/// Everything the engine reads. Also the JSON snapshot layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanInputs {
    #[serde(default)]
    pub vendors: Vec<Vendor>,
    #[serde(default)]
    pub sequences: Vec<Sequence>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub settings: Settings,
}

/// Who is planning and how the roster is split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    /// Planning agent; scopes settings lookups and today's counts.
    pub agent_id: Option<String>,
    pub total_agents: usize,
    pub agent_index: usize,
    pub hot_leads_limit: usize,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            agent_id: None,
            total_agents: 1,
            agent_index: 0,
            hot_leads_limit: 5,
        }
    }
}

impl PlanOptions {
    pub fn for_agent(agent_id: &str, total_agents: usize, agent_index: usize) -> Self {
        Self {
            agent_id: Some(agent_id.to_string()),
            total_agents,
            agent_index,
            ..Self::default()
        }
    }
}

/// Today's plan for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub sessions: Vec<Session>,
    pub planned_tasks: Vec<DailyTask>,
    pub progress: PerChannel<ChannelProgress>,
    pub done_today: DoneToday,
    pub yesterday: PerformanceSnapshot,
    pub this_week: PerformanceSnapshot,
    pub hot_leads: Vec<Vendor>,
    pub time_recommendation: TimeRecommendation,
    pub total_tasks: usize,
    pub total_estimated_minutes: u32,
    pub overall_pct: u32,
}

/// Build the plan. Never fails: bad data degrades to fewer tasks.
pub fn build_daily_plan(inputs: &PlanInputs, opts: &PlanOptions, clock: &Clock) -> DailyPlan {
    let agent = opts.agent_id.as_deref();
    let agent_count = opts.total_agents.max(1);

    let mut budget = Budget::compute(&inputs.vendors, &inputs.logs, &inputs.settings, agent, agent_count, clock);
    let remaining = budget.remaining();
    let followup_days = inputs.settings.followup_days(agent);

    let ctx = StepContext {
        clock,
        remaining: &remaining,
        followup_days: &followup_days,
    };
    let candidates = evaluator::generate_candidates(&inputs.vendors, &inputs.sequences, &inputs.logs, &ctx);
    let candidate_count = candidates.len();

    let planned_tasks = partition::allocate(
        candidates,
        Partition::new(agent_count, opts.agent_index),
        &remaining,
    );
    budget.cap_to_achievable(&partition::count_by_channel(&planned_tasks));

    let sessions = sessions::group_sessions(&planned_tasks);
    let total_estimated_minutes = sessions.iter().map(|s| s.estimated_minutes).sum();
    let overall_pct = budget::percent(budget.done_today.total, budget.total_target());

    tracing::info!(
        "📋 Plan for {}: {} of {} candidates, {} sessions, ~{} min",
        agent.unwrap_or("everyone"),
        planned_tasks.len(),
        candidate_count,
        sessions.len(),
        total_estimated_minutes
    );

    DailyPlan {
        total_tasks: planned_tasks.len(),
        sessions,
        planned_tasks,
        progress: budget.progress,
        done_today: budget.done_today,
        yesterday: PerformanceSnapshot::yesterday(&inputs.logs, &inputs.vendors, clock),
        this_week: PerformanceSnapshot::this_week(&inputs.logs, &inputs.vendors, clock),
        hot_leads: performance::hot_leads(&inputs.vendors, opts.hot_leads_limit),
        time_recommendation: performance::recommend_for_hour(clock.local_hour()),
        total_estimated_minutes,
        overall_pct,
    }
}
