//! # VendorReach: daily outreach planner CLI
//!
//! Usage:
//!   vendorreach plan                          # Today's plan from the local DB
//!   vendorreach plan --agents 3 --index 1     # One agent's share of the roster
//!   vendorreach sent v42 instagram            # Record a send
//!   vendorreach export backup.json            # Dump the store as a snapshot

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vendorreach_core::{Channel, Clock, OverallStatus, ReachConfig};
use vendorreach_planner::{DailyPlan, PlanOptions, TaskKind, build_daily_plan};
use vendorreach_store::{ReachDb, read_snapshot, write_snapshot};

#[derive(Parser)]
#[command(
    name = "vendorreach",
    version,
    about = "📋 VendorReach — daily multi-channel outreach planner"
)]
struct Cli {
    /// Config file (default: ~/.vendorreach/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database path, overrides the config
    #[arg(long, global = true)]
    db: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build and print today's plan
    Plan {
        #[arg(long)]
        agent: Option<String>,
        /// Number of agents sharing the roster
        #[arg(long)]
        agents: Option<usize>,
        /// This agent's index, 0-based
        #[arg(long)]
        index: Option<usize>,
        /// Plan from a JSON snapshot instead of the database
        #[arg(long)]
        snapshot: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Create sequences for vendors that have none
    Enroll,
    /// Record a message sent
    Sent {
        vendor: String,
        channel: Channel,
        #[arg(long)]
        followup: bool,
        #[arg(long)]
        agent: Option<String>,
    },
    /// Skip a vendor on a channel
    Skip {
        vendor: String,
        channel: Channel,
        #[arg(long)]
        agent: Option<String>,
    },
    /// Undo a logged action
    Revert { log_id: String },
    /// Record a vendor's reply (interested, not_interested, maybe_later, ...)
    Respond {
        vendor: String,
        status: OverallStatus,
        #[arg(long)]
        channel: Option<Channel>,
    },
    UndoResponse { vendor: String },
    Reset { vendor: String },
    Invalid { vendor: String },
    Converted { vendor: String },
    /// Inspect or change settings
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Merge a JSON snapshot into the database
    Import { file: PathBuf },
    /// Write the database out as a JSON snapshot
    Export { file: PathBuf },
}

#[derive(Subcommand)]
enum SettingsCommand {
    List,
    Set { key: String, value: String },
}

fn expand_path(p: &str) -> String {
    shellexpand::tilde(p).to_string()
}

fn open_db(config: &ReachConfig, override_path: Option<&str>) -> Result<ReachDb> {
    let raw = override_path.unwrap_or(&config.store.db_path);
    let path = expand_path(raw);
    Ok(ReachDb::open(Path::new(&path))?)
}

fn print_plan(plan: &DailyPlan, clock: &Clock) {
    println!("📋 Plan for {}", clock.today());
    println!(
        "   {} tasks · ~{} min · {}% of today's target\n",
        plan.total_tasks, plan.total_estimated_minutes, plan.overall_pct
    );

    for ch in Channel::ALL {
        let p = &plan.progress[ch];
        let flag = if p.safe { "" } else { "  ⚠️ over safe limit" };
        println!(
            "   {:<10} {:>3}/{:<3} ({:>3}%)  left {:>3}  week {}/{}{flag}",
            ch.label(),
            p.done_today,
            p.target,
            p.pct,
            p.remaining,
            p.weekly_done,
            p.weekly_cap
        );
    }
    println!();

    for s in &plan.sessions {
        let urgent = if s.urgent { "🔥 " } else { "" };
        println!("{urgent}{} — {} tasks, ~{} min", s.label, s.tasks.len(), s.estimated_minutes);
        for t in &s.tasks {
            let overdue = if t.is_overdue {
                format!(" ({}d overdue)", t.days_overdue)
            } else {
                String::new()
            };
            println!(
                "   [{:>3}] {:<24} {:<9} {:<8} {} step {}/{}{overdue}",
                t.priority,
                t.vendor_name,
                t.channel.as_str(),
                t.kind,
                t.identifier,
                t.step_number,
                t.total_steps
            );
        }
        println!();
    }

    let y = &plan.yesterday;
    let w = &plan.this_week;
    println!("📈 Yesterday: {} sent, {} replies, {} signups", y.total, y.replies, y.signups);
    println!("📈 This week: {} sent, {} replies, {} signups", w.total, w.replies, w.signups);
    if !plan.hot_leads.is_empty() {
        println!("🔥 Hot leads:");
        for v in &plan.hot_leads {
            println!("   {} ({})", v.display_name(), v.category);
        }
    }
    let rec = &plan.time_recommendation;
    println!("🕐 Now: {} — {}", rec.label, rec.reason);
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "vendorreach=debug,vendorreach_planner=debug,vendorreach_store=debug"
    } else {
        "vendorreach=info,vendorreach_planner=info,vendorreach_store=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ReachConfig::load_from(path)?,
        None => ReachConfig::load()?,
    };
    let clock = Clock::system(config.utc_offset_minutes);
    let now = clock.now();
    let db_override = cli.db.as_deref();

    match cli.command {
        Command::Plan { agent, agents, index, snapshot, json } => {
            let inputs = match snapshot {
                Some(path) => read_snapshot(&path)?,
                None => open_db(&config, db_override)?.load_inputs()?,
            };
            let opts = PlanOptions {
                agent_id: agent.or_else(|| config.agent.id.clone()),
                total_agents: agents.unwrap_or(config.agent.total_agents),
                agent_index: index.unwrap_or(config.agent.index),
                hot_leads_limit: config.planner.hot_leads_limit,
            };
            let plan = build_daily_plan(&inputs, &opts, &clock);
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan(&plan, &clock);
            }
        }
        Command::Enroll => {
            let n = open_db(&config, db_override)?.enroll(now)?;
            println!("✅ Enrolled {n} vendors");
        }
        Command::Sent { vendor, channel, followup, agent } => {
            let kind = if followup { TaskKind::Followup } else { TaskKind::Initial };
            let agent = agent.or_else(|| config.agent.id.clone());
            let log = open_db(&config, db_override)?
                .mark_sent(&vendor, channel, kind, agent.as_deref(), now)?;
            println!("✅ {} {} on {} (log {})", vendor, log.action, channel, log.id);
        }
        Command::Skip { vendor, channel, agent } => {
            let agent = agent.or_else(|| config.agent.id.clone());
            let log = open_db(&config, db_override)?.mark_skipped(
                &vendor,
                channel,
                agent.as_deref(),
                config.planner.skip_policy,
                now,
            )?;
            println!("⏭️ {vendor} skipped on {channel} (log {})", log.id);
        }
        Command::Revert { log_id } => {
            let v = open_db(&config, db_override)?.revert(&log_id, now)?;
            println!("↩️ Reverted {log_id}; {} is {}", v.id, v.overall_status);
        }
        Command::Respond { vendor, status, channel } => {
            open_db(&config, db_override)?.record_response(&vendor, status, channel, now)?;
            println!("💬 {vendor} → {status}");
        }
        Command::UndoResponse { vendor } => {
            open_db(&config, db_override)?.undo_response(&vendor, now)?;
            println!("↩️ {vendor} back in progress");
        }
        Command::Reset { vendor } => {
            open_db(&config, db_override)?.reset_vendor(&vendor, now)?;
            println!("🔄 {vendor} reset");
        }
        Command::Invalid { vendor } => {
            open_db(&config, db_override)?.mark_invalid(&vendor, now)?;
            println!("🚫 {vendor} marked invalid");
        }
        Command::Converted { vendor } => {
            open_db(&config, db_override)?.mark_converted(&vendor, now)?;
            println!("🎉 {vendor} converted");
        }
        Command::Settings(SettingsCommand::List) => {
            let settings = open_db(&config, db_override)?.settings()?;
            if settings.is_empty() {
                println!("No settings stored; compiled defaults apply.");
            }
            for (key, value) in settings.iter() {
                println!("{key} = {value}");
            }
        }
        Command::Settings(SettingsCommand::Set { key, value }) => {
            open_db(&config, db_override)?.set_setting(&key, &value)?;
            println!("✅ {key} = {value}");
        }
        Command::Import { file } => {
            let inputs = read_snapshot(&file)?;
            let s = open_db(&config, db_override)?.import_snapshot(&inputs)?;
            println!(
                "📥 {} vendors, {} sequences, {} logs, {} settings",
                s.vendors, s.sequences, s.logs, s.settings
            );
        }
        Command::Export { file } => {
            let inputs = open_db(&config, db_override)?.export_snapshot()?;
            write_snapshot(&file, &inputs)?;
            println!("📤 Wrote {} vendors to {}", inputs.vendors.len(), file.display());
        }
    }

    Ok(())
}
