//! Agent partitioning and budget allocation.
//!
//! Each vendor id hashes to exactly one agent, so agents working the same
//! roster never receive the same vendor and never need to coordinate.

use vendorreach_core::PerChannel;

use crate::tasks::DailyTask;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a over the id's UTF-8 bytes.
pub fn fnv1a(id: &str) -> u32 {
    id.bytes()
        .fold(FNV_OFFSET_BASIS, |h, b| (h ^ u32::from(b)).wrapping_mul(FNV_PRIME))
}

/// Agent index that owns a vendor.
pub fn shard_for(vendor_id: &str, agent_count: usize) -> usize {
    let count = agent_count.max(1);
    fnv1a(vendor_id) as usize % count
}

/// Which slice of the roster the planning agent works.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub agent_count: usize,
    pub index: usize,
}

impl Partition {
    pub fn new(agent_count: usize, index: usize) -> Self {
        Self {
            agent_count: agent_count.max(1),
            index,
        }
    }

    pub fn owns(&self, vendor_id: &str) -> bool {
        if self.agent_count == 1 {
            return self.index == 0;
        }
        shard_for(vendor_id, self.agent_count) == self.index
    }
}

/// Sort candidates by priority (stable, highest first), keep this agent's
/// share and accept tasks while their channel still has budget.
pub fn allocate(
    mut candidates: Vec<DailyTask>,
    partition: Partition,
    remaining: &PerChannel<u32>,
) -> Vec<DailyTask> {
    if partition.index >= partition.agent_count {
        tracing::warn!(
            "⚠️ Agent index {} out of range for {} agents, nothing to plan",
            partition.index,
            partition.agent_count
        );
        return Vec::new();
    }

    candidates.sort_by(|a, b| b.priority.cmp(&a.priority));

    let mut budget = *remaining;
    let mut accepted = Vec::new();
    for task in candidates {
        if !partition.owns(&task.vendor_id) {
            continue;
        }
        if budget[task.channel] > 0 {
            budget[task.channel] -= 1;
            accepted.push(task);
        }
    }
    accepted
}

/// Accepted task count per channel.
pub fn count_by_channel(tasks: &[DailyTask]) -> PerChannel<u32> {
    let mut counts = PerChannel::<u32>::default();
    for t in tasks {
        counts[t.channel] += 1;
    }
    counts
}
