//! Priority scoring for candidate tasks. Higher runs first.

use crate::tasks::TaskKind;

/// Conversion bonus per vendor category.
pub fn category_bonus(category: &str) -> i32 {
    match category {
        "photographer" => 15,
        "mua" => 12,
        "decorator" => 10,
        "caterer" => 8,
        "venue" => 6,
        "dj" => 5,
        _ => 0,
    }
}

/// Bonus for freshly uploaded vendors.
fn recency_bonus(uploaded_days_ago: i64) -> i32 {
    match uploaded_days_ago {
        d if d <= 2 => 30,
        d if d <= 7 => 15,
        d if d <= 14 => 5,
        _ => 0,
    }
}

/// Inputs to [`score`].
#[derive(Debug, Clone, Copy)]
pub struct PriorityFactors<'a> {
    pub kind: TaskKind,
    pub overdue: bool,
    pub days_overdue: i64,
    pub category: &'a str,
    pub uploaded_days_ago: i64,
    pub has_all_channels: bool,
}

/// Additive score: overdue/kind base + category + recency + channel breadth.
pub fn score(f: &PriorityFactors<'_>) -> i32 {
    let lateness = (f.days_overdue.max(0) * 5).min(50) as i32;
    let base = match (f.overdue, f.kind) {
        (true, TaskKind::Followup) => 100 + lateness,
        (true, TaskKind::Initial) => 90 + lateness,
        (false, TaskKind::Followup) => 80,
        (false, TaskKind::Initial) => 0,
    };
    let breadth = if f.has_all_channels { 10 } else { 0 };
    base + category_bonus(f.category) + recency_bonus(f.uploaded_days_ago) + breadth
}
