//! Sequence catalog: the five fixed outreach tiers.
//!
//! A tier is an ordered list of timed steps keyed by which channels a vendor
//! can be reached on. Every tier ends with an `exhausted` marker.

use serde::{Deserialize, Serialize};
use vendorreach_core::types::{SequenceStep, StepChannel, StepKind};

use StepChannel::{Email, Exhausted, Instagram, WhatsApp};
use StepKind::{End, Followup, Initial};

const TIER_A: &[SequenceStep] = &[
    SequenceStep::new(0, Instagram, Initial),
    SequenceStep::new(3, WhatsApp, Initial),
    SequenceStep::new(5, Email, Initial),
    SequenceStep::new(8, Instagram, Followup),
    SequenceStep::new(11, WhatsApp, Followup),
    SequenceStep::new(14, Email, Followup),
    SequenceStep::new(17, Exhausted, End),
];

const TIER_B: &[SequenceStep] = &[
    SequenceStep::new(0, WhatsApp, Initial),
    SequenceStep::new(3, Email, Initial),
    SequenceStep::new(7, WhatsApp, Followup),
    SequenceStep::new(11, Email, Followup),
    SequenceStep::new(14, Exhausted, End),
];

const TIER_C: &[SequenceStep] = &[
    SequenceStep::new(0, Instagram, Initial),
    SequenceStep::new(5, Instagram, Followup),
    SequenceStep::new(12, Exhausted, End),
];

const TIER_D: &[SequenceStep] = &[
    SequenceStep::new(0, WhatsApp, Initial),
    SequenceStep::new(4, WhatsApp, Followup),
    SequenceStep::new(10, Exhausted, End),
];

const TIER_E: &[SequenceStep] = &[
    SequenceStep::new(0, Email, Initial),
    SequenceStep::new(5, Email, Followup),
    SequenceStep::new(12, Exhausted, End),
];

/// Outreach tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceTier {
    #[serde(rename = "tier_a")]
    A,
    #[serde(rename = "tier_b")]
    B,
    #[serde(rename = "tier_c")]
    C,
    #[serde(rename = "tier_d")]
    D,
    #[serde(rename = "tier_e")]
    E,
}

impl SequenceTier {
    pub const ALL: [SequenceTier; 5] = [Self::A, Self::B, Self::C, Self::D, Self::E];

    /// Stored key (`tier_a` … `tier_e`).
    pub fn key(&self) -> &'static str {
        match self {
            Self::A => "tier_a",
            Self::B => "tier_b",
            Self::C => "tier_c",
            Self::D => "tier_d",
            Self::E => "tier_e",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::A => "Tier A (IG+WA+Email)",
            Self::B => "Tier B (WA+Email)",
            Self::C => "Tier C (IG only)",
            Self::D => "Tier D (WA only)",
            Self::E => "Tier E (Email only)",
        }
    }

    pub fn steps(&self) -> &'static [SequenceStep] {
        match self {
            Self::A => TIER_A,
            Self::B => TIER_B,
            Self::C => TIER_C,
            Self::D => TIER_D,
            Self::E => TIER_E,
        }
    }

    /// Pick the tier for a vendor's capability flags.
    ///
    /// Two-channel combinations that include Instagram map to Tier A even though
    /// the vendor lacks one of its channels; the step walk filters the missing
    /// channel out. Pending product clarification, this mapping is kept as-is.
    pub fn classify(has_instagram: bool, has_phone: bool, has_email: bool) -> Self {
        match (has_instagram, has_phone, has_email) {
            (true, true, true) => Self::A,
            (false, true, true) => Self::B,
            (true, false, false) => Self::C,
            (false, true, false) => Self::D,
            (false, false, true) => Self::E,
            (true, true, false) | (true, false, true) => Self::A,
            (false, false, false) => Self::C,
        }
    }
}

/// Label for a stored tier key; unknown keys are custom sequences.
pub fn label_for_key(key: &str) -> &'static str {
    SequenceTier::from_key(key)
        .map(|t| t.label())
        .unwrap_or("Custom")
}
