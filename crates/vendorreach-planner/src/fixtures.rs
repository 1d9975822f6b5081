//! Shared builders for planner tests.

use chrono::{DateTime, TimeZone, Utc};
use vendorreach_core::{Sequence, Vendor};

use crate::catalog::SequenceTier;

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn vendor(id: &str, ig: bool, wa: bool, email: bool, created_at: DateTime<Utc>) -> Vendor {
    let mut v = Vendor::new(id, &format!("Vendor {id}"), created_at);
    v.has_instagram = ig;
    v.has_phone = wa;
    v.has_email = email;
    if ig {
        v.username = Some(format!("{id}.studio"));
    }
    if wa {
        v.phone = Some("+910000000000".into());
    }
    if email {
        v.email = Some(format!("{id}@example.com"));
    }
    v
}

pub fn sequence_for(v: &Vendor, tier: SequenceTier, started_at: DateTime<Utc>) -> Sequence {
    Sequence {
        id: format!("seq-{}", v.id),
        vendor_id: v.id.clone(),
        sequence_type: tier.key().to_string(),
        steps: tier.steps().to_vec(),
        current_step: 0,
        started_at,
        is_active: true,
    }
}
