//! Planning clock: one captured instant plus the operator's UTC offset.
//!
//! Every "today", "yesterday", "this week" and "overdue" comparison made while
//! building a plan goes through the same `Clock`, so a plan never straddles a
//! midnight rollover.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Timelike, Utc};

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl Clock {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Clock with local time equal to UTC.
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, Utc.fix())
    }

    /// Clock for an offset given in minutes east of UTC (out-of-range → UTC).
    pub fn with_offset_minutes(now: DateTime<Utc>, minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(minutes.saturating_mul(60)).unwrap_or_else(|| {
            tracing::warn!("⚠️ UTC offset {minutes}min out of range, using UTC");
            Utc.fix()
        });
        Self::new(now, offset)
    }

    /// Sample the wall clock once.
    pub fn system(offset_minutes: i32) -> Self {
        Self::with_offset_minutes(Utc::now(), offset_minutes)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Local calendar date of an instant.
    pub fn local_date(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(self.now)
    }

    pub fn yesterday(&self) -> NaiveDate {
        self.today() - Duration::days(1)
    }

    /// Monday of the current local week.
    pub fn week_start(&self) -> NaiveDate {
        let today = self.today();
        today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
    }

    pub fn is_today(&self, ts: DateTime<Utc>) -> bool {
        self.local_date(ts) == self.today()
    }

    pub fn is_yesterday(&self, ts: DateTime<Utc>) -> bool {
        self.local_date(ts) == self.yesterday()
    }

    /// Between local Monday 00:00 and now, inclusive.
    pub fn is_this_week(&self, ts: DateTime<Utc>) -> bool {
        let local = ts.with_timezone(&self.offset).naive_local();
        local >= self.week_start().and_time(NaiveTime::MIN) && ts <= self.now
    }

    /// Whole days elapsed since `ts`, floored (negative for future instants).
    pub fn whole_days_since(&self, ts: DateTime<Utc>) -> i64 {
        (self.now - ts).num_milliseconds().div_euclid(MILLIS_PER_DAY)
    }

    /// Local hour of day, 0–23.
    pub fn local_hour(&self) -> u32 {
        self.now.with_timezone(&self.offset).hour()
    }
}
