//! Leave-balance reconciliation applied when a leave request is approved.
//!
//! The ledger carries no "already deducted" marker. A debit is only planned
//! for a request leaving `Pending`, and the store applies it in the same unit
//! as the status change, so a request can never be debited twice.

use chrono::NaiveDate;

use crate::{
    models::{request::Request, user::LeaveBalance},
    types::UserId,
};

/// The balance counter a leave tag draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveBucket {
    Annual,
    Sick,
    Personal,
    Emergency,
}

impl LeaveBucket {
    /// Maps a free-form leave tag onto a bucket. Matching ignores case and
    /// anything unrecognised draws from the annual bucket.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "sick" => LeaveBucket::Sick,
            "personal" => LeaveBucket::Personal,
            "emergency" => LeaveBucket::Emergency,
            _ => LeaveBucket::Annual,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveBucket::Annual => "annual",
            LeaveBucket::Sick => "sick",
            LeaveBucket::Personal => "personal",
            LeaveBucket::Emergency => "emergency",
        }
    }
}

/// A pending deduction against a user's balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerDebit {
    pub user_id: UserId,
    pub bucket: LeaveBucket,
    pub days: i32,
}

impl LedgerDebit {
    /// Debit owed when `request` is approved, if any.
    pub fn for_approval(request: &Request) -> Option<Self> {
        let leave = request.kind.leave()?;
        if !leave.deduct || leave.days <= 0 {
            return None;
        }
        Some(Self {
            user_id: request.user_id.clone(),
            bucket: LeaveBucket::from_tag(&leave.leave_type),
            days: leave.days,
        })
    }
}

impl LeaveBalance {
    pub fn get(&self, bucket: LeaveBucket) -> i32 {
        match bucket {
            LeaveBucket::Annual => self.annual,
            LeaveBucket::Sick => self.sick,
            LeaveBucket::Personal => self.personal,
            LeaveBucket::Emergency => self.emergency,
        }
    }

    /// Subtracts `days` from one counter, flooring at zero. Overdrawing is
    /// not an error.
    pub fn debit(&mut self, bucket: LeaveBucket, days: i32) {
        let counter = match bucket {
            LeaveBucket::Annual => &mut self.annual,
            LeaveBucket::Sick => &mut self.sick,
            LeaveBucket::Personal => &mut self.personal,
            LeaveBucket::Emergency => &mut self.emergency,
        };
        *counter = counter.saturating_sub(days.max(0)).max(0);
    }

    /// Clamps every counter to be non-negative.
    pub fn normalized(self) -> Self {
        Self {
            annual: self.annual.max(0),
            sick: self.sick.max(0),
            personal: self.personal.max(0),
            emergency: self.emergency.max(0),
        }
    }
}

/// Applies `debit` to `balance` and returns the full set of counters to
/// persist.
pub fn apply_debit(balance: LeaveBalance, debit: &LedgerDebit) -> LeaveBalance {
    let mut next = balance.normalized();
    next.debit(debit.bucket, debit.days);
    next
}

/// Calendar days from `start` to `end`, both included. `None` when the range
/// is reversed.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> Option<i32> {
    if end < start {
        return None;
    }
    i32::try_from((end - start).num_days() + 1).ok()
}
