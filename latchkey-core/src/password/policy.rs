//! Retry counting and lockout escalation

/// Outcome of recording a failed verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verdict {
    /// Below the limit; `failures` consecutive failures so far
    Retry { failures: u8 },
    /// Limit reached; the counter has been reset
    Lockout,
}

/// Consecutive failed verification counter
///
/// Shared by the open-door and change-password flows. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LockoutPolicy {
    failures: u8,
    limit: u8,
}

impl LockoutPolicy {
    /// Create a policy that locks out after `limit` consecutive failures
    ///
    /// A limit of zero is treated as one.
    pub fn new(limit: u8) -> Self {
        Self {
            failures: 0,
            limit: limit.max(1),
        }
    }

    /// Count a failed verification
    pub fn record_failure(&mut self) -> Verdict {
        self.failures = self.failures.saturating_add(1);
        if self.failures >= self.limit {
            self.failures = 0;
            Verdict::Lockout
        } else {
            Verdict::Retry {
                failures: self.failures,
            }
        }
    }

    /// Clear the counter after a success
    pub fn reset(&mut self) {
        self.failures = 0;
    }

    /// Consecutive failures so far
    pub fn failures(&self) -> u8 {
        self.failures
    }
}
