use crate::ServiceId;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::time::SystemTime;

use serde::Serialize;

/// Result of the most recent health probe for a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Never probed.
    #[default]
    Unknown,
    /// Health endpoint answered 2xx.
    Healthy,
    /// Health endpoint answered with a non-2xx status.
    Unhealthy,
    /// Platform reported no connectivity; no probe was sent.
    Offline,
    /// Transport failure or timeout while probing.
    Error,
}

impl Display for HealthStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        let label = match self {
            HealthStatus::Unknown => "unknown",
            HealthStatus::Healthy => "healthy",
            HealthStatus::Unhealthy => "unhealthy",
            HealthStatus::Offline => "offline",
            HealthStatus::Error => "error",
        };
        formatter.write_str(label)
    }
}

/// Latest known health of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceHealthRecord {
    pub service: ServiceId,
    pub status: HealthStatus,
    pub last_checked_at: SystemTime,
}

impl ServiceHealthRecord {
    /// Record a new status, never moving `last_checked_at` backwards.
    pub fn advanced(&self, status: HealthStatus, now: SystemTime) -> Self {
        Self {
            service: self.service,
            status,
            last_checked_at: now.max(self.last_checked_at),
        }
    }
}

/// Aggregate counts from a round of health probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HealthSummary {
    pub total: usize,
    pub healthy: usize,
    /// Answered with a non-2xx status, or skipped because offline.
    pub unhealthy: usize,
    /// Transport failure or timeout.
    pub errors: usize,
}

impl HealthSummary {
    pub fn tally(statuses: impl IntoIterator<Item = HealthStatus>) -> Self {
        statuses
            .into_iter()
            .fold(Self::default(), |mut summary, status| {
                summary.total += 1;
                match status {
                    HealthStatus::Healthy => summary.healthy += 1,
                    HealthStatus::Error => summary.errors += 1,
                    HealthStatus::Unhealthy | HealthStatus::Offline | HealthStatus::Unknown => {
                        summary.unhealthy += 1
                    }
                }
                summary
            })
    }

    pub fn all_healthy(&self) -> bool {
        self.total > 0 && self.healthy == self.total
    }
}
