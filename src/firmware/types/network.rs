use core::net::Ipv4Addr;

use heapless::String;

pub const NETWORK_SSID_MAX: usize = 32;
pub const NETWORK_PASSWORD_MAX: usize = 64;
pub const NETWORK_CANDIDATES_MAX: usize = 3;
pub const TCP_PORT_DEFAULT: u16 = 5000;
pub const JOIN_DEADLINE_DEFAULT_MS: u32 = 20_000;
pub const JOIN_POLL_INTERVAL_DEFAULT_MS: u32 = 250;

/// One access point eligible for joining. `priority` is the position in the
/// build-time list; lower is registered first.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NetworkCandidate<'a> {
    pub priority: u8,
    pub ssid: &'a str,
    pub password: &'a str,
}

impl NetworkCandidate<'_> {
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }

    /// One-based position shown on the console as `AP[n]`.
    pub fn ordinal(&self) -> u16 {
        u16::from(self.priority) + 1
    }
}

/// Station status as reported by the network stack. Numeric codes follow the
/// classic `wl_status_t` values printed on the console.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LinkStatus {
    Idle,
    NoSsidAvailable,
    ScanCompleted,
    Connected,
    ConnectFailed,
    ConnectionLost,
    Disconnected,
}

impl LinkStatus {
    pub const fn code(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::NoSsidAvailable => 1,
            Self::ScanCompleted => 2,
            Self::Connected => 3,
            Self::ConnectFailed => 4,
            Self::ConnectionLost => 5,
            Self::Disconnected => 6,
        }
    }

    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct JoinedNetwork {
    pub ssid: String<NETWORK_SSID_MAX>,
    pub address: Ipv4Addr,
    pub rssi_dbm: Option<i8>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum JoinOutcome {
    Joined(JoinedNetwork),
    TimedOut { last_status: LinkStatus },
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct JoinAttemptResult {
    pub outcome: JoinOutcome,
    pub elapsed_ms: u64,
    pub polls: u32,
}

impl JoinAttemptResult {
    pub fn is_joined(&self) -> bool {
        matches!(self.outcome, JoinOutcome::Joined(_))
    }

    pub fn joined(&self) -> Option<&JoinedNetwork> {
        match &self.outcome {
            JoinOutcome::Joined(network) => Some(network),
            JoinOutcome::TimedOut { .. } => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct JoinPolicy {
    pub deadline_ms: u32,
    pub poll_interval_ms: u32,
}

impl JoinPolicy {
    pub const fn defaults() -> Self {
        Self {
            deadline_ms: JOIN_DEADLINE_DEFAULT_MS,
            poll_interval_ms: JOIN_POLL_INTERVAL_DEFAULT_MS,
        }
    }

    pub const fn is_valid(self) -> bool {
        self.poll_interval_ms > 0 && self.poll_interval_ms <= self.deadline_ms
    }

    /// Upper bound on polls before the deadline: `ceil(deadline / interval)`.
    pub const fn max_polls(self) -> u32 {
        if self.poll_interval_ms == 0 {
            return 0;
        }
        self.deadline_ms.div_ceil(self.poll_interval_ms)
    }
}

impl Default for JoinPolicy {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_boot_wait() {
        let policy = JoinPolicy::default();
        assert_eq!(policy.deadline_ms, 20_000);
        assert_eq!(policy.poll_interval_ms, 250);
        assert!(policy.is_valid());
        assert_eq!(policy.max_polls(), 80);
    }

    #[test]
    fn policy_rejects_zero_or_oversized_interval() {
        let zero = JoinPolicy {
            deadline_ms: 1_000,
            poll_interval_ms: 0,
        };
        let oversized = JoinPolicy {
            deadline_ms: 1_000,
            poll_interval_ms: 1_001,
        };
        assert!(!zero.is_valid());
        assert!(!oversized.is_valid());
        assert_eq!(zero.max_polls(), 0);
    }

    #[test]
    fn max_polls_rounds_up() {
        let policy = JoinPolicy {
            deadline_ms: 1_000,
            poll_interval_ms: 300,
        };
        assert_eq!(policy.max_polls(), 4);
    }

    #[test]
    fn ordinal_covers_every_priority() {
        let first = NetworkCandidate {
            priority: 0,
            ssid: "AP1",
            password: "",
        };
        let last = NetworkCandidate {
            priority: u8::MAX,
            ..first
        };
        assert_eq!(first.ordinal(), 1);
        assert_eq!(last.ordinal(), 256);
    }

    #[test]
    fn status_codes_follow_console_values() {
        assert_eq!(LinkStatus::Idle.code(), 0);
        assert_eq!(LinkStatus::Connected.code(), 3);
        assert_eq!(LinkStatus::Disconnected.code(), 6);
        assert!(LinkStatus::Connected.is_connected());
        assert!(!LinkStatus::ConnectFailed.is_connected());
    }
}
