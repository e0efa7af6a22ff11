use crate::firmware::types::{JoinAttemptResult, JoinOutcome, LinkStatus, NetworkCandidate};

/// Progress hooks of [`super::join`]. All methods default to no-ops.
pub trait JoinObserver {
    fn candidate_registered(&mut self, _candidate: &NetworkCandidate<'_>) {}

    fn polled(&mut self, _poll: u32, _status: LinkStatus, _elapsed_ms: u64) {}

    fn finished(&mut self, _result: &JoinAttemptResult) {}
}

impl JoinObserver for () {}

/// Console narration of a join attempt.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogJoinObserver;

impl LogJoinObserver {
    /// Level of registration and per-poll progress lines.
    pub const PROGRESS_LEVEL: log::Level = log::Level::Info;
}

impl JoinObserver for LogJoinObserver {
    fn candidate_registered(&mut self, candidate: &NetworkCandidate<'_>) {
        log::log!(
            Self::PROGRESS_LEVEL,
            "wifi: registered AP[{}] '{}'{}",
            candidate.ordinal(),
            candidate.ssid,
            if candidate.is_open() { " (open)" } else { "" }
        );
    }

    fn polled(&mut self, poll: u32, status: LinkStatus, elapsed_ms: u64) {
        log::log!(
            Self::PROGRESS_LEVEL,
            "wifi: poll={} status={} elapsed={}ms",
            poll,
            status.code(),
            elapsed_ms
        );
    }

    fn finished(&mut self, result: &JoinAttemptResult) {
        match &result.outcome {
            JoinOutcome::Joined(network) => match network.rssi_dbm {
                Some(rssi) => log::info!(
                    "WiFi connected to '{}', IP={} RSSI={} dBm",
                    network.ssid,
                    network.address,
                    rssi
                ),
                None => log::info!(
                    "WiFi connected to '{}', IP={}",
                    network.ssid,
                    network.address
                ),
            },
            JoinOutcome::TimedOut { last_status } => log::warn!(
                "WiFi not connected yet (status={}) after {}ms",
                last_status.code(),
                result.elapsed_ms
            ),
        }
    }
}
