//! Candidate cycling for station drivers that connect in the background.
//!
//! One association attempt stays in flight across status polls. The next
//! candidate is configured only after the driver gave up on the current one
//! (or the attempt ran past its budget) and has been told to disconnect.

use crate::firmware::types::LinkStatus;

/// What the driver reports about the current association.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DriverLink {
    Associated,
    Associating,
    Failed,
}

/// Work the driver owes after a poll.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StationAction {
    /// Configure candidate `index` and start connecting to it.
    Connect(usize),
    Wait,
    Connected,
    /// Disconnect; the attempt failed or overran its budget.
    GiveUp(usize),
    /// Disconnect; an established association dropped.
    Lost(usize),
    NoCandidates,
}

impl StationAction {
    pub const fn status(self) -> LinkStatus {
        match self {
            Self::Connect(_) | Self::Wait => LinkStatus::Disconnected,
            Self::Connected => LinkStatus::Connected,
            Self::GiveUp(_) => LinkStatus::ConnectFailed,
            Self::Lost(_) => LinkStatus::ConnectionLost,
            Self::NoCandidates => LinkStatus::NoSsidAvailable,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Attempt {
    Idle,
    Associating { index: usize, since_ms: u64 },
    Associated(usize),
}

#[derive(Clone, Copy, Debug)]
pub struct StationCycle {
    candidates: usize,
    next: usize,
    attempt: Attempt,
    budget_ms: u64,
}

impl StationCycle {
    pub const fn new(budget_ms: u64) -> Self {
        Self {
            candidates: 0,
            next: 0,
            attempt: Attempt::Idle,
            budget_ms,
        }
    }

    /// Forgets any attempt and starts over at the first of `candidates`.
    pub fn reset(&mut self, candidates: usize) {
        self.candidates = candidates;
        self.next = 0;
        self.attempt = Attempt::Idle;
    }

    pub fn associated(&self) -> Option<usize> {
        match self.attempt {
            Attempt::Associated(index) => Some(index),
            _ => None,
        }
    }

    pub fn poll(&mut self, link: DriverLink, now_ms: u64) -> StationAction {
        match self.attempt {
            Attempt::Idle => {
                if self.candidates == 0 {
                    return StationAction::NoCandidates;
                }
                let index = self.next;
                self.attempt = Attempt::Associating {
                    index,
                    since_ms: now_ms,
                };
                StationAction::Connect(index)
            }
            Attempt::Associating { index, since_ms } => match link {
                DriverLink::Associated => {
                    self.attempt = Attempt::Associated(index);
                    StationAction::Connected
                }
                DriverLink::Associating if now_ms.saturating_sub(since_ms) < self.budget_ms => {
                    StationAction::Wait
                }
                DriverLink::Associating | DriverLink::Failed => {
                    self.abandon();
                    StationAction::GiveUp(index)
                }
            },
            Attempt::Associated(index) => {
                if link == DriverLink::Associated {
                    StationAction::Connected
                } else {
                    self.abandon();
                    StationAction::Lost(index)
                }
            }
        }
    }

    /// Drops the current attempt and moves on to the next candidate.
    pub fn abandon(&mut self) {
        self.attempt = Attempt::Idle;
        if self.candidates > 0 {
            self.next = (self.next + 1) % self.candidates;
        }
    }
}
