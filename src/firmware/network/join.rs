use core::fmt::{self, Debug};

use super::{
    super::{
        capability::{MonotonicClock, NetworkStack},
        types::{JoinAttemptResult, JoinOutcome, JoinPolicy, LinkStatus, NetworkCandidate},
    },
    observer::JoinObserver,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JoinError<E> {
    NoCandidates,
    InvalidPolicy(JoinPolicy),
    Station(E),
    Register { priority: u8, error: E },
}

impl<E: Debug> fmt::Display for JoinError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCandidates => f.write_str("no network candidates"),
            Self::InvalidPolicy(policy) => write!(
                f,
                "poll interval {}ms must be in 1..={}ms",
                policy.poll_interval_ms, policy.deadline_ms
            ),
            Self::Station(error) => write!(f, "station setup failed: {:?}", error),
            Self::Register { priority, error } => {
                write!(
                    f,
                    "register AP[{}] failed: {:?}",
                    u16::from(*priority) + 1,
                    error
                )
            }
        }
    }
}

/// Registers every candidate with the stack, then polls the station status
/// every `policy.poll_interval_ms` until it reports connected or
/// `policy.deadline_ms` has elapsed.
///
/// The call finishes within `deadline + poll_interval` however long a poll
/// takes: the wait after a poll is cut to what is left of the deadline. A
/// promptly returning stack that never connects is polled exactly
/// `policy.max_polls()` times. The stack may join any registered candidate,
/// so the joined identity is read back from it.
pub async fn join<S, K, O>(
    stack: &mut S,
    candidates: &[NetworkCandidate<'_>],
    policy: JoinPolicy,
    clock: &mut K,
    observer: &mut O,
) -> Result<JoinAttemptResult, JoinError<S::Error>>
where
    S: NetworkStack,
    K: MonotonicClock,
    O: JoinObserver,
{
    if candidates.is_empty() {
        return Err(JoinError::NoCandidates);
    }
    if !policy.is_valid() {
        return Err(JoinError::InvalidPolicy(policy));
    }

    stack.prepare_station().map_err(JoinError::Station)?;
    for candidate in candidates {
        stack
            .register(candidate)
            .map_err(|error| JoinError::Register {
                priority: candidate.priority,
                error,
            })?;
        observer.candidate_registered(candidate);
    }

    let deadline_ms = u64::from(policy.deadline_ms);
    let started_ms = clock.now_ms();
    let mut polls = 0u32;
    let mut last_status = LinkStatus::Idle;

    loop {
        let elapsed_ms = clock.now_ms().saturating_sub(started_ms);
        if elapsed_ms >= deadline_ms {
            break;
        }

        last_status = stack.poll_status().await;
        polls = polls.saturating_add(1);

        if last_status.is_connected() {
            // Associated but still waiting for an address counts as not joined.
            if let Some(network) = stack.joined() {
                let result = JoinAttemptResult {
                    outcome: JoinOutcome::Joined(network),
                    elapsed_ms,
                    polls,
                };
                observer.finished(&result);
                return Ok(result);
            }
        }

        observer.polled(polls, last_status, elapsed_ms);

        let remaining_ms = deadline_ms.saturating_sub(clock.now_ms().saturating_sub(started_ms));
        if remaining_ms == 0 {
            break;
        }
        let wait_ms = remaining_ms.min(u64::from(policy.poll_interval_ms)) as u32;
        clock.delay_ms(wait_ms).await;
    }

    let result = JoinAttemptResult {
        outcome: JoinOutcome::TimedOut { last_status },
        elapsed_ms: clock.now_ms().saturating_sub(started_ms),
        polls,
    };
    observer.finished(&result);
    Ok(result)
}
