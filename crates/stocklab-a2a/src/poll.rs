//! Bounded polling state machine
//!
//! Each poll attempt produces an [`Observation`]; [`PollState::after`] maps
//! the attempt count and the observation to the next state. The client loop
//! only sleeps, performs I/O, and dispatches on the returned state.

use crate::protocol::TaskState;

/// What a single poll attempt saw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// The attempt failed at the transport level and was skipped
    Unavailable,
    Reported(TaskState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Polling,
    Completed,
    Failed,
    Canceled,
    TimedOut,
}

impl PollState {
    /// Transition after `attempt` (1-based) of `max_attempts`.
    ///
    /// A terminal task state always wins, even on the last attempt.
    pub fn after(attempt: u32, max_attempts: u32, observation: Observation) -> Self {
        match observation {
            Observation::Reported(TaskState::Completed) => Self::Completed,
            Observation::Reported(TaskState::Failed) => Self::Failed,
            Observation::Reported(TaskState::Canceled) => Self::Canceled,
            Observation::Reported(
                TaskState::Submitted | TaskState::Working | TaskState::Unknown,
            )
            | Observation::Unavailable => {
                if attempt >= max_attempts {
                    Self::TimedOut
                } else {
                    Self::Polling
                }
            }
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Polling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_keeps_polling() {
        assert_eq!(
            PollState::after(1, 60, Observation::Reported(TaskState::Working)),
            PollState::Polling
        );
        assert_eq!(
            PollState::after(1, 60, Observation::Reported(TaskState::Submitted)),
            PollState::Polling
        );
        assert_eq!(
            PollState::after(5, 60, Observation::Reported(TaskState::Unknown)),
            PollState::Polling
        );
    }

    #[test]
    fn test_terminal_states() {
        let cases = [
            (TaskState::Completed, PollState::Completed),
            (TaskState::Failed, PollState::Failed),
            (TaskState::Canceled, PollState::Canceled),
        ];
        for (task_state, expected) in cases {
            assert_eq!(
                PollState::after(3, 60, Observation::Reported(task_state)),
                expected
            );
        }
    }

    #[test]
    fn test_unavailable_is_soft() {
        assert_eq!(
            PollState::after(1, 3, Observation::Unavailable),
            PollState::Polling
        );
    }

    #[test]
    fn test_times_out_on_last_attempt() {
        assert_eq!(
            PollState::after(3, 3, Observation::Reported(TaskState::Working)),
            PollState::TimedOut
        );
        assert_eq!(
            PollState::after(3, 3, Observation::Unavailable),
            PollState::TimedOut
        );
    }

    #[test]
    fn test_terminal_wins_on_last_attempt() {
        assert_eq!(
            PollState::after(3, 3, Observation::Reported(TaskState::Completed)),
            PollState::Completed
        );
    }

    #[test]
    fn test_is_terminal() {
        assert!(!PollState::Polling.is_terminal());
        assert!(PollState::TimedOut.is_terminal());
        assert!(PollState::Canceled.is_terminal());
    }
}
