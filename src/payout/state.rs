//! Payout FSM state definitions.

use std::fmt;

/// Payout saga states
///
/// The reservation debit is taken on entry to PENDING; PROCESSING is
/// persisted before the bank call; the webhook (or the synchronous answer)
/// finalizes to CONFIRMED or triggers compensation into FAILED/CANCELED.
/// Terminal failure states imply the refund credit has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum PayoutState {
    /// Reservation debit taken, bank not yet called
    Pending = 0,

    /// Bank call issued; awaiting confirmation
    Processing = 10,

    /// Terminal: bank settled the payout
    Confirmed = 20,

    /// Terminal: bank rejected or errored; reservation refunded
    Failed = -10,

    /// Terminal: payout canceled on the bank side; reservation refunded
    Canceled = -20,
}

impl PayoutState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PayoutState::Confirmed | PayoutState::Failed | PayoutState::Canceled
        )
    }

    /// Exhaustive transition table.
    pub fn can_transition(&self, to: PayoutState) -> bool {
        use PayoutState::*;
        matches!(
            (self, to),
            (Pending, Processing)
                | (Pending, Failed)
                | (Processing, Confirmed)
                | (Processing, Failed)
                | (Processing, Canceled)
        )
    }

    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(PayoutState::Pending),
            10 => Some(PayoutState::Processing),
            20 => Some(PayoutState::Confirmed),
            -10 => Some(PayoutState::Failed),
            -20 => Some(PayoutState::Canceled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutState::Pending => "PENDING",
            PayoutState::Processing => "PROCESSING",
            PayoutState::Confirmed => "CONFIRMED",
            PayoutState::Failed => "FAILED",
            PayoutState::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for PayoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for PayoutState {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        PayoutState::from_id(value).ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PayoutState; 5] = [
        PayoutState::Pending,
        PayoutState::Processing,
        PayoutState::Confirmed,
        PayoutState::Failed,
        PayoutState::Canceled,
    ];

    #[test]
    fn terminal_states() {
        assert!(PayoutState::Confirmed.is_terminal());
        assert!(PayoutState::Failed.is_terminal());
        assert!(PayoutState::Canceled.is_terminal());
        assert!(!PayoutState::Pending.is_terminal());
        assert!(!PayoutState::Processing.is_terminal());
    }

    #[test]
    fn transition_table() {
        assert!(PayoutState::Pending.can_transition(PayoutState::Processing));
        assert!(PayoutState::Processing.can_transition(PayoutState::Confirmed));
        assert!(PayoutState::Processing.can_transition(PayoutState::Failed));
        assert!(PayoutState::Processing.can_transition(PayoutState::Canceled));

        // A confirmed payout can never be failed afterwards
        assert!(!PayoutState::Confirmed.can_transition(PayoutState::Failed));
        // Nothing leaves a terminal state
        for from in [PayoutState::Confirmed, PayoutState::Failed, PayoutState::Canceled] {
            for to in ALL {
                assert!(!from.can_transition(to), "{} -> {}", from, to);
            }
        }
        // Pending cannot skip to Confirmed
        assert!(!PayoutState::Pending.can_transition(PayoutState::Confirmed));
    }

    #[test]
    fn state_id_roundtrip() {
        for state in ALL {
            assert_eq!(PayoutState::from_id(state.id()), Some(state));
        }
        assert!(PayoutState::from_id(999).is_none());
    }
}
