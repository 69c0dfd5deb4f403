//! Conversion FSM state definitions.
//!
//! State IDs are stored as SMALLINT. The transition table is exhaustive:
//! any update not listed here is rejected instead of overwriting blindly.

use std::fmt;

/// Conversion FSM states
///
/// Buy conversions run PENDING -> COMPLETED synchronously; sell conversions
/// walk PENDING -> USDT_RECEIVED -> USDT_SOLD -> COMPLETED driven by the
/// reconciliation poller. FAILED is reachable from every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum ConversionState {
    /// Created; awaiting the first external confirmation
    Pending = 0,

    /// Matching exchange deposit found (sell)
    UsdtReceived = 10,

    /// Market sell executed (sell)
    UsdtSold = 20,

    /// Terminal: ledger effect applied
    Completed = 30,

    /// Terminal: flow failed; `failure_stage` records where
    Failed = -10,
}

impl ConversionState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversionState::Completed | ConversionState::Failed)
    }

    /// Exhaustive transition table.
    pub fn can_transition(&self, to: ConversionState) -> bool {
        use ConversionState::*;
        matches!(
            (self, to),
            (Pending, UsdtReceived)
                | (Pending, Completed)
                | (Pending, Failed)
                | (UsdtReceived, UsdtSold)
                | (UsdtReceived, Failed)
                | (UsdtSold, Completed)
                | (UsdtSold, Failed)
        )
    }

    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(ConversionState::Pending),
            10 => Some(ConversionState::UsdtReceived),
            20 => Some(ConversionState::UsdtSold),
            30 => Some(ConversionState::Completed),
            -10 => Some(ConversionState::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionState::Pending => "PENDING",
            ConversionState::UsdtReceived => "USDT_RECEIVED",
            ConversionState::UsdtSold => "USDT_SOLD",
            ConversionState::Completed => "COMPLETED",
            ConversionState::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ConversionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for ConversionState {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        ConversionState::from_id(value).ok_or(())
    }
}

/// Conversion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum ConversionSide {
    Buy = 1,
    Sell = 2,
}

impl ConversionSide {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(ConversionSide::Buy),
            2 => Some(ConversionSide::Sell),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionSide::Buy => "BUY",
            ConversionSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for ConversionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ConversionState; 5] = [
        ConversionState::Pending,
        ConversionState::UsdtReceived,
        ConversionState::UsdtSold,
        ConversionState::Completed,
        ConversionState::Failed,
    ];

    #[test]
    fn terminal_states() {
        assert!(ConversionState::Completed.is_terminal());
        assert!(ConversionState::Failed.is_terminal());
        assert!(!ConversionState::Pending.is_terminal());
        assert!(!ConversionState::UsdtReceived.is_terminal());
        assert!(!ConversionState::UsdtSold.is_terminal());
    }

    #[test]
    fn transition_table_forward_path() {
        assert!(ConversionState::Pending.can_transition(ConversionState::UsdtReceived));
        assert!(ConversionState::UsdtReceived.can_transition(ConversionState::UsdtSold));
        assert!(ConversionState::UsdtSold.can_transition(ConversionState::Completed));
        // Buy completes straight from Pending
        assert!(ConversionState::Pending.can_transition(ConversionState::Completed));
    }

    #[test]
    fn failed_reachable_from_every_non_terminal() {
        for state in ALL {
            if !state.is_terminal() {
                assert!(state.can_transition(ConversionState::Failed), "{}", state);
            }
        }
    }

    #[test]
    fn terminal_states_admit_nothing() {
        for from in [ConversionState::Completed, ConversionState::Failed] {
            for to in ALL {
                assert!(!from.can_transition(to), "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn no_skipping_or_reversing() {
        assert!(!ConversionState::Pending.can_transition(ConversionState::UsdtSold));
        assert!(!ConversionState::UsdtReceived.can_transition(ConversionState::Completed));
        assert!(!ConversionState::UsdtSold.can_transition(ConversionState::UsdtReceived));
        assert!(!ConversionState::UsdtReceived.can_transition(ConversionState::Pending));
    }

    #[test]
    fn state_id_roundtrip() {
        for state in ALL {
            assert_eq!(ConversionState::from_id(state.id()), Some(state));
        }
        assert!(ConversionState::from_id(999).is_none());
        assert!(ConversionState::from_id(-999).is_none());
    }

    #[test]
    fn side_roundtrip() {
        assert_eq!(ConversionSide::from_id(1), Some(ConversionSide::Buy));
        assert_eq!(ConversionSide::from_id(2), Some(ConversionSide::Sell));
        assert!(ConversionSide::from_id(3).is_none());
    }
}
