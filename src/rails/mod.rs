//! External rail adapters.
//!
//! The engine talks to three non-transactional rails: the PIX bank rail,
//! the crypto spot exchange and the blockchains. Each rail is a narrow
//! `async_trait` contract; the concrete HTTP clients live in the outer
//! layer and are injected at wiring time. The mocks here are deterministic
//! and scriptable so every saga path can be exercised without a network.
//!
//! None of the rail calls are cancellable once issued: a bank transfer or
//! market order cannot be recalled. Callers compensate the ledger
//! consequence instead of cancelling the rail effect.

pub mod bank;
pub mod chain;
pub mod exchange;

pub use bank::{BankRail, BankTransfer, BankTransferStatus, MockBankRail, PixPayoutStatus};
pub use chain::{ChainClient, MockPolygonChain, MockTronChain, Network};
pub use exchange::{
    DepositState, ExchangeAccount, ExchangeClient, ExchangeDeposit, Fill, MockExchange, OrderSide,
};

use thiserror::Error;

/// Failure taxonomy shared by all rail adapters.
///
/// `Timeout` means the rail's state is UNKNOWN: the request may or may not
/// have been applied. It is never safe to compensate on a timeout; the
/// caller must keep the operation pending until the true state is learned
/// (webhook, poll or operator).
#[derive(Debug, Error, Clone)]
pub enum RailError {
    #[error("Rejected by rail: {0}")]
    Rejected(String),

    #[error("Rail unavailable: {0}")]
    Unavailable(String),

    #[error("Rail timeout, state unknown: {0}")]
    Timeout(String),
}

impl RailError {
    /// True when the external state is unknown and compensation is unsafe.
    #[inline]
    pub fn is_state_unknown(&self) -> bool {
        matches!(self, RailError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_state_unknown() {
        assert!(RailError::Timeout("t".into()).is_state_unknown());
        assert!(!RailError::Rejected("r".into()).is_state_unknown());
        assert!(!RailError::Unavailable("u".into()).is_state_unknown());
    }
}
