//! pixramp - BRL/stablecoin conversion and payout orchestration engine
//!
//! Moves money across three independent, non-transactional rails (the PIX
//! bank rail, a spot exchange and two blockchains) while keeping the
//! internal ledger the single source of truth. Idempotency keys substitute
//! for the distributed transaction none of the rails can offer.
//!
//! # Modules
//!
//! - [`money`] - Decimal quantization and validation (BRL / USDT)
//! - [`ledger`] - Append-only transaction log + account balances
//! - [`rails`] - Bank, exchange and chain adapter contracts with mocks
//! - [`wallet`] - Customer blockchain wallets
//! - [`customer`] - Customer directory (spread multiplier, affiliate, PIX key)
//! - [`conversion`] - Buy/sell orchestration with an explicit FSM
//! - [`payout`] - Cash-out saga with debit reservation and compensation
//! - [`recon`] - Reconciliation poller and webhook handlers
//! - [`config`] - YAML configuration
//! - [`db`] - PostgreSQL pool and schema bootstrap

pub mod config;
pub mod customer;
pub mod db;
pub mod ledger;
pub mod logging;
pub mod money;
pub mod schema;
pub mod wallet;

pub mod rails;

pub mod conversion;
pub mod payout;
pub mod recon;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use conversion::{
    BuyOrchestrator, BuyRequest, Conversion, ConversionError, ConversionId, ConversionSide,
    ConversionState, SellOrchestrator,
};
pub use db::Database;
pub use ledger::{Account, LedgerEntry, LedgerError, LedgerService, TxStatus, TxType};
pub use payout::{Payout, PayoutError, PayoutRequest, PayoutSaga, PayoutState};
pub use rails::{BankRail, ChainClient, ExchangeClient, Network, RailError};
pub use recon::{ReconWorker, WebhookIntake};
