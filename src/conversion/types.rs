//! Conversion record types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use super::state::{ConversionSide, ConversionState};
use crate::rails::Network;

/// Conversion identifier - ULID-based
///
/// Monotonic and sortable, generated without coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversionId(ulid::Ulid);

impl ConversionId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }
}

impl Default for ConversionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConversionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConversionId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

/// Buy request from the API layer.
#[derive(Debug, Clone)]
pub struct BuyRequest {
    pub customer_id: i64,
    /// BRL to convert; must meet the configured minimum
    pub amount_brl: Decimal,
    /// Explicit destination wallet; main wallet resolution otherwise
    pub wallet_id: Option<i64>,
    pub network: Network,
}

/// Full conversion record as stored.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub conversion_id: ConversionId,
    pub customer_id: i64,
    pub side: ConversionSide,
    pub state: ConversionState,
    pub network: Network,
    pub target_wallet_id: Option<i64>,

    // Monetary stages
    pub brl_charged: Option<Decimal>,
    pub brl_exchanged: Option<Decimal>,
    pub brl_from_exchange: Option<Decimal>,
    pub spread_brl: Option<Decimal>,
    pub usdt_expected: Option<Decimal>,
    pub usdt_received: Option<Decimal>,
    pub usdt_purchased: Option<Decimal>,
    pub usdt_withdrawn: Option<Decimal>,

    // Fees and profit
    pub exchange_trading_fee: Option<Decimal>,
    pub exchange_withdraw_fee: Option<Decimal>,
    pub affiliate_commission: Option<Decimal>,
    pub gross_profit: Option<Decimal>,
    pub net_profit: Option<Decimal>,

    // External correlation ids
    pub bank_end_to_end_id: Option<String>,
    pub exchange_order_id: Option<String>,
    pub exchange_withdrawal_id: Option<String>,
    pub exchange_deposit_id: Option<String>,
    pub chain_tx_hash: Option<String>,

    pub failure_stage: Option<String>,
    pub error_message: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub retry_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversion {
    fn empty(
        customer_id: i64,
        side: ConversionSide,
        network: Network,
    ) -> Self {
        let now = Utc::now();
        Self {
            conversion_id: ConversionId::new(),
            customer_id,
            side,
            state: ConversionState::Pending,
            network,
            target_wallet_id: None,
            brl_charged: None,
            brl_exchanged: None,
            brl_from_exchange: None,
            spread_brl: None,
            usdt_expected: None,
            usdt_received: None,
            usdt_purchased: None,
            usdt_withdrawn: None,
            exchange_trading_fee: None,
            exchange_withdraw_fee: None,
            affiliate_commission: None,
            gross_profit: None,
            net_profit: None,
            bank_end_to_end_id: None,
            exchange_order_id: None,
            exchange_withdrawal_id: None,
            exchange_deposit_id: None,
            chain_tx_hash: None,
            failure_stage: None,
            error_message: None,
            metadata: None,
            retry_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// New buy conversion with the quoted amounts filled in.
    pub fn new_buy(
        customer_id: i64,
        network: Network,
        target_wallet_id: i64,
        brl_charged: Decimal,
        brl_exchanged: Decimal,
        spread_brl: Decimal,
    ) -> Self {
        let mut conversion = Self::empty(customer_id, ConversionSide::Buy, network);
        conversion.target_wallet_id = Some(target_wallet_id);
        conversion.brl_charged = Some(brl_charged);
        conversion.brl_exchanged = Some(brl_exchanged);
        conversion.spread_brl = Some(spread_brl);
        conversion
    }

    /// New sell conversion awaiting its exchange deposit.
    pub fn new_sell(
        customer_id: i64,
        network: Network,
        usdt_expected: Decimal,
        chain_tx_hash: Option<String>,
    ) -> Self {
        let mut conversion = Self::empty(customer_id, ConversionSide::Sell, network);
        conversion.usdt_expected = Some(usdt_expected);
        conversion.chain_tx_hash = chain_tx_hash;
        conversion
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Conversion[{}] {} customer={} network={} state={}",
            self.conversion_id, self.side, self.customer_id, self.network, self.state
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_id_roundtrip() {
        let id = ConversionId::new();
        let parsed: ConversionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn new_buy_starts_pending() {
        let conversion = Conversion::new_buy(
            1001,
            Network::Tron,
            7,
            Decimal::new(5_000, 2),
            Decimal::new(4_950, 2),
            Decimal::new(50, 2),
        );
        assert_eq!(conversion.state, ConversionState::Pending);
        assert_eq!(conversion.side, ConversionSide::Buy);
        assert_eq!(conversion.brl_charged, Some(Decimal::new(5_000, 2)));
        assert_eq!(conversion.target_wallet_id, Some(7));
        assert!(conversion.usdt_purchased.is_none());
    }

    #[test]
    fn new_sell_records_expected_amount() {
        let conversion =
            Conversion::new_sell(1001, Network::Polygon, Decimal::new(25, 0), Some("0xabc".into()));
        assert_eq!(conversion.side, ConversionSide::Sell);
        assert_eq!(conversion.usdt_expected, Some(Decimal::new(25, 0)));
        assert_eq!(conversion.chain_tx_hash.as_deref(), Some("0xabc"));
    }
}
