//! Spot exchange contract.
//!
//! Sizes for market buys are quote-denominated (BRL), for market sells
//! base-denominated (USDT). Actual executed quantity is always derived
//! from fills, never from the requested size: slippage applies. Fill fees
//! are reported in BRL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use super::RailError;
use super::chain::Network;
use crate::money;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Exchange sub-ledgers. Purchased funds land in Trading and must be moved
/// to Funding before they can be withdrawn on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeAccount {
    Trading,
    Funding,
}

impl ExchangeAccount {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeAccount::Trading => "trading",
            ExchangeAccount::Funding => "funding",
        }
    }
}

/// One fill of a market order.
#[derive(Debug, Clone)]
pub struct Fill {
    /// Base quantity (USDT)
    pub size: Decimal,
    /// Price in BRL per USDT
    pub price: Decimal,
    /// Fee in BRL
    pub fee: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositState {
    Pending,
    Credited,
}

/// A deposit visible in the exchange's deposit history.
#[derive(Debug, Clone)]
pub struct ExchangeDeposit {
    pub deposit_id: String,
    pub amount: Decimal,
    pub network: Network,
    pub tx_hash: Option<String>,
    pub state: DepositState,
    pub timestamp: DateTime<Utc>,
}

/// Spot exchange adapter.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Place a market order. Returns the exchange order id.
    async fn place_market_order(
        &self,
        pair: &str,
        side: OrderSide,
        size: Decimal,
    ) -> Result<String, RailError>;

    /// Fills of an order so far. May be empty while the order settles.
    async fn get_fills(&self, order_id: &str) -> Result<Vec<Fill>, RailError>;

    /// Move funds between the exchange's own sub-ledgers.
    async fn transfer_between_accounts(
        &self,
        currency: &str,
        amount: Decimal,
        from: ExchangeAccount,
        to: ExchangeAccount,
    ) -> Result<(), RailError>;

    /// Withdraw on-chain. Returns the exchange withdrawal id.
    async fn withdraw(
        &self,
        currency: &str,
        amount: Decimal,
        address: &str,
        network: Network,
        fee: Decimal,
    ) -> Result<String, RailError>;

    /// Recent deposit history for a currency, newest first.
    async fn get_deposit_history(&self, currency: &str)
    -> Result<Vec<ExchangeDeposit>, RailError>;
}

#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order_id: String,
    pub pair: String,
    pub side: OrderSide,
    pub size: Decimal,
}

#[derive(Debug, Clone)]
pub struct RequestedWithdrawal {
    pub withdrawal_id: String,
    pub amount: Decimal,
    pub address: String,
    pub network: Network,
    pub fee: Decimal,
}

#[derive(Default)]
struct MockExchangeState {
    price: Decimal,
    fee_rate: Decimal,
    orders: Vec<PlacedOrder>,
    fills: HashMap<String, Vec<Fill>>,
    scripted_fills: Option<Vec<Fill>>,
    deposits: Vec<ExchangeDeposit>,
    withdrawals: Vec<RequestedWithdrawal>,
    transfers: Vec<(String, Decimal, ExchangeAccount, ExchangeAccount)>,
    fail_order: Option<RailError>,
    fail_transfer: Option<RailError>,
    fail_withdraw: Option<RailError>,
    fail_deposit_history: Option<RailError>,
}

/// Scriptable in-memory exchange.
///
/// By default fills are synthesized at a fixed price with a proportional
/// fee; tests can script exact fills per order instead.
pub struct MockExchange {
    state: Mutex<MockExchangeState>,
}

impl Default for MockExchange {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExchange {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockExchangeState {
                price: Decimal::new(550, 2),   // 5.50 BRL per USDT
                fee_rate: Decimal::new(1, 3),  // 0.1%
                ..Default::default()
            }),
        }
    }

    pub fn set_price(&self, price: Decimal) {
        self.state.lock().unwrap().price = price;
    }

    /// Script the fills returned for the next placed order.
    pub fn script_next_fills(&self, fills: Vec<Fill>) {
        self.state.lock().unwrap().scripted_fills = Some(fills);
    }

    pub fn push_deposit(&self, deposit: ExchangeDeposit) {
        self.state.lock().unwrap().deposits.push(deposit);
    }

    pub fn fail_next_order(&self, error: RailError) {
        self.state.lock().unwrap().fail_order = Some(error);
    }

    pub fn fail_next_transfer(&self, error: RailError) {
        self.state.lock().unwrap().fail_transfer = Some(error);
    }

    pub fn fail_next_withdraw(&self, error: RailError) {
        self.state.lock().unwrap().fail_withdraw = Some(error);
    }

    pub fn fail_next_deposit_history(&self, error: RailError) {
        self.state.lock().unwrap().fail_deposit_history = Some(error);
    }

    pub fn placed_orders(&self) -> Vec<PlacedOrder> {
        self.state.lock().unwrap().orders.clone()
    }

    pub fn withdrawals(&self) -> Vec<RequestedWithdrawal> {
        self.state.lock().unwrap().withdrawals.clone()
    }

    pub fn transfer_count(&self) -> usize {
        self.state.lock().unwrap().transfers.len()
    }

    fn synthesize_fills(side: OrderSide, size: Decimal, price: Decimal, fee_rate: Decimal) -> Vec<Fill> {
        match side {
            // Quote-sized buy: spend `size` BRL, receive size/price USDT
            OrderSide::Buy => {
                let base = money::quantize_usdt(size / price);
                vec![Fill {
                    size: base,
                    price,
                    fee: money::quantize_brl(size * fee_rate),
                }]
            }
            // Base-sized sell: sell `size` USDT for size*price BRL
            OrderSide::Sell => vec![Fill {
                size,
                price,
                fee: money::quantize_brl(size * price * fee_rate),
            }],
        }
    }
}

#[async_trait]
impl ExchangeClient for MockExchange {
    async fn place_market_order(
        &self,
        pair: &str,
        side: OrderSide,
        size: Decimal,
    ) -> Result<String, RailError> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.fail_order.take() {
            return Err(error);
        }
        if size <= Decimal::ZERO {
            return Err(RailError::Rejected("order size must be positive".into()));
        }

        let order_id = format!("ord-{}", uuid::Uuid::new_v4().simple());
        let fills = state
            .scripted_fills
            .take()
            .unwrap_or_else(|| Self::synthesize_fills(side, size, state.price, state.fee_rate));

        state.orders.push(PlacedOrder {
            order_id: order_id.clone(),
            pair: pair.to_string(),
            side,
            size,
        });
        state.fills.insert(order_id.clone(), fills);

        Ok(order_id)
    }

    async fn get_fills(&self, order_id: &str) -> Result<Vec<Fill>, RailError> {
        let state = self.state.lock().unwrap();
        match state.fills.get(order_id) {
            Some(fills) => Ok(fills.clone()),
            None => Err(RailError::Rejected(format!("unknown order: {}", order_id))),
        }
    }

    async fn transfer_between_accounts(
        &self,
        currency: &str,
        amount: Decimal,
        from: ExchangeAccount,
        to: ExchangeAccount,
    ) -> Result<(), RailError> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.fail_transfer.take() {
            return Err(error);
        }
        state.transfers.push((currency.to_string(), amount, from, to));
        Ok(())
    }

    async fn withdraw(
        &self,
        _currency: &str,
        amount: Decimal,
        address: &str,
        network: Network,
        fee: Decimal,
    ) -> Result<String, RailError> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.fail_withdraw.take() {
            return Err(error);
        }

        let withdrawal_id = format!("wd-{}", uuid::Uuid::new_v4().simple());
        state.withdrawals.push(RequestedWithdrawal {
            withdrawal_id: withdrawal_id.clone(),
            amount,
            address: address.to_string(),
            network,
            fee,
        });
        Ok(withdrawal_id)
    }

    async fn get_deposit_history(
        &self,
        _currency: &str,
    ) -> Result<Vec<ExchangeDeposit>, RailError> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.fail_deposit_history.take() {
            return Err(error);
        }
        Ok(state.deposits.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        use std::str::FromStr;
        Decimal::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn buy_fills_are_quote_sized() {
        let exchange = MockExchange::new();
        exchange.set_price(dec("5.00"));

        let order_id = exchange
            .place_market_order("USDT-BRL", OrderSide::Buy, dec("49.50"))
            .await
            .unwrap();
        let fills = exchange.get_fills(&order_id).await.unwrap();

        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].size, dec("9.900000"));
        assert_eq!(fills[0].price, dec("5.00"));
        // 0.1% of 49.50 BRL
        assert_eq!(fills[0].fee, dec("0.05"));
    }

    #[tokio::test]
    async fn sell_fills_are_base_sized() {
        let exchange = MockExchange::new();
        exchange.set_price(dec("5.50"));

        let order_id = exchange
            .place_market_order("USDT-BRL", OrderSide::Sell, dec("10"))
            .await
            .unwrap();
        let fills = exchange.get_fills(&order_id).await.unwrap();

        assert_eq!(fills[0].size, dec("10"));
        assert_eq!(fills[0].price, dec("5.50"));
        assert_eq!(fills[0].fee, dec("0.06")); // 0.1% of 55, bankers' rounded
    }

    #[tokio::test]
    async fn scripted_fills_override_synthesis() {
        let exchange = MockExchange::new();
        exchange.script_next_fills(vec![
            Fill { size: dec("4"), price: dec("5.10"), fee: dec("0.02") },
            Fill { size: dec("5"), price: dec("5.20"), fee: dec("0.03") },
        ]);

        let order_id = exchange
            .place_market_order("USDT-BRL", OrderSide::Buy, dec("46.40"))
            .await
            .unwrap();
        let fills = exchange.get_fills(&order_id).await.unwrap();
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].size + fills[1].size, dec("9"));
    }

    #[tokio::test]
    async fn unknown_order_fills_are_rejected() {
        let exchange = MockExchange::new();
        assert!(matches!(
            exchange.get_fills("ord-missing").await,
            Err(RailError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn scripted_failures_fire_once() {
        let exchange = MockExchange::new();
        exchange.fail_next_order(RailError::Unavailable("maintenance".into()));

        assert!(
            exchange
                .place_market_order("USDT-BRL", OrderSide::Buy, Decimal::ONE)
                .await
                .is_err()
        );
        assert!(
            exchange
                .place_market_order("USDT-BRL", OrderSide::Buy, Decimal::ONE)
                .await
                .is_ok()
        );
    }
}
