//! Blockchain client contracts for the two supported networks.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use super::RailError;

/// Supported networks, stored as SMALLINT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum Network {
    Tron = 1,
    Polygon = 2,
}

impl Network {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(Network::Tron),
            2 => Some(Network::Polygon),
            _ => None,
        }
    }

    /// Lowercase slug used in config keys and exchange chain parameters.
    pub fn slug(&self) -> &'static str {
        match self {
            Network::Tron => "tron",
            Network::Polygon => "polygon",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Tron => "TRON",
            Network::Polygon => "POLYGON",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tron" | "trc20" => Ok(Network::Tron),
            "polygon" | "matic" => Ok(Network::Polygon),
            _ => Err(format!("Invalid network: {}", s)),
        }
    }
}

/// Blockchain client adapter.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Network this client serves
    fn network(&self) -> Network;

    /// Stablecoin balance of an address
    async fn get_balance(&self, address: &str) -> Result<Decimal, RailError>;

    /// Broadcast a transfer signed with `from_key`. Returns the tx hash.
    async fn transfer(
        &self,
        from_key: &str,
        to_address: &str,
        amount: Decimal,
    ) -> Result<String, RailError>;

    /// Validate an address format
    fn is_valid_address(&self, address: &str) -> bool;
}

/// Mock Tron client (TRC-20 USDT)
#[derive(Default)]
pub struct MockTronChain {
    balances: Mutex<Vec<(String, Decimal)>>,
    next_error: Mutex<Option<RailError>>,
}

impl MockTronChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&self, address: &str, balance: Decimal) {
        let mut balances = self.balances.lock().unwrap();
        balances.retain(|(a, _)| a != address);
        balances.push((address.to_string(), balance));
    }

    pub fn fail_next(&self, error: RailError) {
        *self.next_error.lock().unwrap() = Some(error);
    }

    /// Deterministic mock address for a seed
    pub fn address_for(seed: i64) -> String {
        let hash = md5::compute(format!("tron_{}", seed));
        format!("T{:x}", hash)
    }
}

#[async_trait]
impl ChainClient for MockTronChain {
    fn network(&self) -> Network {
        Network::Tron
    }

    async fn get_balance(&self, address: &str) -> Result<Decimal, RailError> {
        let balances = self.balances.lock().unwrap();
        Ok(balances
            .iter()
            .find(|(a, _)| a == address)
            .map(|(_, b)| *b)
            .unwrap_or(Decimal::ZERO))
    }

    async fn transfer(
        &self,
        _from_key: &str,
        to_address: &str,
        _amount: Decimal,
    ) -> Result<String, RailError> {
        if let Some(error) = self.next_error.lock().unwrap().take() {
            return Err(error);
        }
        if !self.is_valid_address(to_address) {
            return Err(RailError::Rejected(format!(
                "invalid tron address: {}",
                to_address
            )));
        }
        Ok(format!("{:x}", uuid::Uuid::new_v4().simple()))
    }

    fn is_valid_address(&self, address: &str) -> bool {
        address.starts_with('T') && address.len() >= 30
    }
}

/// Mock Polygon client (ERC-20 USDT)
#[derive(Default)]
pub struct MockPolygonChain {
    balances: Mutex<Vec<(String, Decimal)>>,
    next_error: Mutex<Option<RailError>>,
}

impl MockPolygonChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&self, address: &str, balance: Decimal) {
        let mut balances = self.balances.lock().unwrap();
        balances.retain(|(a, _)| a != address);
        balances.push((address.to_string(), balance));
    }

    pub fn fail_next(&self, error: RailError) {
        *self.next_error.lock().unwrap() = Some(error);
    }

    pub fn address_for(seed: i64) -> String {
        let hash = md5::compute(format!("polygon_{}", seed));
        format!("0x{:x}{:08x}", hash, seed as u32)
    }
}

#[async_trait]
impl ChainClient for MockPolygonChain {
    fn network(&self) -> Network {
        Network::Polygon
    }

    async fn get_balance(&self, address: &str) -> Result<Decimal, RailError> {
        let balances = self.balances.lock().unwrap();
        Ok(balances
            .iter()
            .find(|(a, _)| a == address)
            .map(|(_, b)| *b)
            .unwrap_or(Decimal::ZERO))
    }

    async fn transfer(
        &self,
        _from_key: &str,
        to_address: &str,
        _amount: Decimal,
    ) -> Result<String, RailError> {
        if let Some(error) = self.next_error.lock().unwrap().take() {
            return Err(error);
        }
        if !self.is_valid_address(to_address) {
            return Err(RailError::Rejected(format!(
                "invalid polygon address: {}",
                to_address
            )));
        }
        Ok(format!("0x{:x}", uuid::Uuid::new_v4().simple()))
    }

    fn is_valid_address(&self, address: &str) -> bool {
        address.starts_with("0x") && address.len() == 42
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_roundtrip() {
        assert_eq!(Network::from_id(1), Some(Network::Tron));
        assert_eq!(Network::from_id(2), Some(Network::Polygon));
        assert!(Network::from_id(0).is_none());
        assert_eq!("trc20".parse::<Network>().unwrap(), Network::Tron);
        assert_eq!("POLYGON".parse::<Network>().unwrap(), Network::Polygon);
        assert!("solana".parse::<Network>().is_err());
    }

    #[test]
    fn mock_addresses_are_deterministic_and_valid() {
        let tron = MockTronChain::new();
        let a1 = MockTronChain::address_for(1001);
        let a2 = MockTronChain::address_for(1001);
        assert_eq!(a1, a2);
        assert!(tron.is_valid_address(&a1));

        let polygon = MockPolygonChain::new();
        let p = MockPolygonChain::address_for(1001);
        assert!(polygon.is_valid_address(&p), "{}", p);
    }

    #[tokio::test]
    async fn transfer_rejects_invalid_address() {
        let tron = MockTronChain::new();
        let result = tron.transfer("key", "0xwrongchain", Decimal::ONE).await;
        assert!(matches!(result, Err(RailError::Rejected(_))));

        let hash = tron
            .transfer("key", &MockTronChain::address_for(7), Decimal::ONE)
            .await
            .unwrap();
        assert!(!hash.is_empty());
    }

    #[tokio::test]
    async fn balances_default_to_zero() {
        let tron = MockTronChain::new();
        assert_eq!(tron.get_balance("Tunknown000000000000000000000000").await.unwrap(), Decimal::ZERO);
        tron.set_balance("Tfunded0000000000000000000000000", Decimal::new(100, 0));
        assert_eq!(
            tron.get_balance("Tfunded0000000000000000000000000").await.unwrap(),
            Decimal::new(100, 0)
        );
    }
}
