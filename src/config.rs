use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// PostgreSQL connection URL for ledger and saga state
    pub postgres_url: String,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
}

/// Conversion engine parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    /// Minimum BRL amount accepted by the buy flow
    pub min_buy_brl: Decimal,
    /// Base platform spread, before the per-customer multiplier
    pub base_spread_rate: Decimal,
    /// Extra spread share applied when the customer was referred
    pub affiliate_spread_rate: Decimal,
    /// Exchange trading pair for conversions
    pub pair: String,
    /// PIX key of the exchange's BRL deposit account
    pub exchange_deposit_pix_key: String,
    /// Exchange USDT deposit address per network slug (tron, polygon)
    pub exchange_deposit_addresses: HashMap<String, String>,
    /// Network fee charged by the exchange per USDT withdrawal
    pub withdraw_fee_usdt: Decimal,
    /// How long to wait before reading fills of a market order
    pub fill_wait_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_buy_brl: Decimal::new(10, 0),
            base_spread_rate: Decimal::new(1, 2),        // 0.01
            affiliate_spread_rate: Decimal::new(2, 3),   // 0.002
            pair: "USDT-BRL".to_string(),
            exchange_deposit_pix_key: "exchange-treasury@pix".to_string(),
            exchange_deposit_addresses: HashMap::new(),
            withdraw_fee_usdt: Decimal::ONE,
            fill_wait_ms: 2000,
        }
    }
}

/// Reconciliation poller parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PollerConfig {
    pub interval_ms: u64,
    /// Maximum conversions advanced per tick
    pub batch_size: usize,
    /// How far back the orphan scan looks at exchange deposit history
    pub orphan_window_minutes: i64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 30_000,
            batch_size: 100,
            orphan_window_minutes: 1440,
        }
    }
}

/// Deposit matching heuristic tolerances
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchingConfig {
    pub amount_tolerance_usdt: Decimal,
    pub window_before_minutes: i64,
    pub window_after_minutes: i64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            amount_tolerance_usdt: Decimal::new(1, 2), // 0.01
            window_before_minutes: 5,
            window_after_minutes: 60,
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Self {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .unwrap_or_else(|_| panic!("Failed to read config file: {}", config_path));
        serde_yaml::from_str(&content).expect("Failed to parse config yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let engine = EngineConfig::default();
        assert_eq!(engine.min_buy_brl, Decimal::new(10, 0));
        assert_eq!(engine.base_spread_rate, Decimal::new(1, 2));

        let poller = PollerConfig::default();
        assert_eq!(poller.interval_ms, 30_000);
        assert_eq!(poller.batch_size, 100);

        let matching = MatchingConfig::default();
        assert_eq!(matching.amount_tolerance_usdt, Decimal::new(1, 2));
        assert_eq!(matching.window_before_minutes, 5);
        assert_eq!(matching.window_after_minutes, 60);
    }

    #[test]
    fn parses_full_yaml() {
        let yaml = r#"
log_level: "debug"
log_dir: "./logs"
log_file: "test.log"
use_json: true
rotation: "hourly"
postgres_url: "postgres://u:p@localhost/db"
engine:
  min_buy_brl: "10"
  base_spread_rate: "0.015"
  affiliate_spread_rate: "0.002"
  pair: "USDT-BRL"
  exchange_deposit_pix_key: "key@pix"
  exchange_deposit_addresses:
    tron: "Taddr"
  withdraw_fee_usdt: "1"
  fill_wait_ms: 500
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.engine.base_spread_rate, Decimal::new(15, 3));
        assert_eq!(
            config.engine.exchange_deposit_addresses.get("tron").unwrap(),
            "Taddr"
        );
        // Sections omitted from the file fall back to defaults
        assert_eq!(config.poller.batch_size, 100);
    }
}
