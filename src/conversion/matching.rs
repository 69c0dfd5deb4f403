//! Exchange deposit matching.
//!
//! Links a pending sell conversion to a deposit in the exchange history.
//! An exact tx-hash match always wins; the amount/time-window heuristic is
//! the fallback when the hash is unknown (customer self-custody sends) and
//! its matches are flagged lower-confidence for manual audit.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::config::MatchingConfig;
use crate::rails::exchange::ExchangeDeposit;
use crate::rails::Network;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchConfidence {
    /// Tx hash equality
    Exact,
    /// Chain + amount tolerance + time window
    Heuristic,
}

#[derive(Debug, Clone)]
pub struct DepositMatch<'a> {
    pub deposit: &'a ExchangeDeposit,
    pub confidence: MatchConfidence,
}

/// What the matcher needs to know about a pending conversion.
#[derive(Debug, Clone)]
pub struct MatchTarget {
    pub network: Network,
    pub expected_amount: Decimal,
    pub known_tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Find the deposit belonging to `target`, if any.
///
/// Heuristic candidates must be on the same chain, within the amount
/// tolerance, and timestamped inside `[created_at - before, created_at +
/// after]`. Among several candidates the closest amount wins, ties broken
/// by the earliest deposit.
pub fn find_match<'a>(
    target: &MatchTarget,
    deposits: &'a [ExchangeDeposit],
    config: &MatchingConfig,
) -> Option<DepositMatch<'a>> {
    if let Some(hash) = target.known_tx_hash.as_deref() {
        if let Some(deposit) = deposits
            .iter()
            .find(|d| d.tx_hash.as_deref() == Some(hash))
        {
            return Some(DepositMatch {
                deposit,
                confidence: MatchConfidence::Exact,
            });
        }
        // Hash known but not visible yet: do not fall back to the
        // heuristic, the deposit will appear under its hash.
        return None;
    }

    let window_start = target.created_at - Duration::minutes(config.window_before_minutes);
    let window_end = target.created_at + Duration::minutes(config.window_after_minutes);

    deposits
        .iter()
        .filter(|d| d.network == target.network)
        .filter(|d| (d.amount - target.expected_amount).abs() <= config.amount_tolerance_usdt)
        .filter(|d| d.timestamp >= window_start && d.timestamp <= window_end)
        .min_by(|a, b| {
            let da = (a.amount - target.expected_amount).abs();
            let db = (b.amount - target.expected_amount).abs();
            da.cmp(&db).then(a.timestamp.cmp(&b.timestamp))
        })
        .map(|deposit| DepositMatch {
            deposit,
            confidence: MatchConfidence::Heuristic,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rails::exchange::DepositState;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn deposit(id: &str, amount: &str, network: Network, hash: Option<&str>, offset_min: i64) -> ExchangeDeposit {
        ExchangeDeposit {
            deposit_id: id.to_string(),
            amount: dec(amount),
            network,
            tx_hash: hash.map(String::from),
            state: DepositState::Credited,
            timestamp: Utc::now() + Duration::minutes(offset_min),
        }
    }

    fn target(amount: &str, network: Network, hash: Option<&str>) -> MatchTarget {
        MatchTarget {
            network,
            expected_amount: dec(amount),
            known_tx_hash: hash.map(String::from),
            created_at: Utc::now(),
        }
    }

    fn config() -> MatchingConfig {
        MatchingConfig::default()
    }

    #[test]
    fn exact_hash_wins_over_everything() {
        let deposits = vec![
            deposit("d1", "25.00", Network::Tron, Some("hash-other"), 1),
            deposit("d2", "99.99", Network::Polygon, Some("hash-mine"), 50),
        ];
        let target = target("25.00", Network::Tron, Some("hash-mine"));

        let matched = find_match(&target, &deposits, &config()).unwrap();
        assert_eq!(matched.deposit.deposit_id, "d2");
        assert_eq!(matched.confidence, MatchConfidence::Exact);
    }

    #[test]
    fn known_hash_never_falls_back_to_heuristic() {
        let deposits = vec![deposit("d1", "25.00", Network::Tron, Some("hash-other"), 1)];
        let target = target("25.00", Network::Tron, Some("hash-missing"));
        assert!(find_match(&target, &deposits, &config()).is_none());
    }

    #[test]
    fn heuristic_matches_within_tolerance_and_window() {
        let deposits = vec![deposit("d1", "24.995", Network::Tron, None, 10)];
        let target = target("25.00", Network::Tron, None);

        let matched = find_match(&target, &deposits, &config()).unwrap();
        assert_eq!(matched.deposit.deposit_id, "d1");
        assert_eq!(matched.confidence, MatchConfidence::Heuristic);
    }

    #[test]
    fn heuristic_rejects_wrong_chain() {
        let deposits = vec![deposit("d1", "25.00", Network::Polygon, None, 10)];
        let target = target("25.00", Network::Tron, None);
        assert!(find_match(&target, &deposits, &config()).is_none());
    }

    #[test]
    fn heuristic_rejects_amount_outside_tolerance() {
        let deposits = vec![deposit("d1", "25.02", Network::Tron, None, 10)];
        let target = target("25.00", Network::Tron, None);
        assert!(find_match(&target, &deposits, &config()).is_none());

        // Exactly at the tolerance boundary is accepted
        let deposits = vec![deposit("d2", "25.01", Network::Tron, None, 10)];
        assert!(find_match(&target, &deposits, &config()).is_some());
    }

    #[test]
    fn heuristic_rejects_outside_time_window() {
        let target = target("25.00", Network::Tron, None);

        // Too early: before created_at - 5 min
        let deposits = vec![deposit("d1", "25.00", Network::Tron, None, -10)];
        assert!(find_match(&target, &deposits, &config()).is_none());

        // Too late: after created_at + 60 min
        let deposits = vec![deposit("d2", "25.00", Network::Tron, None, 70)];
        assert!(find_match(&target, &deposits, &config()).is_none());

        // Just inside both edges
        let deposits = vec![deposit("d3", "25.00", Network::Tron, None, -4)];
        assert!(find_match(&target, &deposits, &config()).is_some());
        let deposits = vec![deposit("d4", "25.00", Network::Tron, None, 59)];
        assert!(find_match(&target, &deposits, &config()).is_some());
    }

    #[test]
    fn closest_amount_wins_among_candidates() {
        let deposits = vec![
            deposit("far", "25.01", Network::Tron, None, 5),
            deposit("near", "25.001", Network::Tron, None, 20),
        ];
        let target = target("25.00", Network::Tron, None);

        let matched = find_match(&target, &deposits, &config()).unwrap();
        assert_eq!(matched.deposit.deposit_id, "near");
    }

    #[test]
    fn earliest_deposit_breaks_amount_ties() {
        let deposits = vec![
            deposit("late", "25.00", Network::Tron, None, 30),
            deposit("early", "25.00", Network::Tron, None, 2),
        ];
        let target = target("25.00", Network::Tron, None);

        let matched = find_match(&target, &deposits, &config()).unwrap();
        assert_eq!(matched.deposit.deposit_id, "early");
    }
}
