//! Spread, fee and profit arithmetic.
//!
//! Pure functions over `Decimal`, quantized with the rules in [`crate::money`].
//! The effective spread of a conversion is the base platform rate scaled by
//! the per-customer multiplier, plus the affiliate share when the customer
//! was referred.

use rust_decimal::Decimal;

use crate::money::{quantize_brl, quantize_usdt};
use crate::rails::exchange::Fill;

/// Quoted amounts for a buy.
#[derive(Debug, Clone, PartialEq)]
pub struct BuyQuote {
    /// BRL forwarded to the exchange after the spread
    pub amount_to_exchange: Decimal,
    /// BRL retained by the platform
    pub spread_amount: Decimal,
    /// Effective total spread rate applied
    pub total_spread_rate: Decimal,
    /// Share of the charged amount owed to the affiliate
    pub affiliate_commission: Decimal,
}

/// Compute the buy-side quote.
///
/// `amountToExchange = amount × (1 − totalSpread)`, with the spread amount
/// defined as the exact remainder so the two always sum back to `amount`.
pub fn quote_buy(
    amount: Decimal,
    base_spread_rate: Decimal,
    customer_multiplier: Decimal,
    affiliate_spread_rate: Option<Decimal>,
) -> BuyQuote {
    let affiliate_rate = affiliate_spread_rate.unwrap_or(Decimal::ZERO);
    let total_spread_rate = base_spread_rate * customer_multiplier + affiliate_rate;

    let amount_to_exchange = quantize_brl(amount * (Decimal::ONE - total_spread_rate));
    let spread_amount = amount - amount_to_exchange;
    let affiliate_commission = quantize_brl(amount * affiliate_rate);

    BuyQuote {
        amount_to_exchange,
        spread_amount,
        total_spread_rate,
        affiliate_commission,
    }
}

/// Profit breakdown of a completed buy.
#[derive(Debug, Clone, PartialEq)]
pub struct BuyProfit {
    pub gross_profit: Decimal,
    pub net_profit: Decimal,
}

/// `grossProfit == spreadBrl`; fees and the affiliate share come out of it.
pub fn buy_profit(
    spread_amount: Decimal,
    trading_fee_brl: Decimal,
    withdraw_fee_brl: Decimal,
    affiliate_commission: Decimal,
) -> BuyProfit {
    let gross_profit = spread_amount;
    let net_profit =
        quantize_brl(gross_profit - trading_fee_brl - withdraw_fee_brl - affiliate_commission);
    BuyProfit {
        gross_profit,
        net_profit,
    }
}

/// Proceeds split of a sell.
#[derive(Debug, Clone, PartialEq)]
pub struct SellProceeds {
    /// BRL credited to the customer
    pub customer_credit: Decimal,
    /// BRL retained by the platform
    pub spread_brl: Decimal,
    pub gross_profit: Decimal,
    pub net_profit: Decimal,
}

/// Split the exchange proceeds of a sell.
///
/// The customer receives `brlFromExchange × (1 − spreadRate)`; the platform
/// retains the exact remainder as `spreadBrl`, so credit plus spread always
/// reconstruct the proceeds to the centavo.
pub fn sell_proceeds(
    brl_from_exchange: Decimal,
    spread_rate: Decimal,
    trading_fee_brl: Decimal,
) -> SellProceeds {
    let customer_credit = quantize_brl(brl_from_exchange * (Decimal::ONE - spread_rate));
    let spread_brl = quantize_brl(brl_from_exchange) - customer_credit;
    let gross_profit = spread_brl;
    let net_profit = quantize_brl(gross_profit - trading_fee_brl);
    SellProceeds {
        customer_credit,
        spread_brl,
        gross_profit,
        net_profit,
    }
}

/// Executed base quantity: the sum of fill sizes, never the requested size.
pub fn fills_base_quantity(fills: &[Fill]) -> Decimal {
    quantize_usdt(fills.iter().map(|f| f.size).sum())
}

/// Executed quote proceeds across fills.
pub fn fills_quote_proceeds(fills: &[Fill]) -> Decimal {
    quantize_brl(fills.iter().map(|f| f.size * f.price).sum())
}

/// Total fees across fills (BRL).
pub fn fills_total_fee(fills: &[Fill]) -> Decimal {
    quantize_brl(fills.iter().map(|f| f.fee).sum())
}

/// Size-weighted average price, `None` when nothing filled.
pub fn fills_average_price(fills: &[Fill]) -> Option<Decimal> {
    let base: Decimal = fills.iter().map(|f| f.size).sum();
    if base.is_zero() {
        return None;
    }
    let quote: Decimal = fills.iter().map(|f| f.size * f.price).sum();
    Some(quote / base)
}
