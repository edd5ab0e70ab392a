use std::{error::Error, fmt::Debug};

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::utils::error_fmt_chain;

// Fixed conversion rate; the gateway charges in USD while the catalog is VND
pub const VND_PER_USD: i64 = 24_000;

// Largest amount (USD minor units) the gateway accepts for a single charge
pub const GATEWAY_MAX_MINOR_UNITS: i64 = 99_999_999;

// The only deposit fractions the storefront offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositPercent{
    Ten,
    Twenty,
    Thirty,
    Forty,
    Fifty,
    Full
}

impl DepositPercent{
    pub fn parse(raw: f64) -> Result<DepositPercent, PricingError>{
        // The storefront sends the literal fractions, so exact comparison
        // is intentional
        if raw == 0.1 {
            Ok(DepositPercent::Ten)
        } else if raw == 0.2 {
            Ok(DepositPercent::Twenty)
        } else if raw == 0.3 {
            Ok(DepositPercent::Thirty)
        } else if raw == 0.4 {
            Ok(DepositPercent::Forty)
        } else if raw == 0.5 {
            Ok(DepositPercent::Fifty)
        } else if raw == 1.0 {
            Ok(DepositPercent::Full)
        } else {
            Err(PricingError::InvalidPercentage(raw))
        }
    }

    // Integer permille so deposit = total x percent stays exact
    pub fn permille(&self) -> i64{
        match self {
            DepositPercent::Ten => 100,
            DepositPercent::Twenty => 200,
            DepositPercent::Thirty => 300,
            DepositPercent::Forty => 400,
            DepositPercent::Fifty => 500,
            DepositPercent::Full => 1000
        }
    }

    pub fn as_f64(&self) -> f64{
        self.permille() as f64 / 1000.0
    }
}

// One cart line with the unit price snapshotted from the catalog
#[derive(Debug, Clone, Serialize)]
pub struct CartLine{
    pub vehicle_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64
}

// Everything the payment intent and the deposit record need to know about
// the money side of a checkout
#[derive(Debug, Clone, Serialize)]
pub struct DepositQuote{
    pub total_vnd: i64,
    pub deposit_vnd: i64,
    pub gateway_minor_units: i64,
    pub capped: bool
}

#[derive(Error)]
pub enum PricingError{
    #[error("{0} is not an allowed deposit percentage")]
    InvalidPercentage(f64),
    #[error("the cart is empty")]
    EmptyCart,
    #[error("{0} is not a valid quantity")]
    InvalidQuantity(i32)
}

impl Debug for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Total, deposit slice, and the gateway-side amount with the cap applied.
// Truncation happens only at the gateway boundary.
pub fn quote_deposit(
    lines: &[CartLine],
    percent: DepositPercent
) -> Result<DepositQuote, PricingError>{
    if lines.is_empty(){
        return Err(PricingError::EmptyCart)
    }

    if let Some(line) = lines.iter().find(|line| line.quantity < 1){
        return Err(PricingError::InvalidQuantity(line.quantity))
    }

    let total_vnd: i64 = lines.iter()
        .map(|line| line.unit_price * line.quantity as i64)
        .sum();

    // Widened multiply; the result is never larger than the total
    let deposit_vnd = ((total_vnd as i128) * (percent.permille() as i128) / 1000) as i64;

    let raw_minor_units = (deposit_vnd as i128) * 100 / (VND_PER_USD as i128);
    let capped = raw_minor_units > GATEWAY_MAX_MINOR_UNITS as i128;
    let gateway_minor_units = if capped {
        GATEWAY_MAX_MINOR_UNITS
    } else {
        raw_minor_units as i64
    };

    Ok(DepositQuote{
        total_vnd,
        deposit_vnd,
        gateway_minor_units,
        capped
    })
}
