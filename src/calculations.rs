//! Weight and charge arithmetic for receipts and admin receipts.
//!
//! Every derived value is computed on `Decimal` and rounded half away from
//! zero before it is handed back as `f64` for storage and serialization.
//! Raw form input that is empty or not a number counts as zero.

use std::str::FromStr;

use rust_decimal::prelude::*;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decimal places kept for weights (grams).
pub const WEIGHT_PLACES: u32 = 3;
/// Decimal places kept for monetary amounts.
pub const AMOUNT_PLACES: u32 = 2;

/// Parse a raw form value. Empty or malformed input is zero.
pub fn parse_decimal(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

/// Lift a stored `f64` back to `Decimal` through its shortest round-trip text,
/// so `91.6` stays `91.6` instead of its binary expansion.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    parse_decimal(&value.to_string())
}

/// Round to `places` decimals, half away from zero, and convert for storage.
#[inline]
pub fn round(value: Decimal, places: u32) -> f64 {
    value
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

#[inline]
fn sub(a: Decimal, b: Decimal) -> Decimal {
    a.checked_sub(b).unwrap_or(Decimal::ZERO)
}

#[inline]
fn mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or(Decimal::ZERO)
}

#[inline]
fn div(a: Decimal, b: Decimal) -> Decimal {
    a.checked_div(b).unwrap_or(Decimal::ZERO)
}

/// `gross − stone`, 3 places.
pub fn net_weight(gross_weight: f64, stone_weight: f64) -> f64 {
    round(
        sub(to_decimal(gross_weight), to_decimal(stone_weight)),
        WEIGHT_PLACES,
    )
}

/// `net × touch / 100`, 3 places.
pub fn final_weight(net_weight: f64, melting_touch: f64) -> f64 {
    round(
        div(
            mul(to_decimal(net_weight), to_decimal(melting_touch)),
            Decimal::ONE_HUNDRED,
        ),
        WEIGHT_PLACES,
    )
}

/// `pureWeight × purePercent / melting`, 3 places. A zero melting factor yields zero.
pub fn given_total(pure_weight: f64, pure_percent: f64, melting: f64) -> f64 {
    let melting = to_decimal(melting);
    if melting.is_zero() {
        return 0.0;
    }
    round(
        div(mul(to_decimal(pure_weight), to_decimal(pure_percent)), melting),
        WEIGHT_PLACES,
    )
}

/// `finalOrnamentsWt − stoneWeight`, 3 places.
pub fn received_sub_total(final_ornaments_wt: f64, stone_weight: f64) -> f64 {
    round(
        sub(to_decimal(final_ornaments_wt), to_decimal(stone_weight)),
        WEIGHT_PLACES,
    )
}

/// `subTotal + subTotal × makingCharge / 100`, 3 places.
pub fn received_total(sub_total: f64, making_charge_percent: f64) -> f64 {
    let base = to_decimal(sub_total);
    let charge = div(mul(base, to_decimal(making_charge_percent)), Decimal::ONE_HUNDRED);
    round(base.checked_add(charge).unwrap_or(base), WEIGHT_PLACES)
}

/// Column sum rounded to `places`.
pub fn sum<I>(values: I, places: u32) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let total = values
        .into_iter()
        .map(to_decimal)
        .fold(Decimal::ZERO, |acc, v| acc.checked_add(v).unwrap_or(acc));
    round(total, places)
}

/// Serde adapter for raw numeric form fields: accepts JSON numbers and numeric
/// strings; anything else (including `null`, `""` and `"abc"`) becomes `0`.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => parse_decimal(&s).to_f64().unwrap_or_default(),
        _ => 0.0,
    })
}
