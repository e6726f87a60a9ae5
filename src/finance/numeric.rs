// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::{Decimal, RoundingStrategy};

pub fn round_currency(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn round_whole(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Largest magnitude accepted for a single amount or rate.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Saturating sum; clamps at `Decimal::MAX`/`Decimal::MIN` instead of panicking.
pub fn total<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// `part / whole`, zero when `whole` is zero and clamped when the quotient
/// does not fit.
pub fn ratio(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole).unwrap_or_else(|| {
        if part.is_sign_negative() == whole.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

/// `part / whole * 100`, or zero when `whole` is zero.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    ratio(part, whole).saturating_mul(Decimal::ONE_HUNDRED)
}

pub fn format_percent(d: Decimal) -> String {
    format!(
        "{:.1}%",
        d.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    )
}
