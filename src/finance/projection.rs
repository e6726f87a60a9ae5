// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Compound growth projection of an investment portfolio.

use chrono::{Datelike, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::finance::numeric::{percentage, ratio, round_whole, total};
use crate::models::Investment;

pub const PROJECTION_MONTHS: u32 = 24;
/// Annual return, in percent, used when no holding carries a weight.
pub const DEFAULT_ANNUAL_RATE: Decimal = Decimal::TEN;
/// Share of annual income assumed invested when the portfolio is empty.
pub const SEED_FRACTION: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrowthPoint {
    pub date: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub holdings: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_initial: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_gain: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub gain_percent: Option<Decimal>,
}

/// Value-weighted average of the holdings' annual return rates, weighted
/// against `base`. Falls back to [`DEFAULT_ANNUAL_RATE`] when there is
/// nothing to weigh.
pub fn weighted_return_rate(holdings: &[Investment], base: Decimal) -> Decimal {
    if holdings.is_empty() || base.is_zero() {
        return DEFAULT_ANNUAL_RATE;
    }
    holdings
        .iter()
        .map(|h| ratio(h.value, base).saturating_mul(h.return_rate))
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r))
}

/// Projection starting at the current calendar month.
pub fn project_growth(
    current_value: Decimal,
    holdings: &[Investment],
    fallback_annual_income: Option<Decimal>,
) -> Vec<GrowthPoint> {
    let today = Utc::now().date_naive();
    project_growth_from(today, current_value, holdings, fallback_annual_income)
}

/// Projects [`PROJECTION_MONTHS`] monthly points starting at `start`'s month.
/// Each month compounds the previous unrounded value; emitted values are
/// rounded to whole units.
pub fn project_growth_from(
    start: NaiveDate,
    current_value: Decimal,
    holdings: &[Investment],
    fallback_annual_income: Option<Decimal>,
) -> Vec<GrowthPoint> {
    let mut value = current_value;
    if value.is_zero() {
        if let Some(income) = fallback_annual_income {
            value = income.saturating_mul(SEED_FRACTION);
        }
    }

    let annual_rate = weighted_return_rate(holdings, value);
    let monthly_rate = annual_rate / Decimal::from(12) / Decimal::ONE_HUNDRED;
    debug!(%value, %annual_rate, holdings = holdings.len(), "projecting growth");

    let first_of_month = start.with_day(1).unwrap_or(start);
    let mut points = Vec::with_capacity(PROJECTION_MONTHS as usize);
    for offset in 0..PROJECTION_MONTHS {
        value = value.saturating_mul(Decimal::ONE.saturating_add(monthly_rate));
        let month = first_of_month
            .checked_add_months(Months::new(offset))
            .unwrap_or(NaiveDate::MAX);
        points.push(GrowthPoint {
            date: month.format("%b %Y").to_string(),
            value: round_whole(value),
        });
    }
    points
}

pub fn portfolio_summary(holdings: &[Investment]) -> PortfolioSummary {
    let total_value = total(holdings.iter().map(|h| h.value));
    let total_initial = total(holdings.iter().map(|h| h.initial_value));
    let total_gain = total_value.saturating_sub(total_initial);
    let gain_percent = if total_initial.is_zero() {
        None
    } else {
        Some(percentage(total_gain, total_initial))
    };
    PortfolioSummary {
        holdings: holdings.len(),
        total_value,
        total_initial,
        total_gain,
        gain_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(value: i64, initial: i64, rate: i64) -> Investment {
        Investment {
            id: 1,
            name: "H".into(),
            value: Decimal::from(value),
            initial_value: Decimal::from(initial),
            return_rate: Decimal::from(rate),
            kind: "stock".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 17).unwrap()
    }

    #[test]
    fn seeds_from_income_with_default_rate() {
        let points = project_growth_from(start(), Decimal::ZERO, &[], Some(Decimal::from(1_200_000)));
        assert_eq!(points.len(), 24);
        assert_eq!(points[0].value, Decimal::from(121_000));
        for pair in points.windows(2) {
            assert!(pair[1].value > pair[0].value);
        }
    }

    #[test]
    fn labels_start_at_current_month_and_roll_over_years() {
        let points = project_growth_from(start(), Decimal::from(1000), &[], None);
        assert_eq!(points[0].date, "Nov 2025");
        assert_eq!(points[1].date, "Dec 2025");
        assert_eq!(points[2].date, "Jan 2026");
        assert_eq!(points[23].date, "Oct 2027");
    }

    #[test]
    fn compounding_uses_previous_value() {
        let points = project_growth_from(start(), Decimal::from(1_200_000), &[], None);
        // 1.2M at 10%/yr: one month adds 10_000, the second adds ~10_083.
        assert_eq!(points[0].value, Decimal::from(1_210_000));
        assert_eq!(points[1].value, Decimal::from(1_220_083));
    }

    #[test]
    fn weighted_rate_follows_holding_values() {
        let holdings = vec![holding(750, 500, 8), holding(250, 250, 4)];
        assert_eq!(
            weighted_return_rate(&holdings, Decimal::from(1000)),
            Decimal::from(7)
        );
        assert_eq!(weighted_return_rate(&[], Decimal::from(1000)), DEFAULT_ANNUAL_RATE);
        assert_eq!(weighted_return_rate(&holdings, Decimal::ZERO), DEFAULT_ANNUAL_RATE);
    }

    #[test]
    fn projection_is_deterministic() {
        let holdings = vec![holding(600, 400, 12), holding(400, 400, 3)];
        let a = project_growth_from(start(), Decimal::from(1000), &holdings, Some(Decimal::from(5)));
        let b = project_growth_from(start(), Decimal::from(1000), &holdings, Some(Decimal::from(5)));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_portfolio_without_income_stays_flat_at_zero() {
        let points = project_growth_from(start(), Decimal::ZERO, &[], None);
        assert_eq!(points.len(), 24);
        assert!(points.iter().all(|p| p.value.is_zero()));
    }

    #[test]
    fn huge_holdings_clamp_instead_of_overflowing() {
        let mut big = holding(0, 0, 5);
        big.value = Decimal::MAX;
        big.initial_value = Decimal::MAX;
        let points = project_growth_from(start(), Decimal::MAX, &[big.clone()], None);
        assert_eq!(points.len(), 24);
        assert!(points.iter().all(|p| p.value == Decimal::MAX));

        let s = portfolio_summary(&[big.clone(), big]);
        assert_eq!(s.total_value, Decimal::MAX);
    }

    #[test]
    fn portfolio_summary_guards_zero_initial() {
        let s = portfolio_summary(&[holding(100, 0, 5)]);
        assert_eq!(s.total_gain, Decimal::from(100));
        assert_eq!(s.gain_percent, None);

        let s = portfolio_summary(&[holding(150, 100, 5), holding(50, 100, 5)]);
        assert_eq!(s.total_gain, Decimal::ZERO);
        assert_eq!(s.gain_percent, Some(Decimal::ZERO));
    }

    #[test]
    fn growth_points_serialize_as_date_and_number() {
        let points = project_growth_from(start(), Decimal::from(1200), &[], None);
        let v = serde_json::to_value(&points[0]).unwrap();
        assert_eq!(v["date"], "Nov 2025");
        assert_eq!(v["value"], 1210.0);
    }
}
