// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::FinanceError;
use crate::finance::numeric::{self, round_currency};
use crate::models::SplitMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitRequest {
    Equal,
    /// One amount per member, in member order.
    Custom(Vec<Decimal>),
}

impl SplitRequest {
    pub fn mode(&self) -> SplitMode {
        match self {
            SplitRequest::Equal => SplitMode::Equal,
            SplitRequest::Custom(_) => SplitMode::Custom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareAmount {
    pub user_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Splits `total` across `members`.
///
/// Equal splits round each share to cents and give the rounding remainder
/// to the last member, so the shares always add up to `total`. Custom
/// amounts are taken as given; use [`unallocated`] to see how far they are
/// from the total.
pub fn calculate_shares(
    total: Decimal,
    members: &[String],
    request: &SplitRequest,
) -> Result<Vec<ShareAmount>, FinanceError> {
    if total < Decimal::ZERO {
        return Err(FinanceError::NegativeAmount(total));
    }
    let Some((last, rest)) = members.split_last() else {
        return Ok(Vec::new());
    };

    match request {
        SplitRequest::Equal => {
            let each = round_currency(total / Decimal::from(members.len()));
            let mut shares: Vec<ShareAmount> = rest
                .iter()
                .map(|m| ShareAmount {
                    user_id: m.clone(),
                    amount: each,
                })
                .collect();
            let assigned = each.saturating_mul(Decimal::from(rest.len()));
            shares.push(ShareAmount {
                user_id: last.clone(),
                amount: total.saturating_sub(assigned),
            });
            Ok(shares)
        }
        SplitRequest::Custom(amounts) => {
            if amounts.len() != members.len() {
                return Err(FinanceError::ShareCountMismatch {
                    members: members.len(),
                    amounts: amounts.len(),
                });
            }
            if let Some(neg) = amounts.iter().find(|a| **a < Decimal::ZERO) {
                return Err(FinanceError::NegativeAmount(*neg));
            }
            Ok(members
                .iter()
                .zip(amounts)
                .map(|(m, a)| ShareAmount {
                    user_id: m.clone(),
                    amount: *a,
                })
                .collect())
        }
    }
}

/// `total` minus the sum of the shares; zero when the split reconciles.
pub fn unallocated(total: Decimal, shares: &[ShareAmount]) -> Decimal {
    total.saturating_sub(numeric::total(shares.iter().map(|s| s.amount)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn members(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn equal_split_last_member_absorbs_remainder() {
        let shares =
            calculate_shares(dec("100"), &members(&["a", "b", "c"]), &SplitRequest::Equal).unwrap();
        let amounts: Vec<_> = shares.iter().map(|s| s.amount).collect();
        assert_eq!(amounts, vec![dec("33.33"), dec("33.33"), dec("33.34")]);
        assert_eq!(shares[2].user_id, "c");
        assert_eq!(unallocated(dec("100"), &shares), Decimal::ZERO);
    }

    #[test]
    fn equal_split_remainder_can_be_negative() {
        let shares =
            calculate_shares(dec("200"), &members(&["a", "b", "c"]), &SplitRequest::Equal).unwrap();
        let amounts: Vec<_> = shares.iter().map(|s| s.amount).collect();
        assert_eq!(amounts, vec![dec("66.67"), dec("66.67"), dec("66.66")]);
        assert_eq!(unallocated(dec("200"), &shares), Decimal::ZERO);
    }

    #[test]
    fn even_split_has_no_remainder() {
        let shares =
            calculate_shares(dec("90"), &members(&["a", "b"]), &SplitRequest::Equal).unwrap();
        assert!(shares.iter().all(|s| s.amount == dec("45")));
    }

    #[test]
    fn no_members_means_no_shares() {
        let shares = calculate_shares(dec("10"), &[], &SplitRequest::Equal).unwrap();
        assert!(shares.is_empty());
    }

    #[test]
    fn negative_total_is_rejected() {
        let err =
            calculate_shares(dec("-1"), &members(&["a"]), &SplitRequest::Equal).unwrap_err();
        assert_eq!(err, FinanceError::NegativeAmount(dec("-1")));
    }

    #[test]
    fn custom_amounts_are_not_checked_against_total() {
        let req = SplitRequest::Custom(vec![dec("10"), dec("15")]);
        let shares = calculate_shares(dec("30"), &members(&["a", "b"]), &req).unwrap();
        assert_eq!(shares[1].amount, dec("15"));
        assert_eq!(unallocated(dec("30"), &shares), dec("5"));
    }

    #[test]
    fn custom_amounts_must_match_member_count() {
        let req = SplitRequest::Custom(vec![dec("10")]);
        let err = calculate_shares(dec("30"), &members(&["a", "b"]), &req).unwrap_err();
        assert_eq!(
            err,
            FinanceError::ShareCountMismatch {
                members: 2,
                amounts: 1
            }
        );
    }
}
