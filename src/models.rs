// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FinanceError;
use crate::finance::numeric::percentage;

pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    Income,
    Expense,
}

impl FlowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::Income => "income",
            FlowKind::Expense => "expense",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowKind {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(FlowKind::Income),
            "expense" => Ok(FlowKind::Expense),
            _ => Err(FinanceError::UnknownFlowKind(s.trim().to_string())),
        }
    }
}

/// A dated income or expense row that the aggregations can reduce over.
pub trait Flow {
    fn kind(&self) -> FlowKind;
    fn amount(&self) -> Decimal;
    fn category(&self) -> &str;
    fn date(&self) -> NaiveDate;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub amount: Decimal,
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type")]
    pub kind: FlowKind,
    pub date: NaiveDate,
}

impl Flow for Transaction {
    fn kind(&self) -> FlowKind {
        self.kind
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: i64,
    pub name: String,
    pub value: Decimal,
    pub initial_value: Decimal,
    /// Annual return in percent, e.g. `7.5` for 7.5%.
    pub return_rate: Decimal,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_date: NaiveDate,
}

impl Investment {
    pub fn gain(&self) -> Decimal {
        self.value.saturating_sub(self.initial_value)
    }

    /// Gain relative to the initial value, `None` when nothing was invested.
    pub fn gain_percent(&self) -> Option<Decimal> {
        if self.initial_value.is_zero() {
            None
        } else {
            Some(percentage(self.gain(), self.initial_value))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSheet {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetEntry {
    pub id: i64,
    pub sheet_id: i64,
    #[serde(rename = "type")]
    pub kind: FlowKind,
    #[serde(default)]
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl Flow for BudgetEntry {
    fn kind(&self) -> FlowKind {
        self.kind
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareStatus {
    Pending,
    Paid,
    Declined,
}

impl ShareStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShareStatus::Pending => "pending",
            ShareStatus::Paid => "paid",
            ShareStatus::Declined => "declined",
        }
    }

    /// Moves a pending share to a settled state. Settled shares are final.
    pub fn transition(self, to: ShareStatus) -> Result<ShareStatus, FinanceError> {
        match (self, to) {
            (ShareStatus::Pending, ShareStatus::Paid | ShareStatus::Declined) => Ok(to),
            _ => Err(FinanceError::InvalidTransition { from: self, to }),
        }
    }
}

impl fmt::Display for ShareStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShareStatus {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ShareStatus::Pending),
            "paid" => Ok(ShareStatus::Paid),
            "declined" => Ok(ShareStatus::Declined),
            _ => Err(FinanceError::UnknownStatus(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    Equal,
    Custom,
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitMode::Equal => f.write_str("equal"),
            SplitMode::Custom => f.write_str("custom"),
        }
    }
}

impl FromStr for SplitMode {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" => Ok(SplitMode::Equal),
            "custom" => Ok(SplitMode::Custom),
            _ => Err(FinanceError::UnknownSplitMode(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    pub user_id: String,
    pub amount: Decimal,
    pub status: ShareStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitExpense {
    pub id: i64,
    pub creator_id: String,
    pub description: String,
    pub total_amount: Decimal,
    pub mode: SplitMode,
    pub shares: Vec<Share>,
    pub created: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn investment(value: &str, initial: &str) -> Investment {
        Investment {
            id: 1,
            name: "Index Fund".into(),
            value: Decimal::from_str(value).unwrap(),
            initial_value: Decimal::from_str(initial).unwrap(),
            return_rate: Decimal::from(7),
            kind: "fund".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn flow_kind_parses_case_insensitively() {
        assert_eq!(" Income ".parse::<FlowKind>().unwrap(), FlowKind::Income);
        assert_eq!("EXPENSE".parse::<FlowKind>().unwrap(), FlowKind::Expense);
        assert_eq!(
            "transfer".parse::<FlowKind>().unwrap_err(),
            FinanceError::UnknownFlowKind("transfer".into())
        );
    }

    #[test]
    fn transaction_serializes_type_field() {
        let tx = Transaction {
            id: 7,
            amount: Decimal::new(1250, 2),
            description: "Lunch".into(),
            category: "Food".into(),
            kind: FlowKind::Expense,
            date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
        };
        let v = serde_json::to_value(&tx).unwrap();
        assert_eq!(v["type"], "expense");
        assert_eq!(v["date"], "2025-03-04");
        let back: Transaction = serde_json::from_value(v).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn investment_gain_is_derived() {
        let inv = investment("1200", "1000");
        assert_eq!(inv.gain(), Decimal::from(200));
        assert_eq!(inv.gain_percent(), Some(Decimal::from(20)));
    }

    #[test]
    fn investment_gain_percent_guards_zero_initial() {
        let inv = investment("50", "0");
        assert_eq!(inv.gain(), Decimal::from(50));
        assert_eq!(inv.gain_percent(), None);
    }

    #[test]
    fn share_status_only_moves_forward_from_pending() {
        assert_eq!(
            ShareStatus::Pending.transition(ShareStatus::Paid),
            Ok(ShareStatus::Paid)
        );
        assert_eq!(
            ShareStatus::Pending.transition(ShareStatus::Declined),
            Ok(ShareStatus::Declined)
        );
        assert!(ShareStatus::Paid.transition(ShareStatus::Pending).is_err());
        assert!(ShareStatus::Declined.transition(ShareStatus::Paid).is_err());
        assert!(ShareStatus::Pending.transition(ShareStatus::Pending).is_err());
    }
}
