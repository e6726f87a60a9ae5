// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Income/expense totals, savings rate, and monthly cashflow.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::finance::numeric::percentage;
use crate::models::{Flow, FlowKind};

/// Which income figure the savings rate is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncomeBasis {
    /// Sum of the income rows being summarized.
    #[default]
    Transactions,
    /// A user-declared income figure; income rows are ignored.
    Stated(Decimal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub savings_rate: Decimal,
}

pub fn calculate_summary<F: Flow>(items: &[F], basis: IncomeBasis) -> Summary {
    let mut earned = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    for item in items {
        match item.kind() {
            FlowKind::Income => earned = earned.saturating_add(item.amount()),
            FlowKind::Expense => expenses = expenses.saturating_add(item.amount()),
        }
    }
    let income = match basis {
        IncomeBasis::Transactions => earned,
        IncomeBasis::Stated(stated) => stated,
    };
    let balance = income.saturating_sub(expenses);
    let savings_rate = if income > Decimal::ZERO {
        percentage(balance, income)
    } else {
        Decimal::ZERO
    };
    debug!(rows = items.len(), ?basis, %income, %expenses, "summary computed");
    Summary {
        income,
        expenses,
        balance,
        savings_rate,
    }
}

/// Inclusive date bounds; a missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|f| date >= f) && self.to.is_none_or(|t| date <= t)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<FlowKind>,
    pub category: Option<String>,
    pub range: DateRange,
}

impl TransactionFilter {
    pub fn matches<F: Flow>(&self, item: &F) -> bool {
        if let Some(kind) = self.kind {
            if item.kind() != kind {
                return false;
            }
        }
        if let Some(ref cat) = self.category {
            if !item.category().trim().eq_ignore_ascii_case(cat.trim()) {
                return false;
            }
        }
        self.range.contains(item.date())
    }

    pub fn apply<F: Flow + Clone>(&self, items: &[F]) -> Vec<F> {
        items.iter().filter(|i| self.matches(*i)).cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyFlow {
    pub month: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net: Decimal,
}

/// Income and expenses per `YYYY-MM`, oldest month first.
pub fn monthly_cashflow<F: Flow>(items: &[F]) -> Vec<MonthlyFlow> {
    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for item in items {
        let entry = map
            .entry(item.date().format("%Y-%m").to_string())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match item.kind() {
            FlowKind::Income => entry.0 = entry.0.saturating_add(item.amount()),
            FlowKind::Expense => entry.1 = entry.1.saturating_add(item.amount()),
        }
    }
    map.into_iter()
        .map(|(month, (income, expenses))| MonthlyFlow {
            month,
            income,
            expenses,
            net: income.saturating_sub(expenses),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transaction;
    use std::str::FromStr;

    fn tx(amount: &str, kind: FlowKind, category: &str, date: &str) -> Transaction {
        Transaction {
            id: 0,
            amount: Decimal::from_str(amount).unwrap(),
            description: String::new(),
            category: category.into(),
            kind,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    fn scenario() -> Vec<Transaction> {
        vec![
            tx("5000", FlowKind::Income, "Salary", "2025-01-01"),
            tx("1200", FlowKind::Expense, "Food", "2025-01-05"),
            tx("800", FlowKind::Expense, "Food", "2025-02-10"),
        ]
    }

    #[test]
    fn totals_clamp_at_decimal_bounds() {
        let mut big = tx("0", FlowKind::Income, "Salary", "2025-01-01");
        big.amount = Decimal::MAX;
        let mut spent = big.clone();
        spent.kind = FlowKind::Expense;
        let rows = vec![big.clone(), big, spent.clone(), spent];
        let s = calculate_summary(&rows, IncomeBasis::Transactions);
        assert_eq!(s.income, Decimal::MAX);
        assert_eq!(s.expenses, Decimal::MAX);
        assert!(s.balance.is_zero());

        let flows = monthly_cashflow(&rows);
        assert_eq!(flows[0].income, Decimal::MAX);
        assert!(flows[0].net.is_zero());
    }

    #[test]
    fn summary_of_scenario_uses_transaction_income() {
        let s = calculate_summary(&scenario(), IncomeBasis::Transactions);
        assert_eq!(s.income, Decimal::from(5000));
        assert_eq!(s.expenses, Decimal::from(2000));
        assert_eq!(s.balance, Decimal::from(3000));
        assert_eq!(s.savings_rate, Decimal::from(60));
    }

    #[test]
    fn empty_summary_is_all_zero() {
        let s = calculate_summary::<Transaction>(&[], IncomeBasis::Transactions);
        assert_eq!(s, Summary::default());
        let s = calculate_summary::<Transaction>(&[], IncomeBasis::Stated(Decimal::ZERO));
        assert_eq!(s, Summary::default());
    }

    #[test]
    fn stated_income_replaces_summed_income() {
        let s = calculate_summary(&scenario(), IncomeBasis::Stated(Decimal::from(4000)));
        assert_eq!(s.income, Decimal::from(4000));
        assert_eq!(s.balance, Decimal::from(2000));
        assert_eq!(s.savings_rate, Decimal::from(50));
    }

    #[test]
    fn balance_always_equals_income_minus_expenses() {
        let rows = vec![
            tx("10.10", FlowKind::Income, "", "2025-01-01"),
            tx("20.20", FlowKind::Expense, "Rent", "2025-01-02"),
            tx("0.01", FlowKind::Expense, "Fees", "2025-01-03"),
        ];
        let s = calculate_summary(&rows, IncomeBasis::Transactions);
        assert_eq!(s.income - s.expenses, s.balance);
        assert_eq!(s.balance, Decimal::from_str("-10.11").unwrap());
        assert!(s.savings_rate < Decimal::ZERO);
    }

    #[test]
    fn no_income_means_zero_savings_rate() {
        let rows = vec![tx("50", FlowKind::Expense, "Food", "2025-01-01")];
        let s = calculate_summary(&rows, IncomeBasis::Transactions);
        assert_eq!(s.savings_rate, Decimal::ZERO);
        assert_eq!(s.balance, Decimal::from(-50));
    }

    #[test]
    fn summary_serializes_chart_field_names() {
        let s = calculate_summary(&scenario(), IncomeBasis::Transactions);
        let v = serde_json::to_value(s).unwrap();
        assert_eq!(v["savingsRate"], 60.0);
        assert_eq!(v["balance"], 3000.0);
    }

    #[test]
    fn filter_matches_kind_category_and_range() {
        let filter = TransactionFilter {
            kind: Some(FlowKind::Expense),
            category: Some("food".into()),
            range: DateRange::new(
                NaiveDate::from_ymd_opt(2025, 2, 1),
                NaiveDate::from_ymd_opt(2025, 2, 28),
            ),
        };
        let rows = filter.apply(&scenario());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, Decimal::from(800));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let range = DateRange::new(Some(day), Some(day));
        assert!(range.contains(day));
        assert!(!range.contains(day.succ_opt().unwrap()));
        assert!(DateRange::default().contains(day));
    }

    #[test]
    fn cashflow_groups_by_month_in_order() {
        let flows = monthly_cashflow(&scenario());
        assert_eq!(flows.len(), 2);
        assert_eq!(flows[0].month, "2025-01");
        assert_eq!(flows[0].income, Decimal::from(5000));
        assert_eq!(flows[0].expenses, Decimal::from(1200));
        assert_eq!(flows[0].net, Decimal::from(3800));
        assert_eq!(flows[1].month, "2025-02");
        assert_eq!(flows[1].net, Decimal::from(-800));
    }
}
