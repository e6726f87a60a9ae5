// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::finance::numeric::{percentage, total};
use crate::models::{Flow, FlowKind, UNCATEGORIZED};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategorySort {
    /// Keep first-encounter order.
    #[default]
    Encounter,
    ValueDesc,
    NameAsc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub percent: Decimal,
}

fn category_label(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNCATEGORIZED
    } else {
        trimmed
    }
}

/// Sums amounts per category in first-encounter order, optionally keeping
/// only one kind of flow. Categories that total zero are dropped.
pub fn group_by_category<F: Flow>(items: &[F], kind: Option<FlowKind>) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for item in items {
        if kind.is_some_and(|k| item.kind() != k) {
            continue;
        }
        let name = category_label(item.category());
        match index_by_name.get(name) {
            Some(&idx) => {
                let slot = &mut totals[idx].value;
                *slot = slot.saturating_add(item.amount());
            }
            None => {
                index_by_name.insert(name.to_string(), totals.len());
                totals.push(CategoryTotal {
                    name: name.to_string(),
                    value: item.amount(),
                });
            }
        }
    }

    totals.retain(|t| !t.value.is_zero());
    debug!(categories = totals.len(), ?kind, "grouped by category");
    totals
}

/// Stable sort, so ties keep their encounter order.
pub fn sort_categories(totals: &mut [CategoryTotal], order: CategorySort) {
    match order {
        CategorySort::Encounter => {}
        CategorySort::ValueDesc => totals.sort_by(|a, b| b.value.cmp(&a.value)),
        CategorySort::NameAsc => totals.sort_by(|a, b| a.name.cmp(&b.name)),
    }
}

pub fn category_shares(totals: &[CategoryTotal]) -> Vec<CategoryShare> {
    let sum = total(totals.iter().map(|t| t.value));
    totals
        .iter()
        .map(|t| CategoryShare {
            name: t.name.clone(),
            value: t.value,
            percent: percentage(t.value, sum),
        })
        .collect()
}
