// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure aggregations over already-loaded rows. Nothing in here performs I/O
//! or keeps state between calls.

pub mod categories;
pub mod numeric;
pub mod projection;
pub mod splits;
pub mod summary;

pub use categories::{
    CategoryShare, CategorySort, CategoryTotal, category_shares, group_by_category,
    sort_categories,
};
pub use projection::{
    GrowthPoint, PortfolioSummary, portfolio_summary, project_growth, project_growth_from,
    weighted_return_rate,
};
pub use splits::{ShareAmount, SplitRequest, calculate_shares, unallocated};
pub use summary::{
    DateRange, IncomeBasis, MonthlyFlow, Summary, TransactionFilter, calculate_summary,
    monthly_cashflow,
};
