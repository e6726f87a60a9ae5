// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::sheets::summary_table;
use crate::commands::transactions::range_from_args;
use crate::finance::numeric::{format_percent, total};
use crate::finance::{
    CategorySort, CategoryTotal, DateRange, GrowthPoint, IncomeBasis, Summary, TransactionFilter,
    category_shares, calculate_summary, group_by_category, monthly_cashflow, portfolio_summary,
    project_growth, sort_categories,
};
use crate::models::FlowKind;
use crate::store::{KeyValueStore, UserStore};
use crate::utils::{arg_opt, fmt_money, maybe_print_json, parse_amount, pretty_table};
use anyhow::{Result, anyhow};
use rust_decimal::Decimal;

pub fn handle<S: KeyValueStore>(store: &UserStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, sub)?,
        Some(("categories", sub)) => categories(store, sub)?,
        Some(("cashflow", sub)) => cashflow(store, sub)?,
        Some(("portfolio", sub)) => portfolio(store, sub)?,
        Some(("projection", sub)) => projection(store, sub)?,
        _ => {}
    }
    Ok(())
}

/// `stated` overrides the user's settings; otherwise the configured basis
/// applies.
pub fn summary_report<S: KeyValueStore>(
    store: &UserStore<S>,
    range: DateRange,
    stated: Option<Decimal>,
) -> Result<Summary> {
    let basis = match stated {
        Some(income) => IncomeBasis::Stated(income),
        None => store.settings()?.income_basis(),
    };
    let filter = TransactionFilter {
        range,
        ..TransactionFilter::default()
    };
    let rows = filter.apply(&store.transactions()?);
    Ok(calculate_summary(&rows, basis))
}

fn summary<S: KeyValueStore>(store: &UserStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let stated = arg_opt(sub, "stated-income").map(parse_amount).transpose()?;
    let s = summary_report(store, range_from_args(sub)?, stated)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let ccy = store.settings()?.currency;
    println!("{}", summary_table(&s, &ccy));
    Ok(())
}

pub fn parse_sort(raw: &str) -> Result<CategorySort> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "value" => Ok(CategorySort::ValueDesc),
        "name" => Ok(CategorySort::NameAsc),
        "none" => Ok(CategorySort::Encounter),
        other => Err(anyhow!("Unknown sort '{}', expected value|name|none", other)),
    }
}

pub fn category_report<S: KeyValueStore>(
    store: &UserStore<S>,
    kind: Option<FlowKind>,
    order: CategorySort,
    range: DateRange,
) -> Result<Vec<CategoryTotal>> {
    let filter = TransactionFilter {
        range,
        ..TransactionFilter::default()
    };
    let rows = filter.apply(&store.transactions()?);
    let mut totals = group_by_category(&rows, kind);
    sort_categories(&mut totals, order);
    Ok(totals)
}

fn categories<S: KeyValueStore>(store: &UserStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let kind = match arg_opt(sub, "type").unwrap_or("expense") {
        k if k.eq_ignore_ascii_case("all") => None,
        k => Some(k.parse::<FlowKind>()?),
    };
    let order = parse_sort(arg_opt(sub, "sort").unwrap_or("value"))?;
    let totals = category_report(store, kind, order, range_from_args(sub)?)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &totals)? {
        return Ok(());
    }
    let ccy = store.settings()?.currency;
    let rows = category_shares(&totals)
        .into_iter()
        .map(|c| vec![c.name, fmt_money(&c.value, &ccy), format_percent(c.percent)])
        .collect();
    println!("{}", pretty_table(&["Category", "Total", "Share"], rows));
    Ok(())
}

fn cashflow<S: KeyValueStore>(store: &UserStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);
    let flows = monthly_cashflow(&store.transactions()?);
    let skip = flows.len().saturating_sub(months);
    let recent: Vec<_> = flows.into_iter().skip(skip).collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &recent)? {
        return Ok(());
    }
    let data = recent
        .into_iter()
        .rev()
        .map(|f| {
            vec![
                f.month,
                format!("{:.2}", f.income),
                format!("{:.2}", f.expenses),
                format!("{:.2}", f.net),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expense", "Net"], data)
    );
    Ok(())
}

fn portfolio<S: KeyValueStore>(store: &UserStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let s = portfolio_summary(&store.investments()?);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let ccy = store.settings()?.currency;
    println!(
        "{}",
        pretty_table(
            &["Holdings", "Value", "Invested", "Gain", "Gain %"],
            vec![vec![
                s.holdings.to_string(),
                fmt_money(&s.total_value, &ccy),
                fmt_money(&s.total_initial, &ccy),
                fmt_money(&s.total_gain, &ccy),
                s.gain_percent
                    .map(format_percent)
                    .unwrap_or_else(|| "n/a".to_string()),
            ]],
        )
    );
    Ok(())
}

/// Projects the user's holdings; `income` (or the stated income from the
/// settings) seeds an empty portfolio.
pub fn projection_report<S: KeyValueStore>(
    store: &UserStore<S>,
    income: Option<Decimal>,
) -> Result<Vec<GrowthPoint>> {
    let holdings = store.investments()?;
    let current = total(holdings.iter().map(|h| h.value));
    let fallback = match income {
        Some(i) => Some(i),
        None => store.settings()?.stated_income,
    };
    Ok(project_growth(current, &holdings, fallback))
}

fn projection<S: KeyValueStore>(store: &UserStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let income = arg_opt(sub, "income").map(parse_amount).transpose()?;
    let points = projection_report(store, income)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &points)? {
        return Ok(());
    }
    let ccy = store.settings()?.currency;
    let rows = points
        .into_iter()
        .map(|p| vec![p.date, fmt_money(&p.value, &ccy)])
        .collect();
    println!("{}", pretty_table(&["Month", "Projected Value"], rows));
    Ok(())
}
