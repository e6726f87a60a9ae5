// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::finance::{DateRange, TransactionFilter};
use crate::models::{FlowKind, Transaction};
use crate::store::{KeyValueStore, UserStore};
use crate::utils::{arg_opt, arg_str, maybe_print_json, parse_amount, parse_date, pretty_table};
use anyhow::Result;
use tracing::warn;

pub fn handle<S: KeyValueStore>(store: &UserStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            store.remove_transaction(id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn read_transaction(sub: &clap::ArgMatches) -> Result<Transaction> {
    Ok(Transaction {
        id: 0,
        amount: parse_amount(arg_str(sub, "amount")?)?,
        description: arg_opt(sub, "description").unwrap_or_default().to_string(),
        category: arg_opt(sub, "category").unwrap_or_default().to_string(),
        kind: arg_str(sub, "type")?.parse::<FlowKind>()?,
        date: parse_date(arg_str(sub, "date")?)?,
    })
}

fn check_category<S: KeyValueStore>(store: &UserStore<S>, category: &str) -> Result<()> {
    if category.is_empty() {
        return Ok(());
    }
    let known = store.categories()?;
    if !known.is_empty() && !known.iter().any(|c| c.eq_ignore_ascii_case(category)) {
        warn!(category, "category is not in the user's category list");
    }
    Ok(())
}

fn add<S: KeyValueStore>(store: &UserStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let tx = read_transaction(sub)?;
    check_category(store, &tx.category)?;
    let saved = store.add_transaction(tx)?;
    println!(
        "Recorded {} {} on {} (id {})",
        saved.kind, saved.amount, saved.date, saved.id
    );
    Ok(())
}

fn edit<S: KeyValueStore>(store: &UserStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let mut tx = read_transaction(sub)?;
    tx.id = *sub.get_one::<i64>("id").unwrap_or(&0);
    check_category(store, &tx.category)?;
    store.replace_transaction(tx.clone())?;
    println!("Updated transaction {}", tx.id);
    Ok(())
}

fn list<S: KeyValueStore>(store: &UserStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.kind.to_string(),
                    format!("{:.2}", t.amount),
                    t.category.clone(),
                    t.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Amount", "Category", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

/// Reads the `--type/--category/--from/--to` filters off a subcommand.
pub fn filter_from_args(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    let kind = match arg_opt(sub, "type") {
        Some(k) => Some(k.parse::<FlowKind>()?),
        None => None,
    };
    Ok(TransactionFilter {
        kind,
        category: arg_opt(sub, "category").map(|s| s.to_string()),
        range: range_from_args(sub)?,
    })
}

pub fn range_from_args(sub: &clap::ArgMatches) -> Result<DateRange> {
    Ok(DateRange::new(
        arg_opt(sub, "from").map(parse_date).transpose()?,
        arg_opt(sub, "to").map(parse_date).transpose()?,
    ))
}

/// Newest first, optionally capped by `--limit`.
pub fn query_rows<S: KeyValueStore>(
    store: &UserStore<S>,
    sub: &clap::ArgMatches,
) -> Result<Vec<Transaction>> {
    let filter = filter_from_args(sub)?;
    let mut rows = filter.apply(&store.transactions()?);
    rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows)
}
