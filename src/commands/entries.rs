// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{BudgetEntry, FlowKind};
use crate::store::{KeyValueStore, UserStore};
use crate::utils::{arg_opt, arg_str, maybe_print_json, parse_amount, parse_date, pretty_table};
use anyhow::Result;

pub fn handle<S: KeyValueStore>(store: &UserStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            store.remove_entry(id)?;
            println!("Removed budget entry {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add<S: KeyValueStore>(store: &UserStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let sheet = store.sheet_by_name(arg_str(sub, "sheet")?)?;
    let entry = BudgetEntry {
        id: 0,
        sheet_id: sheet.id,
        kind: arg_str(sub, "type")?.parse::<FlowKind>()?,
        category: arg_opt(sub, "category").unwrap_or_default().to_string(),
        amount: parse_amount(arg_str(sub, "amount")?)?,
        date: parse_date(arg_str(sub, "date")?)?,
        description: arg_opt(sub, "description").map(|s| s.to_string()),
    };
    let saved = store.add_entry(entry)?;
    println!(
        "Added {} {} to '{}' (id {})",
        saved.kind, saved.amount, sheet.name, saved.id
    );
    Ok(())
}

fn list<S: KeyValueStore>(store: &UserStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let sheet = store.sheet_by_name(arg_str(sub, "sheet")?)?;
    let mut entries = store.budget_entries(sheet.id)?;
    entries.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &entries)? {
        return Ok(());
    }
    let rows = entries
        .into_iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.date.to_string(),
                e.kind.to_string(),
                format!("{:.2}", e.amount),
                e.category,
                e.description.unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Type", "Amount", "Category", "Description"],
            rows
        )
    );
    Ok(())
}
