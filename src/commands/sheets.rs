// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::finance::numeric::format_percent;
use crate::finance::{IncomeBasis, Summary, calculate_summary};
use crate::store::{KeyValueStore, UserStore};
use crate::utils::{arg_str, fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<S: KeyValueStore>(store: &UserStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => {
            let sheet = store.create_sheet(arg_str(sub, "name")?)?;
            println!("Created budget sheet '{}' (id {})", sheet.name, sheet.id);
        }
        Some(("list", _)) => {
            let mut data = Vec::new();
            for sheet in store.budget_sheets()? {
                let entries = store.budget_entries(sheet.id)?;
                data.push(vec![
                    sheet.id.to_string(),
                    sheet.name,
                    entries.len().to_string(),
                ]);
            }
            println!("{}", pretty_table(&["ID", "Name", "Entries"], data));
        }
        Some(("rm", sub)) => {
            let sheet = store.sheet_by_name(arg_str(sub, "name")?)?;
            store.remove_sheet(sheet.id)?;
            println!("Removed budget sheet '{}' and its entries", sheet.name);
        }
        Some(("summary", sub)) => summary(store, sub)?,
        _ => {}
    }
    Ok(())
}

/// A sheet is self-contained, so its own income entries are the basis.
pub fn sheet_summary<S: KeyValueStore>(store: &UserStore<S>, name: &str) -> Result<Summary> {
    let sheet = store.sheet_by_name(name)?;
    let entries = store.budget_entries(sheet.id)?;
    Ok(calculate_summary(&entries, IncomeBasis::Transactions))
}

fn summary<S: KeyValueStore>(store: &UserStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let s = sheet_summary(store, arg_str(sub, "sheet")?)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let ccy = store.settings()?.currency;
    println!("{}", summary_table(&s, &ccy));
    Ok(())
}

pub fn summary_table(s: &Summary, ccy: &str) -> comfy_table::Table {
    pretty_table(
        &["Income", "Expenses", "Balance", "Savings Rate"],
        vec![vec![
            fmt_money(&s.income, ccy),
            fmt_money(&s.expenses, ccy),
            fmt_money(&s.balance, ccy),
            format_percent(s.savings_rate),
        ]],
    )
}
