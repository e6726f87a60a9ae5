// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::finance::numeric::format_percent;
use crate::models::Investment;
use crate::store::{KeyValueStore, UserStore};
use crate::utils::{
    arg_opt, arg_str, maybe_print_json, parse_amount, parse_date, parse_decimal, pretty_table,
};
use anyhow::Result;
use chrono::Utc;

pub fn handle<S: KeyValueStore>(store: &UserStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            store.remove_investment(id)?;
            println!("Removed investment {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add<S: KeyValueStore>(store: &UserStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let value = parse_amount(arg_str(sub, "value")?)?;
    let initial_value = match arg_opt(sub, "initial") {
        Some(raw) => parse_amount(raw)?,
        None => value,
    };
    let start_date = match arg_opt(sub, "start") {
        Some(raw) => parse_date(raw)?,
        None => Utc::now().date_naive(),
    };
    let inv = Investment {
        id: 0,
        name: arg_str(sub, "name")?.trim().to_string(),
        value,
        initial_value,
        // may be negative
        return_rate: parse_decimal(arg_str(sub, "rate")?)?,
        kind: arg_opt(sub, "type").unwrap_or("other").to_string(),
        start_date,
    };
    let saved = store.add_investment(inv)?;
    println!(
        "Added investment '{}' worth {} at {}%/yr (id {})",
        saved.name, saved.value, saved.return_rate, saved.id
    );
    Ok(())
}

fn list<S: KeyValueStore>(store: &UserStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let holdings = store.investments()?;
    if maybe_print_json(json_flag, jsonl_flag, &holdings)? {
        return Ok(());
    }
    let rows = holdings
        .iter()
        .map(|h| {
            vec![
                h.id.to_string(),
                h.name.clone(),
                h.kind.clone(),
                format!("{:.2}", h.value),
                format!("{:.2}", h.gain()),
                h.gain_percent()
                    .map(format_percent)
                    .unwrap_or_else(|| "n/a".to_string()),
                format_percent(h.return_rate),
                h.start_date.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Name", "Type", "Value", "Gain", "Gain %", "Return/yr", "Since"],
            rows
        )
    );
    Ok(())
}
