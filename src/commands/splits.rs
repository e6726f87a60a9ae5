// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::finance::{ShareAmount, SplitRequest, unallocated};
use crate::models::{ShareStatus, SplitExpense, SplitMode};
use crate::store::{KeyValueStore, UserStore};
use crate::utils::{
    arg_opt, arg_str, maybe_print_json, parse_amount, parse_date, parse_list, pretty_table,
};
use anyhow::{Result, anyhow};
use chrono::Utc;
use tracing::warn;

pub fn handle<S: KeyValueStore>(store: &UserStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => create(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("settle", sub)) => settle(store, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn request_from_args(sub: &clap::ArgMatches) -> Result<SplitRequest> {
    let mode = arg_opt(sub, "mode").unwrap_or("equal").parse::<SplitMode>()?;
    match mode {
        SplitMode::Equal => Ok(SplitRequest::Equal),
        SplitMode::Custom => {
            let raw = arg_opt(sub, "amounts")
                .ok_or_else(|| anyhow!("--amounts is required with --mode custom"))?;
            let amounts = parse_list(raw)
                .iter()
                .map(|a| parse_amount(a))
                .collect::<Result<Vec<_>>>()?;
            Ok(SplitRequest::Custom(amounts))
        }
    }
}

fn create<S: KeyValueStore>(store: &UserStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let total = parse_amount(arg_str(sub, "total")?)?;
    let members = parse_list(arg_str(sub, "members")?);
    let request = request_from_args(sub)?;
    let created = match arg_opt(sub, "date") {
        Some(raw) => parse_date(raw)?,
        None => Utc::now().date_naive(),
    };
    let split = store.create_split(arg_str(sub, "description")?, total, &members, &request, created)?;

    let shares: Vec<ShareAmount> = split
        .shares
        .iter()
        .map(|s| ShareAmount {
            user_id: s.user_id.clone(),
            amount: s.amount,
        })
        .collect();
    let gap = unallocated(split.total_amount, &shares);
    if !gap.is_zero() {
        warn!(split = split.id, %gap, "custom shares do not add up to the total");
        println!("Warning: shares differ from the total by {:.2}", gap);
    }
    println!(
        "Split '{}' ({:.2}) across {} members (id {})",
        split.description,
        split.total_amount,
        split.shares.len(),
        split.id
    );
    Ok(())
}

fn list<S: KeyValueStore>(store: &UserStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let splits = store.splits()?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &splits)? {
        return Ok(());
    }
    let rows = splits.iter().flat_map(share_rows).collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Description", "Total", "Mode", "Member", "Share", "Status"],
            rows
        )
    );
    Ok(())
}

fn share_rows(split: &SplitExpense) -> Vec<Vec<String>> {
    split
        .shares
        .iter()
        .map(|share| {
            vec![
                split.id.to_string(),
                split.description.clone(),
                format!("{:.2}", split.total_amount),
                split.mode.to_string(),
                share.user_id.clone(),
                format!("{:.2}", share.amount),
                share.status.to_string(),
            ]
        })
        .collect()
}

fn settle<S: KeyValueStore>(store: &UserStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap_or(&0);
    let member = arg_str(sub, "member")?.trim();
    let status = arg_str(sub, "status")?.parse::<ShareStatus>()?;
    let share = store.settle_share(id, member, status)?;
    println!("Share of {} in split {} is now {}", share.user_id, id, share.status);
    Ok(())
}
