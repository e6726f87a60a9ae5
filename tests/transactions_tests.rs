// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetify::store::{MemoryStore, UserStore};
use budgetify::{cli, commands::transactions, models::FlowKind};
use rust_decimal::Decimal;

fn run(store: &UserStore<MemoryStore>, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["budgetify", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(store, tx_m)
    } else {
        panic!("no tx subcommand");
    }
}

fn setup() -> UserStore<MemoryStore> {
    let store = UserStore::new(MemoryStore::new(), "alice");
    for i in 1..=3 {
        let date = format!("2025-01-0{}", i);
        run(
            &store,
            &["add", "--date", &date, "--amount", "10", "--type", "expense", "--category", "Food"],
        )
        .unwrap();
    }
    run(
        &store,
        &["add", "--date", "2025-02-01", "--amount", "2500", "--type", "income", "--category", "Salary"],
    )
    .unwrap();
    store
}

fn list_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["budgetify", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", tx_m)) => match tx_m.subcommand() {
            Some(("list", list_m)) => list_m.clone(),
            _ => panic!("no list subcommand"),
        },
        _ => panic!("no tx subcommand"),
    }
}

#[test]
fn list_limit_respected() {
    let store = setup();
    let rows = transactions::query_rows(&store, &list_matches(&["--limit", "2"])).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date.to_string(), "2025-02-01");
    assert_eq!(rows[1].date.to_string(), "2025-01-03");
}

#[test]
fn list_filters_by_type_and_range() {
    let store = setup();
    let rows = transactions::query_rows(
        &store,
        &list_matches(&["--type", "expense", "--from", "2025-01-02", "--to", "2025-01-31"]),
    )
    .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|t| t.kind == FlowKind::Expense));
}

#[test]
fn add_rejects_unknown_type_and_negative_amount() {
    let store = UserStore::new(MemoryStore::new(), "alice");
    assert!(run(&store, &["add", "--date", "2025-01-01", "--amount", "5", "--type", "transfer"]).is_err());
    assert!(run(&store, &["add", "--date", "2025-01-01", "--amount=-5", "--type", "expense"]).is_err());
    assert!(
        run(
            &store,
            &["add", "--date", "2025-01-01", "--amount", "79228162514264337593543950335", "--type", "income"],
        )
        .is_err()
    );
    assert!(store.transactions().unwrap().is_empty());
}

#[test]
fn edit_replaces_the_whole_record() {
    let store = setup();
    run(
        &store,
        &["edit", "--id", "2", "--date", "2025-03-01", "--amount", "42.50", "--type", "income"],
    )
    .unwrap();
    let tx = store
        .transactions()
        .unwrap()
        .into_iter()
        .find(|t| t.id == 2)
        .unwrap();
    assert_eq!(tx.amount, Decimal::new(4250, 2));
    assert_eq!(tx.kind, FlowKind::Income);
    assert_eq!(tx.category, "");
    assert_eq!(tx.date.to_string(), "2025-03-01");
}

#[test]
fn remove_unknown_id_fails() {
    let store = setup();
    assert!(run(&store, &["rm", "--id", "99"]).is_err());
    run(&store, &["rm", "--id", "1"]).unwrap();
    assert_eq!(store.transactions().unwrap().len(), 3);
}
