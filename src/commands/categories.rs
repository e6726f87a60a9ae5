// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{KeyValueStore, UserStore};
use crate::utils::{arg_str, pretty_table};
use anyhow::Result;

pub fn handle<S: KeyValueStore>(store: &UserStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = arg_str(sub, "name")?.trim();
            store.add_category(name)?;
            println!("Added category '{}'", name);
        }
        Some(("list", _)) => {
            let data = store
                .categories()?
                .into_iter()
                .map(|c| vec![c])
                .collect();
            println!("{}", pretty_table(&["Category"], data));
        }
        Some(("rm", sub)) => {
            let name = arg_str(sub, "name")?.trim();
            store.remove_category(name)?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
